//! Deferred substitution pass
//!
//! Runs once per file, after the last body write. Both substitutions read the
//! same body snapshot (the document text with all markers left out):
//! - the import block is built from the final [`ImportTable`], grouped by
//!   top-level package and filtered against the package declared in the body
//! - the serialization id is a hash of the snapshot, so identical bodies
//!   always get identical ids

use javagen_core::DialectPolicy;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::import_table::{top_level_package, ImportOrdering, ImportTable};
use crate::text_writer::{Document, Marker};

static PACKAGE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*package[ \t]+([\p{L}_][\p{L}\p{N}_]*(?:\.[\p{L}_][\p{L}\p{N}_]*)*)[ \t]*;?[ \t]*\r?$")
        .expect("package declaration pattern compiles")
});

/// Why an import entry was left out of the import block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elision {
    /// Implicitly available in the dialect
    Ambient,
    /// Names the generated class itself
    OwnClass,
    /// Lives in the declared package
    SamePackage,
}

/// Grouped, filtered import statements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBlock {
    pub text: String,
    /// Qualified names that got an import statement, in output order
    pub emitted: Vec<String>,
    pub elided: Vec<(String, Elision)>,
}

/// Final text of one file plus what went into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalized {
    pub text: String,
    pub imports: ImportBlock,
    pub package: Option<String>,
    pub serial_version_uid: Option<i32>,
}

/// Inputs of the substitution pass that do not change per file body
pub struct Finalizer<'a> {
    pub policy: &'static DialectPolicy,
    pub class_name: &'a str,
    pub ordering: &'a dyn ImportOrdering,
    pub newline: &'a str,
}

impl Finalizer<'_> {
    pub fn finalize(&self, document: &Document, table: &ImportTable) -> Finalized {
        let snapshot = document.text();

        let package = declared_package(&snapshot);
        if package.is_none() {
            debug!(
                "No package declaration found for {}, same-package imports are kept",
                self.class_name
            );
        }

        let imports = self.import_block(table, package.as_deref());
        let serial_version_uid = document
            .contains(Marker::SerialVersionUid)
            .then(|| java_hash_code(&snapshot));

        let text = document.render(|marker| match marker {
            Marker::ImportBlock => imports.text.clone(),
            Marker::SerialVersionUid => serial_version_uid.unwrap_or_default().to_string(),
        });

        Finalized {
            text,
            imports,
            package,
            serial_version_uid,
        }
    }

    /// Build the import block for the given declared package
    pub fn import_block(&self, table: &ImportTable, package: Option<&str>) -> ImportBlock {
        let mut block = ImportBlock::default();
        let mut previous = "";

        for qualified in table.ordered(self.ordering) {
            if let Some(reason) = self.elision(qualified, package) {
                debug!("Eliding import {} ({:?})", qualified, reason);
                block.elided.push((qualified.to_string(), reason));
                continue;
            }

            let top_level = top_level_package(qualified);
            if top_level != previous {
                block.text.push_str(self.newline);
            }

            block.text.push_str(&self.policy.import_statement(qualified));
            block.text.push_str(self.newline);
            block.emitted.push(qualified.to_string());
            previous = top_level;
        }

        block
    }

    fn elision(&self, qualified: &str, package: Option<&str>) -> Option<Elision> {
        if self.policy.is_ambient(qualified) {
            return Some(Elision::Ambient);
        }

        if qualified
            .strip_suffix(self.class_name)
            .is_some_and(|prefix| prefix.ends_with('.'))
        {
            return Some(Elision::OwnClass);
        }

        let same_package = package.is_some_and(|package| {
            qualified
                .strip_prefix(package)
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|rest| !rest.contains('.'))
        });

        same_package.then_some(Elision::SamePackage)
    }
}

/// The first package declared in a body
pub fn declared_package(text: &str) -> Option<String> {
    PACKAGE_DECLARATION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// 32-bit polynomial hash over UTF-16 code units (`h * 31 + unit`, wrapping)
pub fn java_hash_code(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
