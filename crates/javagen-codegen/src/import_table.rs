//! Import bookkeeping for one generated file
//!
//! The `ImportTable` is the single source of truth for which types a file
//! refers to by their simple name:
//! - Simple name -> qualified name bindings (at most one per simple name)
//! - The set of all qualified names to import
//!
//! Bindings are never removed or replaced. A later reference to an already
//! bound simple name under a different qualified name is refused, and the
//! caller writes that reference fully qualified instead.
//!
//! ## Usage
//!
//! ```
//! use javagen_codegen::import_table::{ImportTable, LexicalOrdering};
//!
//! let mut table = ImportTable::new();
//! assert!(table.bind("Widget", "com.a.Widget"));
//! assert!(!table.bind("Widget", "com.b.Widget"));
//! assert_eq!(table.ordered(&LexicalOrdering), vec!["com.a.Widget"]);
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Sort order of import statements
pub trait ImportOrdering: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// Human-readable name (for debugging)
    fn name(&self) -> &str;
}

/// Plain lexical order of qualified names
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalOrdering;

impl ImportOrdering for LexicalOrdering {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }

    fn name(&self) -> &str {
        "LexicalOrdering"
    }
}

/// Accumulated imports of one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    /// All qualified names to import
    qualified: BTreeSet<String>,
    /// Simple name -> qualified name
    bindings: BTreeMap<String, String>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `simple` may refer to `qualified` in this file
    pub fn can_bind(&self, simple: &str, qualified: &str) -> bool {
        self.bindings
            .get(simple)
            .map_or(true, |existing| existing == qualified)
    }

    /// Bind a simple name to a qualified name
    ///
    /// Returns `false` (and changes nothing) when the simple name is already
    /// bound to another qualified name.
    pub fn bind(&mut self, simple: &str, qualified: &str) -> bool {
        if !self.can_bind(simple, qualified) {
            return false;
        }

        self.bindings
            .entry(simple.to_string())
            .or_insert_with(|| qualified.to_string());
        self.qualified.insert(qualified.to_string());
        true
    }

    /// The qualified name bound to a simple name
    pub fn binding(&self, simple: &str) -> Option<&str> {
        self.bindings.get(simple).map(String::as_str)
    }

    /// Bindings ordered by simple name
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(s, q)| (s.as_str(), q.as_str()))
    }

    /// Qualified names in the given order
    pub fn ordered(&self, ordering: &dyn ImportOrdering) -> Vec<&str> {
        let mut names: Vec<&str> = self.qualified.iter().map(String::as_str).collect();
        names.sort_by(|a, b| ordering.compare(a, b));
        names
    }

    pub fn contains(&self, qualified: &str) -> bool {
        self.qualified.contains(qualified)
    }

    pub fn len(&self) -> usize {
        self.qualified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qualified.is_empty()
    }

    pub fn stats(&self) -> ImportStats {
        let top_level_packages = self
            .qualified
            .iter()
            .map(|q| top_level_package(q))
            .collect::<BTreeSet<_>>()
            .len();

        ImportStats {
            qualified_types: self.qualified.len(),
            bindings: self.bindings.len(),
            top_level_packages,
        }
    }
}

/// Text before the first dot (`java` for `java.util.List`)
pub fn top_level_package(qualified: &str) -> &str {
    qualified.split('.').next().unwrap_or(qualified)
}

/// Statistics about a file's imports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub qualified_types: usize,
    pub bindings: usize,
    pub top_level_packages: usize,
}
