//! Output dialects and their fixed formatting policies
//!
//! Each dialect is described by a static [`DialectPolicy`] capability table
//! that is selected once from the output file extension and consulted by
//! value afterwards.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::type_name::{GenericArg, Generics, TypeName};
use crate::CoreError;

/// Supported output source flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Java,
    Scala,
    Kotlin,
}

/// Capability table for one dialect
#[derive(Debug, PartialEq, Eq)]
pub struct DialectPolicy {
    pub dialect: Dialect,
    /// File extension without the dot
    pub extension: &'static str,
    /// One level of indentation
    pub indent: &'static str,
    /// Statement terminator for `package` and `import` lines
    pub terminator: &'static str,
    /// Namespace whose members never need an import
    pub ambient_namespace: Option<&'static str>,
    /// Namespace whose direct (single segment) members never need an import
    pub ambient_single_segment: Option<&'static str>,
    /// Boxed types renamed to native equivalents before resolution
    pub native_types: &'static [(&'static str, &'static str)],
    /// Generic wrapper replacing the `[]` array suffix
    pub array_type: Option<&'static str>,
    /// Whether `serialVersionUID` declarations are emitted
    pub serial_version_uid: bool,
}

static JAVA: DialectPolicy = DialectPolicy {
    dialect: Dialect::Java,
    extension: "java",
    indent: "    ",
    terminator: ";",
    ambient_namespace: Some("java.lang."),
    ambient_single_segment: None,
    native_types: &[],
    array_type: None,
    serial_version_uid: true,
};

// java.lang imports stay explicit in Scala output for interoperability.
static SCALA: DialectPolicy = DialectPolicy {
    dialect: Dialect::Scala,
    extension: "scala",
    indent: "  ",
    terminator: "",
    ambient_namespace: None,
    ambient_single_segment: None,
    native_types: &[],
    array_type: None,
    serial_version_uid: false,
};

static KOTLIN: DialectPolicy = DialectPolicy {
    dialect: Dialect::Kotlin,
    extension: "kt",
    indent: "    ",
    terminator: "",
    ambient_namespace: Some("java.lang."),
    ambient_single_segment: Some("kotlin."),
    native_types: &[
        ("java.lang.Integer", "kotlin.Int"),
        ("java.lang.Object", "kotlin.Any"),
    ],
    array_type: Some("kotlin.Array"),
    serial_version_uid: false,
};

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Java, Dialect::Scala, Dialect::Kotlin];

    pub fn policy(self) -> &'static DialectPolicy {
        match self {
            Dialect::Java => &JAVA,
            Dialect::Scala => &SCALA,
            Dialect::Kotlin => &KOTLIN,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.policy().extension == extension)
    }

    /// Select the dialect for an output file and derive its class name
    ///
    /// `out/com/acme/Table.java` yields `(Dialect::Java, "Table")`.
    pub fn for_path(path: &Path) -> Result<(Self, String), CoreError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| CoreError::MissingFileName(path.to_path_buf()))?;

        let (class_name, extension) = file_name
            .rsplit_once('.')
            .ok_or_else(|| CoreError::UnknownExtension(file_name.to_string()))?;

        let dialect = Self::from_extension(extension)
            .ok_or_else(|| CoreError::UnknownExtension(extension.to_string()))?;

        Ok((dialect, class_name.to_string()))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Java => write!(f, "Java"),
            Dialect::Scala => write!(f, "Scala"),
            Dialect::Kotlin => write!(f, "Kotlin"),
        }
    }
}

impl DialectPolicy {
    pub fn package_statement(&self, package: &str) -> String {
        format!("package {}{}", package, self.terminator)
    }

    pub fn import_statement(&self, qualified: &str) -> String {
        format!("import {}{}", qualified, self.terminator)
    }

    /// Whether a qualified name is available without an import
    pub fn is_ambient(&self, qualified: &str) -> bool {
        if self
            .ambient_namespace
            .is_some_and(|namespace| qualified.starts_with(namespace))
        {
            return true;
        }

        // kotlin.Int is implicit, kotlin.collections.List is not
        self.ambient_single_segment
            .and_then(|namespace| qualified.strip_prefix(namespace))
            .is_some_and(|rest| !rest.contains('.'))
    }

    /// Rename boxed and array types to the dialect's native spelling
    ///
    /// For Kotlin, `java.lang.Integer[][]` becomes
    /// `kotlin.Array<kotlin.Array<kotlin.Int?>?>`. Other dialects return the
    /// input unchanged.
    pub fn native_name(&self, type_name: &str) -> String {
        let mut base = type_name;
        let mut dimensions = 0;

        if self.array_type.is_some() {
            while let Some(element) = base.strip_suffix("[]") {
                base = element;
                dimensions += 1;
            }
        }

        let mut renamed = self
            .native_types
            .iter()
            .find(|(boxed, _)| *boxed == base)
            .map_or(base, |(_, native)| *native)
            .to_string();

        if let Some(array_type) = self.array_type {
            for _ in 0..dimensions {
                renamed = format!("{}<{}?>", array_type, renamed);
            }
        }

        renamed
    }

    /// [`native_name`](Self::native_name) for one parsed node
    ///
    /// Only the node itself is renamed; its generic arguments are left for
    /// the caller to visit.
    pub fn native_type(&self, ty: TypeName) -> TypeName {
        let dimensions = match self.array_type {
            Some(_) => ty.generics().array_dimensions(),
            None => 0,
        };
        if dimensions == 0 && !ty.generics().is_none() {
            return ty;
        }

        let (segments, _) = ty.into_parts();
        let path = segments.join(".");
        let segments = match self.native_types.iter().find(|(boxed, _)| *boxed == path) {
            Some((_, native)) => native.split('.').map(str::to_string).collect(),
            None => segments,
        };

        let mut renamed = TypeName::new(segments, Generics::None);
        if let Some(array_type) = self.array_type {
            for _ in 0..dimensions {
                renamed = TypeName::new(
                    array_type.split('.').map(str::to_string).collect(),
                    Generics::Plain {
                        open: '<',
                        close: '>',
                        args: vec![GenericArg {
                            ty: renamed,
                            nullable: true,
                        }],
                    },
                );
            }
        }

        renamed
    }
}
