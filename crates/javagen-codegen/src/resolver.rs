//! Type reference resolution
//!
//! Decides, for every type mentioned while a file body is being written,
//! whether it can be written by its simple name (recording an import
//! obligation in the file's [`ImportTable`]) or must stay fully qualified.
//!
//! Resolution never fails. Anything that does not look like a qualified type
//! reference, collides with an earlier binding, or would shadow the class
//! being generated is written exactly as given (after dialect renaming).

use javagen_core::{DialectPolicy, Generics, TypeName};
use regex::Regex;
use tracing::{debug, trace};

use crate::import_table::ImportTable;
use crate::CodegenError;

/// Identity of the file being generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileScope {
    /// Output file name without extension
    pub class_name: String,
    /// Set once the package declaration has been written
    pub package_name: Option<String>,
}

impl FileScope {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            package_name: None,
        }
    }

    /// Whether `qualified` names the class being generated
    pub fn is_self(&self, qualified: &str) -> bool {
        self.package_name.as_deref().is_some_and(|package| {
            qualified
                .strip_prefix(package)
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|class| class == self.class_name)
        })
    }
}

/// Resolves qualified type names against one file's import table
#[derive(Debug, Clone)]
pub struct TypeResolver {
    policy: &'static DialectPolicy,
    /// Types that are never imported
    fully_qualified: Option<Regex>,
}

impl TypeResolver {
    pub fn new(policy: &'static DialectPolicy) -> Self {
        Self {
            policy,
            fully_qualified: None,
        }
    }

    /// Never import types whose (renamed) name fully matches `pattern`
    pub fn with_fully_qualified_types(mut self, pattern: &str) -> Result<Self, CodegenError> {
        let anchored = format!("^(?:{})$", pattern);
        let regex = Regex::new(&anchored).map_err(|source| CodegenError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.fully_qualified = Some(regex);
        Ok(self)
    }

    pub fn policy(&self) -> &'static DialectPolicy {
        self.policy
    }

    /// Resolve a type reference to the text that should be written
    ///
    /// `keep_segments` is the number of trailing path segments, starting with
    /// the class name, that stay literal: `com.acme.Table.TABLE.COLUMN` with
    /// `keep_segments = 3` imports `com.acme.Table` and yields
    /// `Table.TABLE.COLUMN`. Plain types use `keep_segments = 1`.
    pub fn resolve(
        &self,
        table: &mut ImportTable,
        scope: &FileScope,
        type_name: &str,
        keep_segments: usize,
    ) -> String {
        // Unqualified and primitive types
        if !type_name.contains('.') {
            return type_name.to_string();
        }

        match TypeName::parse(type_name) {
            Ok(parsed) => self.resolve_tree(table, scope, parsed, keep_segments),
            Err(e) => {
                trace!("'{}' is not an import candidate: {}", type_name, e);
                self.policy.native_name(type_name)
            }
        }
    }

    pub fn resolve_all<S: AsRef<str>>(
        &self,
        table: &mut ImportTable,
        scope: &FileScope,
        type_names: &[S],
        keep_segments: usize,
    ) -> Vec<String> {
        type_names
            .iter()
            .map(|name| self.resolve(table, scope, name.as_ref(), keep_segments))
            .collect()
    }

    /// Write a parsed reference, visiting generic arguments in source order
    ///
    /// Every node is bound before its arguments, so an outer type wins a
    /// simple name over the types nested inside it.
    fn resolve_tree(
        &self,
        table: &mut ImportTable,
        scope: &FileScope,
        root: TypeName,
        keep_segments: usize,
    ) -> String {
        let mut out = String::new();
        let mut pending = vec![Pending::Type(root, keep_segments)];

        while let Some(next) = pending.pop() {
            let (ty, keep_segments) = match next {
                Pending::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Pending::Close(close) => {
                    out.push(close);
                    continue;
                }
                Pending::Type(ty, keep_segments) => (ty, keep_segments),
            };

            let ty = if ty.is_qualified() {
                self.policy.native_type(ty)
            } else {
                ty
            };

            let Some(start) = self.import_prefix(table, scope, &ty, keep_segments) else {
                out.push_str(&ty.to_string());
                continue;
            };

            let (segments, generics) = ty.into_parts();
            out.push_str(&segments[start..].join("."));

            match generics {
                Generics::Plain { open, close, args } => {
                    out.push(open);
                    pending.push(Pending::Close(close));
                    for (idx, arg) in args.into_iter().enumerate().rev() {
                        if arg.nullable {
                            pending.push(Pending::Text("?"));
                        }
                        pending.push(Pending::Type(arg.ty, 1));
                        if idx > 0 {
                            pending.push(Pending::Text(", "));
                        }
                    }
                }
                other => out.push_str(&other.to_string()),
            }
        }

        out
    }

    /// Bind the importable prefix of one node
    ///
    /// Returns the index of the first segment to write, or `None` when the
    /// node must be written exactly as given.
    fn import_prefix(
        &self,
        table: &mut ImportTable,
        scope: &FileScope,
        ty: &TypeName,
        keep_segments: usize,
    ) -> Option<usize> {
        if let Some(regex) = &self.fully_qualified {
            let text = ty.to_string();
            if regex.is_match(&text) {
                trace!("'{}' is configured to stay fully qualified", text);
                return None;
            }
        }

        // [com, example, Table, TABLE, COLUMN] with keep_segments = 3 -> class at 2
        let segments = ty.segments();
        let Some(class_idx) = segments
            .len()
            .checked_sub(keep_segments)
            .filter(|idx| keep_segments > 0 && *idx > 0)
        else {
            trace!(
                "'{}' has no importable prefix with keep_segments = {}",
                ty,
                keep_segments
            );
            return None;
        };

        let qualified = segments[..=class_idx].join(".");
        let simple = segments[class_idx].as_str();
        let is_self = scope.is_self(&qualified);

        if simple == scope.class_name && !is_self {
            debug!(
                "Not importing '{}': it would shadow the generated class {}",
                qualified, scope.class_name
            );
            return None;
        }

        if !table.bind(simple, &qualified) {
            debug!(
                "Not importing '{}': '{}' is already bound to '{}'",
                qualified,
                simple,
                table.binding(simple).unwrap_or_default()
            );
            return None;
        }

        trace!("Bound '{}' for '{}'", simple, qualified);

        // Members of the generated class are reachable without its name
        if is_self && class_idx + 1 < segments.len() {
            Some(class_idx + 1)
        } else {
            Some(class_idx)
        }
    }
}

/// Output of [`TypeResolver::resolve_tree`] still to be produced
enum Pending {
    Type(TypeName, usize),
    Text(&'static str),
    Close(char),
}
