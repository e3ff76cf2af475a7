//! Per-file source writer for Java, Scala and Kotlin output
//!
//! A `JavaWriter` is created for one output file, receives the whole body
//! through its print and reference methods, and is consumed by
//! [`JavaWriter::render`] or [`JavaWriter::close`]. Type references are
//! shortened as they are written; the import block and the serialization id
//! are filled in only once the body is complete.
//!
//! ## Usage
//!
//! ```
//! use javagen_codegen::{JavaWriter, WriterConfig};
//!
//! let mut out = JavaWriter::new("com/acme/Table.java", &WriterConfig::default()).unwrap();
//! out.print_package_specification("com.acme");
//! out.print_imports();
//! let list = out.reference("java.util.List<com.acme.Row>");
//! out.println("public class Table {", &[]);
//! out.println("private %s rows;", &[list.into()]);
//! out.println("}", &[]);
//!
//! let source = out.render();
//! assert!(source.text().contains("import java.util.List;"));
//! assert!(source.text().contains("    private List<Row> rows;"));
//! ```

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use javagen_core::{Dialect, DialectPolicy};
use tracing::{debug, info, instrument};

use crate::config::{Encoding, WriterConfig};
use crate::finalize::{Finalizer, ImportBlock};
use crate::format::{format_template, Arg};
use crate::import_table::{ImportOrdering, ImportTable, LexicalOrdering};
use crate::javadoc::{escape_arg, escape_javadoc};
use crate::resolver::{FileScope, TypeResolver};
use crate::text_writer::{Marker, TextWriter};
use crate::CodegenError;

const HEADER_RULE: &str =
    "// -------------------------------------------------------------------------";

pub struct JavaWriter {
    path: PathBuf,
    policy: &'static DialectPolicy,
    scope: FileScope,
    resolver: TypeResolver,
    imports: ImportTable,
    ordering: Box<dyn ImportOrdering>,
    out: TextWriter,
    javadoc: bool,
    encoding: Encoding,
    newline: String,
}

impl JavaWriter {
    /// Create a writer for `path`, selecting the dialect from its extension
    pub fn new(path: impl Into<PathBuf>, config: &WriterConfig) -> Result<Self, CodegenError> {
        let path = path.into();
        let (dialect, class_name) = Dialect::for_path(&path)?;
        let policy = dialect.policy();

        let mut resolver = TypeResolver::new(policy);
        if let Some(pattern) = &config.fully_qualified_types {
            resolver = resolver.with_fully_qualified_types(pattern)?;
        }

        let indent = config.indent.as_deref().unwrap_or(policy.indent);
        debug!("Writing {} as {} class {}", path.display(), dialect, class_name);

        Ok(Self {
            path,
            policy,
            scope: FileScope::new(class_name),
            resolver,
            imports: ImportTable::new(),
            ordering: Box::new(LexicalOrdering),
            out: TextWriter::new(indent, config.newline.as_str()),
            javadoc: config.javadoc,
            encoding: config.encoding()?,
            newline: config.newline.clone(),
        })
    }

    /// Replace the default lexical import order
    pub fn with_ordering(mut self, ordering: Box<dyn ImportOrdering>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dialect(&self) -> Dialect {
        self.policy.dialect
    }

    pub fn class_name(&self) -> &str {
        &self.scope.class_name
    }

    pub fn package_name(&self) -> Option<&str> {
        self.scope.package_name.as_deref()
    }

    /// Imports recorded so far
    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    // ------------------------------------------------------------------------
    // Body text
    // ------------------------------------------------------------------------

    pub fn print(&mut self, template: &str, args: &[Arg]) -> &mut Self {
        self.out.print(&format_template(template, args));
        self
    }

    pub fn println(&mut self, template: &str, args: &[Arg]) -> &mut Self {
        self.out.println(&format_template(template, args));
        self
    }

    /// Write an empty line
    pub fn newline(&mut self) -> &mut Self {
        self.out.end_line();
        self
    }

    // ------------------------------------------------------------------------
    // Type references
    // ------------------------------------------------------------------------

    /// Resolve a type for use in the body, importing it when possible
    pub fn reference(&mut self, type_name: &str) -> String {
        self.reference_keep(type_name, 1)
    }

    /// Resolve a type with a trailing member chain of `keep_segments - 1` segments
    pub fn reference_keep(&mut self, type_name: &str, keep_segments: usize) -> String {
        self.resolver
            .resolve(&mut self.imports, &self.scope, type_name, keep_segments)
    }

    pub fn references<S: AsRef<str>>(&mut self, type_names: &[S], keep_segments: usize) -> Vec<String> {
        self.resolver
            .resolve_all(&mut self.imports, &self.scope, type_names, keep_segments)
    }

    pub fn print_class(&mut self, type_name: &str) -> &mut Self {
        let resolved = self.reference(type_name);
        self.out.print(&resolved);
        self
    }

    // ------------------------------------------------------------------------
    // Boilerplate
    // ------------------------------------------------------------------------

    /// Write a documentation comment, or only a blank line when disabled
    pub fn javadoc(&mut self, text: &str, args: &[Arg]) -> &mut Self {
        self.out.end_line();

        if self.javadoc {
            let escaped_args: Vec<Arg> = args.iter().map(escape_arg).collect();
            self.out.println("/**");
            self.println(&format!(" * {}", escape_javadoc(text)), &escaped_args);
            self.out.println(" */");
        }

        self
    }

    pub fn header(&mut self, text: &str, args: &[Arg]) -> &mut Self {
        self.out.end_line();
        self.out.println(HEADER_RULE);
        self.println(&format!("// {}", text), args);
        self.out.println(HEADER_RULE);
        self
    }

    pub fn print_override(&mut self) -> &mut Self {
        self.out.println("@Override");
        self
    }

    pub fn print_override_if(&mut self, condition: bool) -> &mut Self {
        if condition {
            self.print_override();
        }
        self
    }

    pub fn override_inherit(&mut self) -> &mut Self {
        self.out.end_line();
        self.print_override()
    }

    pub fn override_inherit_if(&mut self, condition: bool) -> &mut Self {
        self.out.end_line();
        self.print_override_if(condition)
    }

    /// Declare `serialVersionUID`; a no-op outside Java
    pub fn print_serial(&mut self) -> &mut Self {
        if self.policy.serial_version_uid {
            self.out.end_line();
            self.out.print("private static final long serialVersionUID = ");
            self.out.mark(Marker::SerialVersionUid);
            self.out.println(";");
        }
        self
    }

    pub fn print_package_specification(&mut self, package: &str) -> &mut Self {
        self.scope.package_name = Some(package.to_string());
        let statement = self.policy.package_statement(package);
        self.out.println(&statement);
        self
    }

    /// Reserve the position of the import block
    pub fn print_imports(&mut self) -> &mut Self {
        self.out.mark(Marker::ImportBlock);
        self.out.end_line();
        self
    }

    // ------------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------------

    /// Finish the body and produce the final file text
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn render(self) -> RenderedSource {
        let document = self.out.finish();
        let finalized = Finalizer {
            policy: self.policy,
            class_name: &self.scope.class_name,
            ordering: self.ordering.as_ref(),
            newline: &self.newline,
        }
        .finalize(&document, &self.imports);

        debug!(
            "Finalized {} with {} import(s), {} elided",
            self.scope.class_name,
            finalized.imports.emitted.len(),
            finalized.imports.elided.len()
        );
        debug!("Import table for {}: {:?}", self.scope.class_name, self.imports.stats());

        RenderedSource {
            path: self.path,
            dialect: self.policy.dialect,
            text: finalized.text,
            imports: finalized.imports,
            import_table: self.imports,
            package: finalized.package,
            serial_version_uid: finalized.serial_version_uid,
            encoding: self.encoding,
        }
    }

    /// Render and write the file to its path
    pub fn close(self) -> Result<WriteOutcome, CodegenError> {
        self.render().write()
    }
}

/// Outcome of writing a rendered file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file already held exactly this content
    Unchanged,
    Written { bytes: usize },
}

/// Final text of one generated file
///
/// Read-only: the import table and import block are exposed for diagnostics
/// but can no longer change.
#[derive(Debug, Clone)]
pub struct RenderedSource {
    path: PathBuf,
    dialect: Dialect,
    text: String,
    imports: ImportBlock,
    import_table: ImportTable,
    package: Option<String>,
    serial_version_uid: Option<i32>,
    encoding: Encoding,
}

impl RenderedSource {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Qualified names that got an import statement, in output order
    pub fn imports(&self) -> &[String] {
        &self.imports.emitted
    }

    pub fn import_block(&self) -> &ImportBlock {
        &self.imports
    }

    /// Every binding recorded while the body was written
    pub fn import_table(&self) -> &ImportTable {
        &self.import_table
    }

    /// Package found in the body, if any
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn serial_version_uid(&self) -> Option<i32> {
        self.serial_version_uid
    }

    /// Encode and write the text to the file's path
    ///
    /// Parent directories are created as needed. A file that already holds
    /// the same bytes is left untouched.
    pub fn write(&self) -> Result<WriteOutcome, CodegenError> {
        let bytes = self.encoding.encode(&self.text)?;

        if fs::read(&self.path).is_ok_and(|existing| existing == bytes) {
            debug!("{} is up to date", self.path.display());
            return Ok(WriteOutcome::Unchanged);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CodegenError::io(parent, e))?;
        }

        let file = fs::File::create(&self.path).map_err(|e| CodegenError::io(&self.path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&bytes)
            .and_then(|()| writer.flush())
            .map_err(|e| CodegenError::io(&self.path, e))?;

        info!("Wrote {} ({} bytes)", self.path.display(), bytes.len());
        Ok(WriteOutcome::Written { bytes: bytes.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn writer(path: &str) -> JavaWriter {
        JavaWriter::new(path, &WriterConfig::default()).unwrap()
    }

    #[test]
    fn test_dialect_from_path() {
        assert_eq!(writer("a/Table.java").dialect(), Dialect::Java);
        assert_eq!(writer("a/Table.scala").dialect(), Dialect::Scala);
        assert_eq!(writer("a/Table.kt").dialect(), Dialect::Kotlin);
        assert_eq!(writer("a/Table.kt").class_name(), "Table");
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            JavaWriter::new("Table.groovy", &WriterConfig::default()),
            Err(CodegenError::Core(_))
        ));
    }

    #[test]
    fn test_invalid_config() {
        let config = WriterConfig {
            encoding: "EBCDIC".to_string(),
            ..WriterConfig::default()
        };
        assert!(matches!(
            JavaWriter::new("Table.java", &config),
            Err(CodegenError::UnsupportedEncoding(_))
        ));

        let config = WriterConfig {
            fully_qualified_types: Some("(".to_string()),
            ..WriterConfig::default()
        };
        assert!(matches!(
            JavaWriter::new("Table.java", &config),
            Err(CodegenError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_package_specification_per_dialect() {
        let mut java = writer("Table.java");
        java.print_package_specification("com.acme");
        assert_eq!(java.package_name(), Some("com.acme"));
        assert_eq!(java.render().text(), "package com.acme;\n");

        let mut scala = writer("Table.scala");
        scala.print_package_specification("com.acme");
        assert_eq!(scala.render().text(), "package com.acme\n");
    }

    #[test]
    fn test_javadoc_block() {
        let mut out = writer("Table.java");
        out.javadoc("The column <code>%s</code>. */ sneaky", &["/* c */".into()]);

        assert_eq!(
            out.render().text(),
            "\n/**\n * The column <code>/ * c * /</code>. * / sneaky\n */\n"
        );
    }

    #[test]
    fn test_javadoc_disabled() {
        let config = WriterConfig {
            javadoc: false,
            ..WriterConfig::default()
        };
        let mut out = JavaWriter::new("Table.java", &config).unwrap();
        out.javadoc("Ignored", &[]);

        assert_eq!(out.render().text(), "\n");
    }

    #[test]
    fn test_header() {
        let mut out = writer("Table.java");
        out.header("Aliases for %s", &["Table".into()]);

        assert_eq!(
            out.render().text(),
            format!("\n{rule}\n// Aliases for Table\n{rule}\n", rule = HEADER_RULE)
        );
    }

    #[test]
    fn test_overrides() {
        let mut out = writer("Table.java");
        out.print_override_if(false);
        out.print_override_if(true);
        out.override_inherit();
        out.override_inherit_if(false);

        assert_eq!(out.render().text(), "@Override\n\n@Override\n\n");
    }

    #[test]
    fn test_serial_only_in_java() {
        let mut java = writer("Table.java");
        java.print_serial();
        let rendered = java.render();
        let uid = rendered.serial_version_uid().unwrap();
        assert_eq!(
            rendered.text(),
            format!("\nprivate static final long serialVersionUID = {};\n", uid)
        );

        let mut kotlin = writer("Table.kt");
        kotlin.print_serial();
        let rendered = kotlin.render();
        assert_eq!(rendered.serial_version_uid(), None);
        assert_eq!(rendered.text(), "");
    }

    #[test]
    fn test_print_class() {
        let mut out = writer("Table.java");
        out.print("return new ", &[]).print_class("com.acme.Row").println("();", &[]);

        let rendered = out.render();
        assert_eq!(rendered.text(), "return new Row();\n");
        assert_eq!(rendered.import_table().binding("Row"), Some("com.acme.Row"));
    }

    #[test]
    fn test_indent_override() {
        let config = WriterConfig {
            indent: Some("\t".to_string()),
            ..WriterConfig::default()
        };
        let mut out = JavaWriter::new("Table.java", &config).unwrap();
        out.println("class Table {", &[]).println("int x;", &[]).println("}", &[]);

        assert_eq!(out.render().text(), "class Table {\n\tint x;\n}\n");
    }
}
