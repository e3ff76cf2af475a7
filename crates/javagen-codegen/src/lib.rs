//! Import-aware source writer for Java, Scala and Kotlin code generators

pub mod config;
pub mod error;
pub mod finalize;
pub mod format;
pub mod import_table;
pub mod java_writer;
pub mod javadoc;
pub mod resolver;
pub mod text_writer;

pub use config::{Encoding, WriterConfig};
pub use error::CodegenError;
pub use format::Arg;
pub use import_table::{ImportOrdering, ImportStats, ImportTable, LexicalOrdering};
pub use java_writer::{JavaWriter, RenderedSource, WriteOutcome};
pub use resolver::{FileScope, TypeResolver};
