//! Error types for source emission
//!
//! Resolution problems (malformed type names, naming collisions) are never
//! errors: the resolver falls back to the fully qualified text. Only
//! construction, configuration and output-sink failures surface here.

use std::io;
use std::path::{Path, PathBuf};

use javagen_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid fully qualified types pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Character {ch:?} cannot be encoded as {encoding}")]
    Unmappable { ch: char, encoding: String },

    #[error("Invalid writer configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CodegenError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        CodegenError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_the_path() {
        let err = CodegenError::io(
            Path::new("out/com/acme/Table.java"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("out/com/acme/Table.java"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_core_errors_convert() {
        let err: CodegenError = CoreError::UnknownExtension("groovy".to_string()).into();
        assert_eq!(err.to_string(), "Unsupported source file extension: groovy");
    }
}
