use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid type name: {0}")]
    InvalidTypeName(String),

    #[error("Unsupported source file extension: {0}")]
    UnknownExtension(String),

    #[error("Output path has no file name: {}", .0.display())]
    MissingFileName(PathBuf),
}
