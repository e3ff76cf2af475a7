//! Writer configuration
//!
//! ```toml
//! fully_qualified_types = "org\\.jooq\\.impl\\..*"
//! encoding = "UTF-8"
//! javadoc = true
//! newline = "\n"
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CodegenError;

/// Configuration shared by every writer of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Regex of qualified names that are always written fully qualified
    pub fully_qualified_types: Option<String>,
    /// Output character encoding
    pub encoding: String,
    /// Emit documentation comments
    pub javadoc: bool,
    /// Line terminator
    pub newline: String,
    /// Override for the dialect's indentation unit
    pub indent: Option<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            fully_qualified_types: None,
            encoding: "UTF-8".to_string(),
            javadoc: true,
            newline: "\n".to_string(),
            indent: None,
        }
    }
}

impl WriterConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CodegenError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CodegenError::io(path.as_ref(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, CodegenError> {
        Ok(toml::from_str(content)?)
    }

    pub fn encoding(&self) -> Result<Encoding, CodegenError> {
        self.encoding.parse()
    }
}

impl FromStr for WriterConfig {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Supported output encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
    Ascii,
}

impl Encoding {
    /// Encode text, failing on the first unrepresentable character
    pub fn encode(self, text: &str) -> Result<Vec<u8>, CodegenError> {
        let limit = match self {
            Encoding::Utf8 => return Ok(text.as_bytes().to_vec()),
            Encoding::Latin1 => 0xFF,
            Encoding::Ascii => 0x7F,
        };

        text.chars()
            .map(|ch| match u8::try_from(u32::from(ch)) {
                Ok(byte) if u32::from(byte) <= limit => Ok(byte),
                _ => Err(CodegenError::Unmappable {
                    ch,
                    encoding: self.to_string(),
                }),
            })
            .collect()
    }
}

impl FromStr for Encoding {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('_', "-").as_str() {
            "UTF-8" | "UTF8" => Ok(Encoding::Utf8),
            "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1" => Ok(Encoding::Latin1),
            "US-ASCII" | "ASCII" => Ok(Encoding::Ascii),
            _ => Err(CodegenError::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "UTF-8"),
            Encoding::Latin1 => write!(f, "ISO-8859-1"),
            Encoding::Ascii => write!(f, "US-ASCII"),
        }
    }
}
