//! Library interface for the javagen CLI

pub mod script;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use javagen_codegen::{JavaWriter, WriteOutcome, WriterConfig};
use javagen_core::Dialect;
use tracing::info;

use crate::script::Script;

/// Command line overrides applied on top of a config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub fully_qualified_types: Option<String>,
    pub no_javadoc: bool,
    pub encoding: Option<String>,
}

/// Load the writer configuration, defaulting when no file is given
pub fn load_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<WriterConfig> {
    let mut config = match path {
        Some(path) => WriterConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {:?}", path))?,
        None => WriterConfig::default(),
    };

    if let Some(pattern) = overrides.fully_qualified_types {
        config.fully_qualified_types = Some(pattern);
    }
    if overrides.no_javadoc {
        config.javadoc = false;
    }
    if let Some(encoding) = overrides.encoding {
        config.encoding = encoding;
    }

    Ok(config)
}

/// What rendering one file produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub path: PathBuf,
    pub dialect: Dialect,
    pub outcome: WriteOutcome,
    pub imports: Vec<String>,
    pub serial_version_uid: Option<i32>,
}

/// Replay a script into a new writer for `output` and write the result
pub fn render_script(script: &Script, output: &Path, config: &WriterConfig) -> Result<RenderReport> {
    let mut out = JavaWriter::new(output, config)
        .with_context(|| format!("Failed to create writer for {:?}", output))?;
    script.apply(&mut out);

    let rendered = out.render();
    let outcome = rendered
        .write()
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    match outcome {
        WriteOutcome::Unchanged => info!("{:?} is unchanged", output),
        WriteOutcome::Written { bytes } => info!("Generated {:?} ({} bytes)", output, bytes),
    }

    Ok(RenderReport {
        path: rendered.path().to_path_buf(),
        dialect: rendered.dialect(),
        outcome,
        imports: rendered.imports().to_vec(),
        serial_version_uid: rendered.serial_version_uid(),
    })
}
