use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use javagen::script::Script;
use javagen::{load_config, render_script, ConfigOverrides};
use javagen_codegen::WriteOutcome;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "javagen")]
#[command(about = "Render Java, Scala and Kotlin sources with managed imports", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one source file from a JSON body script
    Render {
        /// Body script (JSON array of steps)
        #[arg(short, long)]
        script: PathBuf,

        /// Output file; the extension selects Java, Scala or Kotlin
        #[arg(short, long)]
        output: PathBuf,

        /// Writer configuration (TOML)
        #[arg(short, long, env = "JAVAGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Regex of types that are never imported
        #[arg(long)]
        fully_qualified_types: Option<String>,

        /// Skip documentation comments
        #[arg(long)]
        no_javadoc: bool,

        /// Output encoding (UTF-8, ISO-8859-1, US-ASCII)
        #[arg(long)]
        encoding: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::TRACE
    } else if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .init();

    match cli.command {
        Commands::Render {
            script,
            output,
            config,
            fully_qualified_types,
            no_javadoc,
            encoding,
        } => {
            let config = load_config(
                config.as_deref(),
                ConfigOverrides {
                    fully_qualified_types,
                    no_javadoc,
                    encoding,
                },
            )?;
            debug!("Writer configuration: {:?}", config);

            let script = Script::from_file(&script)?;
            let report = render_script(&script, &output, &config)?;

            match report.outcome {
                WriteOutcome::Unchanged => println!("{} unchanged", report.path.display()),
                WriteOutcome::Written { bytes } => {
                    println!("{} written ({} bytes)", report.path.display(), bytes)
                }
            }
            for import in &report.imports {
                println!("  import {}", import);
            }
            Ok(())
        }
    }
}
