//! CLI tool for generating next-edit-prediction datasets.
//!
//! Reads an edit log written by the editor extension (or a directory of
//! them) and writes ChatML-style conversations as JSON, a readable
//! transcript, or TOML-like markup.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use next_edit_chatml_core::{process_input, write_output, OutputFormat, PipelineConfig};

/// Generate a ChatML dataset from an editor edit log.
#[derive(Parser, Debug)]
#[command(name = "next-edit-chatml")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Edit log file, or a directory of *.json logs
    log_path: PathBuf,

    /// Emit debug logging (per-entry ordering details)
    #[arg(long)]
    debug: bool,

    /// Write a human-readable transcript (output.txt)
    #[arg(long, conflicts_with = "toml")]
    readable: bool,

    /// Write TOML-like markup (output.toml)
    #[arg(long)]
    toml: bool,

    /// Output file (defaults to output.json / output.txt / output.toml)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl Args {
    fn format(&self) -> OutputFormat {
        if self.toml {
            OutputFormat::Toml
        } else if self.readable {
            OutputFormat::Readable
        } else {
            OutputFormat::Json
        }
    }
}

/// Run summary printed on stdout, in the same language as the format labels.
fn summary(output_path: &Path, conversations: usize, format: OutputFormat) -> String {
    format!(
        "データセットを生成しました: {}\n生成された会話数: {}\n出力形式: {}",
        output_path.display(),
        conversations,
        format.label()
    )
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if !args.log_path.exists() {
        bail!("file not found: {}", args.log_path.display());
    }

    let config = PipelineConfig {
        format: args.format(),
        output_path: args.output.clone(),
    };

    info!(input = ?args.log_path, format = config.format.label(), "generating dataset");
    let conversations = process_input(&args.log_path)
        .with_context(|| format!("failed to process {}", args.log_path.display()))?;

    let output_path = write_output(&conversations, &config)
        .with_context(|| format!("failed to write {}", config.output_path().display()))?;

    println!("{}", summary(&output_path, conversations.len(), config.format));

    Ok(())
}
