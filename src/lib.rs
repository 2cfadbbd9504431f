//! Annofeed: detection-annotation ingestion for training pipelines.
//!
//! Annofeed reads object-detection annotations — a Pascal-VOC-style
//! directory of per-image XML files, or a flat one-object-per-line text
//! file — into a single in-memory [`ingest::TrainingSet`] that a
//! detection-model training pipeline can consume directly: per-image
//! records, a class-occurrence histogram, and a dense class-to-index
//! mapping with the background pseudo-class pinned to the top index.
//!
//! # Modules
//!
//! - [`ingest`]: format readers and the unified record types
//! - [`report`]: ingest summary reporting
//! - [`error`]: error types for annofeed operations

pub mod error;
pub mod ingest;
pub mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::AnnofeedError;

/// The annofeed CLI application.
#[derive(Parser)]
#[command(name = "annofeed")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Ingest an annotation source and print a summary report.
    Ingest(IngestArgs),
}

/// Arguments for the ingest subcommand.
#[derive(clap::Args)]
struct IngestArgs {
    /// Annotation source: a dataset root for 'voc', a text file for 'flat'.
    input: PathBuf,

    /// Input format ('voc' or 'flat').
    #[arg(long, default_value = "voc")]
    format: String,

    /// Class to retain during structured-directory ingestion (repeatable).
    #[arg(long = "keep-class", default_value = "person")]
    keep_classes: Vec<String>,

    /// Retain every class during structured-directory ingestion.
    #[arg(long)]
    all_classes: bool,

    /// Seed for the flat-format train/test split assignment.
    #[arg(long)]
    seed: Option<u64>,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the annofeed CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), AnnofeedError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Ingest(args)) => run_ingest(args),
        None => {
            println!("annofeed {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Detection-annotation ingestion for training pipelines.");
            println!();
            println!("Run 'annofeed --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the ingest subcommand.
fn run_ingest(args: IngestArgs) -> Result<(), AnnofeedError> {
    let training_set = match args.format.as_str() {
        "voc" | "voc-dir" => {
            let options = if args.all_classes {
                ingest::VocIngestOptions::keep_all()
            } else {
                ingest::VocIngestOptions {
                    keep_classes: Some(args.keep_classes.iter().cloned().collect()),
                }
            };
            ingest::read_voc_dir(&args.input, &options)?
        }
        "flat" | "flat-csv" => ingest::read_flat_csv(&args.input, args.seed)?,
        other => {
            return Err(AnnofeedError::UnsupportedFormat(format!(
                "'{}' (supported: voc, flat)",
                other
            )));
        }
    };

    let report = report::IngestReport::from_training_set(&training_set);

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            // Default text output
            print!("{}", report);
        }
    }

    Ok(())
}
