//! Batch processing command for multiple invoice files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use invx_core::invoice::{InvoiceParser, InvoicePipeline};
use invx_core::{ExtractionError, InvoiceExtractionResult, InvoiceField, InvxError};

use crate::ocr::{InputKind, Recognizer};
use crate::output::{format_result, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    NoText,
    Error,
}

impl Status {
    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NoText => "no_text",
            Self::Error => "error",
        }
    }
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    status: Status,
    invoice: InvoiceExtractionResult,
    confidence: Option<f32>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| InputKind::from_path(p).is_ok())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let recognizer = Recognizer::new(config.ocr.clone());
    let pipeline = InvoicePipeline::with_config(&config.extraction);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = process_single_file(&path, &recognizer, &pipeline).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok((invoice, confidence)) => ProcessResult {
                path,
                status: Status::Success,
                invoice,
                confidence,
                error: None,
                processing_time_ms,
            },
            Err(InvxError::Extraction(ExtractionError::NoText)) => {
                warn!("No text recognized in {}", path.display());
                ProcessResult {
                    path,
                    status: Status::NoText,
                    invoice: InvoiceExtractionResult::default(),
                    confidence: None,
                    error: Some("No text recognized".to_string()),
                    processing_time_ms,
                }
            }
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                ProcessResult {
                    path,
                    status: Status::Error,
                    invoice: InvoiceExtractionResult::default(),
                    confidence: None,
                    error: Some(error_msg),
                    processing_time_ms,
                }
            }
        };

        if let (Status::Success, Some(output_dir)) = (result.status, &args.output_dir) {
            write_output(output_dir, &result, args.format)?;
        }

        results.push(result);
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.status == Status::Success).count();
    let failed: Vec<_> = results.iter().filter(|r| r.status != Status::Success).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn process_single_file(
    path: &Path,
    recognizer: &Recognizer,
    pipeline: &InvoicePipeline,
) -> Result<(InvoiceExtractionResult, Option<f32>), InvxError> {
    let document = recognizer.recognize(path).await?;
    let result = pipeline.parse(&document)?;
    Ok((result.invoice, result.ocr_confidence))
}

fn write_output(output_dir: &Path, result: &ProcessResult, format: OutputFormat) -> anyhow::Result<()> {
    let output_name = result
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");
    let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

    fs::write(&output_path, format_result(&result.invoice, format)?)?;
    debug!("Wrote output to {}", output_path.display());
    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(InvoiceField::ALL.iter().map(|f| f.key()));
    header.extend(["item_count", "ocr_confidence", "processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let mut record = vec![filename.to_string(), result.status.as_str().to_string()];
        record.extend(
            InvoiceField::ALL
                .iter()
                .map(|f| result.invoice.field(*f).to_string()),
        );
        record.push(result.invoice.line_items.len().to_string());
        record.push(
            result
                .confidence
                .map(|c| format!("{:.1}", c))
                .unwrap_or_default(),
        );
        record.push(result.processing_time_ms.to_string());
        record.push(result.error.clone().unwrap_or_default());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
