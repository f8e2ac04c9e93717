//! Process command - recognize and extract a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invx_core::invoice::{ExtractionResult, InvoiceParser, InvoicePipeline};
use invx_core::{ExtractionError, InvoiceExtractionResult};

use crate::ocr::Recognizer;
use crate::output::{format_result, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (image, or .txt with recognized text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show OCR confidence and processing time
    #[arg(long)]
    show_confidence: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Recognizing text...");

    let document = Recognizer::new(config.ocr.clone()).recognize(&args.input).await;
    let document = match document {
        Ok(document) => document,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    pb.set_message("Extracting invoice data...");
    let pipeline = InvoicePipeline::with_config(&config.extraction);
    let parsed = pipeline.parse(&document);
    pb.finish_and_clear();

    let (invoice, report) = match parsed {
        Ok(result) => {
            let invoice = result.invoice.clone();
            (invoice, Some(result))
        }
        Err(ExtractionError::NoText) => {
            eprintln!("{} No text recognized", style("⚠").yellow());
            (InvoiceExtractionResult::default(), None)
        }
    };

    let output = format_result(&invoice, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(result) = &report {
        print_warnings(result);
    }

    if args.show_confidence {
        println!();
        match document.confidence {
            Some(confidence) => {
                println!("{} OCR confidence: {:.1}%", style("ℹ").blue(), confidence)
            }
            None => println!("{} OCR confidence: n/a", style("ℹ").blue()),
        }
        if let Some(result) = &report {
            println!(
                "{} Extraction time: {}ms",
                style("ℹ").blue(),
                result.processing_time_ms
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_warnings(result: &ExtractionResult) {
    for warning in &result.warnings {
        debug!("{}", warning);
    }
    let missing = result.invoice.missing_fields();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
        eprintln!(
            "{} Not found: {}",
            style("ℹ").blue(),
            names.join(", ")
        );
    }
}
