//! Extract command - run extraction on already-recognized text.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;

use invx_core::invoice::{InvoiceExtractor, InvoicePipeline};
use invx_core::{ExtractionError, InvoiceExtractionResult};

use crate::output::{format_result, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text file with OCR output (default: stdin)
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let text = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let pipeline = InvoicePipeline::with_config(&config.extraction);
    let invoice = match pipeline.extract_from_text(&text) {
        Ok(invoice) => invoice,
        Err(ExtractionError::NoText) => {
            eprintln!("{} No text recognized", style("⚠").yellow());
            InvoiceExtractionResult::default()
        }
    };

    println!("{}", format_result(&invoice, args.format)?);

    Ok(())
}
