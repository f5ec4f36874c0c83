//! Parse command - normalize a single pasted receipt.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use hoadon_core::{InvoiceParser, ReceiptParser};

use super::output::{format_invoice, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file with the pasted JSON or HTML ("-" or omitted: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print extraction warnings to stderr
    #[arg(long)]
    warnings: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let raw = match &args.input {
        Some(path) if path.as_os_str() != "-" => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            info!("Reading receipt from {}", path.display());
            tokio::fs::read_to_string(path).await?
        }
        _ => {
            info!("Reading receipt from stdin");
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let parser = ReceiptParser::from_config(&config);
    let result = parser.parse(&raw)?;

    if args.warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    if result.invoice.is_empty() {
        anyhow::bail!("could not parse invoice");
    }

    let output = format_invoice(&result.invoice, args.format, config.output.pretty)?;

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!(
        "Parsed with {} extractor in {}ms",
        result.strategy, result.processing_time_ms
    );

    Ok(())
}
