//! Batch command for many saved receipts.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use hoadon_core::{find_duplicate, CanonicalInvoice, InvoiceParser, ReceiptParser, SavedInvoice};

use super::output::{format_invoice, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
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

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    invoice: Option<CanonicalInvoice>,
    strategy: &'static str,
    duplicate_of: Option<PathBuf>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "json" | "html" | "htm" | "txt")
        })
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
        tokio::fs::create_dir_all(output_dir).await?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = ReceiptParser::from_config(&config);
    let mut results: Vec<FileResult> = Vec::with_capacity(files.len());
    // Invoices seen so far, indexed like `seen_paths`
    let mut history: Vec<SavedInvoice> = Vec::new();
    let mut seen_paths: Vec<PathBuf> = Vec::new();

    for path in files {
        let file_start = Instant::now();
        let outcome = process_single_file(&path, &parser).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok((invoice, strategy)) => {
                let duplicate_of = find_duplicate(&history, &invoice)
                    .map(|saved| seen_paths[saved.id as usize].clone());
                if let Some(original) = &duplicate_of {
                    warn!(
                        "{} repeats order {} from {}",
                        path.display(),
                        invoice.order_code,
                        original.display()
                    );
                }

                history.push(SavedInvoice::new(history.len() as i64, invoice.clone()));
                seen_paths.push(path.clone());

                results.push(FileResult {
                    path,
                    invoice: Some(invoice),
                    strategy,
                    duplicate_of,
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        invoice: None,
                        strategy: "",
                        duplicate_of: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.invoice.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(invoice) = &result.invoice {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("invoice");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                let content = format_invoice(invoice, args.format, config.output.pretty)?;
                tokio::fs::write(&output_path, content).await?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

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

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
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
    parser: &ReceiptParser,
) -> anyhow::Result<(CanonicalInvoice, &'static str)> {
    let raw = tokio::fs::read_to_string(path).await?;
    let result = parser.parse(&raw)?;

    if result.invoice.is_empty() {
        anyhow::bail!("could not parse invoice");
    }

    Ok((result.invoice, result.strategy))
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "extractor",
        "store",
        "order_code",
        "date",
        "items",
        "total",
        "duplicate_of",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let duplicate_of = result
            .duplicate_of
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(invoice) = &result.invoice {
            wtr.write_record([
                filename,
                "success",
                result.strategy,
                &invoice.store,
                &invoice.order_code,
                &invoice.date,
                &invoice.items.len().to_string(),
                &invoice.total.to_string(),
                duplicate_of,
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
