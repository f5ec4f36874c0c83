//! Summary command - weekly totals and per-person shares from a ledger.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Deserialize;
use tracing::info;

use hoadon_core::{summarize_weeks, SavedInvoice, Week, WeeklyReport};

use super::output::format_dong;

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Ledger file with saved weeks and invoices
    #[arg(required = true)]
    ledger: PathBuf,

    /// Number of people sharing (default: split.people from config)
    #[arg(short, long)]
    people: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: SummaryFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SummaryFormat {
    Text,
    Json,
    Csv,
}

/// Exported expense history.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Ledger {
    weeks: Vec<Week>,
    invoices: Vec<SavedInvoice>,
}

pub async fn run(args: SummaryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let people = args.people.unwrap_or(config.split.people);

    if !args.ledger.exists() {
        anyhow::bail!("Ledger file not found: {}", args.ledger.display());
    }

    let content = tokio::fs::read_to_string(&args.ledger).await?;
    let ledger: Ledger = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid ledger {}: {}", args.ledger.display(), e))?;

    info!(
        "Summarizing {} invoices over {} weeks for {} people",
        ledger.invoices.len(),
        ledger.weeks.len(),
        people
    );

    let report = summarize_weeks(&ledger.weeks, &ledger.invoices, people)?;

    let output = match args.format {
        SummaryFormat::Json if config.output.pretty => serde_json::to_string_pretty(&report)?,
        SummaryFormat::Json => serde_json::to_string(&report)?,
        SummaryFormat::Csv => format_report_csv(&report)?,
        SummaryFormat::Text => format_report_text(&report, &ledger.weeks, people),
    };

    println!("{}", output);
    Ok(())
}

fn format_report_csv(report: &WeeklyReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "week_id",
        "name",
        "start_date",
        "invoice_count",
        "total",
        "per_person",
        "average_per_invoice",
    ])?;

    for week in &report.weeks {
        wtr.write_record([
            &week.week_id.to_string(),
            &week.name,
            &week.start_date.to_string(),
            &week.invoice_count.to_string(),
            &week.total.to_string(),
            &week.per_person.to_string(),
            &week.average_per_invoice.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_report_text(report: &WeeklyReport, weeks: &[Week], people: u32) -> String {
    let mut output = String::new();

    if report.weeks.is_empty() {
        output.push_str(&format!("{} No invoices assigned to any week\n", style("ℹ").blue()));
        return output;
    }

    for summary in &report.weeks {
        let range = weeks
            .iter()
            .find(|w| w.id == summary.week_id)
            .map(|w| w.range_label())
            .unwrap_or_default();

        output.push_str(&format!("{} ({})\n", style(&summary.name).bold(), range));
        output.push_str(&format!(
            "  {} invoices, total {}\n",
            summary.invoice_count,
            format_dong(summary.total)
        ));
        output.push_str(&format!(
            "  Per person ({}): {}\n",
            people,
            format_dong(summary.per_person)
        ));
        output.push_str(&format!(
            "  Average per invoice: {}\n",
            format_dong(summary.average_per_invoice)
        ));
    }

    output.push('\n');
    output.push_str(&format!("Grand total: {}\n", format_dong(report.grand_total)));
    output.push_str(&format!(
        "Average per week: {}\n",
        format_dong(report.average_per_week)
    ));

    output
}
