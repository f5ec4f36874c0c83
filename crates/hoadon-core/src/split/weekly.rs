//! Per-week totals for the shared expense history.

use chrono::NaiveDate;
use serde::Serialize;

use super::share_of;
use crate::error::{Result, SplitError};
use crate::models::invoice::SavedInvoice;
use crate::models::week::Week;

/// Totals for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub invoice_count: usize,
    pub total: i64,
    pub per_person: i64,
    pub average_per_invoice: i64,
}

/// Totals across all weeks with at least one invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    /// Newest week first.
    pub weeks: Vec<WeekSummary>,
    pub grand_total: i64,
    pub average_per_week: i64,
}

/// Summarize `invoices` by their assigned week.
///
/// The per-person share of a week divides the whole week total, including
/// invoices marked as not split.
pub fn summarize_weeks(
    weeks: &[Week],
    invoices: &[SavedInvoice],
    people: u32,
) -> Result<WeeklyReport> {
    if people == 0 {
        return Err(SplitError::ZeroParts("people").into());
    }

    let mut summaries = Vec::new();
    for week in weeks {
        let assigned: Vec<&SavedInvoice> = invoices
            .iter()
            .filter(|inv| inv.week_id == Some(week.id))
            .collect();
        if assigned.is_empty() {
            continue;
        }

        let total = assigned
            .iter()
            .fold(0i64, |sum, inv| sum.saturating_add(inv.invoice.total));
        summaries.push(WeekSummary {
            week_id: week.id,
            name: week.name.clone(),
            start_date: week.start_date,
            invoice_count: assigned.len(),
            total,
            per_person: share_of(total, people)?,
            average_per_invoice: share_of(total, assigned.len() as u32)?,
        });
    }

    summaries.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    let grand_total = summaries
        .iter()
        .fold(0i64, |sum, w| sum.saturating_add(w.total));
    let average_per_week = if summaries.is_empty() {
        0
    } else {
        share_of(grand_total, summaries.len() as u32)?
    };

    Ok(WeeklyReport {
        weeks: summaries,
        grand_total,
        average_per_week,
    })
}
