//! Splitting invoice totals between the people sharing a household.

pub mod weekly;

pub use weekly::{summarize_weeks, WeekSummary, WeeklyReport};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::SplitError;
use crate::models::invoice::{CanonicalInvoice, SavedInvoice};

/// `total / parts`, rounded half away from zero to whole đồng.
pub fn share_of(total: i64, parts: u32) -> Result<i64, SplitError> {
    if parts == 0 {
        return Err(SplitError::ZeroParts("people"));
    }

    let share = (Decimal::from(total) / Decimal::from(parts))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    // |share| <= |total|, so this always fits
    Ok(share.to_i64().unwrap_or(total))
}

impl SavedInvoice {
    /// What each of `people` owes for this invoice.
    pub fn per_person(&self, people: u32) -> Result<i64, SplitError> {
        if self.is_not_split {
            Ok(self.invoice.total)
        } else {
            share_of(self.invoice.total, people)
        }
    }
}

/// The saved invoice with the same order code, if any.
///
/// Invoices without an order code are never duplicates.
pub fn find_duplicate<'a>(
    history: &'a [SavedInvoice],
    invoice: &CanonicalInvoice,
) -> Option<&'a SavedInvoice> {
    if invoice.order_code.is_empty() {
        return None;
    }
    history
        .iter()
        .find(|saved| saved.invoice.order_code == invoice.order_code)
}
