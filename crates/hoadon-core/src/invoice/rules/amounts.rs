//! Amount extraction for Vietnamese receipts.
//!
//! Đồng has no minor unit, so `,` and `.` in a captured amount are always
//! thousands separators. [`parse_price`] is the one place that convention is
//! implemented; every extractor goes through it.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::patterns::{CURRENCY_AMOUNT, QUANTITY};
use super::FieldExtractor;
use crate::error::ExtractionError;

/// Currency amount extractor.
pub struct PriceExtractor;

impl PriceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PriceExtractor {
    type Output = i64;

    /// First currency-looking number. A first match that does not parse
    /// yields `None`; later matches are not consulted.
    fn extract(&self, text: &str) -> Option<i64> {
        let caps = CURRENCY_AMOUNT.captures(text)?;
        parse_price(&caps[1])
    }

    fn extract_all(&self, text: &str) -> Vec<i64> {
        CURRENCY_AMOUNT
            .captures_iter(text)
            .filter_map(|caps| parse_price(&caps[1]))
            .collect()
    }
}

/// Parse a Vietnamese-formatted amount ("73.994", "1,234", "56655").
///
/// Commas and periods are stripped before parsing. Returns `None` when no
/// digits remain.
pub fn parse_price(s: &str) -> Option<i64> {
    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '.').collect();
    cleaned.trim().parse().ok()
}

/// Every positive currency amount in `text`, in order of appearance.
pub fn all_prices(text: &str) -> Vec<i64> {
    PriceExtractor::new()
        .extract_all(text)
        .into_iter()
        .filter(|v| *v > 0)
        .collect()
}

/// Quantity from "SL: N" or "xN" markers, defaulting to 1.
pub fn extract_quantity(text: &str) -> Decimal {
    QUANTITY
        .captures(text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(Decimal::from)
        .unwrap_or(Decimal::ONE)
}

/// Round a decimal amount to whole đồng, half away from zero.
pub fn to_dong(amount: Decimal, field: &str) -> Result<i64, ExtractionError> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| ExtractionError::Overflow(format!("{field} = {amount}")))
}

/// Line total `unit_price × quantity`, rounded to whole đồng.
pub fn line_total(unit_price: Decimal, quantity: Decimal, field: &str) -> Result<i64, ExtractionError> {
    let total = unit_price
        .checked_mul(quantity)
        .ok_or_else(|| ExtractionError::Overflow(format!("{field} = {unit_price} × {quantity}")))?;
    to_dong(total, field)
}
