//! Rule-based field extractors shared by the receipt parsers.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{all_prices, extract_quantity, line_total, parse_price, to_dong, PriceExtractor};
pub use dates::{day_label, first_numeric_date, offset_hours, parse_timestamp, to_iso};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
