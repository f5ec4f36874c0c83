//! Receipt extraction: input classification and the per-source extractors.

pub mod classify;
pub mod custom;
pub mod generic;
pub mod html;
mod parser;
pub mod retailer;
pub mod rules;
pub mod structured;

pub use classify::{classify, Strategy};
pub use custom::CustomInvoiceBuilder;
pub use generic::GenericScraper;
pub use html::HtmlScraper;
pub use parser::{ExtractionResult, InvoiceParser, ReceiptParser};
pub use retailer::Retailer;
pub use structured::{BachHoaXanhJson, KingFoodMartJson, OrderPayload};

use crate::error::ExtractionError;
use crate::models::invoice::CanonicalInvoice;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for invoice extractors.
pub trait InvoiceExtractor {
    /// What the extractor reads: a decoded payload or raw page text.
    type Source: ?Sized;

    /// Build a canonical invoice from `source`.
    fn extract(&self, source: &Self::Source) -> Result<CanonicalInvoice>;
}
