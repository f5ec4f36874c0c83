//! Receipt parser dispatching raw input to one extractor.

use chrono::FixedOffset;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::models::config::HoadonConfig;
use crate::models::invoice::CanonicalInvoice;

use super::classify::{classify, Strategy};
use super::generic::GenericScraper;
use super::html::HtmlScraper;
use super::rules::offset_hours;
use super::structured::{BachHoaXanhJson, KingFoodMartJson, OrderPayload};
use super::InvoiceExtractor;

/// Result of invoice extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub invoice: CanonicalInvoice,
    /// Label of the extractor that ran.
    pub strategy: &'static str,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse an invoice from pasted JSON, HTML or text.
    fn parse(&self, raw: &str) -> Result<ExtractionResult>;
}

/// Parser for pasted retailer responses and pages.
///
/// Holds no mutable state; one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct ReceiptParser<C = SystemClock> {
    clock: C,
    /// Zone for naive retailer timestamps and the fallback date.
    local: FixedOffset,
}

impl ReceiptParser<SystemClock> {
    /// Create a parser using the wall clock and Vietnam time.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create a parser from the `parser` section of a config file.
    pub fn from_config(config: &HoadonConfig) -> Self {
        Self::new().with_utc_offset(config.parser.utc_offset_hours)
    }
}

impl Default for ReceiptParser<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ReceiptParser<C> {
    /// Create a parser reading "now" from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            local: offset_hours(7),
        }
    }

    /// Set the local UTC offset in whole hours.
    pub fn with_utc_offset(mut self, hours: i32) -> Self {
        self.local = offset_hours(hours);
        self
    }

    fn run(&self, strategy: &Strategy, raw: &str) -> Result<CanonicalInvoice> {
        let invoice = match strategy {
            Strategy::Structured(OrderPayload::BachHoaXanh(response)) => BachHoaXanhJson::new()
                .with_offset(self.local)
                .extract(response)?,
            Strategy::Structured(OrderPayload::KingFoodMart(response)) => KingFoodMartJson::new()
                .with_offset(self.local)
                .extract(response)?,
            Strategy::Html(retailer) => HtmlScraper::new(*retailer).extract(raw)?,
            Strategy::Generic => GenericScraper::with_clock(&self.clock)
                .with_offset(self.local)
                .extract(raw)?,
        };
        Ok(invoice)
    }
}

impl<C: Clock> InvoiceParser for ReceiptParser<C> {
    fn parse(&self, raw: &str) -> Result<ExtractionResult> {
        let start = self.clock.now();

        info!("Parsing receipt from {} characters of input", raw.len());

        let strategy = classify(raw);
        debug!("Using {} extractor", strategy.label());

        let invoice = self.run(&strategy, raw)?;

        let warnings = invoice.validate();
        if invoice.is_empty() {
            warn!("No line items extracted by {} extractor", strategy.label());
        }

        debug!(
            "Extracted {} items, total {} from {}",
            invoice.items.len(),
            invoice.total,
            invoice.store
        );

        let elapsed = (self.clock.now() - start).num_milliseconds().max(0) as u64;

        Ok(ExtractionResult {
            invoice,
            strategy: strategy.label(),
            warnings,
            processing_time_ms: elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::{ExtractionError, HoadonError};
    use crate::models::invoice::StoreType;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    const BHX_JSON: &str = r#"{"data": {
        "customerDemand": "OV209272511223011",
        "inputTime": "2025-12-22T10:30:00",
        "address": "342 Nguyễn Duy Trinh",
        "cartTotalAmount": 73994,
        "totalShippingCost": 0,
        "totalDiscount": 0,
        "rewardPoints": 740,
        "deliveryList": [{
            "outputStoreName": "BHX_HCM_TDU",
            "deliveryDetailList": [
                {"productName": "HÀNH LÁ GÓI 100G", "salePrice": 8500, "quantity": 1},
                {"productName": "DƯA HẤU KHÔNG HẠT", "salePrice": 22300, "quantity": 2.306, "quantityUnitValue": "2.306kg"},
                {"productName": "BÍ XANH", "salePrice": 35000, "quantity": 0.402, "quantityUnitValue": "402g"}
            ]
        }]
    }}"#;

    fn parser() -> ReceiptParser<FixedClock> {
        ReceiptParser::with_clock(FixedClock(
            Utc.with_ymd_and_hms(2025, 12, 22, 5, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_parse_bach_hoa_xanh_json() {
        let result = parser().parse(BHX_JSON).unwrap();

        assert_eq!(result.strategy, "bachhoaxanh-json");
        assert_eq!(result.invoice.store_type, StoreType::BachHoaXanh);
        assert_eq!(result.invoice.total, 73994);
        assert_eq!(result.invoice.items.len(), 3);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = parser();
        let inputs = [
            BHX_JSON,
            r#"{"foo":"bar"}"#,
            "<tr><td>Cà rốt</td><td>15.000đ</td></tr> bachhoaxanh",
            "Rau 12.000đ Thịt 85.000đ",
        ];

        for input in inputs {
            assert_eq!(parser.parse(input).unwrap(), parser.parse(input).unwrap());
        }
    }

    #[test]
    fn test_unknown_json_falls_back_to_generic() {
        let result = parser().parse(r#"{"foo":"bar"}"#).unwrap();

        assert_eq!(result.strategy, "generic");
        assert_eq!(result.invoice.store, "Cửa hàng khác");
        assert_eq!(result.invoice.store_type, StoreType::Generic);
        assert_eq!(result.invoice.total, 0);
        assert_eq!(result.invoice.date, "22/12/2025");
        assert!(result.invoice.is_empty());
        assert!(result.warnings.contains(&"No line items".to_string()));
    }

    #[test]
    fn test_empty_delivery_list_is_an_error() {
        let err = parser()
            .parse(r#"{"data": {"deliveryList": []}}"#)
            .unwrap_err();

        assert!(matches!(
            err,
            HoadonError::Extraction(ExtractionError::EmptyCollection("deliveryList"))
        ));
    }

    #[test]
    fn test_html_admission_filter() {
        let html = r#"<html><body><p>Bach Hoa Xanh</p><table>
            <tr><td></td><td>9.000đ</td></tr>
            <tr><td>Khuyến mãi</td><td>0đ</td></tr>
            <tr><td>Rau muống</td><td>6.000đ</td></tr>
            <tr><td>Tiêu đề</td><td>không giá</td></tr>
        </table></body></html>"#;
        let result = parser().parse(html).unwrap();

        assert_eq!(result.strategy, "bachhoaxanh-html");
        assert!(
            result
                .invoice
                .items
                .iter()
                .all(|i| !i.name.trim().is_empty() && i.price > 0)
        );
        assert_eq!(result.invoice.items.len(), 1);
    }

    #[test]
    fn test_huge_amounts_do_not_fail() {
        let html = "bachhoaxanh <table><tr><td>A</td><td>9000000000000000000đ</td></tr>\
            <tr><td>B</td><td>9000000000000000000đ</td></tr></table>";
        let result = parser().parse(html).unwrap();
        assert_eq!(result.invoice.total, i64::MAX);
        assert!(!result.warnings.iter().any(|w| w.contains("differs")));

        let html = "bachhoaxanh <table><tr><td>A</td>\
            <td>9000000000000000000đ SL: 9000000000000000000</td></tr></table>";
        let result = parser().parse(html).unwrap();
        assert_eq!(result.strategy, "bachhoaxanh-html");
        assert_eq!(result.invoice.total, i64::MAX);
    }

    #[test]
    fn test_utc_offset_applies_to_naive_timestamps() {
        let result = parser().with_utc_offset(0).parse(BHX_JSON).unwrap();
        assert_eq!(result.invoice.date, "2025-12-22T10:30:00.000Z");

        let result = parser().parse(BHX_JSON).unwrap();
        assert_eq!(result.invoice.date, "2025-12-22T03:30:00.000Z");
    }

    #[test]
    fn test_from_config() {
        let mut config = HoadonConfig::default();
        config.parser.utc_offset_hours = 0;

        let result = ReceiptParser::from_config(&config).parse(BHX_JSON).unwrap();
        assert_eq!(result.invoice.date, "2025-12-22T10:30:00.000Z");
    }
}
