//! Core library for normalizing Vietnamese grocery receipts.
//!
//! This crate provides:
//! - Structured extraction of Bách Hóa Xanh and KingFoodMart API responses
//! - Heuristic scraping of saved order pages and a generic fallback
//! - A store-agnostic invoice model
//! - Bill splitting and weekly summaries

pub mod clock;
pub mod error;
pub mod invoice;
pub mod models;
pub mod split;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ExtractionError, HoadonError, Result, SplitError};
pub use invoice::{
    classify, CustomInvoiceBuilder, ExtractionResult, InvoiceExtractor, InvoiceParser,
    ReceiptParser, Retailer, Strategy,
};
pub use invoice::rules::parse_price;
pub use models::config::HoadonConfig;
pub use models::invoice::{CanonicalInvoice, LineItem, SavedInvoice, StoreType};
pub use models::week::Week;
pub use split::{find_duplicate, share_of, summarize_weeks, WeekSummary, WeeklyReport};

/// Parse pasted JSON, HTML or text with the default parser.
pub fn parse(raw: &str) -> Result<CanonicalInvoice> {
    ReceiptParser::new().parse(raw).map(|result| result.invoice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_king_food_mart() {
        let raw = r#"{"data": {"ecomOrderDetail2": {"groupOrders": [{"orders": [{
            "code": "KP039840384",
            "orderDate": 1766200500000,
            "totalAmount": 14000,
            "products": [{"productName": "Đậu hũ non", "quantity": 1, "discountPrice": 14000, "originalPrice": 14000, "unit": "1 hộp"}]
        }]}]}}}"#;

        let invoice = parse(raw).unwrap();
        assert_eq!(invoice.store_type, StoreType::KingFoodMart);
        assert_eq!(invoice.order_code, "KP039840384");
        assert_eq!(invoice.total, 14000);
    }

    #[test]
    fn test_serialized_shape() {
        let raw = r#"{"data": {"customerDemand": "OV1", "inputTime": "2025-12-22T10:30:00", "cartTotalAmount": 14070,
            "deliveryList": [{"deliveryDetailList": [{"productName": "BÍ XANH", "salePrice": 35000, "quantity": 0.402, "quantityUnitValue": "402g"}]}]}}"#;
        let value = serde_json::to_value(parse(raw).unwrap()).unwrap();

        assert_eq!(value["storeType"], "bachhoaxanh");
        assert_eq!(value["orderCode"], "OV1");
        assert_eq!(value["items"][0]["quantity"], 0.402);
        assert_eq!(value["items"][0]["unitPrice"], 35000);
        assert!(value.get("address").is_none());
    }
}
