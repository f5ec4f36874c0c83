//! Routing of raw input to exactly one extractor.

use serde_json::Value;
use tracing::debug;

use super::retailer::Retailer;
use super::structured::OrderPayload;

/// How a piece of input will be parsed.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// A retailer API response.
    Structured(OrderPayload),
    /// An order page from a known retailer.
    Html(Retailer),
    /// Anything else.
    Generic,
}

impl Strategy {
    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Structured(OrderPayload::BachHoaXanh(_)) => "bachhoaxanh-json",
            Strategy::Structured(OrderPayload::KingFoodMart(_)) => "kingfoodmart-json",
            Strategy::Html(Retailer::BachHoaXanh) => "bachhoaxanh-html",
            Strategy::Html(Retailer::KingFoodMart) => "kingfoodmart-html",
            Strategy::Generic => "generic",
        }
    }
}

/// Pick the strategy for `raw`.
///
/// JSON that fails to parse or matches no known response shape is treated
/// as page text, so the brand search always sees the original input.
pub fn classify(raw: &str) -> Strategy {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            if let Some(payload) = OrderPayload::decode(value) {
                return Strategy::Structured(payload);
            }
            debug!("JSON input matches no known order shape");
        }
        Err(e) => debug!("Input is not JSON: {}", e),
    }

    match Retailer::detect(raw) {
        Some(retailer) => Strategy::Html(retailer),
        None => Strategy::Generic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_shapes() {
        let bhx = r#"{"data": {"deliveryList": []}}"#;
        assert_eq!(classify(bhx).label(), "bachhoaxanh-json");

        let kfm = r#"{"data": {"ecomOrderDetail2": {"groupOrders": []}}}"#;
        assert_eq!(classify(kfm).label(), "kingfoodmart-json");
    }

    #[test]
    fn test_html_by_brand() {
        assert_eq!(
            classify("<html>www.bachhoaxanh.com</html>").label(),
            "bachhoaxanh-html"
        );
        assert_eq!(
            classify("<html>King Food Mart</html>").label(),
            "kingfoodmart-html"
        );
        assert_eq!(classify("<html>Co.op Mart</html>").label(), "generic");
    }

    #[test]
    fn test_unknown_json_searches_raw_text() {
        assert_eq!(classify(r#"{"foo":"bar"}"#).label(), "generic");
        assert_eq!(
            classify(r#"{"site": "kingfoodmart"}"#).label(),
            "kingfoodmart-html"
        );
    }

    #[test]
    fn test_malformed_json_is_not_an_error() {
        assert_eq!(classify(r#"{"data": {"deliveryList": ["#).label(), "generic");
        assert_eq!(classify("").label(), "generic");
    }
}
