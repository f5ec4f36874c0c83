//! Supported retailers and their brand-specific constants.

use regex::Regex;

use super::rules::patterns::{BHX_BRAND_TOKENS, BHX_ORDER_CODE, KFM_BRAND_TOKENS, KFM_ORDER_CODE};
use crate::models::invoice::StoreType;

/// Display name used by the generic fallback.
pub const GENERIC_STORE_NAME: &str = "Cửa hàng khác";

/// A grocery retailer with a known receipt format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Retailer {
    BachHoaXanh,
    KingFoodMart,
}

impl Retailer {
    /// Retailers in detection order.
    pub const ALL: [Retailer; 2] = [Retailer::BachHoaXanh, Retailer::KingFoodMart];

    pub fn display_name(&self) -> &'static str {
        match self {
            Retailer::BachHoaXanh => "Bách Hóa Xanh",
            Retailer::KingFoodMart => "KingFoodMart",
        }
    }

    pub fn store_type(&self) -> StoreType {
        match self {
            Retailer::BachHoaXanh => StoreType::BachHoaXanh,
            Retailer::KingFoodMart => StoreType::KingFoodMart,
        }
    }

    /// Pattern for order codes printed on the retailer's pages.
    pub fn order_code_pattern(&self) -> &'static Regex {
        match self {
            Retailer::BachHoaXanh => &*BHX_ORDER_CODE,
            Retailer::KingFoodMart => &*KFM_ORDER_CODE,
        }
    }

    /// Brand name and subdomain strings, matched case-sensitively.
    pub fn brand_tokens(&self) -> &'static [&'static str] {
        match self {
            Retailer::BachHoaXanh => BHX_BRAND_TOKENS,
            Retailer::KingFoodMart => KFM_BRAND_TOKENS,
        }
    }

    /// Identify the retailer from raw page text.
    pub fn detect(text: &str) -> Option<Retailer> {
        Self::ALL
            .into_iter()
            .find(|r| r.brand_tokens().iter().any(|token| text.contains(token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(
            Retailer::detect(r#"<a href="https://www.bachhoaxanh.com/don-hang">"#),
            Some(Retailer::BachHoaXanh)
        );
        assert_eq!(
            Retailer::detect("<title>King Food Mart</title>"),
            Some(Retailer::KingFoodMart)
        );
        assert_eq!(Retailer::detect("<p>Winmart</p>"), None);
    }

    #[test]
    fn test_detect_is_case_sensitive() {
        assert_eq!(Retailer::detect("BACHHOAXANH"), None);
        assert_eq!(Retailer::detect("KINGFOODMART"), None);
    }

    #[test]
    fn test_bach_hoa_xanh_wins_when_both_present() {
        assert_eq!(
            Retailer::detect("kingfoodmart vs bachhoaxanh"),
            Some(Retailer::BachHoaXanh)
        );
    }
}
