//! Common regex patterns for receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Number immediately followed by the đồng glyph: "73.994đ", "12,900 ₫"
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        r"(?i)([0-9,.]+)\s*[đ₫]"
    ).unwrap();

    // Quantity markers: "SL: 2", "SL 2", "x3"
    pub static ref QUANTITY: Regex = Regex::new(
        r"(?i)SL:?\s*([0-9]+)|x\s*([0-9]+)"
    ).unwrap();

    // Numeric day/month/year, not validated as a calendar date
    pub static ref NUMERIC_DATE: Regex = Regex::new(
        r"([0-9]{1,2}[/\-][0-9]{1,2}[/\-][0-9]{2,4})"
    ).unwrap();

    // Bách Hóa Xanh order codes: OV209272511223011
    pub static ref BHX_ORDER_CODE: Regex = Regex::new(
        r"(?i)OV[0-9]+"
    ).unwrap();

    // KingFoodMart order codes: KP039840384
    pub static ref KFM_ORDER_CODE: Regex = Regex::new(
        r"(?i)\b[A-Z]{2,}[0-9]+\b"
    ).unwrap();

    // Labels of order total elements
    pub static ref TOTAL_LABEL: Regex = Regex::new(
        r"(?i)tổng|total|sum"
    ).unwrap();
}

/// Brand tokens searched case-sensitively in raw HTML.
pub const BHX_BRAND_TOKENS: &[&str] = &["bachhoaxanh", "Bach Hoa Xanh"];

/// Brand tokens searched case-sensitively in raw HTML.
pub const KFM_BRAND_TOKENS: &[&str] = &["kingfoodmart", "King Food Mart"];
