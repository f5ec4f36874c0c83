//! Canonical invoice model shared by every extractor.
//!
//! Field names serialize in camelCase so the JSON output is identical to the
//! invoice objects the web front end stores.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Merchant discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreType {
    /// Bách Hóa Xanh.
    #[serde(rename = "bachhoaxanh")]
    BachHoaXanh,
    /// KingFoodMart.
    #[serde(rename = "kingfoodmart")]
    KingFoodMart,
    /// Generic currency scrape, retailer not identified.
    #[serde(rename = "generic")]
    Generic,
    /// Not produced by a retailer extractor (e.g. entered by hand).
    #[serde(rename = "unknown")]
    #[default]
    Unknown,
}

impl StoreType {
    /// Tag as it appears in serialized invoices.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::BachHoaXanh => "bachhoaxanh",
            StoreType::KingFoodMart => "kingfoodmart",
            StoreType::Generic => "generic",
            StoreType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized, store-agnostic invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalInvoice {
    /// Display name of the merchant.
    pub store: String,

    /// Merchant discriminator.
    #[serde(default)]
    pub store_type: StoreType,

    /// Merchant-assigned order identifier, empty when not found.
    #[serde(default)]
    pub order_code: String,

    /// ISO-8601 timestamp on structured paths, best-effort text otherwise.
    #[serde(default)]
    pub date: String,

    /// Line items in source order.
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Authoritative order total in đồng.
    pub total: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_store: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_points: Option<i64>,

    /// Total before promotional discounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_total: Option<i64>,
}

/// One product entry within an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product description.
    pub name: String,

    /// Effective line total (unit price × quantity).
    pub price: i64,

    /// Count or weight; weight-based produce is fractional.
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,

    /// Price per unit before multiplying by quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<i64>,

    /// Human-readable quantity label, e.g. "402g" or "1 hộp".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Unit price before a promotion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_discount: Option<bool>,
}

impl LineItem {
    /// Create a line item with only the fields every path provides.
    pub fn new(name: impl Into<String>, price: i64, quantity: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            unit_price: None,
            unit: None,
            original_price: None,
            is_discount: None,
        }
    }
}

impl CanonicalInvoice {
    /// Create an invoice with no items and no optional metadata.
    pub fn new(store: impl Into<String>, store_type: StoreType) -> Self {
        Self {
            store: store.into(),
            store_type,
            order_code: String::new(),
            date: String::new(),
            items: Vec::new(),
            total: 0,
            address: None,
            output_store: None,
            shipping_cost: None,
            discount: None,
            reward_points: None,
            original_total: None,
        }
    }

    /// An invoice without items counts as a failed parse for callers.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the line totals, saturating at `i64::MAX`.
    pub fn items_total(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |sum, item| sum.saturating_add(item.price))
    }

    /// Number of items sold at a promotional price.
    pub fn discounted_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.is_discount == Some(true))
            .count()
    }

    /// Check the invoice and return any issues found.
    ///
    /// A mismatch between the item sum and the total is reported but is not
    /// an error: shipping and discounts make the two differ legitimately.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.order_code.is_empty() {
            issues.push("Missing order code".to_string());
        }

        if self.total <= 0 {
            issues.push("Total is zero".to_string());
        }

        if let Some(item) = self.items.iter().find(|i| i.name.trim().is_empty()) {
            issues.push(format!("Line item with price {} has no name", item.price));
        }

        let items_total = self.items_total();
        if !self.items.is_empty() && items_total != self.total {
            issues.push(format!(
                "Line item total ({}) differs from invoice total ({})",
                items_total, self.total
            ));
        }

        issues
    }
}

/// An invoice as kept in the user's history, with its week assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedInvoice {
    /// Identifier assigned by the persistence layer.
    pub id: i64,

    #[serde(flatten)]
    pub invoice: CanonicalInvoice,

    /// Week this invoice is assigned to.
    #[serde(default)]
    pub week_id: Option<i64>,

    /// The invoice belongs to one person and is not shared.
    #[serde(default)]
    pub is_not_split: bool,
}

impl SavedInvoice {
    pub fn new(id: i64, invoice: CanonicalInvoice) -> Self {
        Self {
            id,
            invoice,
            week_id: None,
            is_not_split: false,
        }
    }

    pub fn with_week(mut self, week_id: i64) -> Self {
        self.week_id = Some(week_id);
        self
    }

    pub fn not_split(mut self, not_split: bool) -> Self {
        self.is_not_split = not_split;
        self
    }
}
