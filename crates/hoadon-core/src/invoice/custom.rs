//! Hand-entered invoices for purchases without a receipt to paste.

use rust_decimal::Decimal;

use super::rules::{line_total, to_iso};
use super::Result;
use crate::clock::Clock;
use crate::error::ExtractionError;
use crate::models::invoice::{CanonicalInvoice, LineItem, SavedInvoice, StoreType};

/// Builder for a manually entered invoice.
#[derive(Debug, Clone, Default)]
pub struct CustomInvoiceBuilder {
    store: String,
    items: Vec<(String, i64, Decimal)>,
    not_split: bool,
}

impl CustomInvoiceBuilder {
    pub fn new(store: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            ..Default::default()
        }
    }

    /// Add a line with its unit price and quantity.
    pub fn item(mut self, name: impl Into<String>, unit_price: i64, quantity: Decimal) -> Self {
        self.items.push((name.into(), unit_price, quantity));
        self
    }

    /// Mark the invoice as paid by one person only.
    pub fn not_split(mut self, not_split: bool) -> Self {
        self.not_split = not_split;
        self
    }

    /// Build the invoice, stamped with the current time.
    ///
    /// Lines without a name or price are dropped. A zero quantity counts
    /// as one.
    pub fn build<C: Clock>(self, clock: &C) -> Result<SavedInvoice> {
        let store = self.store.trim();
        if store.is_empty() {
            return Err(ExtractionError::MissingField("store".into()));
        }

        let items = self
            .items
            .into_iter()
            .filter(|(name, unit_price, _)| !name.trim().is_empty() && *unit_price != 0)
            .map(|(name, unit_price, quantity)| {
                let quantity = if quantity.is_zero() {
                    Decimal::ONE
                } else {
                    quantity
                };
                let mut item = LineItem::new(
                    name.trim(),
                    line_total(Decimal::from(unit_price), quantity, "price")?,
                    quantity,
                );
                item.unit_price = Some(unit_price);
                Ok(item)
            })
            .collect::<Result<Vec<_>>>()?;

        if items.is_empty() {
            return Err(ExtractionError::NoData);
        }

        let now = clock.now();
        let mut invoice = CanonicalInvoice::new(store, StoreType::Unknown);
        invoice.order_code = format!("CUSTOM-{}", now.timestamp_millis());
        invoice.date = to_iso(now);
        invoice.items = items;
        invoice.total = invoice.items_total();

        Ok(SavedInvoice::new(now.timestamp_millis(), invoice).not_split(self.not_split))
    }
}
