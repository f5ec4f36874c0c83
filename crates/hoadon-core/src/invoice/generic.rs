//! Last-resort extraction for text from unknown stores.
//!
//! Every currency amount in the text is collected; the largest is taken as
//! the order total and the rest become anonymous line items.

use chrono::FixedOffset;
use rust_decimal::Decimal;

use super::retailer::GENERIC_STORE_NAME;
use super::rules::{all_prices, day_label, offset_hours};
use super::{InvoiceExtractor, Result};
use crate::clock::{Clock, SystemClock};
use crate::models::invoice::{CanonicalInvoice, LineItem, StoreType};

/// Fallback extractor dated with the injected clock.
#[derive(Debug, Clone)]
pub struct GenericScraper<C = SystemClock> {
    clock: C,
    local: FixedOffset,
}

impl GenericScraper<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for GenericScraper<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> GenericScraper<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            local: offset_hours(7),
        }
    }

    pub fn with_offset(mut self, local: FixedOffset) -> Self {
        self.local = local;
        self
    }
}

impl<C: Clock> InvoiceExtractor for GenericScraper<C> {
    type Source = str;

    fn extract(&self, text: &str) -> Result<CanonicalInvoice> {
        let mut amounts = all_prices(text);
        amounts.sort_unstable_by(|a, b| b.cmp(a));

        let mut invoice = CanonicalInvoice::new(GENERIC_STORE_NAME, StoreType::Generic);
        invoice.date = day_label(self.clock.now(), self.local);

        let mut amounts = amounts.into_iter();
        invoice.total = amounts.next().unwrap_or(0);
        invoice.items = amounts
            .enumerate()
            .map(|(i, price)| LineItem::new(format!("Sản phẩm {}", i + 1), price, Decimal::ONE))
            .collect();

        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn scraper() -> GenericScraper<FixedClock> {
        // 18:30 UTC is already the next day in Vietnam
        GenericScraper::with_clock(FixedClock(
            Utc.with_ymd_and_hms(2025, 12, 21, 18, 30, 0).unwrap(),
        ))
    }

    #[test]
    fn test_largest_amount_is_total() {
        let text = "Rau 12.000đ\nThịt 85.000đ\nTrứng 30.000 ₫\nTổng cộng 127.000đ";
        let invoice = scraper().extract(text).unwrap();

        assert_eq!(invoice.store, "Cửa hàng khác");
        assert_eq!(invoice.store_type, StoreType::Generic);
        assert_eq!(invoice.order_code, "");
        assert_eq!(invoice.total, 127000);

        let items: Vec<_> = invoice
            .items
            .iter()
            .map(|i| (i.name.as_str(), i.price))
            .collect();
        assert_eq!(
            items,
            vec![
                ("Sản phẩm 1", 85000),
                ("Sản phẩm 2", 30000),
                ("Sản phẩm 3", 12000),
            ]
        );
        assert!(invoice.items.iter().all(|i| i.quantity == Decimal::ONE));
    }

    #[test]
    fn test_date_is_today_in_local_zone() {
        let invoice = scraper().extract("").unwrap();
        assert_eq!(invoice.date, "22/12/2025");

        let invoice = scraper().with_offset(offset_hours(0)).extract("").unwrap();
        assert_eq!(invoice.date, "21/12/2025");
    }

    #[test]
    fn test_no_amounts() {
        let invoice = scraper().extract(r#"{"foo":"bar"}"#).unwrap();

        assert_eq!(invoice.total, 0);
        assert!(invoice.items.is_empty());
    }

    #[test]
    fn test_zero_amounts_ignored() {
        let invoice = scraper().extract("Phí 0đ, Hàng 5.000đ").unwrap();

        assert_eq!(invoice.total, 5000);
        assert!(invoice.items.is_empty());
    }
}
