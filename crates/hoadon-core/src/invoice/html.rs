//! Heuristic scraping of saved order pages.
//!
//! Retailer pages change often and have no stable markup, so the scraper
//! only relies on loose class-name fragments and currency-looking text.
//! Misfires are silent: a page that matches nothing yields an invoice with
//! no items.

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::retailer::Retailer;
use super::rules::patterns::{CURRENCY_AMOUNT, TOTAL_LABEL};
use super::rules::{
    extract_quantity, first_numeric_date, line_total, parse_price, FieldExtractor,
    PriceExtractor,
};
use super::{InvoiceExtractor, Result};
use crate::models::invoice::{CanonicalInvoice, LineItem};

lazy_static! {
    static ref CANDIDATE: Selector =
        Selector::parse(r#"[class*="product"], [class*="item"], tr"#).unwrap();
    static ref NAME: Selector = Selector::parse(r#"[class*="name"], [class*="title"]"#).unwrap();
    static ref CELL: Selector = Selector::parse("td").unwrap();
    static ref TOTAL: Selector =
        Selector::parse(r#"[class*="total"], [class*="sum"], strong, b"#).unwrap();
}

/// Scraper for one retailer's order page.
#[derive(Debug, Clone, Copy)]
pub struct HtmlScraper {
    retailer: Retailer,
}

impl HtmlScraper {
    pub fn new(retailer: Retailer) -> Self {
        Self { retailer }
    }

    fn line_item(&self, element: ElementRef<'_>, prices: &PriceExtractor) -> Option<LineItem> {
        let text: String = element.text().collect();

        let name = element
            .select(&NAME)
            .next()
            .or_else(|| element.select(&CELL).next())
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let price = prices.extract(&text).unwrap_or(0);

        if name.is_empty() || price <= 0 {
            return None;
        }

        Some(LineItem::new(name, price, extract_quantity(&text)))
    }

    /// Amount of the first labelled element carrying a currency match.
    /// Later labelled elements are not consulted even when that amount
    /// does not parse.
    fn labelled_total(&self, document: &Html) -> Option<i64> {
        let text = document
            .select(&TOTAL)
            .map(|el| el.text().collect::<String>())
            .find(|text| TOTAL_LABEL.is_match(text) && CURRENCY_AMOUNT.is_match(text))?;
        let caps = CURRENCY_AMOUNT.captures(&text)?;
        parse_price(&caps[1])
    }

    /// Σ price × quantity, saturating at `i64::MAX`.
    fn item_sum(items: &[LineItem]) -> i64 {
        items.iter().fold(0i64, |sum, item| {
            let line = line_total(Decimal::from(item.price), item.quantity, "total")
                .unwrap_or(i64::MAX);
            sum.saturating_add(line)
        })
    }
}

impl InvoiceExtractor for HtmlScraper {
    type Source = str;

    fn extract(&self, html: &str) -> Result<CanonicalInvoice> {
        let document = Html::parse_document(html);
        let prices = PriceExtractor::new();

        let mut invoice =
            CanonicalInvoice::new(self.retailer.display_name(), self.retailer.store_type());

        invoice.order_code = self
            .retailer
            .order_code_pattern()
            .find(html)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        invoice.date = first_numeric_date(html).unwrap_or_default();

        invoice.items = document
            .select(&CANDIDATE)
            .filter_map(|el| self.line_item(el, &prices))
            .collect();

        invoice.total = match self.labelled_total(&document) {
            Some(total) if total != 0 => total,
            _ => {
                debug!("No labelled total found, summing line items");
                Self::item_sum(&invoice.items)
            }
        };

        debug!(
            retailer = self.retailer.display_name(),
            items = invoice.items.len(),
            "Scraped order page"
        );

        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::StoreType;
    use pretty_assertions::assert_eq;

    const BHX_PAGE: &str = r#"<html><head><title>bachhoaxanh.com - Đơn hàng</title></head><body>
        <div class="order-header">Mã đơn: OV209272511223011 - Ngày 22/12/2025</div>
        <div class="product-item">
            <span class="product-name">Hành lá gói 100g</span>
            <span class="price">8.500đ</span>
            <span>SL: 1</span>
        </div>
        <div class="product-item">
            <span class="product-name">Sữa tươi Vinamilk</span>
            <span class="price">12.900đ</span>
            <span>x2</span>
        </div>
        <div class="order-total"><strong>Tổng tiền: 34.300đ</strong></div>
    </body></html>"#;

    fn scrape(retailer: Retailer, html: &str) -> CanonicalInvoice {
        HtmlScraper::new(retailer).extract(html).unwrap()
    }

    #[test]
    fn test_scrape_bach_hoa_xanh_page() {
        let invoice = scrape(Retailer::BachHoaXanh, BHX_PAGE);

        assert_eq!(invoice.store, "Bách Hóa Xanh");
        assert_eq!(invoice.store_type, StoreType::BachHoaXanh);
        assert_eq!(invoice.order_code, "OV209272511223011");
        assert_eq!(invoice.date, "22/12/2025");
        assert_eq!(invoice.total, 34300);

        let names: Vec<_> = invoice.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Hành lá gói 100g", "Sữa tươi Vinamilk"]);
        assert_eq!(invoice.items[1].price, 12900);
        assert_eq!(invoice.items[1].quantity, Decimal::from(2));
    }

    #[test]
    fn test_admission_requires_name_and_price() {
        let html = r#"<table>
            <tr><td>Phí giao hàng</td><td>0đ</td></tr>
            <tr><td>   </td><td>5.000đ</td></tr>
            <tr><td>Không có giá</td><td>miễn phí</td></tr>
            <tr><td>Cà rốt</td><td>15.000đ</td></tr>
        </table>"#;
        let invoice = scrape(Retailer::KingFoodMart, html);

        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].name, "Cà rốt");
        assert!(invoice.items.iter().all(|i| !i.name.is_empty() && i.price > 0));
    }

    #[test]
    fn test_total_falls_back_to_item_sum() {
        let html = r#"<table>
            <tr><td>Cà rốt</td><td>15.000đ</td><td>SL: 2</td></tr>
            <tr><td>Bắp cải</td><td>10.000đ</td></tr>
        </table>"#;
        let invoice = scrape(Retailer::KingFoodMart, html);

        assert_eq!(invoice.total, 40000);
    }

    #[test]
    fn test_zero_labelled_total_falls_back() {
        let html = r#"<table><tr><td>Cà rốt</td><td>15.000đ</td></tr></table>
            <b>Tổng: 0đ</b>"#;
        let invoice = scrape(Retailer::BachHoaXanh, html);

        assert_eq!(invoice.total, 15000);
    }

    #[test]
    fn test_unparseable_labelled_total_falls_back() {
        // the first labelled amount is a lone separator; the later one is ignored
        let html = r#"<table><tr><td>Cà rốt</td><td>15.000đ</td></tr></table>
            <b>Tổng: . đ</b><b>Tổng: 50.000đ</b>"#;
        let invoice = scrape(Retailer::BachHoaXanh, html);

        assert_eq!(invoice.total, 15000);
    }

    #[test]
    fn test_label_without_amount_is_skipped() {
        let html = r#"<table><tr><td>Cà rốt</td><td>15.000đ</td></tr></table>
            <b>Tổng cộng</b><b>Tổng: 50.000đ</b>"#;
        let invoice = scrape(Retailer::BachHoaXanh, html);

        assert_eq!(invoice.total, 50000);
    }

    #[test]
    fn test_item_sum_saturates() {
        let html = r#"bachhoaxanh <table>
            <tr><td>A</td><td>9000000000000000000đ</td></tr>
            <tr><td>B</td><td>9000000000000000000đ</td></tr>
        </table>"#;
        let invoice = scrape(Retailer::BachHoaXanh, html);

        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.total, i64::MAX);
    }

    #[test]
    fn test_line_overflow_is_not_an_error() {
        let html = r#"bachhoaxanh <table>
            <tr><td>A</td><td>9000000000000000000đ SL: 9000000000000000000</td></tr>
        </table>"#;
        let invoice = HtmlScraper::new(Retailer::BachHoaXanh).extract(html).unwrap();

        assert_eq!(invoice.items[0].quantity, Decimal::from(9_000_000_000_000_000_000i64));
        assert_eq!(invoice.total, i64::MAX);
    }

    #[test]
    fn test_king_food_mart_order_code() {
        let html = r#"<p>King Food Mart</p><p>Đơn hàng KP039840384</p>"#;
        let invoice = scrape(Retailer::KingFoodMart, html);

        assert_eq!(invoice.order_code, "KP039840384");
        assert_eq!(invoice.store, "KingFoodMart");
        assert!(invoice.items.is_empty());
        assert_eq!(invoice.total, 0);
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let invoice = scrape(Retailer::BachHoaXanh, "<p>bachhoaxanh</p>");

        assert_eq!(invoice.order_code, "");
        assert_eq!(invoice.date, "");
        assert!(invoice.items.is_empty());
    }
}
