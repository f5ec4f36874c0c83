//! KingFoodMart GraphQL order detail (`EcomOrderDetail2`).

use chrono::FixedOffset;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::lenient_string;
use crate::error::ExtractionError;
use crate::invoice::retailer::Retailer;
use crate::invoice::rules::{line_total, offset_hours, parse_timestamp, to_dong, to_iso};
use crate::invoice::{InvoiceExtractor, Result};
use crate::models::invoice::{CanonicalInvoice, LineItem};

#[derive(Debug, Clone, Deserialize)]
pub struct KfmResponse {
    pub data: KfmData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KfmData {
    pub ecom_order_detail2: KfmOrderDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KfmOrderDetail {
    #[serde(default)]
    pub group_orders: Vec<KfmGroupOrder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KfmGroupOrder {
    #[serde(default)]
    pub orders: Vec<KfmOrder>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KfmOrder {
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(default)]
    pub order_date: Option<Value>,
    /// The API has no delivery address; the customer's phone stands in.
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default)]
    pub products: Option<Vec<KfmProduct>>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub undiscounted_total_amount: Option<Decimal>,
    #[serde(default)]
    pub total_discount: Option<Decimal>,
    #[serde(default)]
    pub accumulated_point: Option<KfmPoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KfmProduct {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Price actually charged per unit.
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KfmPoint {
    #[serde(default)]
    pub point: Option<Decimal>,
}

/// Extractor for KingFoodMart order details.
#[derive(Debug, Clone)]
pub struct KingFoodMartJson {
    local: FixedOffset,
}

impl KingFoodMartJson {
    pub fn new() -> Self {
        Self {
            local: offset_hours(7),
        }
    }

    pub fn with_offset(mut self, local: FixedOffset) -> Self {
        self.local = local;
        self
    }

    fn line_item(&self, product: &KfmProduct) -> Result<LineItem> {
        let discount_price = product
            .discount_price
            .ok_or_else(|| ExtractionError::MissingField("products[].discountPrice".into()))?;
        let quantity = product
            .quantity
            .ok_or_else(|| ExtractionError::MissingField("products[].quantity".into()))?;

        let original_price = product
            .original_price
            .map(|p| to_dong(p, "originalPrice"))
            .transpose()?;

        Ok(LineItem {
            name: product.product_name.clone().unwrap_or_default(),
            price: line_total(discount_price, quantity, "price")?,
            quantity,
            unit_price: Some(to_dong(discount_price, "discountPrice")?),
            unit: product.unit.clone(),
            original_price,
            is_discount: Some(product.original_price.is_some_and(|orig| discount_price < orig)),
        })
    }
}

impl Default for KingFoodMartJson {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for KingFoodMartJson {
    type Source = KfmResponse;

    fn extract(&self, source: &KfmResponse) -> Result<CanonicalInvoice> {
        let groups = &source.data.ecom_order_detail2.group_orders;
        let group = groups
            .first()
            .ok_or(ExtractionError::EmptyCollection("groupOrders"))?;
        let order = group
            .orders
            .first()
            .ok_or(ExtractionError::EmptyCollection("orders"))?;

        if groups.len() > 1 || group.orders.len() > 1 {
            debug!(
                groups = groups.len(),
                orders = group.orders.len(),
                "Only the first order is extracted"
            );
        }

        let products = order
            .products
            .as_ref()
            .ok_or_else(|| ExtractionError::MissingField("products".into()))?;

        let order_date = order
            .order_date
            .as_ref()
            .ok_or_else(|| ExtractionError::MissingField("orderDate".into()))?;
        let date = parse_timestamp(order_date, self.local).ok_or_else(|| ExtractionError::Parse {
            field: "orderDate".into(),
            value: order_date.to_string(),
        })?;

        let total = order
            .total_amount
            .ok_or_else(|| ExtractionError::MissingField("totalAmount".into()))?;

        let items = products
            .iter()
            .map(|product| self.line_item(product))
            .collect::<Result<Vec<_>>>()?;

        let reward_points = order
            .accumulated_point
            .as_ref()
            .and_then(|p| p.point)
            .map(|p| to_dong(p, "accumulatedPoint.point"))
            .transpose()?
            .unwrap_or(0);

        let retailer = Retailer::KingFoodMart;
        let mut invoice = CanonicalInvoice::new(retailer.display_name(), retailer.store_type());
        invoice.order_code = order.code.clone().unwrap_or_default();
        invoice.date = to_iso(date);
        invoice.items = items;
        invoice.total = to_dong(total, "totalAmount")?;
        invoice.address = order.phone.clone();
        invoice.output_store = Some(retailer.display_name().to_string());
        invoice.shipping_cost = Some(0);
        invoice.discount = order
            .total_discount
            .map(|v| to_dong(v, "totalDiscount"))
            .transpose()?;
        invoice.reward_points = Some(reward_points);
        invoice.original_total = order
            .undiscounted_total_amount
            .map(|v| to_dong(v, "undiscountedTotalAmount"))
            .transpose()?;

        Ok(invoice)
    }
}
