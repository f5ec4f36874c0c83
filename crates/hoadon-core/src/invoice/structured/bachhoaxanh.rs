//! Bách Hóa Xanh order history API (`History/GetDetailHistory`).
//!
//! Products are priced by weight or count, so quantities are often
//! fractional and line totals are always recomputed from the sale price.

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

/// Top-level response.
#[derive(Debug, Clone, Deserialize)]
pub struct BhxResponse {
    pub data: BhxData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BhxData {
    pub delivery_list: Vec<BhxDelivery>,

    #[serde(flatten)]
    pub order: BhxOrderFields,
}

/// Order-level fields. The API has carried these both on `data` and on
/// each delivery; the delivery wins when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BhxOrderFields {
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_demand: Option<String>,
    #[serde(default)]
    pub input_time: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default)]
    pub cart_total_amount: Option<Decimal>,
    #[serde(default)]
    pub total_shipping_cost: Option<Decimal>,
    #[serde(default)]
    pub total_discount: Option<Decimal>,
    #[serde(default)]
    pub reward_points: Option<Decimal>,
}

impl BhxOrderFields {
    /// Fill every field missing here from `fallback`.
    fn or(self, fallback: BhxOrderFields) -> BhxOrderFields {
        BhxOrderFields {
            customer_demand: self.customer_demand.or(fallback.customer_demand),
            input_time: self.input_time.or(fallback.input_time),
            address: self.address.or(fallback.address),
            cart_total_amount: self.cart_total_amount.or(fallback.cart_total_amount),
            total_shipping_cost: self.total_shipping_cost.or(fallback.total_shipping_cost),
            total_discount: self.total_discount.or(fallback.total_discount),
            reward_points: self.reward_points.or(fallback.reward_points),
        }
    }
}

/// One shipment of an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BhxDelivery {
    #[serde(default)]
    pub delivery_detail_list: Option<Vec<BhxDetail>>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub output_store_name: Option<String>,

    #[serde(flatten)]
    pub order: BhxOrderFields,
}

/// One product line of a shipment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BhxDetail {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,

    #[serde(default, alias = "unitSalePrice")]
    pub sale_price: Option<Decimal>,

    #[serde(default)]
    pub quantity: Option<Decimal>,

    /// Label such as "402g"; absent for count-based products.
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantity_unit_value: Option<String>,
}

/// Extractor for Bách Hóa Xanh API responses.
#[derive(Debug, Clone)]
pub struct BachHoaXanhJson {
    /// Zone of timestamps that carry no offset.
    local: FixedOffset,
}

impl BachHoaXanhJson {
    pub fn new() -> Self {
        Self {
            local: offset_hours(7),
        }
    }

    pub fn with_offset(mut self, local: FixedOffset) -> Self {
        self.local = local;
        self
    }

    fn line_item(&self, detail: &BhxDetail) -> Result<LineItem> {
        let sale_price = detail
            .sale_price
            .ok_or_else(|| ExtractionError::MissingField("deliveryDetailList[].salePrice".into()))?;
        let quantity = detail
            .quantity
            .ok_or_else(|| ExtractionError::MissingField("deliveryDetailList[].quantity".into()))?;

        let unit = detail
            .quantity_unit_value
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| quantity.normalize().to_string());

        Ok(LineItem {
            name: detail.product_name.clone().unwrap_or_default(),
            price: line_total(sale_price, quantity, "price")?,
            quantity,
            unit_price: Some(to_dong(sale_price, "salePrice")?),
            unit: Some(unit),
            original_price: None,
            is_discount: None,
        })
    }
}

impl Default for BachHoaXanhJson {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for BachHoaXanhJson {
    type Source = BhxResponse;

    fn extract(&self, source: &BhxResponse) -> Result<CanonicalInvoice> {
        let data = &source.data;
        // Later shipments of a split order are not merged.
        let delivery = data
            .delivery_list
            .first()
            .ok_or(ExtractionError::EmptyCollection("deliveryList"))?;

        if data.delivery_list.len() > 1 {
            debug!(
                "Ignoring {} additional deliveries",
                data.delivery_list.len() - 1
            );
        }

        let details = delivery
            .delivery_detail_list
            .as_ref()
            .ok_or_else(|| ExtractionError::MissingField("deliveryDetailList".into()))?;

        let order = delivery.order.clone().or(data.order.clone());

        let input_time = order
            .input_time
            .as_ref()
            .ok_or_else(|| ExtractionError::MissingField("inputTime".into()))?;
        let date = parse_timestamp(input_time, self.local).ok_or_else(|| ExtractionError::Parse {
            field: "inputTime".into(),
            value: input_time.to_string(),
        })?;

        let total = order
            .cart_total_amount
            .ok_or_else(|| ExtractionError::MissingField("cartTotalAmount".into()))?;

        let items = details
            .iter()
            .map(|detail| self.line_item(detail))
            .collect::<Result<Vec<_>>>()?;

        let retailer = Retailer::BachHoaXanh;
        let mut invoice = CanonicalInvoice::new(retailer.display_name(), retailer.store_type());
        invoice.order_code = order.customer_demand.unwrap_or_default();
        invoice.date = to_iso(date);
        invoice.items = items;
        invoice.total = to_dong(total, "cartTotalAmount")?;
        invoice.address = order.address;
        invoice.output_store = delivery.output_store_name.clone();
        invoice.shipping_cost = order
            .total_shipping_cost
            .map(|v| to_dong(v, "totalShippingCost"))
            .transpose()?;
        invoice.discount = order
            .total_discount
            .map(|v| to_dong(v, "totalDiscount"))
            .transpose()?;
        invoice.reward_points = order
            .reward_points
            .map(|v| to_dong(v, "rewardPoints"))
            .transpose()?;

        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::StoreType;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const FIXTURE: &str = r#"{
        "data": {
            "customerDemand": "OV209272511223011",
            "inputTime": "2025-12-22T10:30:00",
            "address": "342 - 342A Nguyễn Duy Trinh, ấp Trung 2, Phường Bình Trị Đông, TP HCM",
            "cartTotalAmount": 73994,
            "totalShippingCost": 0,
            "totalDiscount": 0,
            "rewardPoints": 740,
            "deliveryList": [
                {
                    "outputStoreName": "BHX_HCM_TDU - 342 Nguyễn Duy Trinh",
                    "deliveryDetailList": [
                        {"productName": "HÀNH LÁ GÓI 100G", "salePrice": 8500, "quantity": 1},
                        {"productName": "DƯA HẤU KHÔNG HẠT", "salePrice": 22300, "quantity": 2.306, "quantityUnitValue": "2.306kg"},
                        {"productName": "BÍ XANH", "salePrice": 35000, "quantity": 0.402, "quantityUnitValue": "402g"}
                    ]
                }
            ]
        }
    }"#;

    fn extract(json: &str) -> Result<CanonicalInvoice> {
        let response: BhxResponse = serde_json::from_str(json).unwrap();
        BachHoaXanhJson::new().extract(&response)
    }

    #[test]
    fn test_extract_fixture() {
        let invoice = extract(FIXTURE).unwrap();

        assert_eq!(invoice.store, "Bách Hóa Xanh");
        assert_eq!(invoice.store_type, StoreType::BachHoaXanh);
        assert_eq!(invoice.order_code, "OV209272511223011");
        assert_eq!(invoice.date, "2025-12-22T03:30:00.000Z");
        assert_eq!(invoice.total, 73994);
        assert_eq!(invoice.items.len(), 3);
        assert_eq!(
            invoice.output_store.as_deref(),
            Some("BHX_HCM_TDU - 342 Nguyễn Duy Trinh")
        );
        assert_eq!(invoice.shipping_cost, Some(0));
        assert_eq!(invoice.discount, Some(0));
        assert_eq!(invoice.reward_points, Some(740));
        assert_eq!(invoice.original_total, None);
    }

    #[test]
    fn test_line_prices_recomputed() {
        let invoice = extract(FIXTURE).unwrap();

        let melon = &invoice.items[1];
        assert_eq!(melon.name, "DƯA HẤU KHÔNG HẠT");
        assert_eq!(melon.quantity, Decimal::from_str("2.306").unwrap());
        assert_eq!(melon.unit_price, Some(22300));
        assert_eq!(melon.price, 51424);
        assert_eq!(melon.unit.as_deref(), Some("2.306kg"));

        for item in &invoice.items {
            let expected = (Decimal::from(item.unit_price.unwrap()) * item.quantity).round();
            assert_eq!(Decimal::from(item.price), expected);
        }
    }

    #[test]
    fn test_total_is_authoritative() {
        let invoice = extract(FIXTURE).unwrap();
        // 8500 + 51424 + 14070
        assert_eq!(invoice.items_total(), 73994);

        let json = FIXTURE.replace("\"cartTotalAmount\": 73994", "\"cartTotalAmount\": 80000");
        let invoice = extract(&json).unwrap();
        assert_eq!(invoice.total, 80000);
        assert_eq!(invoice.items_total(), 73994);
    }

    #[test]
    fn test_unit_defaults_to_quantity() {
        let invoice = extract(FIXTURE).unwrap();
        assert_eq!(invoice.items[0].unit.as_deref(), Some("1"));
    }

    #[test]
    fn test_empty_delivery_list_fails() {
        let err = extract(r#"{"data": {"deliveryList": [], "cartTotalAmount": 1000}}"#).unwrap_err();
        assert_eq!(err, ExtractionError::EmptyCollection("deliveryList"));
    }

    #[test]
    fn test_only_first_delivery_is_used() {
        let json = r#"{"data": {
            "customerDemand": "OV1", "inputTime": "2025-12-22T10:30:00", "cartTotalAmount": 30000,
            "deliveryList": [
                {"deliveryDetailList": [{"productName": "A", "salePrice": 10000, "quantity": 1}]},
                {"deliveryDetailList": [{"productName": "B", "salePrice": 20000, "quantity": 1}]}
            ]
        }}"#;
        let invoice = extract(json).unwrap();

        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].name, "A");
        assert_eq!(invoice.total, 30000);
    }

    #[test]
    fn test_order_fields_on_delivery() {
        let json = r#"{"data": {"deliveryList": [{
            "customerDemand": "OV42",
            "inputTime": "2025-12-22T10:30:00+07:00",
            "cartTotalAmount": 12000,
            "unused": true,
            "deliveryDetailList": [{"productName": "Rau muống", "unitSalePrice": 6000, "quantity": 2}]
        }]}}"#;
        let invoice = extract(json).unwrap();

        assert_eq!(invoice.order_code, "OV42");
        assert_eq!(invoice.total, 12000);
        assert_eq!(invoice.items[0].price, 12000);
        // not defaulted when absent
        assert_eq!(invoice.shipping_cost, None);
        assert_eq!(invoice.reward_points, None);
    }

    #[test]
    fn test_invalid_input_time_fails() {
        let json = FIXTURE.replace("2025-12-22T10:30:00", "not a date");
        let err = extract(&json).unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { ref field, .. } if field == "inputTime"));
    }

    #[test]
    fn test_zero_price_is_kept() {
        let json = r#"{"data": {"customerDemand": "OV1", "inputTime": "2025-12-22", "cartTotalAmount": 0,
            "deliveryList": [{"deliveryDetailList": [{"productName": "Quà tặng", "salePrice": 0, "quantity": 1}]}]}}"#;
        let invoice = extract(json).unwrap();

        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].price, 0);
    }
}
