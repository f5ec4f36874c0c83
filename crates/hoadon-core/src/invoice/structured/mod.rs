//! Structured extractors for retailer API responses.
//!
//! A pasted payload is decoded against each known response shape in turn.
//! Decoding only requires the keys that identify a shape; everything else is
//! optional so that a recognised payload with missing fields surfaces as an
//! [`ExtractionError`](crate::error::ExtractionError) instead of silently
//! falling through to the HTML path.

pub mod bachhoaxanh;
pub mod kingfoodmart;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use bachhoaxanh::{BachHoaXanhJson, BhxResponse};
pub use kingfoodmart::{KfmResponse, KingFoodMartJson};

/// A retailer API response of a known shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OrderPayload {
    /// `data.deliveryList` is an array.
    BachHoaXanh(BhxResponse),
    /// `data.ecomOrderDetail2` is an object.
    KingFoodMart(KfmResponse),
}

impl OrderPayload {
    /// Decode a JSON value, or `None` when it matches no known shape.
    pub fn decode(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}

/// Accept a string or a number where the retailers are inconsistent.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
