//! WASM bindings for grocery receipt normalization.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use wasm_bindgen::prelude::*;

use hoadon_core::invoice::rules::parse_price as parse_dong;
use hoadon_core::{share_of, CanonicalInvoice, ExtractionResult, InvoiceParser, ReceiptParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn invoice_or_error(result: ExtractionResult) -> Result<CanonicalInvoice, JsValue> {
    if result.invoice.is_empty() {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "hoadon: {} extractor found no line items",
            result.strategy
        )));
        return Err(JsValue::from_str("could not parse invoice"));
    }
    Ok(result.invoice)
}

/// Parse pasted JSON or HTML into a canonical invoice.
///
/// Fails when no line items could be extracted.
#[wasm_bindgen]
pub fn parse_invoice(text: &str) -> Result<JsValue, JsValue> {
    ReceiptParserJs::new().parse(text)
}

/// Parse and return `{ invoice, strategy, warnings, processingTimeMs }`.
#[wasm_bindgen]
pub fn parse_invoice_with_warnings(text: &str) -> Result<JsValue, JsValue> {
    ReceiptParserJs::new().parse_with_warnings(text)
}

/// Parse a Vietnamese-formatted amount (e.g., "73.994").
#[wasm_bindgen]
pub fn parse_price(text: &str) -> Option<f64> {
    parse_dong(text).map(|v| v as f64)
}

/// Share of `total` for each of `people`, rounded to whole đồng.
#[wasm_bindgen]
pub fn split_amount(total: f64, people: u32) -> Result<f64, JsValue> {
    share_of(total.round() as i64, people)
        .map(|v| v as f64)
        .map_err(to_js_error)
}

/// Receipt parser class for browser use.
#[wasm_bindgen]
pub struct ReceiptParserJs {
    parser: ReceiptParser,
}

#[wasm_bindgen]
impl ReceiptParserJs {
    /// Create a parser using Vietnam time (UTC+7).
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: ReceiptParser::new(),
        }
    }

    /// Set the UTC offset, in hours, for timestamps without a zone.
    #[wasm_bindgen]
    pub fn set_utc_offset(&mut self, hours: i32) {
        self.parser = ReceiptParser::new().with_utc_offset(hours);
    }

    /// Parse pasted JSON or HTML.
    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text).map_err(to_js_error)?;
        let invoice = invoice_or_error(result)?;

        serde_wasm_bindgen::to_value(&invoice).map_err(to_js_error)
    }

    /// Parse and include extraction warnings.
    #[wasm_bindgen]
    pub fn parse_with_warnings(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text).map_err(to_js_error)?;

        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ParseOutput {
            invoice: CanonicalInvoice,
            strategy: &'static str,
            warnings: Vec<String>,
            processing_time_ms: u64,
        }

        let output = ParseOutput {
            invoice: result.invoice,
            strategy: result.strategy,
            warnings: result.warnings,
            processing_time_ms: result.processing_time_ms,
        };

        serde_wasm_bindgen::to_value(&output).map_err(to_js_error)
    }
}

impl Default for ReceiptParserJs {
    fn default() -> Self {
        Self::new()
    }
}
