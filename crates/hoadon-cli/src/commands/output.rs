//! Rendering of invoices for the terminal and output files.

use hoadon_core::CanonicalInvoice;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_invoice(
    invoice: &CanonicalInvoice,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(invoice)?,
        OutputFormat::Json => serde_json::to_string(invoice)?,
        OutputFormat::Csv => format_invoice_csv(invoice)?,
        OutputFormat::Text => format_invoice_text(invoice),
    })
}

fn format_invoice_csv(invoice: &CanonicalInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "store",
        "order_code",
        "date",
        "name",
        "quantity",
        "unit",
        "unit_price",
        "price",
        "invoice_total",
    ])?;

    for item in &invoice.items {
        wtr.write_record([
            &invoice.store,
            &invoice.order_code,
            &invoice.date,
            &item.name,
            &item.quantity.normalize().to_string(),
            item.unit.as_deref().unwrap_or(""),
            &item.unit_price.map(|p| p.to_string()).unwrap_or_default(),
            &item.price.to_string(),
            &invoice.total.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_invoice_text(invoice: &CanonicalInvoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Store: {}\n", invoice.store));
    if !invoice.order_code.is_empty() {
        output.push_str(&format!("Order: {}\n", invoice.order_code));
    }
    if !invoice.date.is_empty() {
        output.push_str(&format!("Date: {}\n", invoice.date));
    }
    if let Some(address) = &invoice.address {
        output.push_str(&format!("Address: {}\n", address));
    }
    output.push('\n');

    output.push_str("Items:\n");
    for item in &invoice.items {
        let quantity = item
            .unit
            .clone()
            .unwrap_or_else(|| item.quantity.normalize().to_string());
        let marker = if item.is_discount == Some(true) { " *" } else { "" };
        output.push_str(&format!(
            "  {} ({}) {}{}\n",
            item.name,
            quantity,
            format_dong(item.price),
            marker
        ));
    }
    output.push('\n');

    if let Some(shipping) = invoice.shipping_cost.filter(|s| *s != 0) {
        output.push_str(&format!("Shipping: {}\n", format_dong(shipping)));
    }
    if let Some(discount) = invoice.discount.filter(|d| *d != 0) {
        output.push_str(&format!("Discount: {}\n", format_dong(discount)));
    }
    output.push_str(&format!("Total: {}\n", format_dong(invoice.total)));

    output
}

/// `73994` → `73.994đ`
pub fn format_dong(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped}đ")
}
