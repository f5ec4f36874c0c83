//! Data models for invoices, weeks and configuration.

pub mod config;
pub mod invoice;
pub mod week;

pub use config::HoadonConfig;
pub use invoice::{CanonicalInvoice, LineItem, SavedInvoice, StoreType};
pub use week::Week;
