//! # Vendas Core Types
//!
//! The Layer 0 vocabulary shared by every service and by the dashboard: the
//! entities each service stores, the payloads used to create them, and the
//! envelopes every service answers with.
//!
//! This crate performs no I/O. Field validation lives here so that every
//! service rejects bad input the same way before touching its store.

pub mod entities;
pub mod error;
pub mod responses;
pub mod source;

// Re-export the core types to provide a clean public API.
pub use entities::{
    Customer, CustomerInput, NewSale, NewSaleItem, Product, ProductInput, Sale, SaleItem,
    SaleStatus, MAX_PRICE, MAX_QUANTITY,
};
pub use error::CoreError;
pub use responses::{HealthStatus, ListResponse};
pub use source::Source;
