//! # Vendas Analytics
//!
//! Descriptive statistics over monetary series, plus the customer digest the
//! customers service reports alongside its list.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   HTTP, stores or threads. It depends only on `core-types` (Layer 0).
//! - **Snapshot Input:** Every computation takes an owned, immutable
//!   `NumericSeries` (or a slice it never mutates), which is what makes it safe
//!   to hand to the offload executor while the caller keeps serving writes.
//!
//! ## Public API
//!
//! - `NumericSeries`: a validated, non-negative series of monetary values.
//! - `compute_statistics`: count, sum, mean, min, max, median and population
//!   standard deviation, rounded to cents.
//! - `StatisticsResult`: the immutable record produced by `compute_statistics`.
//! - `digest_customers` / `CustomerDigest`: the customers service's summary.

// Declare the modules that constitute this crate.
pub mod digest;
pub mod engine;
pub mod error;
pub mod report;
pub mod series;

// Re-export the key components to create a clean, public-facing API.
pub use digest::{digest_customers, CustomerDigest};
pub use engine::compute_statistics;
pub use error::AnalyticsError;
pub use report::StatisticsResult;
pub use series::NumericSeries;
