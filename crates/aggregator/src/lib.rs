//! # Vendas Aggregator
//!
//! The dashboard's core: fan out to every upstream service at once, wait for
//! all of them to settle, and compose whatever came back into one view.
//!
//! ## Architectural Principles
//!
//! - **Settle-All:** One upstream being down never prevents the others from
//!   being shown. `gather_all` always returns exactly one outcome per call and
//!   never raises; faults become `SourceOutcome::Failure` at the branch.
//! - **Keyed, Not Ordered:** Outcomes are merged by `Source`, so the view is
//!   the same whatever order the branches completed in.
//! - **Degrade, Don't Fail:** `compose_view` substitutes neutral defaults for
//!   failed sources, marks them offline, and flags derived totals as partial.
//!
//! ## Public API
//!
//! - `gather_all` / `Gatherer`: the concurrent settle-all join.
//! - `SourceOutcome`, `FailureReason`, `FaultKind`: one branch's terminal state.
//! - `compose_view` / `AggregateView`: the merged dashboard view.
//! - `DashboardService`: gather + compose over the configured upstreams.

// Declare the modules that constitute this crate.
pub mod error;
pub mod gather;
pub mod outcome;
pub mod service;
pub mod view;

// Re-export the key components to create a clean, public-facing API.
pub use error::AggregatorError;
pub use gather::{gather_all, Gatherer, SourceCall};
pub use outcome::{FailureReason, FaultKind, SourceOutcome};
pub use service::DashboardService;
pub use view::{compose_view, compose_view_at, AggregateView, Availability, SourceAvailability};
