//! # Vendas Offload Executor
//!
//! Runs CPU-bound computations (statistics over a store snapshot) away from
//! the async request handlers, so a slow computation never stalls the
//! runtime threads that are serving other requests.
//!
//! ## Architectural Principles
//!
//! - **Bounded, Fixed Pool:** A fixed number of OS threads drain one bounded
//!   job queue. Callers that find the queue full wait asynchronously for room;
//!   nothing spawns a thread per request.
//! - **Exactly-Once Delivery:** Each submission gets its own `oneshot`
//!   channel. The caller sees either the value or an `ExecutionFault`, never
//!   a silent default.
//! - **No Retries:** A failed computation is reported, not re-run. Retry
//!   policy belongs to the caller.
//!
//! ## Public API
//!
//! - `OffloadExecutor`: the worker pool and its async `run` entry point.
//! - `OffloadError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod pool;

// Re-export the key components to provide a clean, public-facing API.
pub use error::OffloadError;
pub use pool::OffloadExecutor;
