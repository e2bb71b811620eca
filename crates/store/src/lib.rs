//! # Vendas Store Crate
//!
//! The in-memory collections behind each CRUD service.
//!
//! ## Architectural Principles
//!
//! - **Thin Adapter:** Storage is in memory. Each service owns one
//!   `Repository<T>`; there is no schema, no query language and no migrations.
//! - **Snapshots, Not Borrows:** Readers get an owned copy of the collection
//!   (`Repository::snapshot`). The lock is released before the copy is handed
//!   to anything else, so an offloaded computation can never observe a
//!   concurrent write, and no request holds the lock across an `.await`.
//!
//! ## Public API
//!
//! - `Repository`: the cloneable handle to one collection.
//! - `Entity`: what a record needs to be stored (a stable id).
//! - `seed`: the reference catalogue each service starts with.
//! - `StoreError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod repository;
pub mod seed;

// Re-export the key components to create a clean, public-facing API.
pub use error::StoreError;
pub use repository::{Entity, Repository};
