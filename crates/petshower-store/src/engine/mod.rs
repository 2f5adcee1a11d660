//! Store engine traits and abstractions.
//!
//! This module defines the traits that store backends implement:
//!
//! - [`StoreEngine`] - Entry point for creating transactions
//! - [`StoreTransaction`] - Typed reads and writes under one transaction
//!
//! # Error Handling
//!
//! All operations return [`StoreResult<T>`], an alias for
//! `Result<T, StoreError>`. See [`StoreError`] for the possible variants.

mod error;
mod traits;

pub use error::{StoreError, StoreResult};
pub use traits::{StoreEngine, StoreTransaction};
