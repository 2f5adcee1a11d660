//! `petshower-store`
//!
//! This crate provides the entity store abstraction and backend
//! implementations for the petshower snapshot engine.
//!
//! # Overview
//!
//! The store layer exposes a transactional, typed interface over whatever
//! actually persists the scheduling data: entities of the managed kinds,
//! the optional ledger table, flat options, and opaque custom tables. The
//! snapshot builder reads through it, the restore orchestrator writes
//! through it, and neither knows which backend it is talking to.
//!
//! # Core Traits
//!
//! - [`StoreEngine`] - The entry point for store operations
//! - [`StoreTransaction`] - Transactional read/write access
//!
//! # Error Handling
//!
//! All store operations return [`StoreResult<T>`], an alias for
//! `Result<T, StoreError>`.
//!
//! # Example
//!
//! ```
//! use petshower_core::{Attributes, EntityKind, Metadata};
//! use petshower_store::backends::MemoryEngine;
//! use petshower_store::{StoreEngine, StoreTransaction};
//!
//! # fn main() -> petshower_store::StoreResult<()> {
//! let engine = MemoryEngine::new();
//!
//! let mut tx = engine.begin_write()?;
//! let id = tx.insert_entity(EntityKind::Client, Attributes::titled("Dana"), Metadata::new())?;
//! tx.commit()?;
//!
//! let tx = engine.begin_read()?;
//! let clients = tx.entities(EntityKind::Client)?;
//! assert_eq!(clients[0].id, id);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`engine`] - Store engine traits and abstractions
//! - [`backends`] - Concrete backend implementations

#![deny(clippy::unwrap_used)]

pub mod backends;
pub mod engine;

pub use engine::{StoreEngine, StoreError, StoreResult, StoreTransaction};
