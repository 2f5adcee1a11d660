//! Concrete store backend implementations.

pub mod memory;

pub use memory::MemoryEngine;
