//! The in-memory engine.

use std::sync::{Arc, RwLock};

use crate::engine::{StoreEngine, StoreError, StoreResult};

use super::transaction::MemoryTransaction;
use super::State;

/// The default table-name prefix for in-memory stores.
const DEFAULT_PREFIX: &str = "ps_";

/// An in-memory store engine.
///
/// Cloning the engine is cheap and shares the underlying state, matching
/// how embedding code passes one store to several components.
#[derive(Debug, Clone)]
pub struct MemoryEngine {
    state: Arc<RwLock<State>>,
    prefix: String,
}

impl MemoryEngine {
    /// Create an empty store with a ledger table present.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Create an empty store under a specific table prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { state: Arc::new(RwLock::new(State::new(true))), prefix: prefix.into() }
    }

    /// Create an empty store whose ledger table does not exist.
    ///
    /// Ledger operations on such a store return
    /// [`StoreError::TableNotFound`].
    #[must_use]
    pub fn without_ledger() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::new(false))),
            prefix: DEFAULT_PREFIX.to_owned(),
        }
    }

    pub(super) fn snapshot(&self) -> StoreResult<State> {
        self.state
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| StoreError::transaction("store lock poisoned"))
    }

    pub(super) fn replace(&self, state: State) -> StoreResult<()> {
        let mut guard =
            self.state.write().map_err(|_| StoreError::transaction("store lock poisoned"))?;
        *guard = state;
        Ok(())
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreEngine for MemoryEngine {
    type Transaction<'a>
        = MemoryTransaction
    where
        Self: 'a;

    fn begin_read(&self) -> StoreResult<Self::Transaction<'_>> {
        MemoryTransaction::new(self.clone(), true)
    }

    fn begin_write(&self) -> StoreResult<Self::Transaction<'_>> {
        MemoryTransaction::new(self.clone(), false)
    }

    fn table_prefix(&self) -> String {
        self.prefix.clone()
    }
}
