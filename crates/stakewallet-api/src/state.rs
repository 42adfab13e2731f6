//! Application state shared across handlers

use std::sync::Arc;

use stakewallet_ledger::{LedgerEngine, Limits, RateTable, WalletService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The wallet service façade
    pub service: Arc<WalletService>,
}

impl AppState {
    pub fn new(service: Arc<WalletService>) -> Self {
        Self { service }
    }

    /// State backed by the in-memory store with default rates and limits.
    pub fn in_memory() -> Self {
        let engine = LedgerEngine::new(RateTable::default(), Limits::default());
        Self::new(Arc::new(WalletService::in_memory(engine)))
    }
}
