//! Store boundaries
//!
//! The engine's only view of durable storage. Implementations may block on a
//! database; the bundled [`crate::MemoryStore`] keeps everything in process.
//! Whatever the backing, a failure mid-operation aborts the whole unit — the
//! service never leaves a wallet mutation without its ledger entry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use stakewallet_types::{
    CurrencyCode, LedgerEntry, NewLedgerEntry, NewPendingWithdrawal, PendingWithdrawal, PlayerId,
    Wallet, WalletResult, WithdrawalStatus,
};

/// Durable storage for wallet rows, keyed by (player, currency).
#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn find(&self, player_id: PlayerId, currency: &CurrencyCode)
        -> WalletResult<Option<Wallet>>;

    async fn find_all(&self, player_id: PlayerId) -> WalletResult<Vec<Wallet>>;

    /// Insert or replace the wallet row. The caller stamps timestamps as
    /// part of the mutation; the store writes the row as given.
    async fn upsert(&self, wallet: Wallet) -> WalletResult<Wallet>;
}

/// Append-only storage for ledger entries.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist an entry, assigning its id and a per-process monotonic
    /// timestamp.
    async fn append(&self, entry: NewLedgerEntry) -> WalletResult<LedgerEntry>;

    /// Entries for one (player, currency) pair since `since`, newest first,
    /// at most `limit`.
    async fn query_recent(
        &self,
        player_id: PlayerId,
        currency: &CurrencyCode,
        since: DateTime<Utc>,
        limit: usize,
    ) -> WalletResult<Vec<LedgerEntry>>;

    /// All entries since `since`, for reporting folds.
    async fn entries_since(&self, since: DateTime<Utc>) -> WalletResult<Vec<LedgerEntry>>;
}

/// Storage for pending withdrawal records.
#[async_trait]
pub trait WithdrawalStore: Send + Sync {
    async fn create(&self, withdrawal: NewPendingWithdrawal) -> WalletResult<PendingWithdrawal>;

    /// Terminal status write; no balance effect.
    async fn set_status(
        &self,
        id: Uuid,
        status: WithdrawalStatus,
        processed_at: DateTime<Utc>,
    ) -> WalletResult<PendingWithdrawal>;
}
