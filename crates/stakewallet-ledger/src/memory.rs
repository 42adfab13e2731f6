//! In-memory store
//!
//! Implements all three store traits behind `Arc<RwLock<...>>`. Operations
//! are infallible once the per-wallet lock is held, so the wallet/ledger
//! pairing is atomic by construction: there is no failure point between the
//! upsert and the append.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use stakewallet_types::{
    CurrencyCode, LedgerEntry, NewLedgerEntry, NewPendingWithdrawal, PendingWithdrawal, PlayerId,
    Wallet, WalletError, WalletKey, WalletResult, WithdrawalStatus,
};

use crate::store::{LedgerStore, WalletStore, WithdrawalStore};

/// In-process backing store for wallets, ledger entries, and withdrawals.
#[derive(Clone, Default)]
pub struct MemoryStore {
    wallets: Arc<RwLock<HashMap<WalletKey, Wallet>>>,
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
    withdrawals: Arc<RwLock<HashMap<Uuid, PendingWithdrawal>>>,
    /// Last timestamp handed out; appends are strictly monotonic even when
    /// the wall clock stalls within one tick.
    last_timestamp: Arc<Mutex<DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn next_timestamp(&self) -> DateTime<Utc> {
        let mut last = self.last_timestamp.lock().await;
        let now = Utc::now();
        let ts = if now <= *last {
            *last + Duration::microseconds(1)
        } else {
            now
        };
        *last = ts;
        ts
    }

    /// Total number of ledger entries ever appended.
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn withdrawal(&self, id: Uuid) -> Option<PendingWithdrawal> {
        self.withdrawals.read().await.get(&id).cloned()
    }

    /// All withdrawal records for a player, oldest first.
    pub async fn withdrawals_for(&self, player_id: PlayerId) -> Vec<PendingWithdrawal> {
        let mut found: Vec<PendingWithdrawal> = self
            .withdrawals
            .read()
            .await
            .values()
            .filter(|w| w.player_id == player_id)
            .cloned()
            .collect();
        found.sort_by_key(|w| w.requested_at);
        found
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn find(
        &self,
        player_id: PlayerId,
        currency: &CurrencyCode,
    ) -> WalletResult<Option<Wallet>> {
        let wallets = self.wallets.read().await;
        Ok(wallets
            .get(&WalletKey::new(player_id, currency.clone()))
            .cloned())
    }

    async fn find_all(&self, player_id: PlayerId) -> WalletResult<Vec<Wallet>> {
        let wallets = self.wallets.read().await;
        let mut found: Vec<Wallet> = wallets
            .values()
            .filter(|w| w.player_id == player_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.currency.cmp(&b.currency));
        Ok(found)
    }

    async fn upsert(&self, wallet: Wallet) -> WalletResult<Wallet> {
        let mut wallets = self.wallets.write().await;
        wallets.insert(wallet.key(), wallet.clone());
        Ok(wallet)
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn append(&self, entry: NewLedgerEntry) -> WalletResult<LedgerEntry> {
        let timestamp = self.next_timestamp().await;
        let persisted = LedgerEntry {
            id: Uuid::new_v4(),
            player_id: entry.player_id,
            kind: entry.kind,
            amount: entry.amount,
            currency: entry.currency,
            balance_before: entry.balance_before,
            balance_after: entry.balance_after,
            timestamp,
            description: entry.description,
        };
        self.entries.write().await.push(persisted.clone());
        Ok(persisted)
    }

    async fn query_recent(
        &self,
        player_id: PlayerId,
        currency: &CurrencyCode,
        since: DateTime<Utc>,
        limit: usize,
    ) -> WalletResult<Vec<LedgerEntry>> {
        let entries = self.entries.read().await;
        let mut matched: Vec<LedgerEntry> = entries
            .iter()
            .filter(|e| {
                e.player_id == player_id && &e.currency == currency && e.timestamp >= since
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn entries_since(&self, since: DateTime<Utc>) -> WalletResult<Vec<LedgerEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.timestamp >= since)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WithdrawalStore for MemoryStore {
    async fn create(&self, withdrawal: NewPendingWithdrawal) -> WalletResult<PendingWithdrawal> {
        let record = PendingWithdrawal {
            id: Uuid::new_v4(),
            player_id: withdrawal.player_id,
            amount: withdrawal.amount,
            currency: withdrawal.currency,
            status: WithdrawalStatus::Pending,
            requested_at: Utc::now(),
            processed_at: None,
        };
        self.withdrawals
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: WithdrawalStatus,
        processed_at: DateTime<Utc>,
    ) -> WalletResult<PendingWithdrawal> {
        let mut withdrawals = self.withdrawals.write().await;
        let record = withdrawals
            .get_mut(&id)
            .ok_or(WalletError::PendingWithdrawalNotFound { id })?;
        record.status = status;
        record.processed_at = Some(processed_at);
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stakewallet_types::EntryKind;

    fn entry_for(player: i64) -> NewLedgerEntry {
        NewLedgerEntry {
            player_id: PlayerId(player),
            kind: EntryKind::Deposit,
            amount: dec!(10.00),
            currency: CurrencyCode::usd(),
            balance_before: Some(dec!(0.00)),
            balance_after: Some(dec!(10.00)),
            description: "Deposit via payment gateway".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_then_find() {
        let store = MemoryStore::new();
        let wallet = Wallet::open(PlayerId(1), CurrencyCode::usd(), Utc::now());
        store.upsert(wallet.clone()).await.unwrap();

        let found = store.find(PlayerId(1), &CurrencyCode::usd()).await.unwrap();
        assert_eq!(found, Some(wallet));
        assert!(store
            .find(PlayerId(1), &CurrencyCode::eur())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_all_sorted_by_currency() {
        let store = MemoryStore::new();
        for code in ["USD", "CAD", "EUR"] {
            store
                .upsert(Wallet::open(PlayerId(1), CurrencyCode::new(code), Utc::now()))
                .await
                .unwrap();
        }
        let all = store.find_all(PlayerId(1)).await.unwrap();
        let codes: Vec<&str> = all.iter().map(|w| w.currency.as_str()).collect();
        assert_eq!(codes, vec!["CAD", "EUR", "USD"]);
    }

    #[tokio::test]
    async fn test_append_timestamps_are_monotonic() {
        let store = MemoryStore::new();
        let mut previous = None;
        for _ in 0..50 {
            let entry = store.append(entry_for(1)).await.unwrap();
            if let Some(prev) = previous {
                assert!(entry.timestamp > prev);
            }
            previous = Some(entry.timestamp);
        }
    }

    #[tokio::test]
    async fn test_query_recent_orders_newest_first_and_caps() {
        let store = MemoryStore::new();
        for _ in 0..5 {
            store.append(entry_for(1)).await.unwrap();
        }
        store.append(entry_for(2)).await.unwrap();

        let recent = store
            .query_recent(PlayerId(1), &CurrencyCode::usd(), Utc::now() - Duration::days(1), 3)
            .await
            .unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent[0].timestamp > recent[1].timestamp);
        assert!(recent[1].timestamp > recent[2].timestamp);
        assert!(recent.iter().all(|e| e.player_id == PlayerId(1)));
    }

    #[tokio::test]
    async fn test_set_status_unknown_id() {
        let store = MemoryStore::new();
        let err = store
            .set_status(Uuid::new_v4(), WithdrawalStatus::Approved, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::PendingWithdrawalNotFound { .. }));
    }

    #[tokio::test]
    async fn test_withdrawal_lifecycle() {
        let store = MemoryStore::new();
        let created = store
            .create(NewPendingWithdrawal {
                player_id: PlayerId(1),
                amount: dec!(100.00),
                currency: CurrencyCode::usd(),
            })
            .await
            .unwrap();
        assert_eq!(created.status, WithdrawalStatus::Pending);
        assert!(created.processed_at.is_none());

        let resolved = store
            .set_status(created.id, WithdrawalStatus::Approved, Utc::now())
            .await
            .unwrap();
        assert_eq!(resolved.status, WithdrawalStatus::Approved);
        assert!(resolved.processed_at.is_some());
    }
}
