//! Wallet service façade
//!
//! Orchestrates one operation at a time: acquire the per-wallet lock(s), ask
//! the engine for the staged outcome, persist the wallet mutation and its
//! ledger entry as one unit, release. Operations on distinct wallets run
//! concurrently; two operations on one wallet take turns, so a lost update
//! cannot happen.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use stakewallet_types::{
    CurrencyCode, EntryKind, LedgerEntry, PendingWithdrawal, PlayerId, Wallet, WalletError,
    WalletKey, WalletResult, WithdrawalStatus,
};

use crate::engine::LedgerEngine;
use crate::memory::MemoryStore;
use crate::store::{LedgerStore, WalletStore, WithdrawalStore};

/// Fixed page size for transaction history.
pub const HISTORY_PAGE_SIZE: usize = 100;

/// Balance view for one wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceView {
    pub player_id: PlayerId,
    pub currency: CurrencyCode,
    pub balance: Decimal,
    pub bonus_balance: Decimal,
    pub total_balance: Decimal,
}

impl From<&Wallet> for BalanceView {
    fn from(wallet: &Wallet) -> Self {
        Self {
            player_id: wallet.player_id,
            currency: wallet.currency.clone(),
            balance: wallet.balance,
            bonus_balance: wallet.bonus_balance,
            total_balance: wallet.total(),
        }
    }
}

/// One line of the multi-currency summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBalance {
    pub currency: CurrencyCode,
    pub balance: Decimal,
    pub bonus_balance: Decimal,
    pub total_balance: Decimal,
}

/// Every wallet a player holds plus the aggregate in the base currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllBalances {
    pub player_id: PlayerId,
    pub currencies: Vec<CurrencyBalance>,
    #[serde(rename = "totalBalanceInUSD")]
    pub total_balance_in_usd: Decimal,
}

/// Per-currency activity totals for the daily report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyActivity {
    pub currency: CurrencyCode,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    pub total_bets: Decimal,
    pub total_wins: Decimal,
    pub unique_players: usize,
}

/// Ledger activity over the trailing 24 hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub generated_at: DateTime<Utc>,
    pub window_start: DateTime<Utc>,
    pub currencies: Vec<CurrencyActivity>,
}

/// The service façade over the ledger engine and its stores.
pub struct WalletService {
    engine: LedgerEngine,
    wallets: Arc<dyn WalletStore>,
    ledger: Arc<dyn LedgerStore>,
    withdrawals: Arc<dyn WithdrawalStore>,
    /// One async lock per (player, currency); created on first use, kept for
    /// the life of the process.
    locks: DashMap<WalletKey, Arc<Mutex<()>>>,
}

impl WalletService {
    pub fn new(
        engine: LedgerEngine,
        wallets: Arc<dyn WalletStore>,
        ledger: Arc<dyn LedgerStore>,
        withdrawals: Arc<dyn WithdrawalStore>,
    ) -> Self {
        Self {
            engine,
            wallets,
            ledger,
            withdrawals,
            locks: DashMap::new(),
        }
    }

    /// Convenience constructor backed by one shared [`MemoryStore`].
    pub fn in_memory(engine: LedgerEngine) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(
            engine,
            store.clone(),
            store.clone(),
            store,
        )
    }

    pub fn engine(&self) -> &LedgerEngine {
        &self.engine
    }

    fn lock_for(&self, key: &WalletKey) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn require_wallet(
        &self,
        player_id: PlayerId,
        currency: &CurrencyCode,
    ) -> WalletResult<Wallet> {
        self.wallets
            .find(player_id, currency)
            .await?
            .ok_or_else(|| WalletError::WalletNotFound {
                player_id,
                currency: currency.clone(),
            })
    }

    /// Credit real funds, opening the wallet on first use.
    pub async fn deposit(
        &self,
        player_id: PlayerId,
        amount: Decimal,
        currency: CurrencyCode,
    ) -> WalletResult<BalanceView> {
        let key = WalletKey::new(player_id, currency.clone());
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let now = Utc::now();
        let wallet = match self.wallets.find(player_id, &currency).await? {
            Some(wallet) => wallet,
            None => Wallet::open(player_id, currency.clone(), now),
        };

        let staged = self.engine.deposit(&wallet, amount, now)?;
        let saved = self.wallets.upsert(staged.wallet).await?;
        self.ledger.append(staged.entry).await?;

        tracing::info!(
            player_id = %player_id,
            currency = %saved.currency,
            %amount,
            balance = %saved.balance,
            "deposit applied"
        );
        Ok(BalanceView::from(&saved))
    }

    /// Debit real funds and record a pending withdrawal in the same unit.
    /// Funds leave the spendable balance before back-office approval.
    pub async fn withdraw(
        &self,
        player_id: PlayerId,
        amount: Decimal,
        currency: CurrencyCode,
    ) -> WalletResult<BalanceView> {
        // Amount problems are reported even when the wallet does not exist.
        self.engine.validate_withdrawal_amount(amount)?;

        let key = WalletKey::new(player_id, currency.clone());
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let wallet = self.require_wallet(player_id, &currency).await?;
        let staged = self.engine.withdraw(&wallet, amount, Utc::now())?;
        let saved = self.wallets.upsert(staged.wallet).await?;
        self.ledger.append(staged.entry).await?;
        let pending = self.withdrawals.create(staged.withdrawal).await?;

        tracing::info!(
            player_id = %player_id,
            currency = %saved.currency,
            %amount,
            withdrawal_id = %pending.id,
            "withdrawal requested, funds debited"
        );
        Ok(BalanceView::from(&saved))
    }

    /// Place a wager, drawing bonus funds before real funds.
    pub async fn bet(
        &self,
        player_id: PlayerId,
        amount: Decimal,
        currency: CurrencyCode,
        game_ref: &str,
    ) -> WalletResult<BalanceView> {
        LedgerEngine::validate_amount(amount)?;

        let key = WalletKey::new(player_id, currency.clone());
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let wallet = self.require_wallet(player_id, &currency).await?;
        let staged = self.engine.bet(&wallet, amount, game_ref, Utc::now())?;
        let saved = self.wallets.upsert(staged.wallet).await?;
        self.ledger.append(staged.entry).await?;

        tracing::info!(
            player_id = %player_id,
            currency = %saved.currency,
            %amount,
            game = game_ref,
            "bet placed"
        );
        Ok(BalanceView::from(&saved))
    }

    /// Credit a payout to the real balance.
    pub async fn win(
        &self,
        player_id: PlayerId,
        amount: Decimal,
        currency: CurrencyCode,
        game_ref: &str,
    ) -> WalletResult<BalanceView> {
        LedgerEngine::validate_amount(amount)?;

        let key = WalletKey::new(player_id, currency.clone());
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let wallet = self.require_wallet(player_id, &currency).await?;
        let staged = self.engine.win(&wallet, amount, game_ref, Utc::now())?;
        let saved = self.wallets.upsert(staged.wallet).await?;
        self.ledger.append(staged.entry).await?;

        tracing::info!(
            player_id = %player_id,
            currency = %saved.currency,
            %amount,
            game = game_ref,
            "win credited"
        );
        Ok(BalanceView::from(&saved))
    }

    /// Credit promotional funds.
    pub async fn credit_bonus(
        &self,
        player_id: PlayerId,
        amount: Decimal,
        currency: CurrencyCode,
        bonus_code: &str,
    ) -> WalletResult<BalanceView> {
        LedgerEngine::validate_amount(amount)?;

        let key = WalletKey::new(player_id, currency.clone());
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let wallet = self.require_wallet(player_id, &currency).await?;
        let staged = self
            .engine
            .credit_bonus(&wallet, amount, bonus_code, Utc::now())?;
        let saved = self.wallets.upsert(staged.wallet).await?;
        self.ledger.append(staged.entry).await?;

        tracing::info!(
            player_id = %player_id,
            currency = %saved.currency,
            %amount,
            bonus_code,
            "bonus credited"
        );
        Ok(BalanceView::from(&saved))
    }

    /// Convert real funds between two of the player's wallets. Both locks
    /// are taken in lexicographic currency order, so an opposing conversion
    /// cannot deadlock with this one.
    pub async fn convert(
        &self,
        player_id: PlayerId,
        from: CurrencyCode,
        to: CurrencyCode,
        amount: Decimal,
    ) -> WalletResult<BalanceView> {
        LedgerEngine::validate_amount(amount)?;

        let source_key = WalletKey::new(player_id, from.clone());
        let dest_key = WalletKey::new(player_id, to.clone());

        let (first, second) = if from <= to {
            (source_key.clone(), dest_key.clone())
        } else {
            (dest_key.clone(), source_key.clone())
        };

        let first_lock = self.lock_for(&first);
        let _first_guard = first_lock.lock().await;
        // Same-currency conversion is one wallet, one lock.
        let second_lock = (first != second).then(|| self.lock_for(&second));
        let _second_guard = match &second_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let now = Utc::now();
        let source = self.require_wallet(player_id, &from).await?;
        let destination = if from == to {
            source.clone()
        } else {
            match self.wallets.find(player_id, &to).await? {
                Some(wallet) => wallet,
                None => Wallet::open(player_id, to.clone(), now),
            }
        };

        let staged = self.engine.convert(&source, &destination, amount, now)?;
        self.wallets.upsert(staged.source).await?;
        let saved_destination = self.wallets.upsert(staged.destination).await?;
        self.ledger.append(staged.entry).await?;

        tracing::info!(
            player_id = %player_id,
            %from,
            %to,
            %amount,
            converted = %staged.converted,
            "currency converted"
        );
        Ok(BalanceView::from(&saved_destination))
    }

    /// Single-currency balance query.
    pub async fn balance(
        &self,
        player_id: PlayerId,
        currency: CurrencyCode,
    ) -> WalletResult<BalanceView> {
        let wallet = self.require_wallet(player_id, &currency).await?;
        Ok(BalanceView::from(&wallet))
    }

    /// Every wallet the player holds plus the base-currency aggregate.
    pub async fn all_balances(&self, player_id: PlayerId) -> WalletResult<AllBalances> {
        let wallets = self.wallets.find_all(player_id).await?;
        let currencies = wallets
            .iter()
            .map(|w| CurrencyBalance {
                currency: w.currency.clone(),
                balance: w.balance,
                bonus_balance: w.bonus_balance,
                total_balance: w.total(),
            })
            .collect();
        Ok(AllBalances {
            player_id,
            currencies,
            total_balance_in_usd: self.engine.base_currency_total(&wallets),
        })
    }

    /// Ledger entries for one wallet over a trailing day window, newest
    /// first, capped at [`HISTORY_PAGE_SIZE`].
    pub async fn history(
        &self,
        player_id: PlayerId,
        currency: CurrencyCode,
        days: i64,
    ) -> WalletResult<Vec<LedgerEntry>> {
        let since = Self::window_start(days)?;
        // History is scoped to an existing wallet's life.
        self.require_wallet(player_id, &currency).await?;
        self.ledger
            .query_recent(player_id, &currency, since, HISTORY_PAGE_SIZE)
            .await
    }

    /// The caller picks the day window; a non-positive or unrepresentable
    /// window is a bad request, not a panic.
    fn window_start(days: i64) -> WalletResult<DateTime<Utc>> {
        let invalid = || WalletError::invalid_amount(format!("Invalid day window: {days}"));
        if days <= 0 {
            return Err(invalid());
        }
        let window = Duration::try_days(days).ok_or_else(invalid)?;
        Utc::now().checked_sub_signed(window).ok_or_else(invalid)
    }

    /// Back-office resolution of a pending withdrawal. Terminal status write
    /// only; the debit made at request time stands either way.
    pub async fn resolve_withdrawal(
        &self,
        id: Uuid,
        status: WithdrawalStatus,
    ) -> WalletResult<PendingWithdrawal> {
        let resolved = self.withdrawals.set_status(id, status, Utc::now()).await?;
        tracing::info!(withdrawal_id = %id, ?status, "withdrawal resolved");
        Ok(resolved)
    }

    /// Per-currency activity totals over the trailing 24 hours.
    pub async fn daily_report(&self) -> WalletResult<DailyReport> {
        let generated_at = Utc::now();
        let window_start = generated_at - Duration::days(1);
        let entries = self.ledger.entries_since(window_start).await?;

        let mut totals: BTreeMap<CurrencyCode, (CurrencyActivity, HashSet<PlayerId>)> =
            BTreeMap::new();
        for entry in entries {
            let (activity, players) = totals
                .entry(entry.currency.clone())
                .or_insert_with(|| {
                    (
                        CurrencyActivity {
                            currency: entry.currency.clone(),
                            total_deposits: Decimal::ZERO,
                            total_withdrawals: Decimal::ZERO,
                            total_bets: Decimal::ZERO,
                            total_wins: Decimal::ZERO,
                            unique_players: 0,
                        },
                        HashSet::new(),
                    )
                });
            match entry.kind {
                EntryKind::Deposit => activity.total_deposits += entry.amount,
                EntryKind::Withdrawal => activity.total_withdrawals += entry.amount,
                EntryKind::Bet => activity.total_bets += entry.amount,
                EntryKind::Win => activity.total_wins += entry.amount,
                EntryKind::Bonus | EntryKind::Conversion => {}
            }
            players.insert(entry.player_id);
        }

        let currencies = totals
            .into_values()
            .map(|(mut activity, players)| {
                activity.unique_players = players.len();
                activity
            })
            .collect();

        Ok(DailyReport {
            generated_at,
            window_start,
            currencies,
        })
    }
}
