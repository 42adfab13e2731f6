//! Stakewallet Ledger - per-player, per-currency wallet ledger engine
//!
//! The ledger engine owns every rule about how balances change:
//! - deposits and wins credit real funds
//! - withdrawals debit real funds and stage a pending payout record
//! - bets draw bonus funds before real funds
//! - conversion computes deterministic two-stage-rounded amounts
//! - every mutation is paired with exactly one append-only ledger entry
//!
//! # Invariants
//!
//! 1. No negative balances, real or bonus
//! 2. Wallet mutation and ledger append land as one atomic unit
//! 3. Operations on one (player, currency) pair are serialized; distinct
//!    wallets never block each other
//! 4. Entries are append-only and the engine never clamps a bad amount
//!
//! The engine performs no I/O of its own; reads and writes go through the
//! [`store`] traits. [`MemoryStore`] is the bundled implementation.

pub mod engine;
pub mod memory;
pub mod rates;
pub mod service;
pub mod store;

pub use engine::{LedgerEngine, Staged, StagedConversion, StagedWithdrawal};
pub use memory::MemoryStore;
pub use rates::{Limits, RateTable};
pub use service::{
    AllBalances, BalanceView, CurrencyActivity, CurrencyBalance, DailyReport, WalletService,
    HISTORY_PAGE_SIZE,
};
pub use store::{LedgerStore, WalletStore, WithdrawalStore};
