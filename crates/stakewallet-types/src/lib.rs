//! Stakewallet foundation types
//!
//! Shared domain vocabulary for the wallet ledger: player and currency
//! identifiers, scale-2 money helpers, the wallet / ledger-entry /
//! pending-withdrawal records, and the error taxonomy every layer speaks.
//!
//! # Invariants
//!
//! 1. `balance >= 0` and `bonus_balance >= 0` for every wallet, always
//! 2. One wallet per (player, currency) pair
//! 3. Ledger entries are append-only and never mutated after creation
//! 4. Only the ledger engine computes new balances

pub mod currency;
pub mod entry;
pub mod error;
pub mod money;
pub mod wallet;
pub mod withdrawal;

pub use currency::CurrencyCode;
pub use entry::{EntryKind, LedgerEntry, NewLedgerEntry};
pub use error::{WalletError, WalletResult};
pub use money::{round2, round10};
pub use wallet::{PlayerId, Wallet, WalletKey};
pub use withdrawal::{NewPendingWithdrawal, PendingWithdrawal, WithdrawalStatus};
