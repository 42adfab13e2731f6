//! Ledger entries
//!
//! One immutable record per balance-affecting event. The ledger is the
//! source of truth for audit and history; wallet rows are a derived,
//! mutable projection of it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{CurrencyCode, PlayerId};

/// The kind of balance-affecting event an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Deposit,
    Withdrawal,
    Bet,
    Win,
    Bonus,
    Conversion,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::Bet => "BET",
            Self::Win => "WIN",
            Self::Bonus => "BONUS",
            Self::Conversion => "CONVERSION",
        };
        write!(f, "{s}")
    }
}

/// An entry staged by the ledger engine, before the store has assigned its
/// id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    pub player_id: PlayerId,
    pub kind: EntryKind,
    /// Magnitude of the operation, always positive. For bets this is the full
    /// wager, not the post-deduction split.
    pub amount: Decimal,
    pub currency: CurrencyCode,
    /// Real-balance snapshot immediately before the event. `None` for kinds
    /// that do not map to a single wallet's real-balance delta (BONUS,
    /// CONVERSION).
    pub balance_before: Option<Decimal>,
    /// Real-balance snapshot immediately after the event.
    pub balance_after: Option<Decimal>,
    pub description: String,
}

/// A persisted, append-only ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: Uuid,
    pub player_id: PlayerId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub balance_before: Option<Decimal>,
    pub balance_after: Option<Decimal>,
    /// Assigned at append time; monotonic within a process.
    pub timestamp: DateTime<Utc>,
    pub description: String,
}
