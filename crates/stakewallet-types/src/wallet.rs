//! Wallet records
//!
//! One wallet per (player, currency). `balance` holds withdrawable real
//! funds; `bonus_balance` holds promotional funds that can only be wagered.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::CurrencyCode;

/// Unique identifier for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The (player, currency) pair a wallet is keyed by. Also the unit of
/// serialization: concurrent operations on the same key take turns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WalletKey {
    pub player_id: PlayerId,
    pub currency: CurrencyCode,
}

impl WalletKey {
    pub fn new(player_id: PlayerId, currency: CurrencyCode) -> Self {
        Self {
            player_id,
            currency,
        }
    }
}

/// A player's balance record for one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub player_id: PlayerId,
    pub currency: CurrencyCode,
    /// Real, withdrawable funds. Never negative.
    pub balance: Decimal,
    /// Promotional funds, wager-only and never withdrawable. Never negative.
    pub bonus_balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Open a fresh zero-balance wallet. Timestamps are stamped here, not by
    /// the store.
    pub fn open(player_id: PlayerId, currency: CurrencyCode, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            currency,
            balance: Decimal::ZERO,
            bonus_balance: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> WalletKey {
        WalletKey::new(self.player_id, self.currency.clone())
    }

    /// Total spendable funds: real plus bonus.
    pub fn total(&self) -> Decimal {
        self.balance + self.bonus_balance
    }
}
