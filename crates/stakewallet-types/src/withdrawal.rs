//! Pending withdrawals
//!
//! Funds leave the spendable balance at request time; the pending row models
//! the payout rail still completing. Approval or rejection is a terminal
//! status write with no balance effect.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CurrencyCode, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
}

/// A withdrawal request staged alongside its wallet debit.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPendingWithdrawal {
    pub player_id: PlayerId,
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

/// A persisted withdrawal awaiting (or past) back-office resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWithdrawal {
    pub id: Uuid,
    pub player_id: PlayerId,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub status: WithdrawalStatus,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}
