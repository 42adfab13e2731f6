//! Error taxonomy
//!
//! Every kind is caller-visible and non-retryable as-is: the caller must
//! change the request. The engine never clamps or substitutes a value.
//! Messages restate the offending values so they can be displayed or logged
//! without re-deriving context.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::{CurrencyCode, PlayerId};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WalletError {
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Unsupported currency: {code}")]
    UnsupportedCurrency { code: CurrencyCode },

    #[error("Wallet not found for player {player_id} and currency {currency}")]
    WalletNotFound {
        player_id: PlayerId,
        currency: CurrencyCode,
    },

    #[error("Insufficient funds. Available: {available}, requested: {requested}")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Pending withdrawal not found: {id}")]
    PendingWithdrawalNotFound { id: Uuid },

    /// A store adapter failed mid-unit. The whole operation aborts; no
    /// partial wallet or ledger write may remain visible.
    #[error("Store error: {message}")]
    Store { message: String },
}

impl WalletError {
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }
}

pub type WalletResult<T> = Result<T, WalletError>;
