//! Request and query payloads
//!
//! Field names follow the wire convention (camelCase). Amounts are optional
//! at the edge so a missing field produces the domain's invalid-amount error
//! instead of a framework deserialization failure.

use rust_decimal::Decimal;
use serde::Deserialize;

use stakewallet_types::WithdrawalStatus;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub amount: Option<Decimal>,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub amount: Option<Decimal>,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRequest {
    pub amount: Option<Decimal>,
    pub currency: String,
    pub game_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinRequest {
    pub amount: Option<Decimal>,
    pub currency: String,
    pub game_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusRequest {
    pub amount: Option<Decimal>,
    pub currency: String,
    pub bonus_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceQuery {
    pub currency: String,
}

fn default_days() -> i64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub currency: String,
    #[serde(default = "default_days")]
    pub days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveWithdrawalRequest {
    pub status: WithdrawalStatus,
}

impl ResolveWithdrawalRequest {
    /// Only terminal statuses are accepted as a resolution.
    pub fn terminal_status(&self) -> ApiResult<WithdrawalStatus> {
        match self.status {
            WithdrawalStatus::Pending => Err(ApiError::BadRequest(
                "Status must be APPROVED or REJECTED".to_string(),
            )),
            status => Ok(status),
        }
    }
}

/// A missing amount reads as an invalid amount, not a malformed request.
pub fn required_amount(amount: Option<Decimal>) -> Decimal {
    amount.unwrap_or(Decimal::ZERO)
}
