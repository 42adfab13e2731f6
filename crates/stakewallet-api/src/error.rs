//! API error handling
//!
//! Maps the domain error taxonomy onto HTTP statuses. Response bodies carry
//! the human-readable message as-is; the engine already phrases them with
//! the offending values included.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use stakewallet_types::WalletError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Wallet(WalletError::InvalidAmount { .. })
            | Self::Wallet(WalletError::UnsupportedCurrency { .. })
            | Self::Wallet(WalletError::InsufficientFunds { .. })
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,

            Self::Wallet(WalletError::WalletNotFound { .. })
            | Self::Wallet(WalletError::PendingWithdrawalNotFound { .. }) => {
                StatusCode::NOT_FOUND
            }

            Self::Wallet(WalletError::Store { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short error label for the response body.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Wallet(WalletError::InvalidAmount { .. }) => "Invalid Amount",
            Self::Wallet(WalletError::UnsupportedCurrency { .. }) => "Unsupported Currency",
            Self::Wallet(WalletError::InsufficientFunds { .. }) => "Insufficient Funds",
            Self::Wallet(WalletError::WalletNotFound { .. }) => "Wallet Not Found",
            Self::Wallet(WalletError::PendingWithdrawalNotFound { .. }) => {
                "Withdrawal Not Found"
            }
            Self::Wallet(WalletError::Store { .. }) => "Internal Server Error",
            Self::BadRequest(_) => "Bad Request",
        }
    }
}

/// JSON error body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            timestamp: Utc::now(),
            status: err.status_code().as_u16(),
            error: err.label().to_string(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Wallet(WalletError::Store { message }) = &self {
            tracing::error!(error = %message, "store failure surfaced to API");
        }
        let status = self.status_code();
        let body = ErrorResponse::from(&self);
        (status, Json(body)).into_response()
    }
}
