//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{transaction, wallet};
use crate::state::AppState;

/// All routes mounted under `/api`.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wallets/:player_id/deposit", post(wallet::deposit))
        .route("/wallets/:player_id/withdraw", post(wallet::withdraw))
        .route("/wallets/:player_id/bet", post(wallet::bet))
        .route("/wallets/:player_id/win", post(wallet::win))
        .route("/wallets/:player_id/bonus", post(wallet::credit_bonus))
        .route("/wallets/:player_id/convert", post(wallet::convert))
        .route("/wallets/:player_id/balance", get(wallet::balance))
        .route("/wallets/:player_id/balances", get(wallet::all_balances))
        .route("/transactions/:player_id", get(transaction::history))
        .route(
            "/withdrawals/:id/status",
            post(transaction::resolve_withdrawal),
        )
        .route("/reports/daily", get(transaction::daily_report))
}
