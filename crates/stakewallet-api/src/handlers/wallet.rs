//! Wallet operation handlers
//!
//! Each handler marshals the request and delegates to the service. Currency
//! codes are normalized here; whether a code is supported stays the engine's
//! call.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use stakewallet_ledger::{AllBalances, BalanceView};
use stakewallet_types::{CurrencyCode, PlayerId};

use crate::dto::{
    required_amount, BalanceQuery, BetRequest, BonusRequest, ConvertRequest, DepositRequest,
    WinRequest, WithdrawalRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Json(req): Json<DepositRequest>,
) -> ApiResult<Json<BalanceView>> {
    let view = state
        .service
        .deposit(
            PlayerId(player_id),
            required_amount(req.amount),
            CurrencyCode::new(&req.currency),
        )
        .await?;
    Ok(Json(view))
}

pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Json(req): Json<WithdrawalRequest>,
) -> ApiResult<Json<BalanceView>> {
    let view = state
        .service
        .withdraw(
            PlayerId(player_id),
            required_amount(req.amount),
            CurrencyCode::new(&req.currency),
        )
        .await?;
    Ok(Json(view))
}

pub async fn bet(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Json(req): Json<BetRequest>,
) -> ApiResult<Json<BalanceView>> {
    let view = state
        .service
        .bet(
            PlayerId(player_id),
            required_amount(req.amount),
            CurrencyCode::new(&req.currency),
            &req.game_id,
        )
        .await?;
    Ok(Json(view))
}

pub async fn win(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Json(req): Json<WinRequest>,
) -> ApiResult<Json<BalanceView>> {
    let view = state
        .service
        .win(
            PlayerId(player_id),
            required_amount(req.amount),
            CurrencyCode::new(&req.currency),
            &req.game_id,
        )
        .await?;
    Ok(Json(view))
}

pub async fn credit_bonus(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Json(req): Json<BonusRequest>,
) -> ApiResult<Json<BalanceView>> {
    let view = state
        .service
        .credit_bonus(
            PlayerId(player_id),
            required_amount(req.amount),
            CurrencyCode::new(&req.currency),
            &req.bonus_code,
        )
        .await?;
    Ok(Json(view))
}

pub async fn convert(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Json(req): Json<ConvertRequest>,
) -> ApiResult<Json<BalanceView>> {
    let view = state
        .service
        .convert(
            PlayerId(player_id),
            CurrencyCode::new(&req.from_currency),
            CurrencyCode::new(&req.to_currency),
            required_amount(req.amount),
        )
        .await?;
    Ok(Json(view))
}

pub async fn balance(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Query(query): Query<BalanceQuery>,
) -> ApiResult<Json<BalanceView>> {
    let view = state
        .service
        .balance(PlayerId(player_id), CurrencyCode::new(&query.currency))
        .await?;
    Ok(Json(view))
}

pub async fn all_balances(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> ApiResult<Json<AllBalances>> {
    let balances = state.service.all_balances(PlayerId(player_id)).await?;
    Ok(Json(balances))
}
