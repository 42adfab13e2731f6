//! Ledger history, withdrawal resolution, and reporting handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use stakewallet_ledger::DailyReport;
use stakewallet_types::{CurrencyCode, LedgerEntry, PendingWithdrawal, PlayerId};

use crate::dto::{HistoryQuery, ResolveWithdrawalRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<LedgerEntry>>> {
    let entries = state
        .service
        .history(
            PlayerId(player_id),
            CurrencyCode::new(&query.currency),
            query.days,
        )
        .await?;
    Ok(Json(entries))
}

pub async fn resolve_withdrawal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResolveWithdrawalRequest>,
) -> ApiResult<Json<PendingWithdrawal>> {
    let status = req.terminal_status()?;
    let resolved = state.service.resolve_withdrawal(id, status).await?;
    Ok(Json(resolved))
}

pub async fn daily_report(State(state): State<Arc<AppState>>) -> ApiResult<Json<DailyReport>> {
    let report = state.service.daily_report().await?;
    Ok(Json(report))
}
