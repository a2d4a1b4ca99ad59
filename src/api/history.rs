//! Raw exchange history: fills, orders, income.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::{parse_symbol, resolve_limit, ApiQuery, ApiResponse, AppState, SessionCredentials};
use crate::datasource::{DEFAULT_INCOME_LIMIT, DEFAULT_ORDERS_LIMIT, DEFAULT_TRADES_LIMIT};
use crate::domain::{Fill, IncomeRecord, Order, TimeMs};
use crate::engine::within_days;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub symbol: Option<String>,
    pub limit: Option<u32>,
    /// Look-back window in days, applied after fetching; 0 or absent keeps all.
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct IncomeQuery {
    pub limit: Option<u32>,
    pub days: Option<u32>,
}

pub async fn get_trades(
    State(state): State<AppState>,
    SessionCredentials(creds): SessionCredentials,
    ApiQuery(params): ApiQuery<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<Fill>>>, AppError> {
    let symbol = parse_symbol(params.symbol.as_deref())?;
    let limit = resolve_limit(params.limit, DEFAULT_TRADES_LIMIT)?;

    let fills = state
        .datasource
        .fetch_trades(&creds, symbol.as_ref(), limit)
        .await?;
    let fills = within_days(fills, params.days.unwrap_or(0), TimeMs::now());
    Ok(ApiResponse::ok(fills))
}

pub async fn get_orders(
    State(state): State<AppState>,
    SessionCredentials(creds): SessionCredentials,
    ApiQuery(params): ApiQuery<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<Order>>>, AppError> {
    let symbol = parse_symbol(params.symbol.as_deref())?;
    let limit = resolve_limit(params.limit, DEFAULT_ORDERS_LIMIT)?;

    let orders = state
        .datasource
        .fetch_orders(&creds, symbol.as_ref(), limit)
        .await?;
    let orders = within_days(orders, params.days.unwrap_or(0), TimeMs::now());
    Ok(ApiResponse::ok(orders))
}

pub async fn get_income(
    State(state): State<AppState>,
    SessionCredentials(creds): SessionCredentials,
    ApiQuery(params): ApiQuery<IncomeQuery>,
) -> Result<Json<ApiResponse<Vec<IncomeRecord>>>, AppError> {
    let limit = resolve_limit(params.limit, DEFAULT_INCOME_LIMIT)?;
    let income = state.datasource.fetch_income(&creds, limit).await?;
    let income = within_days(income, params.days.unwrap_or(0), TimeMs::now());
    Ok(ApiResponse::ok(income))
}
