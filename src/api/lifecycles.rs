//! Lifecycle reconstruction and the statistics built on it.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::{
    parse_symbol, resolve_limit, ApiQuery, ApiResponse, AppState, SessionCredentials, MAX_LIMIT,
};
use crate::datasource::Credentials;
use crate::domain::{Symbol, TimeMs};
use crate::engine::{aggregate, summarize, within_days, AccountStats, Lifecycle};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct LifecyclesQuery {
    pub symbol: Option<String>,
    pub limit: Option<u32>,
    /// Look-back window in days; 0 or absent keeps everything fetched.
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    pub limit: Option<u32>,
    pub days: Option<u32>,
}

async fn load_lifecycles(
    state: &AppState,
    creds: &Credentials,
    symbol: Option<&Symbol>,
    limit: u32,
    days: u32,
) -> Result<Vec<Lifecycle>, AppError> {
    let fills = state.datasource.fetch_trades(creds, symbol, limit).await?;
    let fills = within_days(fills, days, TimeMs::now());
    Ok(aggregate(&fills))
}

pub async fn get_lifecycles(
    State(state): State<AppState>,
    SessionCredentials(creds): SessionCredentials,
    ApiQuery(params): ApiQuery<LifecyclesQuery>,
) -> Result<Json<ApiResponse<Vec<Lifecycle>>>, AppError> {
    let symbol = parse_symbol(params.symbol.as_deref())?;
    let limit = resolve_limit(params.limit, MAX_LIMIT)?;
    let days = params.days.unwrap_or(0);

    let lifecycles = load_lifecycles(&state, &creds, symbol.as_ref(), limit, days).await?;
    Ok(ApiResponse::ok(lifecycles))
}

pub async fn get_statistics(
    State(state): State<AppState>,
    SessionCredentials(creds): SessionCredentials,
    ApiQuery(params): ApiQuery<StatisticsQuery>,
) -> Result<Json<ApiResponse<AccountStats>>, AppError> {
    let limit = resolve_limit(params.limit, MAX_LIMIT)?;
    let days = params.days.unwrap_or(0);

    let lifecycles = load_lifecycles(&state, &creds, None, limit, days).await?;
    Ok(ApiResponse::ok(summarize(&lifecycles)))
}
