use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{resolve_limit, ApiQuery, ApiResponse, AppState, SessionCredentials, MAX_LIMIT};
use crate::engine::{bucket_daily, summarize_calendar, CalendarSummary, DailyBucket};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub days: Vec<DailyBucket>,
    pub summary: CalendarSummary,
}

/// Last 30 UTC+8 days of income, oldest first, plus a summary.
pub async fn get_calendar(
    State(state): State<AppState>,
    SessionCredentials(creds): SessionCredentials,
    ApiQuery(params): ApiQuery<CalendarQuery>,
) -> Result<Json<ApiResponse<CalendarResponse>>, AppError> {
    let limit = resolve_limit(params.limit, MAX_LIMIT)?;
    let income = state.datasource.fetch_income(&creds, limit).await?;

    let days = bucket_daily(&income, Utc::now());
    let summary = summarize_calendar(&days);
    Ok(ApiResponse::ok(CalendarResponse { days, summary }))
}
