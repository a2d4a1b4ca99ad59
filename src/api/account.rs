use axum::extract::State;
use axum::Json;

use super::{ApiResponse, AppState, SessionCredentials};
use crate::domain::{AccountInfo, PositionRisk};
use crate::error::AppError;

pub async fn get_account(
    State(state): State<AppState>,
    SessionCredentials(creds): SessionCredentials,
) -> Result<Json<ApiResponse<AccountInfo>>, AppError> {
    let account = state.datasource.fetch_account(&creds).await?;
    Ok(ApiResponse::ok(account))
}

/// Open positions only; flat entries are filtered by the data source.
pub async fn get_positions(
    State(state): State<AppState>,
    SessionCredentials(creds): SessionCredentials,
) -> Result<Json<ApiResponse<Vec<PositionRisk>>>, AppError> {
    let positions = state.datasource.fetch_positions(&creds).await?;
    Ok(ApiResponse::ok(positions))
}
