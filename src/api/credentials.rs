//! Per-session API key management.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ApiResponse, AppState};
use crate::datasource::Credentials;
use crate::error::AppError;
use crate::session::SessionId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRequest {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStatus {
    pub configured: bool,
    pub has_api_key: bool,
}

pub async fn save_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ConfigRequest>,
) -> Result<impl IntoResponse, AppError> {
    let creds = Credentials::new(&body.api_key, &body.api_secret)
        .map_err(|_| AppError::BadRequest("API key and secret must not be empty".into()))?;

    let presented = SessionId::from_headers(&headers);
    let id = state.sessions.set_credentials(presented, creds).await;
    if presented != Some(id) {
        info!(session = %id, "started session");
    }

    let cookie = id.cookie(state.sessions.ttl());
    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::ok(ConfigStatus {
            configured: true,
            has_api_key: true,
        }),
    ))
}

pub async fn config_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<ApiResponse<ConfigStatus>> {
    let configured = match SessionId::from_headers(&headers) {
        Some(id) => state.sessions.get(id).await.is_some(),
        None => false,
    };
    ApiResponse::ok(ConfigStatus {
        configured,
        has_api_key: configured,
    })
}

pub async fn clear_config(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<ApiResponse<ConfigStatus>> {
    if let Some(id) = SessionId::from_headers(&headers) {
        state.sessions.clear_credentials(id).await;
    }
    ApiResponse::ok(ConfigStatus {
        configured: false,
        has_api_key: false,
    })
}
