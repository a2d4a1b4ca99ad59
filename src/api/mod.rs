pub mod account;
pub mod calendar;
pub mod credentials;
pub mod health;
pub mod history;
pub mod lifecycles;

use crate::config::Config;
use crate::datasource::{Credentials, DataSource};
use crate::domain::Symbol;
use crate::error::AppError;
use crate::session::{SessionId, SessionStore};
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Largest `limit` the exchange accepts on the list endpoints.
pub const MAX_LIMIT: u32 = 1000;

const MAX_SYMBOL_LEN: usize = 32;

#[derive(Clone)]
pub struct AppState {
    pub datasource: Arc<dyn DataSource>,
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(datasource: Arc<dyn DataSource>, config: Config) -> Self {
        let sessions = Arc::new(SessionStore::new(Duration::from_millis(
            config.session_ttl_ms,
        )));
        Self {
            datasource,
            sessions,
            config,
        }
    }
}

/// Success envelope shared by every data endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(ApiResponse {
            success: true,
            data,
        })
    }
}

/// Credentials of the calling session; rejects with 401 when none are stored.
#[derive(Debug, Clone)]
pub struct SessionCredentials(pub Credentials);

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionCredentials {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = SessionId::from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let creds = state
            .sessions
            .get(id)
            .await
            .ok_or(AppError::Unauthorized)?;
        Ok(SessionCredentials(creds))
    }
}

/// `Query` whose rejections use the JSON error envelope.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}

/// Normalize an optional `symbol` query value. Empty means all symbols.
pub(crate) fn parse_symbol(raw: Option<&str>) -> Result<Option<Symbol>, AppError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(s) => s,
    };
    if raw.len() > MAX_SYMBOL_LEN || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::BadRequest(format!("Invalid symbol: {}", raw)));
    }
    Ok(Some(Symbol::new(raw.to_ascii_uppercase())))
}

pub(crate) fn resolve_limit(raw: Option<u32>, default: u32) -> Result<u32, AppError> {
    match raw {
        None => Ok(default),
        Some(limit) if (1..=MAX_LIMIT).contains(&limit) => Ok(limit),
        Some(limit) => Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}, got {}",
            MAX_LIMIT, limit
        ))),
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/config", post(credentials::save_config))
        .route("/api/config/status", get(credentials::config_status))
        .route("/api/config/clear", post(credentials::clear_config))
        .route("/api/account", get(account::get_account))
        .route("/api/positions", get(account::get_positions))
        .route("/api/trades", get(history::get_trades))
        .route("/api/orders", get(history::get_orders))
        .route("/api/income", get(history::get_income))
        .route("/api/lifecycles", get(lifecycles::get_lifecycles))
        .route("/api/statistics", get(lifecycles::get_statistics))
        .route("/api/calendar", get(calendar::get_calendar))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol_uppercases() {
        assert_eq!(
            parse_symbol(Some("btcusdt")).unwrap(),
            Some(Symbol::new("BTCUSDT"))
        );
        assert_eq!(parse_symbol(Some("  ")).unwrap(), None);
        assert_eq!(parse_symbol(None).unwrap(), None);
    }

    #[test]
    fn test_parse_symbol_rejects_query_characters() {
        assert!(matches!(
            parse_symbol(Some("BTCUSDT&limit=5")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_resolve_limit_bounds() {
        assert_eq!(resolve_limit(None, 50).unwrap(), 50);
        assert_eq!(resolve_limit(Some(1000), 50).unwrap(), 1000);
        assert!(resolve_limit(Some(0), 50).is_err());
        assert!(resolve_limit(Some(1001), 50).is_err());
    }
}
