use axum::extract::State;
use axum::Json;

use super::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once the router is serving; reports live session count.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ready",
        "sessions": state.sessions.len().await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::datasource::MockDataSource;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_reports_sessions() {
        let state = AppState::new(Arc::new(MockDataSource::new()), Config::default());
        let Json(body) = ready(State(state)).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["sessions"], 0);
    }
}
