use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::datasource::DataSourceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API credentials are not configured")]
    Unauthorized,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Upstream error: {0}")]
    Upstream(#[from] DataSourceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Unauthorized | AppError::Upstream(DataSourceError::MissingCredentials) => (
                StatusCode::UNAUTHORIZED,
                json!("API credentials are not configured"),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!(msg)),
            AppError::Upstream(DataSourceError::Api { code, msg, .. }) => {
                tracing::warn!(code, %msg, "exchange rejected request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "code": code, "msg": msg }),
                )
            }
            AppError::Upstream(err) => {
                tracing::warn!(error = %err, "upstream request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!(err.to_string()))
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error,
        }));

        (status, body).into_response()
    }
}
