use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Catalog(#[from] schemaviz_core::Error),

    #[error("No catalog source attached")]
    NoSource,

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<schemaviz_core::ValidationError> for WidgetError {
    fn from(err: schemaviz_core::ValidationError) -> Self {
        WidgetError::Catalog(err.into())
    }
}

impl IntoResponse for WidgetError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            WidgetError::Catalog(schemaviz_core::Error::Query(_)) => {
                (StatusCode::BAD_GATEWAY, "QUERY_ERROR")
            }
            WidgetError::Catalog(schemaviz_core::Error::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            WidgetError::Catalog(schemaviz_core::Error::Serialization(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR")
            }
            WidgetError::NoSource => (StatusCode::CONFLICT, "NO_SOURCE"),
            WidgetError::InvalidEvent(_) => (StatusCode::BAD_REQUEST, "INVALID_EVENT"),
            WidgetError::AssetNotFound(_) => (StatusCode::NOT_FOUND, "ASSET_NOT_FOUND"),
            WidgetError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            WidgetError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WidgetError>;
