use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use lead_api::{DownstreamError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    UnreadableBody(#[from] axum::extract::rejection::BytesRejection),

    #[error("{0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("{0}")]
    Downstream(#[from] DownstreamError),

    #[error("bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },

    #[error("serve: {0}")]
    Serve(std::io::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}
