//! Error types for gflash-server
//!
//! Every catalog failure is reported to the client as an opaque 500 with a
//! flat `{"error": message}` body. The cause is only logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Catalog file could not be read
    #[error("Erro ao ler as músicas")]
    CatalogRead(String),

    /// Catalog file was read but is not valid JSON
    #[error("Erro ao processar as músicas")]
    CatalogParse(String),
}

impl ApiError {
    /// Underlying cause, for logs only
    pub fn cause(&self) -> &str {
        match self {
            ApiError::CatalogRead(cause) | ApiError::CatalogParse(cause) => cause,
        }
    }
}

impl From<gflash_common::Error> for ApiError {
    fn from(err: gflash_common::Error) -> Self {
        match err {
            gflash_common::Error::Parse(e) => ApiError::CatalogParse(e.to_string()),
            other => ApiError::CatalogRead(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
