//! Song catalog endpoint

use axum::{extract::State, Json};
use gflash_common::catalog;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::AppState;

/// GET /songs
///
/// Returns the catalog document as authored. The file is read from disk on
/// each call and only checked for JSON syntax.
pub async fn list_songs(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let document = catalog::load_catalog_document(&state.catalog_path)
        .await
        .map_err(|e| {
            let err = ApiError::from(e);
            error!(
                "Failed to load catalog {}: {}",
                state.catalog_path.display(),
                err.cause()
            );
            err
        })?;

    match document.as_array() {
        Some(songs) => debug!("Serving {} songs", songs.len()),
        None => debug!("Serving non-array catalog document"),
    }
    Ok(Json(document))
}
