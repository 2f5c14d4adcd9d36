//! gflash-server library - Song catalog service
//!
//! Serves the song catalog file over `GET /songs`. The file is re-read on
//! every request; nothing is cached in process memory.

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

/// Origin allowed by CORS when none is configured
pub const DEFAULT_CORS_ORIGIN: &str = "https://jlucassp.github.io";

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog JSON file, read on each request
    pub catalog_path: Arc<PathBuf>,
}

impl AppState {
    /// Create new application state
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: Arc::new(catalog_path.into()),
        }
    }
}

/// Router-level options resolved at startup
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// The single origin allowed to read responses cross-site
    pub cors_origin: HeaderValue,
    /// Directory served for any path not matched by an API route
    pub assets_dir: Option<PathBuf>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            assets_dir: None,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState, options: &RouterOptions) -> Router {
    use axum::routing::get;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([options.cors_origin.clone()]))
        .allow_methods([Method::GET]);

    let mut router = Router::new()
        .route("/songs", get(api::list_songs))
        .merge(api::health_routes())
        .with_state(state);

    if let Some(dir) = &options.assets_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}
