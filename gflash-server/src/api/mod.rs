//! HTTP API handlers for gflash-server

pub mod health;
pub mod songs;

pub use health::health_routes;
pub use songs::list_songs;
