//! # gflash Common Library
//!
//! Shared code for the gflash server and player:
//! - Song record types and catalog file loading
//! - Configuration resolution
//! - Common error type

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{Song, SongId};
pub use error::{Error, Result};
