//! Error types for gflash-player

use thiserror::Error;

/// Main error type for the player
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Catalog request failed (network, status or body decoding)
    #[error("Catalog fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Operation needs a selected song
    #[error("No song selected")]
    NoSongSelected,

    /// Selector value does not match any catalog entry
    #[error("Unknown song id: {0}")]
    UnknownSong(String),

    /// Media duration is not a positive finite number
    #[error("Invalid duration: {0}")]
    InvalidDuration(f64),

    /// Alert cue could not be played
    #[error("Alert cue failed: {0}")]
    Cue(String),
}

/// Convenience Result type using PlayerError
pub type Result<T> = std::result::Result<T, PlayerError>;
