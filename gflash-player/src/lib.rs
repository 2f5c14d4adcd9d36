//! gflash-player library - playback-alert synchronization
//!
//! Headless rendition of the alert player page:
//! - [`client`]: fetches the song catalog once and builds selector options
//! - [`timeline`]: positions one marker per timing along the track
//! - [`alert`]: fires each crossed timing exactly once per session
//! - [`sync`]: media event state machine and the 100 ms progress poll
//!
//! The page's DOM and audio element are abstracted by [`surface::Surface`]
//! and [`media::MediaElement`].

pub mod alert;
pub mod client;
pub mod error;
pub mod media;
pub mod session;
pub mod surface;
pub mod sync;
pub mod timeline;

pub use error::{PlayerError, Result};
pub use sync::PlaybackSynchronizer;
