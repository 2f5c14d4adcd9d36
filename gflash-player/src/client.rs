//! Catalog client
//!
//! Fetches the song catalog once at startup. A failed fetch is logged and
//! yields an empty catalog; there is no retry.

use gflash_common::{Song, SongId};
use tracing::{debug, error, info};

use crate::{PlayerError, Result};

/// One entry of the song selector
#[derive(Debug, Clone, PartialEq)]
pub struct SongOption {
    pub id: SongId,
    pub name: String,
}

/// Songs fetched from the catalog service, in catalog order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    pub fn new(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    /// Selector options `(id, name)` in catalog order
    pub fn options(&self) -> Vec<SongOption> {
        self.songs
            .iter()
            .map(|song| SongOption {
                id: song.id.clone(),
                name: song.name.clone(),
            })
            .collect()
    }

    /// Look up a song by raw selector value
    pub fn find(&self, raw_id: &str) -> Result<&Song> {
        self.songs
            .iter()
            .find(|song| song.id.matches(raw_id))
            .ok_or_else(|| PlayerError::UnknownSong(raw_id.to_string()))
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

/// HTTP client for the catalog service
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Client for the service at `base_url` (e.g. `http://127.0.0.1:3000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Full URL of the catalog endpoint
    pub fn songs_url(&self) -> String {
        format!("{}/songs", self.base_url.trim_end_matches('/'))
    }

    /// Single catalog request, errors propagated
    pub async fn try_fetch(&self) -> Result<Vec<Song>> {
        let url = self.songs_url();
        debug!("Fetching catalog from {}", url);

        let songs = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Song>>()
            .await?;

        Ok(songs)
    }

    /// Fetch the catalog, logging any failure and returning it empty
    pub async fn fetch(&self) -> Catalog {
        match self.try_fetch().await {
            Ok(songs) => {
                info!("Loaded {} songs", songs.len());
                Catalog::new(songs)
            }
            Err(e) => {
                error!("Failed to load songs: {}", e);
                Catalog::default()
            }
        }
    }
}
