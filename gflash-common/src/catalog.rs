//! Song catalog records
//!
//! The catalog is a single JSON document holding an array of song records:
//!
//! ```json
//! [{ "id": 1, "name": "Song A", "audio": "songs/a.mp3", "timings": [5, 10, 15] }]
//! ```
//!
//! Records are immutable once loaded. The server re-reads the file on every
//! request and serves the document untyped, exactly as authored. The player
//! fetches it once at startup and parses it into [`Song`] records.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Song identifier as authored in the catalog
///
/// Catalogs use plain numbers, but string ids are accepted too. Ids are
/// compared by their display form, so a selector value of `"1"` matches
/// `SongId::Number(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SongId {
    Number(i64),
    Text(String),
}

impl SongId {
    /// Loose comparison against a raw selector value
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            SongId::Number(n) => raw.trim().parse::<i64>().is_ok_and(|v| v == *n),
            SongId::Text(s) => s == raw.trim(),
        }
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SongId::Number(n) => write!(f, "{}", n),
            SongId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for SongId {
    fn from(value: i64) -> Self {
        SongId::Number(value)
    }
}

/// One song record from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub name: String,
    /// Audio file path, relative to the asset root
    pub audio: String,
    /// Alert timestamps in seconds, in authored order
    #[serde(default)]
    pub timings: Vec<f64>,
}

impl Song {
    /// Whether the authored timings are in ascending order
    pub fn timings_ascending(&self) -> bool {
        is_ascending(&self.timings)
    }
}

/// Parse a catalog document
pub fn parse_catalog(raw: &str) -> Result<Vec<Song>> {
    Ok(serde_json::from_str(raw)?)
}

/// Read and parse the catalog file at `path`
///
/// I/O failures surface as [`crate::Error::Io`], malformed documents as
/// [`crate::Error::Parse`].
pub async fn load_catalog(path: &Path) -> Result<Vec<Song>> {
    let raw = tokio::fs::read_to_string(path).await?;
    parse_catalog(&raw)
}

/// Read the catalog file at `path` as an untyped JSON document
///
/// Only JSON syntax is checked; record shapes, number forms and extra fields
/// are kept as authored.
pub async fn load_catalog_document(path: &Path) -> Result<serde_json::Value> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

/// True if every timestamp is >= its predecessor
pub fn is_ascending(timings: &[f64]) -> bool {
    timings.windows(2).all(|pair| pair[0] <= pair[1])
}
