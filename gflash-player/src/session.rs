//! Per-page playback session state

use gflash_common::catalog::is_ascending;
use gflash_common::Song;
use tracing::{info, warn};

use crate::alert::TriggeredTimings;
use crate::{PlayerError, Result};

/// State owned by the synchronizer for the selected song
#[derive(Debug, Default)]
pub struct SessionState {
    selected: Option<Song>,
    /// Timings of the selected song, sorted ascending
    active_timings: Vec<f64>,
    pub triggered: TriggeredTimings,
    alerts_mode: bool,
    seeking: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `song` current: copy its timings and forget fired alerts
    ///
    /// Timings authored out of order are sorted so marker indices follow
    /// playback order.
    pub fn select(&mut self, song: Song) {
        let mut timings = song.timings.clone();
        if !is_ascending(&timings) {
            warn!(
                "Timings for song {} ({}) are not in ascending order; sorting",
                song.id, song.name
            );
            timings.sort_by(f64::total_cmp);
        }

        self.active_timings = timings;
        self.triggered.clear();
        self.seeking = false;
        self.selected = Some(song);
    }

    /// Switch to alert mode and re-arm every timing
    ///
    /// Returns `Ok(false)` without changing anything when the song has no
    /// timings.
    pub fn enter_alerts_mode(&mut self) -> Result<bool> {
        let song = self.selected.as_ref().ok_or(PlayerError::NoSongSelected)?;

        if self.active_timings.is_empty() {
            info!("Nenhum timing encontrado para essa música ({})", song.name);
            return Ok(false);
        }

        self.alerts_mode = true;
        self.triggered.clear();
        Ok(true)
    }

    pub fn selected(&self) -> Option<&Song> {
        self.selected.as_ref()
    }

    pub fn active_timings(&self) -> &[f64] {
        &self.active_timings
    }

    /// Active timings alongside the mutable set of those already fired
    pub fn armed_timings(&mut self) -> (&[f64], &mut TriggeredTimings) {
        (&self.active_timings, &mut self.triggered)
    }

    pub fn alerts_mode(&self) -> bool {
        self.alerts_mode
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub fn set_seeking(&mut self, seeking: bool) {
        self.seeking = seeking;
    }
}
