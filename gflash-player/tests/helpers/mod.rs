//! Shared test helpers for gflash-player integration tests

#![allow(dead_code)]

use gflash_player::client::SongOption;
use gflash_player::surface::Surface;
use gflash_player::timeline::TimelineView;
use gflash_player::Result;

/// Surface that records everything drawn to it
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub selector: Vec<SongOption>,
    pub timeline: Option<TimelineView>,
    pub progress: Vec<f64>,
    pub cues: usize,
    /// Every highlight change, in order
    pub highlight_log: Vec<(usize, bool)>,
}

impl RecordingSurface {
    /// Markers currently lit
    pub fn lit(&self) -> Vec<usize> {
        let mut lit = Vec::new();
        for &(index, active) in &self.highlight_log {
            if active {
                if !lit.contains(&index) {
                    lit.push(index);
                }
            } else {
                lit.retain(|&i| i != index);
            }
        }
        lit
    }

    pub fn marker_offsets(&self) -> Vec<f64> {
        self.timeline
            .as_ref()
            .map(|view| view.markers().iter().map(|m| m.offset_percent).collect())
            .unwrap_or_default()
    }
}

impl Surface for RecordingSurface {
    fn populate_selector(&mut self, options: &[SongOption]) {
        self.selector = options.to_vec();
    }

    fn render_timeline(&mut self, view: &TimelineView) {
        self.timeline = Some(view.clone());
    }

    fn create_progress_bar(&mut self) {
        self.progress.push(0.0);
    }

    fn set_progress(&mut self, percent: f64) {
        self.progress.push(percent);
    }

    fn set_marker_highlight(&mut self, index: usize, active: bool) {
        self.highlight_log.push((index, active));
    }

    fn play_alert_cue(&mut self) -> Result<()> {
        self.cues += 1;
        Ok(())
    }

    fn set_mute_label(&mut self, _label: &str) {}
}

pub const SONG_A_CATALOG: &str =
    r#"[{"id":1,"name":"Song A","audio":"a.mp3","timings":[5,10,15]}]"#;
