//! Output surface: the page's DOM and alert sound
//!
//! [`LogSurface`] renders everything as tracing output for the terminal
//! player. Tests use their own recording implementations.

use tracing::{debug, info};

use crate::client::SongOption;
use crate::timeline::TimelineView;
use crate::Result;

/// Everything the synchronizer draws or plays
pub trait Surface {
    /// Fill the song selector, preserving order
    fn populate_selector(&mut self, options: &[SongOption]);

    /// Replace the timeline track contents; drops any progress bar
    fn render_timeline(&mut self, view: &TimelineView);

    /// Create a fresh progress bar at width 0, replacing an existing one
    fn create_progress_bar(&mut self);

    /// Set progress-bar width in percent
    fn set_progress(&mut self, percent: f64);

    /// Toggle the active highlight of the marker at `index`
    fn set_marker_highlight(&mut self, index: usize, active: bool);

    /// Play the one-shot alert sound
    fn play_alert_cue(&mut self) -> Result<()>;

    /// Update the mute toggle label
    fn set_mute_label(&mut self, label: &str);
}

/// Surface that writes to the log
#[derive(Debug, Default)]
pub struct LogSurface {
    last_progress_percent: Option<u32>,
}

impl Surface for LogSurface {
    fn populate_selector(&mut self, options: &[SongOption]) {
        for option in options {
            info!("  [{}] {}", option.id, option.name);
        }
    }

    fn render_timeline(&mut self, view: &TimelineView) {
        self.last_progress_percent = None;
        match view {
            TimelineView::Placeholder(text) => info!("Timeline: {}", text),
            TimelineView::Markers(markers) if markers.is_empty() => debug!("Timeline cleared"),
            TimelineView::Markers(markers) => {
                let offsets: Vec<String> = markers
                    .iter()
                    .map(|m| format!("{:.1}%", m.offset_percent))
                    .collect();
                info!("Timeline: {} markers at [{}]", markers.len(), offsets.join(", "));
            }
        }
    }

    fn create_progress_bar(&mut self) {
        self.last_progress_percent = Some(0);
        debug!("Progress bar created");
    }

    fn set_progress(&mut self, percent: f64) {
        // Only log whole-percent changes
        let whole = percent.max(0.0).floor() as u32;
        if self.last_progress_percent != Some(whole) {
            self.last_progress_percent = Some(whole);
            debug!("Progress: {}%", whole);
        }
    }

    fn set_marker_highlight(&mut self, index: usize, active: bool) {
        debug!("Marker {} {}", index + 1, if active { "on" } else { "off" });
    }

    fn play_alert_cue(&mut self) -> Result<()> {
        info!("*** ALERT ***");
        Ok(())
    }

    fn set_mute_label(&mut self, label: &str) {
        info!("Audio toggle: {}", label);
    }
}
