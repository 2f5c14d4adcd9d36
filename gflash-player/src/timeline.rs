//! Timeline construction
//!
//! Places one marker per timing at `timing / duration * 100` percent along
//! the track. Offsets are not clamped: a timing past the end of the song
//! lands beyond 100 %, a negative one before 0 %.

use crate::{PlayerError, Result};

/// Text shown in place of markers when a song has no timings
pub const NO_TIMINGS_PLACEHOLDER: &str = "Nenhum timing disponível.";

/// One rendered timing
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Position in the active timing list
    pub index: usize,
    /// Timing in seconds
    pub time: f64,
    /// Horizontal offset along the track, in percent
    pub offset_percent: f64,
}

/// Contents of the timeline track
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineView {
    Markers(Vec<Marker>),
    Placeholder(&'static str),
}

impl TimelineView {
    /// Rendered markers; empty for the placeholder
    pub fn markers(&self) -> &[Marker] {
        match self {
            TimelineView::Markers(markers) => markers,
            TimelineView::Placeholder(_) => &[],
        }
    }
}

/// Build the timeline for `timings` over a song of `duration` seconds
///
/// Empty timings always yield the placeholder. Otherwise `duration` must be
/// finite and positive.
pub fn build_timeline(timings: &[f64], duration: f64) -> Result<TimelineView> {
    if timings.is_empty() {
        return Ok(TimelineView::Placeholder(NO_TIMINGS_PLACEHOLDER));
    }

    if !valid_duration(duration) {
        return Err(PlayerError::InvalidDuration(duration));
    }

    let markers = timings
        .iter()
        .enumerate()
        .map(|(index, &time)| Marker {
            index,
            time,
            offset_percent: marker_offset(time, duration),
        })
        .collect();

    Ok(TimelineView::Markers(markers))
}

/// Offset of a timing along the track, in percent
pub fn marker_offset(time: f64, duration: f64) -> f64 {
    time / duration * 100.0
}

/// Progress-bar width for the given position, in percent
///
/// `None` while the duration is unknown.
pub fn progress_percent(current_time: f64, duration: f64) -> Option<f64> {
    valid_duration(duration).then(|| current_time / duration * 100.0)
}

fn valid_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}
