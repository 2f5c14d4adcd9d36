//! Alert triggering
//!
//! On each time update, every timing at or before the playback position that
//! has not fired yet fires once: the alert cue plays and the matching marker
//! lights up for [`HIGHLIGHT_DURATION`].
//!
//! Timings are de-duplicated by value, so two identical timings fire once.

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{error, info};

use crate::surface::Surface;

/// How long a fired marker stays highlighted
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(1);

/// Set of timings already fired in the current session, keyed by value
#[derive(Debug, Default, Clone)]
pub struct TriggeredTimings {
    fired: HashSet<u64>,
}

impl TriggeredTimings {
    fn key(time: f64) -> u64 {
        // -0.0 and 0.0 are the same timing
        if time == 0.0 {
            0.0f64.to_bits()
        } else {
            time.to_bits()
        }
    }

    pub fn contains(&self, time: f64) -> bool {
        self.fired.contains(&Self::key(time))
    }

    /// Record `time`; false if it was already present
    pub fn insert(&mut self, time: f64) -> bool {
        self.fired.insert(Self::key(time))
    }

    pub fn clear(&mut self) {
        self.fired.clear();
    }

    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

/// A timing that fired on this evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredAlert {
    /// Position in the active timing list, and so the marker index
    pub index: usize,
    pub time: f64,
}

/// Fires due timings and tracks their pending highlight reverts
#[derive(Debug, Default)]
pub struct AlertTrigger {
    /// Marker index → revert deadline
    highlights: Vec<(usize, Instant)>,
    fired_total: u64,
}

impl AlertTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every timing `t <= current_time` not yet in `triggered`
    ///
    /// Walks `timings` in list order. A failing cue is logged and does not
    /// stop the remaining alerts.
    pub fn evaluate<S: Surface>(
        &mut self,
        timings: &[f64],
        triggered: &mut TriggeredTimings,
        current_time: f64,
        surface: &mut S,
        now: Instant,
    ) -> Vec<FiredAlert> {
        let mut fired = Vec::new();

        for (index, &time) in timings.iter().enumerate() {
            if time > current_time || !triggered.insert(time) {
                continue;
            }

            if let Err(e) = surface.play_alert_cue() {
                error!("Failed to play alert sound: {}", e);
            }
            info!("Especial {} ativado no tempo {}s", index + 1, time);

            surface.set_marker_highlight(index, true);
            self.schedule_revert(index, now + HIGHLIGHT_DURATION);

            self.fired_total += 1;
            fired.push(FiredAlert { index, time });
        }

        fired
    }

    fn schedule_revert(&mut self, index: usize, deadline: Instant) {
        // A marker fired again while lit stays lit for a full period
        match self.highlights.iter_mut().find(|(i, _)| *i == index) {
            Some(entry) => entry.1 = deadline,
            None => self.highlights.push((index, deadline)),
        }
    }

    /// Earliest pending revert
    pub fn next_revert_deadline(&self) -> Option<Instant> {
        self.highlights.iter().map(|(_, deadline)| *deadline).min()
    }

    /// Turn off every highlight whose deadline has passed
    pub fn revert_expired<S: Surface>(&mut self, surface: &mut S, now: Instant) -> usize {
        let before = self.highlights.len();
        self.highlights.retain(|&(index, deadline)| {
            if deadline <= now {
                surface.set_marker_highlight(index, false);
                false
            } else {
                true
            }
        });
        before - self.highlights.len()
    }

    /// Drop pending reverts without touching the surface (timeline replaced)
    pub fn forget_highlights(&mut self) {
        self.highlights.clear();
    }

    pub fn highlighted_count(&self) -> usize {
        self.highlights.len()
    }

    /// Alerts fired since creation, across sessions
    pub fn fired_total(&self) -> u64 {
        self.fired_total
    }
}
