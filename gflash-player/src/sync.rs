//! Playback synchronizer
//!
//! Reacts to media events and keeps the timeline, progress bar and alerts in
//! step with playback.
//!
//! **State machine:**
//! ```text
//! Idle --select+loadedmetadata--> Loaded --play--> Playing <--pause/play--> Paused
//!                                                  Playing --ended--> Ended --play--> Playing
//! ```
//!
//! Two independent cadences drive it:
//! - `timeupdate` events (browser cadence): refresh progress and evaluate
//!   alerts, unless a seek is in progress
//! - the fixed 100 ms poll, running only while playing: refresh progress only

use std::future::Future;
use std::time::Duration;

use gflash_common::Song;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::alert::{AlertTrigger, FiredAlert};
use crate::client::Catalog;
use crate::media::{MediaElement, MediaEvent};
use crate::session::SessionState;
use crate::surface::Surface;
use crate::timeline::{build_timeline, progress_percent, TimelineView};
use crate::Result;

/// Period of the progress-bar poll
pub const PROGRESS_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Toggle label while audio is muted
pub const UNMUTE_LABEL: &str = "Ativar Áudio";

/// Toggle label while audio is audible
pub const MUTE_LABEL: &str = "Desativar Áudio";

/// Playback phase of the active media element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No song loaded
    Idle,
    /// Song selected and metadata ready
    Loaded,
    Playing,
    Paused,
    Ended,
}

/// Effect of an event on the progress poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollChange {
    Unchanged,
    /// Poll (re)started; first tick one period from now
    Started,
    Stopped,
}

/// Owns the session and applies media events to it
pub struct PlaybackSynchronizer<M, S> {
    media: M,
    surface: S,
    session: SessionState,
    trigger: AlertTrigger,
    phase: PlaybackPhase,
    polling: bool,
    progress_bar: bool,
}

impl<M: MediaElement, S: Surface> PlaybackSynchronizer<M, S> {
    pub fn new(media: M, surface: S) -> Self {
        Self {
            media,
            surface,
            session: SessionState::new(),
            trigger: AlertTrigger::new(),
            phase: PlaybackPhase::Idle,
            polling: false,
            progress_bar: false,
        }
    }

    /// Make `song` the active song
    ///
    /// Replaces the media source and resets fired alerts, highlights and the
    /// poll. The timeline is drawn once `loadedmetadata` reports a duration.
    pub fn select_song(&mut self, song: Song) {
        info!("Selected song {} ({})", song.id, song.name);
        self.media.set_source(&song.audio);
        self.session.select(song);
        self.trigger.forget_highlights();
        self.clear_timeline();
        self.polling = false;
        self.phase = PlaybackPhase::Idle;
    }

    /// Select by raw selector value; unknown ids leave everything unchanged
    pub fn select_from_catalog(&mut self, catalog: &Catalog, raw_id: &str) -> Result<()> {
        let song = catalog.find(raw_id).map_err(|e| {
            debug!("Ignoring selection: {}", e);
            e
        })?;
        self.select_song(song.clone());
        Ok(())
    }

    /// "Play alerts": enter alert mode for the selected song
    ///
    /// Returns whether the mode was entered (false when the song has no
    /// timings).
    pub fn play_alerts(&mut self) -> Result<bool> {
        self.session.enter_alerts_mode()
    }

    /// Flip mute and return the new toggle label
    pub fn toggle_mute(&mut self) -> &'static str {
        let muted = !self.media.is_muted();
        self.media.set_muted(muted);
        let label = if muted { UNMUTE_LABEL } else { MUTE_LABEL };
        self.surface.set_mute_label(label);
        label
    }

    /// Apply one media event
    pub fn handle_event(&mut self, event: MediaEvent, now: Instant) -> PollChange {
        match event {
            MediaEvent::LoadedMetadata { duration } => {
                self.on_loaded_metadata(duration);
                PollChange::Unchanged
            }
            MediaEvent::Play => self.on_play(),
            MediaEvent::Pause => self.on_pause(),
            MediaEvent::Seeking => {
                self.session.set_seeking(true);
                PollChange::Unchanged
            }
            MediaEvent::Seeked => {
                self.session.set_seeking(false);
                // Replay-on-seek: every timing is re-armed whatever the direction
                self.session.triggered.clear();
                debug!("Seek finished, alerts re-armed");
                PollChange::Unchanged
            }
            MediaEvent::TimeUpdate { current_time } => {
                self.on_time_update(current_time, now);
                PollChange::Unchanged
            }
            MediaEvent::Ended => {
                info!("Áudio finalizado.");
                self.phase = PlaybackPhase::Ended;
                self.stop_poll()
            }
        }
    }

    fn on_loaded_metadata(&mut self, duration: f64) {
        if self.session.selected().is_none() {
            debug!("Metadata loaded with no song selected");
            return;
        }

        // Rendering replaces the track contents, progress bar included
        self.progress_bar = false;
        self.trigger.forget_highlights();

        match build_timeline(self.session.active_timings(), duration) {
            Ok(view) => self.surface.render_timeline(&view),
            Err(e) => {
                warn!("Timeline not rendered: {}", e);
                self.clear_timeline();
            }
        }

        if self.phase == PlaybackPhase::Idle {
            self.phase = PlaybackPhase::Loaded;
        }
    }

    /// Empty the track so no marker of a previous song stays visible
    fn clear_timeline(&mut self) {
        self.progress_bar = false;
        self.surface.render_timeline(&TimelineView::Markers(Vec::new()));
    }

    fn on_play(&mut self) -> PollChange {
        if self.phase == PlaybackPhase::Idle {
            debug!("Play ignored: no song loaded");
            return PollChange::Unchanged;
        }

        self.phase = PlaybackPhase::Playing;
        self.polling = true;

        if !self.session.alerts_mode() {
            self.surface.create_progress_bar();
            self.progress_bar = true;
            self.refresh_progress();
        }

        PollChange::Started
    }

    fn on_pause(&mut self) -> PollChange {
        if self.phase == PlaybackPhase::Playing {
            self.phase = PlaybackPhase::Paused;
        }
        self.stop_poll()
    }

    fn stop_poll(&mut self) -> PollChange {
        if std::mem::replace(&mut self.polling, false) {
            PollChange::Stopped
        } else {
            PollChange::Unchanged
        }
    }

    fn on_time_update(&mut self, current_time: f64, now: Instant) -> Vec<FiredAlert> {
        self.refresh_progress();

        if self.session.is_seeking() {
            return Vec::new();
        }

        let (timings, triggered) = self.session.armed_timings();
        self.trigger
            .evaluate(timings, triggered, current_time, &mut self.surface, now)
    }

    /// One period of the progress poll
    pub fn poll_tick(&mut self) {
        if self.polling {
            self.refresh_progress();
        }
    }

    fn refresh_progress(&mut self) {
        if !self.progress_bar {
            return;
        }
        if let Some(percent) = progress_percent(self.media.current_time(), self.media.duration()) {
            self.surface.set_progress(percent);
        }
    }

    /// Revert highlights whose 1 s period has elapsed
    pub fn expire_highlights(&mut self, now: Instant) -> usize {
        self.trigger.revert_expired(&mut self.surface, now)
    }

    /// Process events until the bus closes
    pub async fn run(self, events: broadcast::Receiver<MediaEvent>) -> Self {
        self.run_until(events, std::future::pending()).await
    }

    /// Process events until the bus closes or `shutdown` completes
    ///
    /// Events already queued when `shutdown` completes are still applied.
    /// Returns the synchronizer so callers can inspect the final state.
    pub async fn run_until<F>(
        mut self,
        mut events: broadcast::Receiver<MediaEvent>,
        shutdown: F,
    ) -> Self
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut poll = tokio::time::interval(PROGRESS_POLL_INTERVAL);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let revert_at = self.trigger.next_revert_deadline();

            tokio::select! {
                _ = &mut shutdown => {
                    let drained = self.drain_pending(&mut events);
                    debug!("Synchronizer shutting down ({} queued events applied)", drained);
                    break;
                }
                received = events.recv() => match received {
                    Ok(event) => {
                        if self.handle_event(event, Instant::now()) == PollChange::Started {
                            poll.reset();
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Synchronizer lagged, {} media events dropped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = poll.tick(), if self.polling => self.poll_tick(),
                _ = tokio::time::sleep_until(revert_at.unwrap_or_else(Instant::now)), if revert_at.is_some() => {
                    self.expire_highlights(Instant::now());
                }
            }
        }

        self
    }

    fn drain_pending(&mut self, events: &mut broadcast::Receiver<MediaEvent>) -> usize {
        let mut applied = 0;
        loop {
            match events.try_recv() {
                Ok(event) => {
                    self.handle_event(event, Instant::now());
                    applied += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Synchronizer lagged, {} media events dropped", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return applied,
            }
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn has_progress_bar(&self) -> bool {
        self.progress_bar
    }

    pub fn fired_total(&self) -> u64 {
        self.trigger.fired_total()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn media(&self) -> &M {
        &self.media
    }
}
