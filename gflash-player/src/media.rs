//! Media element abstraction and its event bus
//!
//! The page's `<audio>` element becomes two pieces:
//! - [`MediaElement`]: the pollable side (current time, duration, source, mute)
//! - [`MediaEventBus`]: the native events (play, pause, seeking, seeked,
//!   timeupdate, loadedmetadata, ended), broadcast to registered handlers
//!
//! [`SimulatedMedia`] implements both against a wall clock, standing in for
//! real audio output in the terminal player and in tests.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::debug;

/// Native media element events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Duration known for the current source
    LoadedMetadata { duration: f64 },
    Play,
    Pause,
    /// User started scrubbing
    Seeking,
    /// Scrub finished, position settled
    Seeked,
    /// Browser-cadence position report
    TimeUpdate { current_time: f64 },
    Ended,
}

/// Pollable state of the active media element
pub trait MediaElement {
    /// Playback position in seconds
    fn current_time(&self) -> f64;

    /// Total duration in seconds; NaN until metadata is loaded
    fn duration(&self) -> f64;

    /// Replace the source, resetting position
    fn set_source(&mut self, source: &str);

    fn set_muted(&mut self, muted: bool);

    fn is_muted(&self) -> bool;
}

/// Broadcast bus for [`MediaEvent`]s
///
/// Handlers register by subscribing; every subscriber sees every event
/// emitted after it subscribed, in emission order.
#[derive(Clone)]
pub struct MediaEventBus {
    tx: broadcast::Sender<MediaEvent>,
    capacity: usize,
}

impl MediaEventBus {
    /// Creates a new bus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<MediaEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)`, or `Err` if nobody is listening.
    pub fn emit(
        &self,
        event: MediaEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<MediaEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: MediaEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Debug)]
struct SimState {
    source: Option<String>,
    duration: f64,
    metadata_loaded: bool,
    /// Position at the moment playback last started or was paused
    base_position: f64,
    playing_since: Option<Instant>,
    muted: bool,
}

impl SimState {
    fn position(&self, now: Instant) -> f64 {
        let elapsed = self
            .playing_since
            .map(|since| now.saturating_duration_since(since).as_secs_f64())
            .unwrap_or(0.0);
        (self.base_position + elapsed).min(self.duration)
    }

    fn freeze(&mut self, now: Instant) {
        self.base_position = self.position(now);
        self.playing_since = None;
    }
}

/// Media element driven by the tokio clock
///
/// Cloning yields another handle to the same element.
#[derive(Clone)]
pub struct SimulatedMedia {
    state: Arc<Mutex<SimState>>,
    bus: MediaEventBus,
}

impl SimulatedMedia {
    /// Create an element whose sources all last `duration` seconds
    pub fn new(bus: MediaEventBus, duration: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                source: None,
                duration,
                metadata_loaded: false,
                base_position: 0.0,
                playing_since: None,
                muted: false,
            })),
            bus,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current source path, if any
    pub fn source(&self) -> Option<String> {
        self.lock().source.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.lock().playing_since.is_some()
    }

    /// Finish loading the current source and announce its duration
    pub fn load_metadata(&self) {
        let duration = {
            let mut state = self.lock();
            state.metadata_loaded = true;
            state.duration
        };
        self.bus.emit_lossy(MediaEvent::LoadedMetadata { duration });
    }

    /// Start playback from the current position
    pub fn play(&self) {
        {
            let mut state = self.lock();
            if state.playing_since.is_some() {
                return;
            }
            state.playing_since = Some(Instant::now());
        }
        self.bus.emit_lossy(MediaEvent::Play);
    }

    pub fn pause(&self) {
        {
            let mut state = self.lock();
            if state.playing_since.is_none() {
                return;
            }
            state.freeze(Instant::now());
        }
        self.bus.emit_lossy(MediaEvent::Pause);
    }

    /// Jump to `position`, emitting seeking, timeupdate and seeked in the
    /// order a browser does
    pub fn seek(&self, position: f64) {
        self.bus.emit_lossy(MediaEvent::Seeking);
        let current_time = {
            let mut state = self.lock();
            let now = Instant::now();
            state.base_position = position.clamp(0.0, state.duration);
            if state.playing_since.is_some() {
                state.playing_since = Some(now);
            }
            state.base_position
        };
        self.bus
            .emit_lossy(MediaEvent::TimeUpdate { current_time });
        self.bus.emit_lossy(MediaEvent::Seeked);
    }

    /// Emit time updates every `interval` while playing
    ///
    /// Returns once playback reaches the end, after emitting the final
    /// timeupdate, pause and ended.
    pub async fn drive(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let (current_time, playing, finished) = {
                let state = self.lock();
                let t = state.position(Instant::now());
                (t, state.playing_since.is_some(), t >= state.duration)
            };

            if !playing {
                continue;
            }

            self.bus.emit_lossy(MediaEvent::TimeUpdate { current_time });

            if finished {
                self.lock().freeze(Instant::now());
                debug!("Simulated playback reached end at {:.2}s", current_time);
                self.bus.emit_lossy(MediaEvent::Pause);
                self.bus.emit_lossy(MediaEvent::Ended);
                return;
            }
        }
    }
}

impl MediaElement for SimulatedMedia {
    fn current_time(&self) -> f64 {
        self.lock().position(Instant::now())
    }

    fn duration(&self) -> f64 {
        let state = self.lock();
        if state.metadata_loaded {
            state.duration
        } else {
            f64::NAN
        }
    }

    fn set_source(&mut self, source: &str) {
        let mut state = self.lock();
        state.source = Some(source.to_string());
        state.metadata_loaded = false;
        state.base_position = 0.0;
        state.playing_since = None;
    }

    fn set_muted(&mut self, muted: bool) {
        self.lock().muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.lock().muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_subscribe_and_emit() {
        let bus = MediaEventBus::new(16);
        assert_eq!(bus.capacity(), 16);
        assert!(bus.emit(MediaEvent::Play).is_err());

        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(bus.emit(MediaEvent::Play).unwrap(), 1);
        assert_eq!(rx.try_recv().unwrap(), MediaEvent::Play);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_clock_advances_only_while_playing() {
        let bus = MediaEventBus::new(16);
        let mut media = SimulatedMedia::new(bus, 20.0);
        media.set_source("a.mp3");
        assert!(media.duration().is_nan());

        media.load_metadata();
        assert_eq!(media.duration(), 20.0);

        media.play();
        tokio::time::advance(Duration::from_secs(3)).await;
        assert!((media.current_time() - 3.0).abs() < 1e-6);

        media.pause();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!((media.current_time() - 3.0).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_event_order() {
        let bus = MediaEventBus::new(16);
        let mut rx = bus.subscribe();
        let media = SimulatedMedia::new(bus, 20.0);

        media.seek(12.0);

        assert_eq!(rx.try_recv().unwrap(), MediaEvent::Seeking);
        assert_eq!(
            rx.try_recv().unwrap(),
            MediaEvent::TimeUpdate { current_time: 12.0 }
        );
        assert_eq!(rx.try_recv().unwrap(), MediaEvent::Seeked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_ends_with_pause_and_ended() {
        let bus = MediaEventBus::new(64);
        let mut rx = bus.subscribe();
        let mut media = SimulatedMedia::new(bus, 1.0);
        media.set_source("a.mp3");
        media.load_metadata();
        media.play();

        media.drive(Duration::from_millis(250)).await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        let n = events.len();
        assert_eq!(events[n - 2], MediaEvent::Pause);
        assert_eq!(events[n - 1], MediaEvent::Ended);
        assert!(!media.is_playing());
        assert_eq!(media.current_time(), 1.0);
    }
}
