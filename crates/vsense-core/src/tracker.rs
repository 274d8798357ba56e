//! Watch-time accumulation across play/pause cycles

use std::time::{Duration, Instant};

/// Accumulates playing time for the active video.
///
/// Time is passed in by the caller so the tracker stays deterministic.
#[derive(Debug, Clone, Default)]
pub struct WatchTracker {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl WatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    /// Playback started. Redundant calls while playing are ignored.
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(started);
        }
    }

    pub fn end(&mut self, now: Instant) {
        self.pause(now);
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    /// Reset for a newly detected video, starting at once if it is already playing
    pub fn arm(&mut self, already_playing: bool, now: Instant) {
        self.reset();
        if already_playing {
            self.start(now);
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + now.saturating_duration_since(started),
            None => self.accumulated,
        }
    }

    /// Whole seconds watched so far
    pub fn duration_secs(&self, now: Instant) -> u64 {
        self.elapsed(now).as_secs()
    }
}
