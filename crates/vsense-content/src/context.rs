//! The one video context a page session is currently following

use crate::control::SaveControl;
use std::fmt;
use vsense_core::WatchTracker;
use vsense_page::{ElementRef, VideoContext};

/// Tags every delayed or asynchronous input with the context it was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the page to settle before probing
    Settling,
    /// Container was missing when checked; the next resolve re-schedules
    Detached,
    /// Container found, saved-state query outstanding
    Checking { container: ElementRef },
    /// Control mounted
    Active { container: ElementRef },
}

#[derive(Debug)]
pub struct ActiveContext {
    pub video: VideoContext,
    pub generation: Generation,
    pub phase: Phase,
    pub tracker: WatchTracker,
    /// Video element the tracker follows
    pub armed: Option<ElementRef>,
    pub control: Option<SaveControl>,
}

impl ActiveContext {
    pub fn new(video: VideoContext, generation: Generation) -> Self {
        Self {
            video,
            generation,
            phase: Phase::Settling,
            tracker: WatchTracker::new(),
            armed: None,
            control: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }
}
