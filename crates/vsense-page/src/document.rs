//! Capability set the host page exposes to detection and extraction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a host element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementRef(pub u64);

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Media state of a `<video>` element
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProbe {
    pub element: ElementRef,
    pub src: Option<String>,
    pub poster: Option<String>,
    pub paused: bool,
    /// Seconds; zero or NaN until metadata is loaded
    pub duration: f64,
    /// Fully inside the viewport
    pub in_viewport: bool,
}

impl VideoProbe {
    pub fn is_playing(&self) -> bool {
        !self.paused
    }

    pub fn has_duration(&self) -> bool {
        self.duration > 0.0
    }
}

/// Read-only view of the host DOM.
///
/// Selectors are CSS selector strings and are interpreted by the host.
pub trait Document: Send + Sync {
    /// Current `location.href`
    fn location(&self) -> String;

    /// `document.title`
    fn title(&self) -> String;

    /// First element matching `selector`, searching under `scope` when given
    fn query(&self, scope: Option<ElementRef>, selector: &str) -> Option<ElementRef>;

    /// Nearest inclusive ancestor matching `selector`
    fn closest(&self, element: ElementRef, selector: &str) -> Option<ElementRef>;

    fn parent(&self, element: ElementRef) -> Option<ElementRef>;

    /// `textContent`
    fn text(&self, element: ElementRef) -> Option<String>;

    fn attr(&self, element: ElementRef, name: &str) -> Option<String>;

    /// Media state when `element` is a video
    fn video(&self, element: ElementRef) -> Option<VideoProbe>;

    /// Every video element in document order
    fn videos(&self) -> Vec<VideoProbe>;

    fn exists(&self, selector: &str) -> bool {
        self.query(None, selector).is_some()
    }

    /// Text of the first match, blank text counted as missing
    fn query_text(&self, scope: Option<ElementRef>, selector: &str) -> Option<String> {
        self.query(scope, selector)
            .and_then(|el| self.text(el))
            .filter(|t| !t.trim().is_empty())
    }

    fn query_attr(&self, scope: Option<ElementRef>, selector: &str, name: &str) -> Option<String> {
        self.query(scope, selector)
            .and_then(|el| self.attr(el, name))
            .filter(|v| !v.trim().is_empty())
    }
}
