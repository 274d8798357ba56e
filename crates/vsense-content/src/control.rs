//! Save/Saved toggle state and the notices its outcomes produce

use std::fmt;
use tracing::debug;
use vsense_store::{RemoveOutcome, SaveOutcome, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Unsaved,
    Saved,
}

impl ControlState {
    pub fn from_saved(saved: bool) -> Self {
        if saved {
            ControlState::Saved
        } else {
            ControlState::Unsaved
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControlState::Unsaved => "Save",
            ControlState::Saved => "Saved",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ControlState::Unsaved => "vs-save-button",
            ControlState::Saved => "vs-save-button saved",
        }
    }
}

/// Identifies one storage request issued by a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleIntent {
    Save,
    Remove,
}

/// Successful result of a storage request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Save(SaveOutcome),
    Remove(RemoveOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Short message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Notice for a finished request; `noun` is "Video" or "Reel"
pub fn outcome_notice(
    noun: &str,
    intent: ToggleIntent,
    result: &Result<StoreOutcome, StoreError>,
) -> Notice {
    match result {
        Ok(StoreOutcome::Save(SaveOutcome::Added)) => Notice::info(format!("{} saved!", noun)),
        Ok(StoreOutcome::Save(SaveOutcome::Exists)) => Notice::info("Already saved!"),
        Ok(StoreOutcome::Remove(RemoveOutcome::Removed)) => {
            Notice::info(format!("{} removed!", noun))
        }
        Ok(StoreOutcome::Remove(RemoveOutcome::NotFound)) => {
            Notice::info(format!("{} not found!", noun))
        }
        Err(e) => {
            let verb = match intent {
                ToggleIntent::Save => "save",
                ToggleIntent::Remove => "remove",
            };
            Notice::error(format!("Could not {} {}: {}", verb, noun.to_lowercase(), e))
        }
    }
}

/// What the host should do after a request finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub state: ControlState,
    /// State differs from before the request
    pub changed: bool,
    /// Play the saved animation
    pub animate: bool,
    pub notice: Notice,
}

/// The injected toggle for one context.
///
/// At most one storage request is outstanding; clicks while one is in flight
/// are dropped.
#[derive(Debug, Clone)]
pub struct SaveControl {
    state: ControlState,
    noun: String,
    in_flight: Option<(RequestToken, ToggleIntent)>,
    next_token: u64,
}

impl SaveControl {
    pub fn new(state: ControlState, noun: &str) -> Self {
        Self {
            state,
            noun: noun.to_string(),
            in_flight: None,
            next_token: 0,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a request for the opposite of the current state
    pub fn begin_toggle(&mut self) -> Option<(RequestToken, ToggleIntent)> {
        if self.is_busy() {
            debug!("toggle ignored, request in flight");
            return None;
        }

        self.next_token += 1;
        let token = RequestToken(self.next_token);
        let intent = match self.state {
            ControlState::Unsaved => ToggleIntent::Save,
            ControlState::Saved => ToggleIntent::Remove,
        };
        self.in_flight = Some((token, intent));
        Some((token, intent))
    }

    /// Apply the result of the in-flight request; other tokens are ignored
    pub fn finish(
        &mut self,
        token: RequestToken,
        result: &Result<StoreOutcome, StoreError>,
    ) -> Option<Finished> {
        let intent = match self.in_flight {
            Some((current, intent)) if current == token => intent,
            _ => {
                debug!(%token, "completion for unknown request ignored");
                return None;
            }
        };
        self.in_flight = None;

        let before = self.state;
        let mut animate = false;
        match result {
            Ok(StoreOutcome::Save(outcome)) => {
                self.state = ControlState::Saved;
                animate = *outcome == SaveOutcome::Added;
            }
            Ok(StoreOutcome::Remove(_)) => self.state = ControlState::Unsaved,
            Err(_) => {}
        }

        Some(Finished {
            state: self.state,
            changed: self.state != before,
            animate,
            notice: outcome_notice(&self.noun, intent, result),
        })
    }
}
