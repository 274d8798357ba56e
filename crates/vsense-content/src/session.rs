//! Page session state machine.
//!
//! Inputs are method calls carrying the current time; outputs are [`Effect`]s
//! the driver carries out. Anything that arrives later than the call that
//! caused it (settle timers, storage results) is tagged with the
//! [`Generation`] it was issued for and dropped once the context has moved on.

use crate::context::{ActiveContext, Generation, Phase};
use crate::control::{
    outcome_notice, ControlState, Notice, RequestToken, SaveControl, StoreOutcome, ToggleIntent,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use vsense_core::{Config, RecordBuilder, VideoRecord};
use vsense_page::{Document, ElementRef, PlatformAdapter, VideoContext};
use vsense_store::StoreError;

/// Storage work requested by a toggle
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRequest {
    Save(VideoRecord),
    Remove { url: String },
}

impl StoreRequest {
    pub fn intent(&self) -> ToggleIntent {
        match self {
            StoreRequest::Save(_) => ToggleIntent::Save,
            StoreRequest::Remove { .. } => ToggleIntent::Remove,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Play,
    Pause,
    Ended,
}

/// Work for the driver
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call [`ContentSession::on_settled`] after `delay`
    ScheduleSettle { generation: Generation, delay: Duration },
    /// Ask storage whether `url` is saved, then call [`ContentSession::on_saved_checked`]
    CheckSaved { generation: Generation, url: String },
    Mount {
        generation: Generation,
        container: ElementRef,
        state: ControlState,
    },
    Render {
        generation: Generation,
        state: ControlState,
        animate: bool,
    },
    Unmount { generation: Generation },
    /// Run `request`, then call [`ContentSession::on_persisted`]
    Persist {
        generation: Generation,
        token: RequestToken,
        request: StoreRequest,
    },
    Notify(Notice),
}

fn current(
    active: &mut Option<ActiveContext>,
    generation: Generation,
) -> Option<&mut ActiveContext> {
    active.as_mut().filter(|a| a.generation == generation)
}

/// Follows the watchable video on one page
pub struct ContentSession {
    adapter: Arc<dyn PlatformAdapter>,
    builder: RecordBuilder,
    settle_delay: Duration,
    last_generation: u64,
    active: Option<ActiveContext>,
}

impl ContentSession {
    pub fn new(adapter: Arc<dyn PlatformAdapter>, config: &Config) -> Self {
        Self {
            adapter,
            builder: RecordBuilder::from_config(config),
            settle_delay: config.settle_delay(),
            last_generation: 0,
            active: None,
        }
    }

    pub fn adapter(&self) -> &Arc<dyn PlatformAdapter> {
        &self.adapter
    }

    pub fn context(&self) -> Option<&VideoContext> {
        self.active.as_ref().map(|a| &a.video)
    }

    pub fn generation(&self) -> Option<Generation> {
        self.active.as_ref().map(|a| a.generation)
    }

    pub fn phase(&self) -> Option<Phase> {
        self.active.as_ref().map(|a| a.phase)
    }

    pub fn control_state(&self) -> Option<ControlState> {
        self.active
            .as_ref()
            .and_then(|a| a.control.as_ref())
            .map(|c| c.state())
    }

    /// Seconds watched in the current context
    pub fn watch_secs(&self, now: Instant) -> u64 {
        self.active
            .as_ref()
            .map_or(0, |a| a.tracker.duration_secs(now))
    }

    /// Re-check the page after navigation or DOM churn
    pub fn on_resolve(&mut self, doc: &dyn Document) -> Vec<Effect> {
        let resolved = self.adapter.resolve(doc);
        let mut effects = Vec::new();

        match (resolved, self.active.as_mut()) {
            (Some(video), Some(active)) if active.video.id == video.id => {
                if active.phase == Phase::Detached {
                    debug!(context = %active.video.id, "re-probing detached context");
                    active.phase = Phase::Settling;
                    effects.push(Effect::ScheduleSettle {
                        generation: active.generation,
                        delay: self.settle_delay,
                    });
                }
            }
            (Some(video), _) => {
                self.teardown(&mut effects);
                self.last_generation += 1;
                let generation = Generation(self.last_generation);
                info!(context = %video.id, %generation, "video context detected");
                self.active = Some(ActiveContext::new(video, generation));
                effects.push(Effect::ScheduleSettle {
                    generation,
                    delay: self.settle_delay,
                });
            }
            (None, Some(active)) if self.adapter.retains(doc, &active.video) => {
                debug!(context = %active.video.id, "context out of view, keeping it");
                if active.phase == Phase::Detached {
                    active.phase = Phase::Settling;
                    effects.push(Effect::ScheduleSettle {
                        generation: active.generation,
                        delay: self.settle_delay,
                    });
                }
            }
            (None, Some(_)) => {
                debug!("context no longer watchable");
                self.teardown(&mut effects);
            }
            (None, None) => {}
        }
        effects
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        if let Some(old) = self.active.take() {
            if old.is_mounted() {
                effects.push(Effect::Unmount {
                    generation: old.generation,
                });
            }
        }
    }

    /// Settle delay elapsed: find the container and arm the tracker
    pub fn on_settled(
        &mut self,
        doc: &dyn Document,
        generation: Generation,
        now: Instant,
    ) -> Vec<Effect> {
        let Some(active) = current(&mut self.active, generation) else {
            debug!(%generation, "stale settle timer ignored");
            return Vec::new();
        };
        if active.phase != Phase::Settling {
            return Vec::new();
        }

        let Some(container) = self.adapter.locate_container(doc, &active.video) else {
            debug!(context = %active.video.id, "video container not found");
            active.phase = Phase::Detached;
            return Vec::new();
        };

        let video = self.adapter.locate_video(doc, &active.video);
        let playing = video
            .and_then(|el| doc.video(el))
            .is_some_and(|probe| probe.is_playing());
        active.tracker.arm(playing, now);
        active.armed = video;
        active.phase = Phase::Checking { container };

        vec![Effect::CheckSaved {
            generation,
            url: active.video.id.clone(),
        }]
    }

    /// Saved-state known: mount the control
    pub fn on_saved_checked(
        &mut self,
        generation: Generation,
        result: Result<bool, StoreError>,
    ) -> Vec<Effect> {
        let Some(active) = current(&mut self.active, generation) else {
            debug!(%generation, "stale saved-state result ignored");
            return Vec::new();
        };
        let Phase::Checking { container } = active.phase else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        let state = match result {
            Ok(saved) => ControlState::from_saved(saved),
            Err(e) => {
                warn!(context = %active.video.id, error = %e, "saved-state check failed");
                effects.push(Effect::Notify(Notice::error(format!(
                    "Could not check saved state: {}",
                    e
                ))));
                ControlState::Unsaved
            }
        };

        active.control = Some(SaveControl::new(state, self.adapter.noun()));
        active.phase = Phase::Active { container };
        effects.insert(
            0,
            Effect::Mount {
                generation,
                container,
                state,
            },
        );
        effects
    }

    /// Media event from a video element; only the armed video counts
    pub fn on_playback(&mut self, element: ElementRef, event: PlaybackEvent, now: Instant) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.armed != Some(element) {
            debug!(%element, ?event, "playback event from untracked video");
            return;
        }

        match event {
            PlaybackEvent::Play => active.tracker.start(now),
            PlaybackEvent::Pause => active.tracker.pause(now),
            PlaybackEvent::Ended => active.tracker.end(now),
        }
    }

    /// Control activated: build the record or the removal
    pub fn on_click(
        &mut self,
        doc: &dyn Document,
        generation: Generation,
        now: Instant,
    ) -> Vec<Effect> {
        let Some(active) = current(&mut self.active, generation) else {
            debug!(%generation, "click on a stale control ignored");
            return Vec::new();
        };
        let Some(control) = active.control.as_mut() else {
            return Vec::new();
        };
        let Some((token, intent)) = control.begin_toggle() else {
            return Vec::new();
        };

        let request = match intent {
            ToggleIntent::Save => {
                let fields = self.adapter.extract(doc, &active.video);
                let watched = active.tracker.duration_secs(now);
                let draft = fields.into_draft(active.video.platform, &active.video.id, watched);
                StoreRequest::Save(self.builder.build(draft))
            }
            ToggleIntent::Remove => StoreRequest::Remove {
                url: active.video.id.clone(),
            },
        };

        vec![Effect::Persist {
            generation,
            token,
            request,
        }]
    }

    /// Storage request finished.
    ///
    /// A request from an earlier context still reports its notice but never
    /// touches the current control.
    pub fn on_persisted(
        &mut self,
        generation: Generation,
        token: RequestToken,
        intent: ToggleIntent,
        result: Result<StoreOutcome, StoreError>,
    ) -> Vec<Effect> {
        if let Err(e) = &result {
            warn!(%generation, %token, error = %e, "storage request failed");
        }

        let control = current(&mut self.active, generation).and_then(|a| a.control.as_mut());
        let Some(control) = control else {
            debug!(%generation, "completion for a previous context");
            return vec![Effect::Notify(outcome_notice(self.adapter.noun(), intent, &result))];
        };

        let Some(done) = control.finish(token, &result) else {
            return Vec::new();
        };
        let mut effects = Vec::new();
        if done.changed {
            effects.push(Effect::Render {
                generation,
                state: done.state,
                animate: done.animate,
            });
        }
        effects.push(Effect::Notify(done.notice));
        effects
    }
}
