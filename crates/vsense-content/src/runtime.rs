//! Async driver that feeds a [`ContentSession`] from the host page.
//!
//! A single task owns the session. It polls the location, debounces DOM
//! mutation bursts into one resolve, forwards host events, and runs storage
//! calls on the blocking pool. Results come back through a channel so the
//! session is never touched from two places at once.

use crate::context::{Generation, Phase};
use crate::control::{ControlState, Notice, RequestToken, StoreOutcome, ToggleIntent};
use crate::session::{ContentSession, Effect, PlaybackEvent, StoreRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use vsense_core::Config;
use vsense_page::{Document, ElementRef, PlatformAdapter};
use vsense_store::{StoreError, VideoStore};

/// Writer for the injected save control
pub trait ControlSurface: Send {
    fn mount(&mut self, generation: Generation, container: ElementRef, state: ControlState);
    fn render(&mut self, generation: Generation, state: ControlState, animate: bool);
    fn unmount(&mut self, generation: Generation);
}

/// Fire-and-forget user notices
pub trait Notifier: Send {
    fn notify(&mut self, notice: &Notice, visible_for: Duration);
}

/// Signals from the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Something under `document.body` changed
    Mutation,
    Playback {
        element: ElementRef,
        event: PlaybackEvent,
    },
    /// The control mounted for `generation` was clicked
    Click { generation: Generation },
    Shutdown,
}

/// Sends host events to a running [`ContentRuntime`]
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    events: mpsc::UnboundedSender<HostEvent>,
}

impl RuntimeHandle {
    /// False once the runtime has stopped
    pub fn send(&self, event: HostEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn mutation(&self) -> bool {
        self.send(HostEvent::Mutation)
    }

    pub fn playback(&self, element: ElementRef, event: PlaybackEvent) -> bool {
        self.send(HostEvent::Playback { element, event })
    }

    pub fn click(&self, generation: Generation) -> bool {
        self.send(HostEvent::Click { generation })
    }

    pub fn shutdown(&self) -> bool {
        self.send(HostEvent::Shutdown)
    }
}

/// Results of timers and storage calls
#[derive(Debug)]
enum Completion {
    Settled(Generation),
    SavedChecked {
        generation: Generation,
        result: Result<bool, StoreError>,
    },
    Persisted {
        generation: Generation,
        token: RequestToken,
        intent: ToggleIntent,
        result: Result<StoreOutcome, StoreError>,
    },
}

struct Driver<D, S, U, N> {
    session: ContentSession,
    doc: D,
    store: Arc<S>,
    surface: U,
    notifier: N,
    notice_duration: Duration,
    completions: mpsc::UnboundedSender<Completion>,
}

impl<D, S, U, N> Driver<D, S, U, N>
where
    D: Document,
    S: VideoStore + 'static,
    U: ControlSurface,
    N: Notifier,
{
    fn resolve(&mut self) {
        let effects = self.session.on_resolve(&self.doc);
        self.apply(effects);
    }

    fn handle_event(&mut self, event: HostEvent) {
        let now = Instant::now().into_std();
        match event {
            HostEvent::Playback { element, event } => self.session.on_playback(element, event, now),
            HostEvent::Click { generation } => {
                let effects = self.session.on_click(&self.doc, generation, now);
                self.apply(effects);
            }
            // handled by the run loop
            HostEvent::Mutation | HostEvent::Shutdown => {}
        }
    }

    fn complete(&mut self, completion: Completion) {
        let effects = match completion {
            Completion::Settled(generation) => {
                let now = Instant::now().into_std();
                self.session.on_settled(&self.doc, generation, now)
            }
            Completion::SavedChecked { generation, result } => {
                self.session.on_saved_checked(generation, result)
            }
            Completion::Persisted {
                generation,
                token,
                intent,
                result,
            } => self.session.on_persisted(generation, token, intent, result),
        };
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleSettle { generation, delay } => {
                    let tx = self.completions.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(Completion::Settled(generation));
                    });
                }
                Effect::CheckSaved { generation, url } => {
                    let store = Arc::clone(&self.store);
                    let tx = self.completions.clone();
                    tokio::task::spawn_blocking(move || {
                        let result = store.is_saved(&url);
                        let _ = tx.send(Completion::SavedChecked { generation, result });
                    });
                }
                Effect::Mount {
                    generation,
                    container,
                    state,
                } => self.surface.mount(generation, container, state),
                Effect::Render {
                    generation,
                    state,
                    animate,
                } => self.surface.render(generation, state, animate),
                Effect::Unmount { generation } => self.surface.unmount(generation),
                Effect::Persist {
                    generation,
                    token,
                    request,
                } => {
                    let store = Arc::clone(&self.store);
                    let tx = self.completions.clone();
                    tokio::task::spawn_blocking(move || {
                        let intent = request.intent();
                        let result = match request {
                            StoreRequest::Save(record) => {
                                store.save(record).map(StoreOutcome::Save)
                            }
                            StoreRequest::Remove { url } => {
                                store.remove(&url).map(StoreOutcome::Remove)
                            }
                        };
                        let _ = tx.send(Completion::Persisted {
                            generation,
                            token,
                            intent,
                            result,
                        });
                    });
                }
                Effect::Notify(notice) => self.notifier.notify(&notice, self.notice_duration),
            }
        }
    }
}

/// Drives one page session until shutdown
pub struct ContentRuntime<D, S, U, N> {
    driver: Driver<D, S, U, N>,
    events: mpsc::UnboundedReceiver<HostEvent>,
    completions: mpsc::UnboundedReceiver<Completion>,
    poll_interval: Duration,
    mutation_debounce: Duration,
}

impl<D, S, U, N> ContentRuntime<D, S, U, N>
where
    D: Document,
    S: VideoStore + 'static,
    U: ControlSurface,
    N: Notifier,
{
    pub fn new(
        adapter: Arc<dyn PlatformAdapter>,
        doc: D,
        store: Arc<S>,
        surface: U,
        notifier: N,
        config: &Config,
    ) -> (Self, RuntimeHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let runtime = Self {
            driver: Driver {
                session: ContentSession::new(adapter, config),
                doc,
                store,
                surface,
                notifier,
                notice_duration: config.notice_duration(),
                completions: completions_tx,
            },
            events: events_rx,
            completions: completions_rx,
            poll_interval: config.poll_interval(),
            mutation_debounce: config.mutation_debounce(),
        };
        (runtime, RuntimeHandle { events: events_tx })
    }

    /// Run until [`HostEvent::Shutdown`] or every handle is dropped
    pub async fn run(self) {
        let ContentRuntime {
            mut driver,
            mut events,
            mut completions,
            poll_interval,
            mutation_debounce,
        } = self;

        let mut poll = tokio::time::interval(poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_location: Option<String> = None;
        let mut mutation_deadline: Option<Instant> = None;

        info!(platform = %driver.session.adapter().platform(), "content session started");

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    let location = driver.doc.location();
                    if last_location.as_deref() != Some(location.as_str()) {
                        debug!(%location, "location changed");
                        last_location = Some(location);
                        driver.resolve();
                    } else if driver.session.phase() == Some(Phase::Detached) {
                        driver.resolve();
                    }
                }
                _ = tokio::time::sleep_until(mutation_deadline.unwrap_or_else(Instant::now)),
                    if mutation_deadline.is_some() =>
                {
                    mutation_deadline = None;
                    driver.resolve();
                }
                event = events.recv() => match event {
                    Some(HostEvent::Mutation) => {
                        mutation_deadline = Some(Instant::now() + mutation_debounce);
                    }
                    Some(HostEvent::Shutdown) | None => break,
                    Some(event) => driver.handle_event(event),
                },
                Some(completion) = completions.recv() => driver.complete(completion),
            }
        }

        info!("content session stopped");
    }
}
