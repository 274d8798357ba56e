#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use vsense_content::{ControlState, ControlSurface, Generation, Notice, Notifier};
use vsense_core::{Config, VideoRecord};
use vsense_page::{ElementRef, StaticDocument, VideoState};
use vsense_store::{MemoryStore, Snapshot, StoreError, VideoStore};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Mount(Generation, ControlState),
    Render(Generation, ControlState),
    Unmount(Generation),
}

/// Records every surface call and notice
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    notices: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    /// Generation of the most recent mount
    pub fn mounted(&self) -> Option<Generation> {
        self.calls().iter().rev().find_map(|c| match c {
            Call::Mount(generation, _) => Some(*generation),
            _ => None,
        })
    }

    pub fn renders_for(&self, generation: Generation) -> Vec<ControlState> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Render(g, state) if g == generation => Some(state),
                _ => None,
            })
            .collect()
    }
}

impl ControlSurface for Recorder {
    fn mount(&mut self, generation: Generation, _container: ElementRef, state: ControlState) {
        self.calls.lock().unwrap().push(Call::Mount(generation, state));
    }

    fn render(&mut self, generation: Generation, state: ControlState, _animate: bool) {
        self.calls.lock().unwrap().push(Call::Render(generation, state));
    }

    fn unmount(&mut self, generation: Generation) {
        self.calls.lock().unwrap().push(Call::Unmount(generation));
    }
}

impl Notifier for Recorder {
    fn notify(&mut self, notice: &Notice, _visible_for: Duration) {
        self.notices.lock().unwrap().push(notice.message.clone());
    }
}

/// Store whose commits take `delay`
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
        }
    }
}

impl VideoStore for SlowStore {
    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        self.inner.snapshot()
    }

    fn commit(&self, expected_revision: u64, records: Vec<VideoRecord>) -> Result<u64, StoreError> {
        std::thread::sleep(self.delay);
        self.inner.commit(expected_revision, records)
    }
}

pub fn fast_config() -> Config {
    Config {
        poll_interval_ms: 10,
        mutation_debounce_ms: 5,
        settle_delay_ms: 20,
        ..Config::default()
    }
}

/// YouTube watch page titled `title` with 1,000 views; returns the page and its video
pub fn watch_page(location: &str, title: &str) -> (StaticDocument, ElementRef) {
    let doc = StaticDocument::new(location);
    let player = doc.element("#movie_player");
    let video = doc.add_video(Some(player), VideoState::default());
    doc.add("#title h1", title);
    doc.add("ytd-video-view-count-renderer", "1,000 views");
    (doc, video)
}

pub async fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..300 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
