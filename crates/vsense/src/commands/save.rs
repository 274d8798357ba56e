//! Runs a full page session against a fixture: wait for the control to
//! mount, press it once, report the notice.

use super::{load_config, open_store};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};
use vsense_content::{
    ContentRuntime, ControlState, ControlSurface, Generation, Notice, NoticeKind, Notifier,
    RuntimeHandle,
};
use vsense_core::Config;
use vsense_page::{Document, ElementRef, PlatformRegistry, StaticDocument};
use vsense_store::VideoStore;

/// Extra wait on top of the settle delay before giving up on a mount
const MOUNT_GRACE: Duration = Duration::from_secs(5);
const PERSIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reports control changes back to the command
struct ConsoleSurface {
    mounted: mpsc::UnboundedSender<(Generation, ControlState)>,
}

impl ControlSurface for ConsoleSurface {
    fn mount(&mut self, generation: Generation, container: ElementRef, state: ControlState) {
        debug!(%generation, %container, label = state.label(), "control mounted");
        let _ = self.mounted.send((generation, state));
    }

    fn render(&mut self, generation: Generation, state: ControlState, animate: bool) {
        debug!(%generation, label = state.label(), animate, "control rendered");
    }

    fn unmount(&mut self, generation: Generation) {
        debug!(%generation, "control removed");
    }
}

struct ChannelNotifier {
    notices: mpsc::UnboundedSender<Notice>,
}

impl Notifier for ChannelNotifier {
    fn notify(&mut self, notice: &Notice, visible_for: Duration) {
        debug!(message = %notice.message, ?visible_for, "notice");
        let _ = self.notices.send(notice.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveReport {
    /// Control mounted as already saved; nothing was pressed
    AlreadySaved,
    Pressed(Notice),
}

struct SessionEvents {
    mounted: mpsc::UnboundedReceiver<(Generation, ControlState)>,
    notices: mpsc::UnboundedReceiver<Notice>,
}

async fn press_once(
    handle: &RuntimeHandle,
    events: &mut SessionEvents,
    mount_wait: Duration,
    location: &str,
) -> anyhow::Result<SaveReport> {
    let (generation, state) = tokio::time::timeout(mount_wait, events.mounted.recv())
        .await
        .ok()
        .flatten()
        .ok_or_else(|| anyhow::anyhow!("no watchable video found on {}", location))?;

    if state == ControlState::Saved {
        return Ok(SaveReport::AlreadySaved);
    }

    // Drop notices raised while mounting
    while events.notices.try_recv().is_ok() {}

    handle.click(generation);
    let notice = tokio::time::timeout(PERSIST_TIMEOUT, events.notices.recv())
        .await
        .ok()
        .flatten()
        .ok_or_else(|| anyhow::anyhow!("storage did not answer"))?;
    Ok(SaveReport::Pressed(notice))
}

/// Drive one session until the control has been pressed and storage answered
pub async fn save_document<D, S>(
    doc: D,
    store: Arc<S>,
    config: &Config,
) -> anyhow::Result<SaveReport>
where
    D: Document + 'static,
    S: VideoStore + 'static,
{
    let registry = PlatformRegistry::from_config(config);
    let location = doc.location();
    let adapter = registry
        .for_location(&location)
        .ok_or_else(|| anyhow::anyhow!("no enabled platform handles {}", location))?;

    let (mounted_tx, mounted_rx) = mpsc::unbounded_channel();
    let (notices_tx, notices_rx) = mpsc::unbounded_channel();
    let (runtime, handle) = ContentRuntime::new(
        adapter,
        doc,
        store,
        ConsoleSurface { mounted: mounted_tx },
        ChannelNotifier { notices: notices_tx },
        config,
    );
    let task = tokio::spawn(runtime.run());

    let mut events = SessionEvents {
        mounted: mounted_rx,
        notices: notices_rx,
    };
    let mount_wait = config.settle_delay() + MOUNT_GRACE;
    let report = press_once(&handle, &mut events, mount_wait, &location).await;

    handle.shutdown();
    task.await?;
    report
}

pub fn run(fixture: &str) -> anyhow::Result<()> {
    let config = load_config()?;
    let doc = StaticDocument::load_fixture(Path::new(fixture))?;
    let store = Arc::new(open_store()?);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = rt.block_on(save_document(doc, store, &config))?;

    match report {
        SaveReport::AlreadySaved => println!("Already saved!"),
        SaveReport::Pressed(notice) => {
            info!(message = %notice.message, "save finished");
            println!("{}", notice.message);
            if notice.kind == NoticeKind::Error {
                anyhow::bail!("save failed");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsense_page::VideoState;
    use vsense_store::MemoryStore;

    fn fast_config() -> Config {
        Config {
            poll_interval_ms: 10,
            mutation_debounce_ms: 5,
            settle_delay_ms: 20,
            ..Config::default()
        }
    }

    fn reel_page() -> StaticDocument {
        let doc = StaticDocument::new("https://www.instagram.com/reel/C0ffee/");
        let frame = doc.element("div[style*=\"height\"]");
        doc.add_video(Some(frame), VideoState::default());
        doc
    }

    #[tokio::test]
    async fn test_save_document_adds_record() {
        let store = Arc::new(MemoryStore::new());
        let report = save_document(reel_page(), Arc::clone(&store), &fast_config())
            .await
            .unwrap();

        match report {
            SaveReport::Pressed(notice) => assert_eq!(notice.message, "Reel saved!"),
            other => panic!("unexpected report {:?}", other),
        }
        assert!(store.is_saved("https://www.instagram.com/reel/C0ffee/").unwrap());
    }

    #[tokio::test]
    async fn test_save_document_skips_saved_video() {
        let store = Arc::new(MemoryStore::new());
        save_document(reel_page(), Arc::clone(&store), &fast_config())
            .await
            .unwrap();

        let report = save_document(reel_page(), Arc::clone(&store), &fast_config())
            .await
            .unwrap();
        assert_eq!(report, SaveReport::AlreadySaved);
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_document_without_video_fails() {
        let doc = StaticDocument::new("https://www.youtube.com/");
        let config = Config {
            settle_delay_ms: 10,
            ..fast_config()
        };
        let result = save_document(doc, Arc::new(MemoryStore::new()), &config).await;
        assert!(result.is_err());
    }
}
