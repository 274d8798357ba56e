mod common;

use common::{fast_config, wait_for, watch_page, Call, Recorder, SlowStore};
use std::sync::Arc;
use std::time::Duration;
use vsense_content::{ContentRuntime, ControlState, PlaybackEvent};
use vsense_page::{Document, YoutubeAdapter};
use vsense_store::{JsonFileStore, MemoryStore, VideoStore};

const URL_A: &str = "https://www.youtube.com/watch?v=aaa";
const URL_B: &str = "https://www.youtube.com/watch?v=bbb";

#[tokio::test]
async fn test_save_records_metrics_and_watch_time() {
    let (doc, video) = watch_page(URL_A, "Foo");
    let store = Arc::new(MemoryStore::new());
    let recorder = Recorder::default();

    let (runtime, handle) = ContentRuntime::new(
        Arc::new(YoutubeAdapter::new()),
        doc.clone(),
        Arc::clone(&store),
        recorder.clone(),
        recorder.clone(),
        &fast_config(),
    );
    let task = tokio::spawn(runtime.run());

    assert!(wait_for(|| recorder.mounted().is_some()).await);
    let generation = recorder.mounted().unwrap();

    handle.playback(video, PlaybackEvent::Play);
    tokio::time::sleep(Duration::from_millis(1200)).await;
    handle.playback(video, PlaybackEvent::Pause);
    handle.click(generation);

    assert!(wait_for(|| !recorder.notices().is_empty()).await);
    assert_eq!(recorder.notices(), vec!["Video saved!"]);

    let records = store.get_all().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.url, URL_A);
    assert_eq!(record.title, "Foo");
    assert_eq!(record.metrics.views, Some(1000));
    assert_eq!(record.metrics.likes, None);
    assert!(
        (1..=2).contains(&record.watch_duration),
        "watch_duration = {}",
        record.watch_duration
    );

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test]
async fn test_navigation_during_save_leaves_new_control_alone() {
    let (doc, _) = watch_page(URL_A, "Foo");
    let store = Arc::new(SlowStore::new(Duration::from_millis(300)));
    let recorder = Recorder::default();

    let (runtime, handle) = ContentRuntime::new(
        Arc::new(YoutubeAdapter::new()),
        doc.clone(),
        Arc::clone(&store),
        recorder.clone(),
        recorder.clone(),
        &fast_config(),
    );
    let task = tokio::spawn(runtime.run());

    assert!(wait_for(|| recorder.mounted().is_some()).await);
    let first = recorder.mounted().unwrap();
    handle.click(first);

    // Navigate while the save for A is still committing
    doc.set_location(URL_B);
    if let Some(title) = doc.query(None, "#title h1") {
        doc.set_text(title, "Bar");
    }
    handle.mutation();
    assert!(wait_for(|| recorder.mounted() != Some(first)).await);
    let second = recorder.mounted().unwrap();

    assert!(wait_for(|| !recorder.notices().is_empty()).await);
    assert_eq!(recorder.notices(), vec!["Video saved!"]);

    // The stale completion renders nothing anywhere
    assert!(recorder.renders_for(first).is_empty());
    assert!(recorder.renders_for(second).is_empty());
    assert_eq!(
        recorder.calls(),
        vec![
            Call::Mount(first, ControlState::Unsaved),
            Call::Unmount(first),
            Call::Mount(second, ControlState::Unsaved),
        ]
    );

    let records = store.get_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, URL_A);
    assert_eq!(records[0].title, "Foo");

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test]
async fn test_saved_state_survives_restart_with_file_store() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("videos.json");

    let (doc, _) = watch_page(URL_A, "Foo");
    let recorder = Recorder::default();
    let (runtime, handle) = ContentRuntime::new(
        Arc::new(YoutubeAdapter::new()),
        doc.clone(),
        Arc::new(JsonFileStore::open(&path)),
        recorder.clone(),
        recorder.clone(),
        &fast_config(),
    );
    let task = tokio::spawn(runtime.run());
    assert!(wait_for(|| recorder.mounted().is_some()).await);
    handle.click(recorder.mounted().unwrap());
    assert!(wait_for(|| !recorder.notices().is_empty()).await);
    handle.shutdown();
    task.await.unwrap();

    let recorder = Recorder::default();
    let (runtime, handle) = ContentRuntime::new(
        Arc::new(YoutubeAdapter::new()),
        doc,
        Arc::new(JsonFileStore::open(&path)),
        recorder.clone(),
        recorder.clone(),
        &fast_config(),
    );
    let task = tokio::spawn(runtime.run());
    assert!(wait_for(|| recorder.mounted().is_some()).await);
    assert!(matches!(
        recorder.calls().as_slice(),
        [Call::Mount(_, ControlState::Saved)]
    ));

    // Pressing a saved control removes the record
    handle.click(recorder.mounted().unwrap());
    assert!(wait_for(|| !recorder.notices().is_empty()).await);
    assert_eq!(recorder.notices(), vec!["Video removed!"]);
    assert!(JsonFileStore::open(&path).get_all().unwrap().is_empty());

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test]
async fn test_watch_time_resets_per_context() {
    let (doc, video) = watch_page(URL_A, "Foo");
    let store = Arc::new(MemoryStore::new());
    let recorder = Recorder::default();

    let (runtime, handle) = ContentRuntime::new(
        Arc::new(YoutubeAdapter::new()),
        doc.clone(),
        Arc::clone(&store),
        recorder.clone(),
        recorder.clone(),
        &fast_config(),
    );
    let task = tokio::spawn(runtime.run());

    assert!(wait_for(|| recorder.mounted().is_some()).await);
    let first = recorder.mounted().unwrap();
    handle.playback(video, PlaybackEvent::Play);
    tokio::time::sleep(Duration::from_millis(1100)).await;

    doc.set_location(URL_B);
    handle.mutation();
    assert!(wait_for(|| recorder.mounted() != Some(first)).await);
    handle.click(recorder.mounted().unwrap());

    assert!(wait_for(|| !recorder.notices().is_empty()).await);
    let records = store.get_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, URL_B);
    assert_eq!(records[0].watch_duration, 0);

    handle.shutdown();
    task.await.unwrap();
}
