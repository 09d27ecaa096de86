//! Context behaviour driven step by step against the simulated engine.

mod common;

use std::sync::Arc;

use common::{STEP, context, steps};
use cutscene_core::store::KeyValueStore;
use cutscene_director::domain::state::Phase;
use cutscene_host::command::HostCommand;
use cutscene_host::config::ContentFile;
use cutscene_host::context::{AppContext, Flow};
use cutscene_host::engine::EngineStatus;
use cutscene_host::error::AppError;
use cutscene_store::JsonFileStore;
use cutscene_test_support::{FixedClock, MemoryStore};

#[test]
fn test_start_plays_intro_through_markers_to_completion() {
    // Arrange
    let store = MemoryStore::new();
    let mut context = context(&store);

    // Act / Assert
    context.start();
    assert_eq!(context.director().active_key(), Some("Intro"));

    steps(&mut context, 20);
    assert_eq!(context.director().phase(), Phase::PausedForInput);
    assert_eq!(context.engine().status(), EngineStatus::Paused);
    assert_eq!(
        context.director().subtitles().map(|s| s.text().to_owned()),
        Some("Where am I?".to_owned())
    );

    let flow = context.apply(HostCommand::Input("Confirm".into())).unwrap();
    assert_eq!(flow, Flow::Continue);
    steps(&mut context, 1);
    assert_eq!(context.director().phase(), Phase::Playing);
    assert_eq!(store.durable_value("Intro"), None);

    steps(&mut context, 40);
    assert!(context.director().is_idle());
    assert_eq!(store.durable_value("Intro"), Some(1));
}

#[test]
fn test_played_intro_is_skipped_after_restart() {
    // Arrange
    let mut store = MemoryStore::new();
    store.set_int("Intro", 1).unwrap();
    store.flush().unwrap();
    let mut context = context(&store.restart());

    // Act
    context.start();

    // Assert
    assert!(context.director().is_idle());
    assert!(context.triggers()[0].is_disabled());
    assert!(context.engine().loaded_asset().is_none());
}

#[test]
fn test_skip_command_records_one_shot() {
    // Arrange
    let store = MemoryStore::new();
    let mut context = context(&store);
    context.start();
    steps(&mut context, 3);

    // Act
    context.apply(HostCommand::Skip).unwrap();

    // Assert
    assert_eq!(context.director().phase(), Phase::Ending);
    assert_eq!(store.durable_value("Intro"), Some(1));
}

#[test]
fn test_zone_waits_for_submit_then_plays_once() {
    // Arrange
    let mut context = context(&MemoryStore::new());

    // Act / Assert
    context.apply(HostCommand::Enter("bus_stop".into())).unwrap();
    let zone = context.zone("bus_stop").unwrap();
    assert!(zone.hint_visible());
    assert!(context.director().is_idle());

    context.apply(HostCommand::Input("Submit".into())).unwrap();
    assert_eq!(context.director().active_key(), Some("Bus"));
    assert!(context.zone("bus_stop").unwrap().is_spent());

    steps(&mut context, 15);
    assert!(context.director().is_idle());
    assert_eq!(context.engine().status(), EngineStatus::Stopped);
}

#[test]
fn test_input_answering_a_pause_is_not_offered_to_zones() {
    // Arrange
    let yaml = common::CONTENT.replace("event_name: Confirm", "event_name: Submit");
    let content = ContentFile::from_yaml(&yaml).unwrap();
    let mut context = AppContext::new(
        &content,
        Box::new(MemoryStore::new()),
        Arc::new(FixedClock::pinned()),
    )
    .unwrap();
    context.start();
    context.apply(HostCommand::Enter("bus_stop".into())).unwrap();
    steps(&mut context, 20);
    assert_eq!(context.director().phase(), Phase::PausedForInput);

    // Act
    context.apply(HostCommand::Input("Submit".into())).unwrap();
    steps(&mut context, 1);

    // Assert
    assert_eq!(context.director().phase(), Phase::Playing);
    assert_eq!(context.director().active_key(), Some("Intro"));
    let zone = context.zone("bus_stop").unwrap();
    assert!(zone.hint_visible());
    assert!(!zone.is_spent());

    steps(&mut context, 40);
    assert!(context.director().is_idle());
    context.apply(HostCommand::Input("Submit".into())).unwrap();
    assert_eq!(context.director().active_key(), Some("Bus"));
}

#[test]
fn test_interact_fires_event_trigger() {
    // Arrange
    let mut context = context(&MemoryStore::new());

    // Act
    context.apply(HostCommand::Interact("Bus".into())).unwrap();

    // Assert
    assert_eq!(context.director().active_key(), Some("Bus"));
}

#[test]
fn test_unknown_zone_and_trigger_are_command_errors() {
    let mut context = context(&MemoryStore::new());

    assert!(matches!(
        context.apply(HostCommand::Enter("nowhere".into())),
        Err(AppError::Command(_))
    ));
    assert!(matches!(
        context.apply(HostCommand::Interact("Nothing".into())),
        Err(AppError::Command(_))
    ));
}

#[test]
fn test_quit_stops_the_loop() {
    let mut context = context(&MemoryStore::new());

    assert_eq!(context.apply(HostCommand::Quit).unwrap(), Flow::Quit);
}

#[test]
fn test_subtitle_command_reaches_overlay() {
    // Arrange
    let mut context = context(&MemoryStore::new());

    // Act
    context
        .apply(HostCommand::Subtitle {
            text: "Hello".into(),
            duration: None,
        })
        .unwrap();
    context.step(STEP);

    // Assert
    assert_eq!(context.director().subtitles().map(|s| s.text()), Some("Hello"));
}

#[test]
fn test_publish_events_drains_the_channel() {
    // Arrange
    let mut context = context(&MemoryStore::new());
    context.start();

    // Act
    let first = context.publish_events();
    let second = context.publish_events();

    // Assert
    assert_eq!(first[0].metadata.event_type, "director.playback_accepted");
    assert!(second.is_empty());
}

#[test]
fn test_shutdown_stops_active_timeline() {
    // Arrange
    let mut context = context(&MemoryStore::new());
    context.apply(HostCommand::Play("Bus".into())).unwrap();
    steps(&mut context, 3);

    // Act
    context.shutdown();

    // Assert
    assert!(context.director().is_idle());
    assert_eq!(context.engine().status(), EngineStatus::Stopped);
}

#[test]
fn test_content_file_and_save_file_round_trip_through_disk() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let content_path = dir.path().join("content.yaml");
    let save_path = dir.path().join("save.json");
    std::fs::write(&content_path, common::CONTENT).unwrap();
    let content = ContentFile::load(&content_path).unwrap();
    let clock = Arc::new(FixedClock::pinned());

    // Act
    let mut first = AppContext::new(
        &content,
        Box::new(JsonFileStore::open(&save_path).unwrap()),
        clock.clone(),
    )
    .unwrap();
    first.start();
    first.apply(HostCommand::Skip).unwrap();
    let mut second =
        AppContext::new(&content, Box::new(JsonFileStore::open(&save_path).unwrap()), clock)
            .unwrap();
    second.start();

    // Assert
    assert!(second.director().is_idle());
    assert!(second.director().has_played("Intro"));
}

#[test]
fn test_duplicate_timeline_keys_keep_the_first_entry() {
    // Arrange
    let yaml = common::CONTENT.replace(
        "  - key: Bus\n",
        "  - key: Intro\n    asset: other.timeline\n    length_secs: 1.0\n  - key: Bus\n",
    );
    let content = ContentFile::from_yaml(&yaml).unwrap();

    // Act
    let context = AppContext::new(
        &content,
        Box::new(MemoryStore::new()),
        Arc::new(FixedClock::pinned()),
    )
    .unwrap();

    // Assert
    let registry = context.director().registry();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.rejected().len(), 1);
    assert_eq!(
        registry.resolve("Intro").unwrap().handle.asset(),
        "intro.timeline"
    );
}
