//! Shared helpers for host integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use cutscene_host::config::ContentFile;
use cutscene_host::context::AppContext;
use cutscene_test_support::{FixedClock, MemoryStore};

pub const STEP: Duration = Duration::from_millis(100);

pub const CONTENT: &str = r#"
director:
  fade_secs: 0.5
  settle_secs: 0.2
subtitles:
  fade_secs: 0.1
  default_display_secs: 1.0
timelines:
  - key: Intro
    asset: intro.timeline
    length_secs: 3.0
    subtitles:
      - { at_secs: 0.5, text: "Where am I?" }
    pauses:
      - { at_secs: 1.0, event_name: Confirm }
  - key: Bus
    asset: bus.timeline
    uses_fade: false
    length_secs: 1.0
triggers:
  - { key: Intro, play_on_start: true, play_only_once: true }
  - { key: Bus }
zones:
  - { name: bus_stop, key: Bus, mode: once, require_input: Submit }
"#;

pub fn content() -> ContentFile {
    ContentFile::from_yaml(CONTENT).unwrap()
}

/// Builds a context over `store` with a pinned clock.
pub fn context(store: &MemoryStore) -> AppContext {
    AppContext::new(&content(), Box::new(store.clone()), Arc::new(FixedClock::pinned())).unwrap()
}

/// Steps the context `n` times.
pub fn steps(context: &mut AppContext, n: usize) {
    for _ in 0..n {
        context.step(STEP);
    }
}
