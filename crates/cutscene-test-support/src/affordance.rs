//! Test skip button: records visibility changes.

use std::sync::{Arc, Mutex};

use cutscene_core::affordance::SkipAffordance;

#[derive(Debug, Default)]
struct ButtonLog {
    visible: bool,
    shows: usize,
    hides: usize,
}

/// A skip affordance that records every `show` and `hide`. Clones share the
/// same log, so a test can keep one while the director owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSkipButton {
    log: Arc<Mutex<ButtonLog>>,
}

impl RecordingSkipButton {
    /// Creates a hidden button.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the button is currently visible.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.log.lock().unwrap().visible
    }

    /// Number of `show` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn show_count(&self) -> usize {
        self.log.lock().unwrap().shows
    }

    /// Number of `hide` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn hide_count(&self) -> usize {
        self.log.lock().unwrap().hides
    }
}

impl SkipAffordance for RecordingSkipButton {
    fn show(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.visible = true;
        log.shows += 1;
    }

    fn hide(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.visible = false;
        log.hides += 1;
    }
}
