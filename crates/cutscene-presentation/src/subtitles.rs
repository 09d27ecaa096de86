//! Queued subtitle overlay.
//!
//! Entries are shown strictly one at a time in FIFO order. Each goes through
//! fade-in, hold and fade-out, and the overlay is back at opacity 0 before
//! the next entry is dequeued.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::debug;

use crate::ramp::Ramp;

/// Tunables for the subtitle overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleSettings {
    /// Length of each fade-in and fade-out.
    pub fade_duration: Duration,
    /// Hold time used when `show` is called without a positive duration.
    pub default_display: Duration,
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        Self {
            fade_duration: Duration::from_millis(400),
            default_display: Duration::from_secs(3),
        }
    }
}

/// One queued line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    /// Text to display.
    pub text: String,
    /// How long the text stays fully visible.
    pub duration: Duration,
}

/// Display state of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitlePhase {
    /// Nothing shown, queue drained.
    Idle,
    /// The current entry is fading in.
    FadingIn,
    /// The current entry is fully visible.
    Holding,
    /// The current entry is fading out.
    FadingOut,
}

/// FIFO subtitle queue with its own fade sub-state.
#[derive(Debug)]
pub struct SubtitleQueue {
    settings: SubtitleSettings,
    queue: VecDeque<SubtitleEntry>,
    current: Option<SubtitleEntry>,
    phase: SubtitlePhase,
    opacity: f32,
    text: String,
    ramp: Option<Ramp>,
    hold_remaining: Duration,
}

impl Default for SubtitleQueue {
    fn default() -> Self {
        Self::new(SubtitleSettings::default())
    }
}

impl SubtitleQueue {
    /// Creates an idle, blank queue.
    #[must_use]
    pub fn new(settings: SubtitleSettings) -> Self {
        Self {
            settings,
            queue: VecDeque::new(),
            current: None,
            phase: SubtitlePhase::Idle,
            opacity: 0.0,
            text: String::new(),
            ramp: None,
            hold_remaining: Duration::ZERO,
        }
    }

    /// Enqueues a line. Blank text is ignored; a missing or zero duration
    /// falls back to the default display time. Returns whether the line was
    /// enqueued.
    pub fn show(&mut self, text: &str, duration: Option<Duration>) -> bool {
        if text.trim().is_empty() {
            debug!("ignoring blank subtitle");
            return false;
        }
        let duration = duration
            .filter(|d| !d.is_zero())
            .unwrap_or(self.settings.default_display);
        self.queue.push_back(SubtitleEntry {
            text: text.to_owned(),
            duration,
        });
        debug!(text, ?duration, queued = self.queue.len(), "subtitle enqueued");
        if self.phase == SubtitlePhase::Idle {
            self.begin_next();
        }
        true
    }

    /// Advances the display state machine.
    pub fn tick(&mut self, dt: Duration) {
        match self.phase {
            SubtitlePhase::Idle => {}
            SubtitlePhase::FadingIn => {
                if self.advance_ramp(dt) {
                    if let Some(entry) = &self.current {
                        self.text.clone_from(&entry.text);
                        self.hold_remaining = entry.duration;
                    }
                    self.phase = SubtitlePhase::Holding;
                }
            }
            SubtitlePhase::Holding => {
                self.hold_remaining = self.hold_remaining.saturating_sub(dt);
                if self.hold_remaining.is_zero() {
                    self.ramp = Some(Ramp::new(self.opacity, 0.0, self.settings.fade_duration));
                    self.phase = SubtitlePhase::FadingOut;
                }
            }
            SubtitlePhase::FadingOut => {
                if self.advance_ramp(dt) {
                    self.text.clear();
                    self.current = None;
                    self.begin_next();
                }
            }
        }
    }

    /// Cancels any fade or hold, drops every queued line and snaps to blank.
    pub fn hide_immediate(&mut self) {
        if self.phase != SubtitlePhase::Idle || !self.queue.is_empty() {
            debug!(dropped = self.queue.len(), "subtitles hidden immediately");
        }
        self.queue.clear();
        self.current = None;
        self.ramp = None;
        self.hold_remaining = Duration::ZERO;
        self.phase = SubtitlePhase::Idle;
        self.opacity = 0.0;
        self.text.clear();
    }

    /// Text currently rendered (possibly blank).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Overlay opacity in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[must_use]
    pub fn phase(&self) -> SubtitlePhase {
        self.phase
    }

    /// Entries waiting behind the current one.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == SubtitlePhase::Idle
    }

    fn begin_next(&mut self) {
        let Some(entry) = self.queue.pop_front() else {
            self.phase = SubtitlePhase::Idle;
            return;
        };
        self.text.clear();
        self.ramp = Some(Ramp::new(self.opacity, 1.0, self.settings.fade_duration));
        self.current = Some(entry);
        self.phase = SubtitlePhase::FadingIn;
    }

    /// Returns `true` once the ramp in flight has completed.
    fn advance_ramp(&mut self, dt: Duration) -> bool {
        let Some(ramp) = self.ramp.as_mut() else {
            return true;
        };
        self.opacity = ramp.advance(dt);
        if ramp.is_complete() {
            self.ramp = None;
            true
        } else {
            false
        }
    }
}
