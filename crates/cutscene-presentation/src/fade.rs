//! Full-screen fade surface.

use std::time::Duration;

use tracing::trace;

use crate::ramp::Ramp;

/// Opacity a fade ends at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeTarget {
    /// Fully covering the screen (opacity 1).
    Opaque,
    /// Fully transparent (opacity 0).
    Clear,
}

impl FadeTarget {
    /// Numeric opacity of this target.
    #[must_use]
    pub fn opacity(self) -> f32 {
        match self {
            Self::Opaque => 1.0,
            Self::Clear => 0.0,
        }
    }
}

/// A single full-screen overlay whose opacity ramps between clear and opaque.
///
/// Only one fade is ever in flight: starting a new one retargets from the
/// opacity reached so far instead of queueing or snapping.
#[derive(Debug, Default)]
pub struct FadeSurface {
    opacity: f32,
    ramp: Option<Ramp>,
}

impl FadeSurface {
    /// Creates a clear, idle surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a linear fade from the current opacity to `target` over
    /// `duration`. A zero duration snaps to the target.
    pub fn fade_to(&mut self, target: FadeTarget, duration: Duration) {
        trace!(from = self.opacity, ?target, ?duration, "fade started");
        let ramp = Ramp::new(self.opacity, target.opacity(), duration);
        if ramp.is_complete() {
            self.opacity = ramp.target();
            self.ramp = None;
        } else {
            self.ramp = Some(ramp);
        }
    }

    /// Advances the fade in flight, if any.
    pub fn tick(&mut self, dt: Duration) {
        let Some(ramp) = self.ramp.as_mut() else {
            return;
        };
        self.opacity = ramp.advance(dt);
        if ramp.is_complete() {
            self.ramp = None;
        }
    }

    /// Forces the surface clear and releases the input block at once.
    pub fn hide_immediately(&mut self) {
        self.ramp = None;
        self.opacity = 0.0;
    }

    /// Current opacity in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Whether a fade is still in flight.
    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.ramp.is_some()
    }

    /// Whether the last fade has completed at `target`.
    #[must_use]
    pub fn is_settled_at(&self, target: FadeTarget) -> bool {
        self.ramp.is_none() && (self.opacity - target.opacity()).abs() < f32::EPSILON
    }

    /// Whether pointer and input events are blocked by the overlay. A fade
    /// heading to opaque blocks from its first frame.
    #[must_use]
    pub fn blocks_input(&self) -> bool {
        self.opacity > 0.0 || self.ramp.is_some_and(|ramp| ramp.target() > 0.0)
    }

    /// Whether the overlay needs drawing at all.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.blocks_input()
    }
}
