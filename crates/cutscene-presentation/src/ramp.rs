//! Linear opacity ramp.

use std::time::Duration;

/// A timed linear interpolation between two opacities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
}

impl Ramp {
    /// Creates a ramp from `from` to `to` lasting `duration`.
    #[must_use]
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from: from.clamp(0.0, 1.0),
            to: to.clamp(0.0, 1.0),
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Advances the ramp and returns the new value.
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    /// Current interpolated value. Exactly the target once complete.
    #[must_use]
    pub fn value(&self) -> f32 {
        if self.is_complete() {
            return self.to;
        }
        let t = (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    /// The value this ramp ends at.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.to
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}
