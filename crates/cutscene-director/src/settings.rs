//! Director timing configuration.

use std::time::Duration;

/// Timing knobs for the screen fade around a timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorSettings {
    /// Length of each fade-out and fade-in.
    pub fade_duration: Duration,
    /// Pause with the screen opaque, hiding the engine's scene swap.
    pub settle_delay: Duration,
}

impl Default for DirectorSettings {
    fn default() -> Self {
        Self {
            fade_duration: Duration::from_secs(1),
            settle_delay: Duration::from_millis(200),
        }
    }
}
