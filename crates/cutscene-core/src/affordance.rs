//! UI affordances the director toggles during playback.

/// A skip control shown while a sequence is playing.
pub trait SkipAffordance: Send {
    /// Makes the control visible and clickable.
    fn show(&mut self);

    /// Hides the control. Safe to call when already hidden.
    fn hide(&mut self);
}
