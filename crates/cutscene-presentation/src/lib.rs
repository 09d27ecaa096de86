//! Cutscene Presentation — the overlays a cutscene drives.
//!
//! Both overlays are plain state advanced by `tick(elapsed)`. The host reads
//! opacity and text each frame to render them.

pub mod fade;
pub mod ramp;
pub mod subtitles;

pub use fade::{FadeSurface, FadeTarget};
pub use subtitles::{SubtitleEntry, SubtitlePhase, SubtitleQueue, SubtitleSettings};
