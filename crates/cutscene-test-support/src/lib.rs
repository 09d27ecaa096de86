//! Shared test doubles for the cutscene workspace.

mod affordance;
mod clock;
mod engine;
mod store;

pub use affordance::RecordingSkipButton;
pub use clock::FixedClock;
pub use engine::{EngineCall, RecordingPlaybackEngine};
pub use store::{FailingStore, MemoryStore};
