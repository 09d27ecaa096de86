//! Cutscene Core — shared abstractions for timed presentation playback.
//!
//! This crate defines the error type, event metadata, sequence handles and
//! the collaborator traits (playback engine, input source, key-value store,
//! skip affordance) that the director composes. It contains no scheduling
//! logic and no infrastructure code.

pub mod affordance;
pub mod clock;
pub mod engine;
pub mod error;
pub mod event;
pub mod input;
pub mod sequence;
pub mod signal;
pub mod store;
