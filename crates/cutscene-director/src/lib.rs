//! Cutscene Director — timeline orchestration.
//!
//! Responsible for resolving timeline keys, running exactly one timeline at
//! a time through fade-out, settle, playback and teardown, pausing for
//! player input, and remembering which one-shot timelines have completed.

pub mod application;
pub mod domain;
pub mod settings;
