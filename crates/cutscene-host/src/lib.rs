//! Cutscene Host — runs the director against a simulated engine, reading
//! commands from a line-based console.

pub mod command;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod runtime;
