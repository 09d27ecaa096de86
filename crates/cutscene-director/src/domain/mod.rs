//! Domain types for timeline orchestration.

pub mod commands;
pub mod events;
pub mod registry;
pub mod state;
