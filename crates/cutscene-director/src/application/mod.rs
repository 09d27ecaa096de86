//! Application services that drive the domain.

pub mod one_shot;
pub mod orchestrator;
pub mod triggers;
