//! Core types, collaborator traits, errors, configuration, events and tracing
//! shared by every verity crate.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;
