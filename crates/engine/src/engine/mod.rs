//! Instance engine
//!
//! The engine module provides the `InstanceEngine`, which creates instances
//! from stored definitions and drives them through guarded transitions.

mod error;
mod executor;
mod guard;
mod registry;

pub use error::EngineError;
pub use executor::{InstanceEngine, InstanceEngineBuilder};
pub use guard::{available_actions, evaluate_transition};
