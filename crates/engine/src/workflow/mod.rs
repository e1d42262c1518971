//! Workflow data model
//!
//! - [`WorkflowDefinition`], [`State`] and [`Action`] describe a state machine
//! - [`WorkflowInstance`] and [`TransitionRecord`] track one run through it
//! - [`validate_definition`] guards what the store accepts

mod definition;
mod instance;
mod validation;

pub use definition::{Action, State, WorkflowDefinition};
pub use instance::{TransitionRecord, WorkflowInstance};
pub use validation::{validate_definition, ValidationError, ValidationMode};
