//! # Waypoint Engine
//!
//! An in-memory finite state machine engine for named workflows.
//!
//! ## Features
//!
//! - **Immutable definitions**: validated once on submission, then shared read-only
//! - **Guarded transitions**: existence checks before permission checks, all before any write
//! - **Append-only history**: one record per successful transition, in execution order
//! - **Per-instance locking**: concurrent transitions on one instance are serialized,
//!   different instances never wait on each other
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      InstanceEngine                          │
//! │  (instance registry, guard evaluation, transition history)  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ lookup by definition id
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DefinitionStore                          │
//! │  (validated, immutable workflow definitions)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use waypoint_engine::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = InstanceEngine::new(InMemoryDefinitionStore::new());
//!
//! let definition = WorkflowDefinition::new("ticket")
//!     .with_state(State::new("open").initial())
//!     .with_state(State::new("closed").terminal())
//!     .with_action(Action::new("close", ["open"], "closed"));
//! engine.definitions().submit_definition(definition).await?;
//!
//! let instance = engine.start_instance("ticket").await?;
//! let instance = engine.execute_action(instance.id, "close").await?;
//! assert_eq!(instance.current_state_id, "closed");
//! assert_eq!(instance.history.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod persistence;
pub mod providers;
pub mod testing;
pub mod workflow;

/// Prelude for common imports
pub mod prelude {
    pub use crate::config::{EngineConfig, StoreConfig};
    pub use crate::engine::{EngineError, InstanceEngine};
    pub use crate::persistence::{DefinitionStore, InMemoryDefinitionStore, StoreError};
    pub use crate::workflow::{
        Action, State, TransitionRecord, ValidationMode, WorkflowDefinition, WorkflowInstance,
    };
}

// Re-export key types at crate root
pub use config::{EngineConfig, StoreConfig};
pub use engine::{EngineError, InstanceEngine, InstanceEngineBuilder};
pub use persistence::{DefinitionStore, InMemoryDefinitionStore, StoreError};
pub use providers::{Clock, IdGenerator, SystemClock, UuidV7Generator};
pub use workflow::{
    Action, State, TransitionRecord, ValidationError, ValidationMode, WorkflowDefinition,
    WorkflowInstance,
};
