//! Workflow instance types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A successful transition, appended to an instance's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TransitionRecord {
    /// The action that was executed
    pub action_id: String,

    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

/// A running instance of a workflow definition
///
/// Instances reference their definition by id only. The engine hands out
/// snapshots; the registry copy is only changed by a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct WorkflowInstance {
    /// Engine-generated identifier
    pub id: Uuid,

    /// Identifier of the governing definition
    pub definition_id: String,

    /// The state the instance is currently in
    pub current_state_id: String,

    /// Successful transitions, oldest first
    pub history: Vec<TransitionRecord>,
}

impl WorkflowInstance {
    pub(crate) fn new(
        id: Uuid,
        definition_id: impl Into<String>,
        initial_state_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            definition_id: definition_id.into(),
            current_state_id: initial_state_id.into(),
            history: vec![],
        }
    }

    /// Move to `to_state` and record the action that got us there
    pub(crate) fn apply_transition(
        &mut self,
        action_id: &str,
        to_state: &str,
        timestamp: DateTime<Utc>,
    ) {
        self.current_state_id = to_state.to_string();
        self.history.push(TransitionRecord {
            action_id: action_id.to_string(),
            timestamp,
        });
    }

    /// The most recent transition, if any
    pub fn last_transition(&self) -> Option<&TransitionRecord> {
        self.history.last()
    }
}
