//! Workflow definition types
//!
//! A definition is the blueprint of a state machine: a set of states and the
//! actions (edges) that move an instance between them. Definitions are
//! immutable once accepted by a [`DefinitionStore`](crate::DefinitionStore).

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

fn enabled_by_default() -> bool {
    true
}

/// A single state of a workflow definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct State {
    /// State identifier, unique within its definition
    pub id: String,

    /// Whether instances start in this state
    #[serde(default)]
    pub is_initial: bool,

    /// Whether this state is terminal (admits no outgoing actions)
    #[serde(default)]
    pub is_final: bool,

    /// Disabled states cannot be entered
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl State {
    /// Create an enabled, non-initial, non-final state
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_initial: false,
            is_final: false,
            enabled: true,
        }
    }

    /// Mark this state as the initial state
    pub fn initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    /// Mark this state as terminal
    pub fn terminal(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Disable this state
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// An action moves an instance from any of `from_states` to `to_state`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Action {
    /// Action identifier, unique within its definition
    pub id: String,

    /// States this action may be executed from
    pub from_states: Vec<String>,

    /// State the instance lands on
    pub to_state: String,

    /// Disabled actions are rejected before any state check
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl Action {
    /// Create an enabled action
    pub fn new<I, S>(id: impl Into<String>, from_states: I, to_state: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            from_states: from_states.into_iter().map(Into::into).collect(),
            to_state: to_state.into(),
            enabled: true,
        }
    }

    /// Disable this action
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Check if the action may be executed from `state_id`
    pub fn allows_from(&self, state_id: &str) -> bool {
        self.from_states.iter().any(|s| s == state_id)
    }
}

/// A named workflow: states plus the actions between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct WorkflowDefinition {
    /// Caller-assigned, globally unique identifier
    pub id: String,

    /// Declared states, in declaration order
    #[serde(default)]
    pub states: Vec<State>,

    /// Declared actions, in declaration order
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl WorkflowDefinition {
    /// Create an empty definition
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            states: vec![],
            actions: vec![],
        }
    }

    /// Add a state
    pub fn with_state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Add an action
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Look up a state by id
    pub fn state(&self, state_id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == state_id)
    }

    /// Look up an action by id
    pub fn action(&self, action_id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == action_id)
    }

    /// All states flagged initial
    pub fn initial_states(&self) -> impl Iterator<Item = &State> {
        self.states.iter().filter(|s| s.is_initial)
    }

    /// The state an instance starts in: flagged initial and enabled
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial && s.enabled)
    }
}
