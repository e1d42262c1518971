//! Definition validation run before a definition is accepted

use std::collections::HashSet;

use super::WorkflowDefinition;

/// How thoroughly definitions are checked on submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Non-empty id and exactly one initial state. Dangling action
    /// references are accepted and only surface when executed.
    #[default]
    Lenient,

    /// Lenient checks plus unique state/action ids, non-empty `from_states`,
    /// and no action referencing an undeclared state.
    Strict,
}

impl std::fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Reasons a definition is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("workflow definition must have a non-empty id")]
    EmptyId,

    #[error("workflow definition must contain exactly one initial state, found none")]
    NoInitialState,

    #[error("workflow definition must contain exactly one initial state, found {0}")]
    MultipleInitialStates(usize),

    #[error("state '{0}' is declared more than once")]
    DuplicateStateId(String),

    #[error("action '{0}' is declared more than once")]
    DuplicateActionId(String),

    #[error("action '{0}' has no source states")]
    EmptyFromStates(String),

    #[error("action '{action_id}' references unknown source state '{state_id}'")]
    UnknownSourceState { action_id: String, state_id: String },

    #[error("action '{action_id}' references unknown target state '{state_id}'")]
    UnknownTargetState { action_id: String, state_id: String },
}

/// Validate a definition, returning the first problem found
pub fn validate_definition(
    definition: &WorkflowDefinition,
    mode: ValidationMode,
) -> Result<(), ValidationError> {
    if definition.id.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }

    match definition.initial_states().count() {
        1 => {}
        0 => return Err(ValidationError::NoInitialState),
        n => return Err(ValidationError::MultipleInitialStates(n)),
    }

    if mode == ValidationMode::Strict {
        validate_references(definition)?;
    }

    Ok(())
}

fn validate_references(definition: &WorkflowDefinition) -> Result<(), ValidationError> {
    let mut state_ids = HashSet::new();
    for state in &definition.states {
        if !state_ids.insert(state.id.as_str()) {
            return Err(ValidationError::DuplicateStateId(state.id.clone()));
        }
    }

    let mut action_ids = HashSet::new();
    for action in &definition.actions {
        if !action_ids.insert(action.id.as_str()) {
            return Err(ValidationError::DuplicateActionId(action.id.clone()));
        }

        if action.from_states.is_empty() {
            return Err(ValidationError::EmptyFromStates(action.id.clone()));
        }

        if let Some(unknown) = action
            .from_states
            .iter()
            .find(|s| !state_ids.contains(s.as_str()))
        {
            return Err(ValidationError::UnknownSourceState {
                action_id: action.id.clone(),
                state_id: unknown.clone(),
            });
        }

        if !state_ids.contains(action.to_state.as_str()) {
            return Err(ValidationError::UnknownTargetState {
                action_id: action.id.clone(),
                state_id: action.to_state.clone(),
            });
        }
    }

    Ok(())
}
