//! Errors from instance engine operations

use uuid::Uuid;

use crate::persistence::StoreError;

/// Errors from instance engine operations
///
/// Every variant is an expected, caller-facing outcome. None of them leave
/// an instance partially updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The referenced definition is not in the store
    #[error("workflow definition not found: {0}")]
    DefinitionNotFound(String),

    /// The definition has no enabled initial state
    #[error("workflow definition '{0}' has no enabled initial state")]
    NoValidInitialState(String),

    /// Instance not found
    #[error("workflow instance not found: {0}")]
    InstanceNotFound(Uuid),

    /// The current state is undeclared or final
    #[error("cannot execute actions from state '{state_id}': state is final or invalid")]
    InvalidOrTerminalState { state_id: String },

    /// The action is not declared on the definition
    #[error("action not found: {0}")]
    ActionNotFound(String),

    /// The action is declared but disabled
    #[error("action '{0}' is disabled")]
    ActionDisabled(String),

    /// The action may not be executed from the current state
    #[error("action '{action_id}' is not allowed from current state '{state_id}'")]
    ActionNotAllowedFromState { action_id: String, state_id: String },

    /// The action's target state is undeclared or disabled
    #[error("target state '{0}' is invalid or disabled")]
    InvalidTargetState(String),

    /// The id source kept returning ids that are already registered
    #[error("could not allocate a unique instance id (last attempt: {0})")]
    InstanceIdCollision(Uuid),

    /// Store error
    #[error("store error: {0}")]
    Store(StoreError),
}

impl EngineError {
    /// Stable, machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::DefinitionNotFound(_) => "DEFINITION_NOT_FOUND",
            Self::NoValidInitialState(_) => "NO_VALID_INITIAL_STATE",
            Self::InstanceNotFound(_) => "INSTANCE_NOT_FOUND",
            Self::InvalidOrTerminalState { .. } => "INVALID_OR_TERMINAL_STATE",
            Self::ActionNotFound(_) => "ACTION_NOT_FOUND",
            Self::ActionDisabled(_) => "ACTION_DISABLED",
            Self::ActionNotAllowedFromState { .. } => "ACTION_NOT_ALLOWED_FROM_STATE",
            Self::InvalidTargetState(_) => "INVALID_TARGET_STATE",
            Self::InstanceIdCollision(_) => "INSTANCE_ID_COLLISION",
            Self::Store(e) => e.code(),
        }
    }

    /// Whether this is one of the transition guard failures
    pub fn is_guard_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidOrTerminalState { .. }
                | Self::ActionNotFound(_)
                | Self::ActionDisabled(_)
                | Self::ActionNotAllowedFromState { .. }
                | Self::InvalidTargetState(_)
        )
    }
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DefinitionNotFound(id) => Self::DefinitionNotFound(id),
            other => Self::Store(other),
        }
    }
}
