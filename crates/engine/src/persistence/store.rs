//! DefinitionStore trait definition

use std::sync::Arc;

use async_trait::async_trait;

use crate::workflow::{ValidationError, WorkflowDefinition};

/// Error type for definition store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A definition with this id already exists
    #[error("workflow definition already exists: {0}")]
    DuplicateDefinitionId(String),

    /// The submitted definition failed validation
    #[error("invalid workflow definition: {0}")]
    InvalidDefinition(#[from] ValidationError),

    /// No definition with this id
    #[error("workflow definition not found: {0}")]
    DefinitionNotFound(String),
}

impl StoreError {
    /// Stable, machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateDefinitionId(_) => "DUPLICATE_DEFINITION_ID",
            Self::InvalidDefinition(_) => "INVALID_DEFINITION",
            Self::DefinitionNotFound(_) => "DEFINITION_NOT_FOUND",
        }
    }
}

/// Store for immutable workflow definitions
///
/// Implementations must be thread-safe. Accepted definitions are never
/// mutated or removed; readers receive shared handles to the stored value.
#[async_trait]
pub trait DefinitionStore: Send + Sync + 'static {
    /// Validate and store a definition
    ///
    /// The store takes ownership of `definition`; a rejected submission
    /// leaves the store unchanged.
    async fn submit_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> Result<Arc<WorkflowDefinition>, StoreError>;

    /// Look up a definition by id
    async fn get_definition(&self, id: &str) -> Result<Arc<WorkflowDefinition>, StoreError>;

    /// All stored definitions, ordered by id
    async fn list_definitions(&self) -> Result<Vec<Arc<WorkflowDefinition>>, StoreError>;
}
