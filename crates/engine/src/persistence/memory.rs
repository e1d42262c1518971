//! In-memory implementation of DefinitionStore

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use super::store::*;
use crate::config::StoreConfig;
use crate::workflow::{validate_definition, ValidationMode, WorkflowDefinition};

/// In-memory implementation of DefinitionStore
///
/// Definitions live for as long as the store does. The duplicate check and
/// the insert happen under the same write lock, so two concurrent
/// submissions of one id cannot both succeed.
///
/// # Example
///
/// ```
/// use waypoint_engine::InMemoryDefinitionStore;
///
/// let store = InMemoryDefinitionStore::new();
/// assert_eq!(store.definition_count(), 0);
/// ```
pub struct InMemoryDefinitionStore {
    definitions: RwLock<HashMap<String, Arc<WorkflowDefinition>>>,
    validation: ValidationMode,
}

impl InMemoryDefinitionStore {
    /// Create a new store with lenient validation
    pub fn new() -> Self {
        Self::with_validation(ValidationMode::default())
    }

    /// Create a new store with the given validation mode
    pub fn with_validation(validation: ValidationMode) -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
            validation,
        }
    }

    /// Create a new store from configuration
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_validation(config.validation)
    }

    /// Validation mode applied on submission
    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    /// Get the number of stored definitions
    pub fn definition_count(&self) -> usize {
        self.definitions.read().len()
    }
}

impl Default for InMemoryDefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryDefinitionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDefinitionStore")
            .field("definitions", &self.definition_count())
            .field("validation", &self.validation)
            .finish()
    }
}

#[async_trait]
impl DefinitionStore for InMemoryDefinitionStore {
    #[instrument(skip(self, definition), fields(definition_id = %definition.id))]
    async fn submit_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> Result<Arc<WorkflowDefinition>, StoreError> {
        if let Err(e) = validate_definition(&definition, self.validation) {
            warn!(error = %e, "rejected workflow definition");
            return Err(e.into());
        }

        let mut definitions = self.definitions.write();
        if definitions.contains_key(&definition.id) {
            warn!("workflow definition id already taken");
            return Err(StoreError::DuplicateDefinitionId(definition.id));
        }

        let definition = Arc::new(definition);
        definitions.insert(definition.id.clone(), Arc::clone(&definition));

        info!(
            states = definition.states.len(),
            actions = definition.actions.len(),
            "workflow definition stored"
        );
        Ok(definition)
    }

    async fn get_definition(&self, id: &str) -> Result<Arc<WorkflowDefinition>, StoreError> {
        let definitions = self.definitions.read();
        let definition = definitions.get(id).cloned();
        if definition.is_none() {
            debug!(definition_id = id, "workflow definition not found");
        }
        definition.ok_or_else(|| StoreError::DefinitionNotFound(id.to_string()))
    }

    async fn list_definitions(&self) -> Result<Vec<Arc<WorkflowDefinition>>, StoreError> {
        let mut definitions: Vec<_> = self.definitions.read().values().cloned().collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(definitions)
    }
}
