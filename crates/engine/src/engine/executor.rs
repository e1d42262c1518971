//! Instance engine
//!
//! The `InstanceEngine` is responsible for:
//! - Starting instances from stored definitions
//! - Executing actions against instances, guard by guard
//! - Serving instance lookups
//!
//! Transitions on one instance are serialized through that instance's lock;
//! transitions on different instances proceed in parallel.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::persistence::DefinitionStore;
use crate::providers::{Clock, IdGenerator, SystemClock, UuidV7Generator};
use crate::workflow::WorkflowInstance;

use super::guard::{available_actions, evaluate_transition};
use super::registry::InstanceRegistry;
use super::EngineError;

/// Workflow instance engine
///
/// # Example
///
/// ```ignore
/// use waypoint_engine::prelude::*;
///
/// let engine = InstanceEngine::new(InMemoryDefinitionStore::new());
/// engine.definitions().submit_definition(definition).await?;
///
/// let instance = engine.start_instance("order").await?;
/// let instance = engine.execute_action(instance.id, "pay").await?;
/// ```
pub struct InstanceEngine<S: DefinitionStore> {
    definitions: Arc<S>,
    instances: InstanceRegistry,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl<S: DefinitionStore> InstanceEngine<S> {
    /// Create a new engine over the given definition store
    pub fn new(definitions: S) -> Self {
        Self::builder(definitions).build()
    }

    /// Start building an engine with custom id/time sources or config
    pub fn builder(definitions: S) -> InstanceEngineBuilder<S> {
        InstanceEngineBuilder::new(Arc::new(definitions))
    }

    /// The definition store this engine reads from
    pub fn definitions(&self) -> &S {
        &self.definitions
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a new instance of a definition
    ///
    /// The instance begins in the definition's enabled initial state with an
    /// empty history.
    #[instrument(skip(self))]
    pub async fn start_instance(
        &self,
        definition_id: &str,
    ) -> Result<WorkflowInstance, EngineError> {
        let definition = self.definitions.get_definition(definition_id).await?;

        let initial = definition.initial_state().ok_or_else(|| {
            warn!("definition has no enabled initial state");
            EngineError::NoValidInitialState(definition_id.to_string())
        })?;

        let mut last_id = None;
        for _ in 0..self.config.max_id_attempts.max(1) {
            let instance_id = self.ids.next_id();
            let instance = WorkflowInstance::new(instance_id, definition_id, initial.id.clone());

            match self.instances.insert(instance.clone()) {
                Ok(()) => {
                    info!(%instance_id, state = %initial.id, "workflow instance started");
                    return Ok(instance);
                }
                Err(_) => {
                    warn!(%instance_id, "generated instance id already registered, retrying");
                    last_id = Some(instance_id);
                }
            }
        }

        Err(EngineError::InstanceIdCollision(
            last_id.unwrap_or_else(Uuid::nil),
        ))
    }

    /// Get a snapshot of an instance
    pub async fn get_instance(&self, instance_id: Uuid) -> Result<WorkflowInstance, EngineError> {
        self.instances
            .get(instance_id)
            .map(|slot| slot.snapshot())
            .ok_or(EngineError::InstanceNotFound(instance_id))
    }

    /// Snapshots of all instances, optionally limited to one definition
    pub async fn list_instances(&self, definition_id: Option<&str>) -> Vec<WorkflowInstance> {
        self.instances.snapshots(definition_id)
    }

    /// Get the number of registered instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Ids of the actions that would currently succeed on an instance
    pub async fn available_actions(&self, instance_id: Uuid) -> Result<Vec<String>, EngineError> {
        let slot = self
            .instances
            .get(instance_id)
            .ok_or(EngineError::InstanceNotFound(instance_id))?;
        let definition = self.definitions.get_definition(slot.definition_id()).await?;

        let instance = slot.lock();
        Ok(available_actions(&definition, &instance.current_state_id)
            .into_iter()
            .map(|a| a.id.clone())
            .collect())
    }

    /// Execute an action against an instance
    ///
    /// Either the instance moves to the action's target state and gains one
    /// history record, or nothing changes and the first failing guard is
    /// reported.
    #[instrument(skip(self))]
    pub async fn execute_action(
        &self,
        instance_id: Uuid,
        action_id: &str,
    ) -> Result<WorkflowInstance, EngineError> {
        let slot = self
            .instances
            .get(instance_id)
            .ok_or(EngineError::InstanceNotFound(instance_id))?;

        // The definition id never changes and definitions are immutable, so
        // the lookup can happen before taking the instance lock.
        let definition = self.definitions.get_definition(slot.definition_id()).await?;

        let mut instance = slot.lock();
        let target = match evaluate_transition(&definition, &instance.current_state_id, action_id) {
            Ok(target) => target,
            Err(e) => {
                warn!(state = %instance.current_state_id, error = %e, "transition rejected");
                return Err(e);
            }
        };

        let from = instance.current_state_id.clone();
        instance.apply_transition(action_id, &target.id, self.clock.now());

        info!(from = %from, to = %target.id, history = instance.history.len(), "transition applied");
        debug!(?instance, "instance after transition");
        Ok(instance.clone())
    }
}

impl<S: DefinitionStore + fmt::Debug> fmt::Debug for InstanceEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceEngine")
            .field("definitions", &self.definitions)
            .field("instances", &self.instances)
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`InstanceEngine`]
pub struct InstanceEngineBuilder<S: DefinitionStore> {
    definitions: Arc<S>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl<S: DefinitionStore> InstanceEngineBuilder<S> {
    fn new(definitions: Arc<S>) -> Self {
        Self {
            definitions,
            ids: Arc::new(UuidV7Generator),
            clock: Arc::new(SystemClock),
            config: EngineConfig::default(),
        }
    }

    /// Use a custom instance id source
    pub fn id_generator(mut self, ids: impl IdGenerator) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Use a custom clock for transition timestamps
    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Use a shared clock handle (e.g. one a test keeps advancing)
    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use custom engine configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> InstanceEngine<S> {
        InstanceEngine {
            definitions: self.definitions,
            instances: InstanceRegistry::new(),
            ids: self.ids,
            clock: self.clock,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{InMemoryDefinitionStore, StoreError};
    use crate::testing::{FixedIdGenerator, ManualClock, SequentialIdGenerator};
    use crate::workflow::{Action, State, TransitionRecord, WorkflowDefinition};
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Store whose definitions can be made to disappear after instances exist
    #[derive(Default)]
    struct VanishingStore {
        inner: InMemoryDefinitionStore,
        vanished: AtomicBool,
    }

    impl VanishingStore {
        fn vanish(&self) {
            self.vanished.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl DefinitionStore for VanishingStore {
        async fn submit_definition(
            &self,
            definition: WorkflowDefinition,
        ) -> Result<Arc<WorkflowDefinition>, StoreError> {
            self.inner.submit_definition(definition).await
        }

        async fn get_definition(&self, id: &str) -> Result<Arc<WorkflowDefinition>, StoreError> {
            if self.vanished.load(Ordering::SeqCst) {
                return Err(StoreError::DefinitionNotFound(id.to_string()));
            }
            self.inner.get_definition(id).await
        }

        async fn list_definitions(&self) -> Result<Vec<Arc<WorkflowDefinition>>, StoreError> {
            self.inner.list_definitions().await
        }
    }

    fn d1() -> WorkflowDefinition {
        WorkflowDefinition::new("D1")
            .with_state(State::new("A").initial())
            .with_state(State::new("B"))
            .with_state(State::new("C").terminal())
            .with_action(Action::new("go", ["A"], "B"))
            .with_action(Action::new("finish", ["B"], "C"))
            .with_action(Action::new("x", ["A"], "Z"))
    }

    async fn engine_with(
        definitions: Vec<WorkflowDefinition>,
    ) -> (InstanceEngine<InMemoryDefinitionStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let engine = InstanceEngine::builder(InMemoryDefinitionStore::new())
            .id_generator(SequentialIdGenerator::new())
            .shared_clock(clock.clone())
            .build();
        for def in definitions {
            engine.definitions().submit_definition(def).await.unwrap();
        }
        (engine, clock)
    }

    #[tokio::test]
    async fn test_start_instance() {
        let (engine, _) = engine_with(vec![d1()]).await;

        let instance = engine.start_instance("D1").await.unwrap();
        assert_eq!(instance.id, Uuid::from_u128(1));
        assert_eq!(instance.definition_id, "D1");
        assert_eq!(instance.current_state_id, "A");
        assert!(instance.history.is_empty());

        assert_eq!(engine.get_instance(instance.id).await.unwrap(), instance);
        assert_eq!(engine.instance_count(), 1);
    }

    #[tokio::test]
    async fn test_start_unknown_definition() {
        let (engine, _) = engine_with(vec![]).await;
        assert_eq!(
            engine.start_instance("nope").await,
            Err(EngineError::DefinitionNotFound("nope".to_string()))
        );
        assert_eq!(engine.instance_count(), 0);
    }

    #[tokio::test]
    async fn test_start_with_disabled_initial_state() {
        let def = WorkflowDefinition::new("off").with_state(State::new("A").initial().disabled());
        let (engine, _) = engine_with(vec![def]).await;

        assert_eq!(
            engine.start_instance("off").await,
            Err(EngineError::NoValidInitialState("off".to_string()))
        );
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let (engine, clock) = engine_with(vec![d1()]).await;
        let t0 = clock.now();
        let id = engine.start_instance("D1").await.unwrap().id;

        let instance = engine.execute_action(id, "go").await.unwrap();
        assert_eq!(instance.current_state_id, "B");
        assert_eq!(
            instance.history,
            vec![TransitionRecord {
                action_id: "go".to_string(),
                timestamp: t0,
            }]
        );

        clock.advance(Duration::minutes(5));
        let instance = engine.execute_action(id, "finish").await.unwrap();
        assert_eq!(instance.current_state_id, "C");
        assert_eq!(instance.history.len(), 2);
        assert_eq!(instance.history[1].action_id, "finish");
        assert_eq!(instance.history[1].timestamp, t0 + Duration::minutes(5));

        assert_eq!(
            engine.execute_action(id, "go").await,
            Err(EngineError::InvalidOrTerminalState {
                state_id: "C".to_string()
            })
        );
        assert_eq!(engine.get_instance(id).await.unwrap(), instance);
    }

    #[tokio::test]
    async fn test_failed_transition_changes_nothing() {
        let (engine, _) = engine_with(vec![d1()]).await;
        let before = engine.start_instance("D1").await.unwrap();

        assert_eq!(
            engine.execute_action(before.id, "x").await,
            Err(EngineError::InvalidTargetState("Z".to_string()))
        );
        assert_eq!(engine.get_instance(before.id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_execute_on_unknown_instance() {
        let (engine, _) = engine_with(vec![d1()]).await;
        let missing = Uuid::from_u128(99);
        assert_eq!(
            engine.execute_action(missing, "go").await,
            Err(EngineError::InstanceNotFound(missing))
        );
        assert_eq!(
            engine.get_instance(missing).await,
            Err(EngineError::InstanceNotFound(missing))
        );
    }

    #[tokio::test]
    async fn test_available_actions() {
        let (engine, _) = engine_with(vec![d1()]).await;
        let id = engine.start_instance("D1").await.unwrap().id;

        assert_eq!(engine.available_actions(id).await.unwrap(), vec!["go"]);
        engine.execute_action(id, "go").await.unwrap();
        assert_eq!(engine.available_actions(id).await.unwrap(), vec!["finish"]);
        engine.execute_action(id, "finish").await.unwrap();
        assert!(engine.available_actions(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_instances_by_definition() {
        let other = WorkflowDefinition::new("D2").with_state(State::new("S").initial());
        let (engine, _) = engine_with(vec![d1(), other]).await;

        engine.start_instance("D1").await.unwrap();
        engine.start_instance("D2").await.unwrap();
        engine.start_instance("D1").await.unwrap();

        assert_eq!(engine.list_instances(None).await.len(), 3);
        let d1_ids: Vec<_> = engine
            .list_instances(Some("D1"))
            .await
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(d1_ids, vec![Uuid::from_u128(1), Uuid::from_u128(3)]);
    }

    #[tokio::test]
    async fn test_id_collision_gives_up() {
        let taken = Uuid::from_u128(5);
        let engine = InstanceEngine::builder(InMemoryDefinitionStore::new())
            .id_generator(FixedIdGenerator(taken))
            .config(EngineConfig::default().with_max_id_attempts(3))
            .build();
        engine.definitions().submit_definition(d1()).await.unwrap();

        assert_eq!(engine.start_instance("D1").await.unwrap().id, taken);
        assert_eq!(
            engine.start_instance("D1").await,
            Err(EngineError::InstanceIdCollision(taken))
        );
        assert_eq!(engine.instance_count(), 1);
    }

    #[tokio::test]
    async fn test_execute_with_missing_definition() {
        let engine = InstanceEngine::new(VanishingStore::default());
        engine.definitions().submit_definition(d1()).await.unwrap();
        let instance = engine.start_instance("D1").await.unwrap();

        engine.definitions().vanish();

        assert_eq!(
            engine.execute_action(instance.id, "go").await,
            Err(EngineError::DefinitionNotFound("D1".to_string()))
        );
        assert_eq!(
            engine.available_actions(instance.id).await,
            Err(EngineError::DefinitionNotFound("D1".to_string()))
        );

        let after = engine.get_instance(instance.id).await.unwrap();
        assert_eq!(after.current_state_id, "A");
        assert!(after.history.is_empty());
    }
}
