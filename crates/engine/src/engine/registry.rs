//! Instance registry with per-instance locking
//!
//! The registry map is only locked long enough to insert a slot or clone a
//! handle to one. All reads and writes of an instance go through that
//! slot's own mutex, so work on one instance never waits on another.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::workflow::WorkflowInstance;

/// One registered instance
pub(crate) struct InstanceSlot {
    definition_id: String,
    instance: Mutex<WorkflowInstance>,
}

impl InstanceSlot {
    /// Definition id, fixed for the life of the instance
    pub(crate) fn definition_id(&self) -> &str {
        &self.definition_id
    }

    /// Exclusive access to the instance
    pub(crate) fn lock(&self) -> parking_lot::MutexGuard<'_, WorkflowInstance> {
        self.instance.lock()
    }

    pub(crate) fn snapshot(&self) -> WorkflowInstance {
        self.instance.lock().clone()
    }
}

/// Map of instance id to instance slot
#[derive(Default)]
pub(crate) struct InstanceRegistry {
    slots: RwLock<HashMap<Uuid, Arc<InstanceSlot>>>,
}

impl InstanceRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a new instance
    ///
    /// Returns the instance back if its id is already taken.
    pub(crate) fn insert(&self, instance: WorkflowInstance) -> Result<(), WorkflowInstance> {
        let mut slots = self.slots.write();
        match slots.entry(instance.id) {
            Entry::Occupied(_) => Err(instance),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(InstanceSlot {
                    definition_id: instance.definition_id.clone(),
                    instance: Mutex::new(instance),
                }));
                Ok(())
            }
        }
    }

    pub(crate) fn get(&self, id: Uuid) -> Option<Arc<InstanceSlot>> {
        self.slots.read().get(&id).cloned()
    }

    /// Snapshots of all instances, optionally limited to one definition,
    /// ordered by id
    pub(crate) fn snapshots(&self, definition_id: Option<&str>) -> Vec<WorkflowInstance> {
        let slots: Vec<_> = self
            .slots
            .read()
            .values()
            .filter(|slot| definition_id.map_or(true, |id| slot.definition_id == id))
            .cloned()
            .collect();

        let mut instances: Vec<_> = slots.iter().map(|slot| slot.snapshot()).collect();
        instances.sort_by_key(|i| i.id);
        instances
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.read().len()
    }
}

impl fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field("instances", &self.len())
            .finish()
    }
}
