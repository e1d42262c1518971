//! Persistence layer for workflow definitions
//!
//! This module provides:
//! - [`DefinitionStore`] trait for definition storage
//! - [`InMemoryDefinitionStore`], the process-lifetime implementation

mod memory;
mod store;

pub use memory::InMemoryDefinitionStore;
pub use store::{DefinitionStore, StoreError};
