//! Sources of instance ids and wall-clock time
//!
//! The engine never calls `Uuid::now_v7()` or `Utc::now()` directly; both
//! come through these traits so they can be swapped out in tests (see
//! [`crate::testing`]).

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of globally unique instance identifiers
pub trait IdGenerator: Send + Sync + 'static {
    /// Produce a fresh identifier
    fn next_id(&self) -> Uuid;
}

/// Source of the current time for transition timestamps
pub trait Clock: Send + Sync + 'static {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Time-ordered UUID v7 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}

/// System wall clock (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
