use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of identifiers for records stored without one.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs, the default for real storage areas.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-N` identifiers, counting from 1.
#[derive(Debug)]
pub struct SequenceIds {
    prefix: String,
    next: AtomicU64,
}

impl SequenceIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: AtomicU64::new(1) }
    }
}

impl Default for SequenceIds {
    fn default() -> Self { Self::new("p") }
}

impl IdSource for SequenceIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}
