use std::{collections::HashMap, sync::Arc};

use magnitude::Magnitude;
use parking_lot::RwLock;
use rep::RepKind;
use tracing::trace;

use crate::{synthesize, ConversionError, Operation};

type Key = (RepKind, RepKind, Magnitude);

/// Memoizes [`synthesize`] so each conversion is only worked out once.
/// Shared freely between threads.
#[derive(Default)]
pub struct ConversionCache {
    ops: RwLock<HashMap<Key, Arc<Operation>>>,
}

impl ConversionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The operation converting `old` into `new` by `m`. Failed requests are
    /// not cached.
    pub fn get(
        &self,
        old: RepKind,
        new: RepKind,
        m: &Magnitude,
    ) -> Result<Arc<Operation>, ConversionError> {
        let key = (old, new, m.clone());
        if let Some(op) = self.ops.read().get(&key) {
            return Ok(op.clone());
        }

        let op = Arc::new(synthesize(old, new, m)?);
        trace!("Caching {old} -> {new} by {m}");

        // Another thread may have raced us here; keep whichever landed first.
        let mut ops = self.ops.write();
        Ok(ops.entry(key).or_insert(op).clone())
    }

    pub fn len(&self) -> usize {
        self.ops.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.read().is_empty()
    }

    pub fn clear(&self) {
        self.ops.write().clear();
    }
}
