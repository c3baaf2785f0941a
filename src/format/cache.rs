//! Compiled format cache
//!
//! Callers that lemmatise many small inputs tend to reuse a handful of
//! formats; compiled trees are kept in an LRU keyed by the format string.

use super::tree::FormatTree;
use crate::error::FormatResult;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Default number of compiled formats kept
pub const DEFAULT_CAPACITY: usize = 64;

pub struct FormatCache {
    inner: Mutex<LruCache<String, Arc<FormatTree>>>,
}

impl Default for FormatCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl FormatCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        FormatCache {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Arc<FormatTree>>> {
        // Entries are immutable; a poisoned map is still consistent
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The compiled tree for `format`, compiling it on a miss. Compile
    /// errors are returned as is and nothing is cached.
    pub fn get_or_compile(&self, format: &str) -> FormatResult<Arc<FormatTree>> {
        if let Some(tree) = self.lock().get(format) {
            return Ok(Arc::clone(tree));
        }
        let tree = Arc::new(FormatTree::compile(format)?);
        tracing::debug!(format, "compiled output format");
        self.lock().put(format.to_string(), Arc::clone(&tree));
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
