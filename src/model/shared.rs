//! Reader/writer sharing of one map across threads

use std::sync::Arc;

use parking_lot::RwLock;

use super::map::MindMap;

/// A [`MindMap`] behind a reader/writer lock
///
/// Cloning the handle shares the same map. Any number of readers may run at
/// once; a writer has exclusive access.
#[derive(Debug, Clone, Default)]
pub struct SharedMindMap {
    inner: Arc<RwLock<MindMap>>,
}

impl SharedMindMap {
    pub fn new(map: MindMap) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Run `f` with shared access
    pub fn read<R>(&self, f: impl FnOnce(&MindMap) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access
    pub fn write<R>(&self, f: impl FnOnce(&mut MindMap) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Copy of the current state as a separate document
    ///
    /// Handles from the shared map are foreign to the copy.
    pub fn snapshot(&self) -> MindMap {
        self.inner.read().clone()
    }

    /// Take the map back if this is the last handle
    pub fn try_unwrap(self) -> Result<MindMap, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<MindMap> for SharedMindMap {
    fn from(map: MindMap) -> Self {
        Self::new(map)
    }
}
