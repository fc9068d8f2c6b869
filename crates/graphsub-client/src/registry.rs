use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use graphsub_frame::Message;

/// Callback invoked once per inbound message addressed to an operation.
pub type Handler = Arc<dyn Fn(Message) + Send + Sync>;

/// Concurrent id → handler mapping for one connection — the unit of
/// multiplexing.
///
/// Lookups (the reader loop) run concurrently; mutations (start, stop,
/// terminal cleanup) are exclusive. The lock is never held across an await
/// point.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<HashMap<String, Handler>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a handler for `id`. An existing entry is overwritten; callers
    /// guarantee uniqueness through id generation.
    pub fn register(&self, id: impl Into<String>, handler: Handler) {
        self.write().insert(id.into(), handler);
    }

    /// Remove the handler for `id`. Removing an absent id is a no-op: the
    /// remote terminal frame and a local stop may both attempt cleanup.
    pub fn unregister(&self, id: &str) {
        self.write().remove(id);
    }

    /// Fetch the handler for `id`, if one is registered.
    pub fn lookup(&self, id: &str) -> Option<Handler> {
        self.read().get(id).cloned()
    }

    /// Remove every handler. Dropping the handlers closes any channels they
    /// hold, which is how pending requests observe connection death.
    pub fn drain(&self) {
        self.write().clear();
    }

    /// Number of live operations.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Handler>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Handler>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
