//! Thread-safe wrapper around [`Context`] (spec §8: "thread safety is the
//! caller's responsibility unless this wrapper is used").
//!
//! Mirrors the teacher's `SharedMutableRegistry<T>`: `Arc<RwLock<T>>` rather
//! than a `Mutex`, since most context operations (feature lookups, schema
//! search, node/type queries) only need read access and a `RwLock` lets
//! those run concurrently with each other.

use std::fmt;
use std::sync::Arc;

use yang_ir::ParseBackend;

use crate::context::Context;

/// A [`Context`] shared across threads. Cloning is cheap (an `Arc` bump);
/// every clone sees the same underlying module table.
pub struct SyncContext<PB: ParseBackend>(Arc<parking_lot::RwLock<Context<PB>>>);

impl<PB: ParseBackend> SyncContext<PB> {
    pub fn new(context: Context<PB>) -> Self {
        SyncContext(Arc::new(parking_lot::RwLock::new(context)))
    }

    /// Get read access to the context.
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, Context<PB>> {
        self.0.read()
    }

    /// Get write access to the context.
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, Context<PB>> {
        self.0.write()
    }
}

impl<PB: ParseBackend> Clone for SyncContext<PB> {
    fn clone(&self) -> Self {
        SyncContext(Arc::clone(&self.0))
    }
}

impl<PB: ParseBackend> fmt::Debug for SyncContext<PB> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncContext").finish_non_exhaustive()
    }
}
