//! Lock and map backends selected by cargo features.

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{RwLockReadGuard, RwLockWriteGuard};
#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::{RwLockReadGuard, RwLockWriteGuard};

/// Reader-writer lock with a non-poisoning interface.
///
/// With the std backend a poisoned lock is recovered by taking the inner
/// guard: every container mutation is a single map operation, so a panic
/// in another thread cannot leave the tables half-updated.
#[derive(Default)]
pub(crate) struct RwLock<T> {
    #[cfg(feature = "parking-lot")]
    inner: parking_lot::RwLock<T>,
    #[cfg(not(feature = "parking-lot"))]
    inner: std::sync::RwLock<T>,
}

impl<T> RwLock<T> {
    #[inline]
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
        #[cfg(feature = "parking-lot")]
        {
            self.inner.read()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    #[inline]
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
        #[cfg(feature = "parking-lot")]
        {
            self.inner.write()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }
}
