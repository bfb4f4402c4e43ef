//! Enforced-`Arc` wrapper for heap-allocated `Value` payloads.
//!
//! `Heap<T>` has a private constructor (`pub(super)`), so the only way to
//! build one is through a `Value::` factory method. This keeps every heap
//! allocation behind `Arc`, giving `Value::clone()` O(1) cost regardless of
//! payload size.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// An `Arc`-backed heap allocation.
///
/// Construct only via `Heap::new`, which is restricted to this module's
/// parent (`value::mod`) so external code cannot bypass the `Value` factory
/// methods.
pub struct Heap<T>(pub(super) Arc<T>);

impl<T> Heap<T> {
    pub(super) fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Unwrap the inner value if this is the only reference, otherwise
    /// return the `Heap` unchanged.
    pub fn try_into_inner(self) -> Result<T, Self> {
        Arc::try_unwrap(self.0).map_err(Self)
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Clone for Heap<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for Heap<T> {}

impl<T: Hash> Hash for Heap<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

#[cfg(test)]
mod tests;
