// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbitrary caller data attached to a path.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A string-keyed bag of values attached to a [`BezPath`](crate::BezPath).
///
/// Cloning is shallow: the clone shares the stored values with the original.
/// Paths derived from another path (clones, trims) get such a clone.
#[derive(Clone, Default)]
pub struct UserInfo {
    values: BTreeMap<String, Arc<dyn Any + Send + Sync>>,
}

impl UserInfo {
    /// Create an empty bag.
    pub fn new() -> Self {
        UserInfo::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    /// Store an already shared value under `key`.
    pub fn insert_shared(&mut self, key: impl Into<String>, value: Arc<dyn Any + Send + Sync>) {
        self.values.insert(key.into(), value);
    }

    /// The value under `key`, if there is one and it has type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref())
    }

    /// The shared value under `key`, whatever its type.
    pub fn get_shared(&self, key: &str) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.values.get(key)
    }

    /// Remove the value under `key`, returning whether there was one.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Iterate over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}
