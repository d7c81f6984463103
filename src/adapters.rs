//! [`MapUnderTest`] for the standard maps, and a read-only wrapper.
//!
//! `HashMap<Option<K>, Option<V>>` and `BTreeMap<Option<K>, Option<V>>`
//! support bulk insertion with null keys and values. [`Unmodifiable`]
//! rejects every bulk insertion, even one that would change nothing.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::container::{ContainerError, MapUnderTest, Outcome};
use crate::sample::{Batch, Pair};

const NULL_BATCH: ContainerError = ContainerError::NullRejected {
    what: "batch reference",
};

// ---------------------------------------------------------------------------
// HashMap
// ---------------------------------------------------------------------------

impl<K, V, S> MapUnderTest<K, V> for HashMap<Option<K>, Option<V>, S>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
    S: BuildHasher,
{
    fn put_all(&mut self, batch: Option<&Batch<K, V>>) -> Outcome {
        let batch = batch.ok_or(NULL_BATCH)?;
        self.extend(batch.iter().map(|p| (p.key.clone(), p.value.clone())));
        Ok(())
    }

    fn contains_key(&self, key: Option<&K>) -> Result<bool, ContainerError> {
        Ok(Self::contains_key(self, &key.cloned()))
    }

    fn contains_value(&self, value: Option<&V>) -> Result<bool, ContainerError> {
        Ok(self.values().any(|v| v.as_ref() == value))
    }

    fn get(&self, key: Option<&K>) -> Result<Option<Option<V>>, ContainerError> {
        Ok(Self::get(self, &key.cloned()).cloned())
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn entries(&self) -> Vec<Pair<K, V>> {
        self.iter()
            .map(|(k, v)| Pair::nullable(k.clone(), v.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// BTreeMap
// ---------------------------------------------------------------------------

impl<K, V> MapUnderTest<K, V> for BTreeMap<Option<K>, Option<V>>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    fn put_all(&mut self, batch: Option<&Batch<K, V>>) -> Outcome {
        let batch = batch.ok_or(NULL_BATCH)?;
        self.extend(batch.iter().map(|p| (p.key.clone(), p.value.clone())));
        Ok(())
    }

    fn contains_key(&self, key: Option<&K>) -> Result<bool, ContainerError> {
        Ok(Self::contains_key(self, &key.cloned()))
    }

    fn contains_value(&self, value: Option<&V>) -> Result<bool, ContainerError> {
        Ok(self.values().any(|v| v.as_ref() == value))
    }

    fn get(&self, key: Option<&K>) -> Result<Option<Option<V>>, ContainerError> {
        Ok(Self::get(self, &key.cloned()).cloned())
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn entries(&self) -> Vec<Pair<K, V>> {
        self.iter()
            .map(|(k, v)| Pair::nullable(k.clone(), v.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Unmodifiable
// ---------------------------------------------------------------------------

/// Read-only view over another map: queries delegate, `put_all` always
/// fails with [`ContainerError::Unsupported`].
#[derive(Debug, Clone, Default)]
pub struct Unmodifiable<M> {
    inner: M,
}

impl<M> Unmodifiable<M> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: M) -> Self {
        Self { inner }
    }

    /// Returns the wrapped map.
    #[must_use]
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<K, V, M: MapUnderTest<K, V>> MapUnderTest<K, V> for Unmodifiable<M> {
    fn put_all(&mut self, _batch: Option<&Batch<K, V>>) -> Outcome {
        Err(ContainerError::Unsupported {
            operation: "put_all",
        })
    }

    fn contains_key(&self, key: Option<&K>) -> Result<bool, ContainerError> {
        self.inner.contains_key(key)
    }

    fn contains_value(&self, value: Option<&V>) -> Result<bool, ContainerError> {
        self.inner.contains_value(value)
    }

    fn get(&self, key: Option<&K>) -> Result<Option<Option<V>>, ContainerError> {
        self.inner.get(key)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn entries(&self) -> Vec<Pair<K, V>> {
        self.inner.entries()
    }
}
