//! Policy-driven in-memory map that honours every capability combination.
//!
//! [`ReferenceMap`] keeps entries in insertion order and validates the whole
//! batch before writing anything, so a rejected `put_all` never leaves a
//! partial write behind.

use tracing::trace;

use crate::capability::Capability;
use crate::container::{ContainerError, MapUnderTest, Outcome};
use crate::sample::{Batch, Pair};

/// How a map without bulk-insert support answers a batch that would not
/// change its contents (an empty batch, or one whose pairs are all present
/// with the same values). Both answers satisfy the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoOpPolicy {
    /// Fail with `UnsupportedOperation` anyway.
    Reject,
    /// Succeed without doing anything.
    Allow,
}

/// Behavior of a [`ReferenceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Policy {
    /// `put_all` is supported.
    pub bulk_insert: bool,
    /// Null keys may be stored.
    pub null_keys: bool,
    /// Null values may be stored.
    pub null_values: bool,
    /// Answer to an unsupported `put_all` with no net effect.
    pub no_op: NoOpPolicy,
    /// Null lookups of a kind the map cannot store fail with
    /// `NullRejected` instead of answering `false`.
    pub null_hostile_queries: bool,
}

impl Policy {
    /// Supports bulk insertion, null keys and null values.
    pub const PERMISSIVE: Self = Self {
        bulk_insert: true,
        null_keys: true,
        null_values: true,
        no_op: NoOpPolicy::Allow,
        null_hostile_queries: false,
    };

    /// Supports bulk insertion but rejects nulls, including null lookups.
    pub const NULL_HOSTILE: Self = Self {
        bulk_insert: true,
        null_keys: false,
        null_values: false,
        no_op: NoOpPolicy::Allow,
        null_hostile_queries: true,
    };

    /// No bulk insertion; rejects even batches with no net effect.
    pub const READ_ONLY: Self = Self {
        bulk_insert: false,
        null_keys: false,
        null_values: false,
        no_op: NoOpPolicy::Reject,
        null_hostile_queries: false,
    };

    /// The capabilities a map with this policy declares.
    #[must_use]
    pub fn capabilities(self) -> Vec<Capability> {
        [
            (self.bulk_insert, Capability::SupportsBulkInsert),
            (self.null_keys, Capability::AllowsNullKeys),
            (self.null_values, Capability::AllowsNullValues),
        ]
        .into_iter()
        .filter_map(|(declared, cap)| declared.then_some(cap))
        .collect()
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::PERMISSIVE
    }
}

/// Insertion-ordered map whose bulk-insert behavior follows a [`Policy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMap<K, V> {
    entries: Vec<Pair<K, V>>,
    policy: Policy,
}

impl<K, V> ReferenceMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new(policy: Policy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    /// Returns the map's policy.
    #[must_use]
    pub const fn policy(&self) -> Policy {
        self.policy
    }
}

impl<K: PartialEq + Clone, V: PartialEq + Clone> ReferenceMap<K, V> {
    /// Creates a map holding `seed`, bypassing the policy.
    #[must_use]
    pub fn seeded(policy: Policy, seed: &[Pair<K, V>]) -> Self {
        let mut map = Self::new(policy);
        for pair in seed {
            map.put(pair.clone());
        }
        map
    }

    fn position(&self, key: Option<&K>) -> Option<usize> {
        self.entries.iter().position(|p| p.key.as_ref() == key)
    }

    fn put(&mut self, pair: Pair<K, V>) {
        match self.position(pair.key.as_ref()) {
            Some(i) => self.entries[i].value = pair.value,
            None => self.entries.push(pair),
        }
    }

    /// Returns `true` if applying `batch` would change the contents.
    fn would_change(&self, batch: &Batch<K, V>) -> bool {
        batch.iter().any(|pair| {
            self.position(pair.key.as_ref())
                .is_none_or(|i| self.entries[i].value != pair.value)
        })
    }

    fn reject_unsupported(&self, batch: Option<&Batch<K, V>>) -> Outcome {
        let effective = batch.is_none_or(|b| self.would_change(b));
        if effective || self.policy.no_op == NoOpPolicy::Reject {
            trace!(effective, "put_all rejected: bulk insertion unsupported");
            return Err(ContainerError::Unsupported {
                operation: "put_all",
            });
        }
        Ok(())
    }

    fn check_nulls(&self, batch: &Batch<K, V>) -> Outcome {
        for pair in batch {
            if pair.has_null_key() && !self.policy.null_keys {
                trace!("put_all rejected: null key");
                return Err(ContainerError::NullRejected { what: "key" });
            }
            if pair.has_null_value() && !self.policy.null_values {
                trace!("put_all rejected: null value");
                return Err(ContainerError::NullRejected { what: "value" });
            }
        }
        Ok(())
    }
}

impl<K: PartialEq + Clone, V: PartialEq + Clone> MapUnderTest<K, V> for ReferenceMap<K, V> {
    fn put_all(&mut self, batch: Option<&Batch<K, V>>) -> Outcome {
        if !self.policy.bulk_insert {
            return self.reject_unsupported(batch);
        }
        let batch = batch.ok_or(ContainerError::NullRejected {
            what: "batch reference",
        })?;
        self.check_nulls(batch)?;
        for pair in batch {
            self.put(pair.clone());
        }
        Ok(())
    }

    fn contains_key(&self, key: Option<&K>) -> Result<bool, ContainerError> {
        if key.is_none() && self.policy.null_hostile_queries && !self.policy.null_keys {
            return Err(ContainerError::NullRejected { what: "key query" });
        }
        Ok(self.position(key).is_some())
    }

    fn contains_value(&self, value: Option<&V>) -> Result<bool, ContainerError> {
        if value.is_none() && self.policy.null_hostile_queries && !self.policy.null_values {
            return Err(ContainerError::NullRejected {
                what: "value query",
            });
        }
        Ok(self.entries.iter().any(|p| p.value.as_ref() == value))
    }

    fn get(&self, key: Option<&K>) -> Result<Option<Option<V>>, ContainerError> {
        if key.is_none() && self.policy.null_hostile_queries && !self.policy.null_keys {
            return Err(ContainerError::NullRejected { what: "key query" });
        }
        Ok(self.position(key).map(|i| self.entries[i].value.clone()))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries(&self) -> Vec<Pair<K, V>> {
        self.entries.clone()
    }
}
