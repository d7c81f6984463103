//! Sample pairs, the validated sample pool and resolved input batches.

use std::fmt;
use std::slice;

use crate::error::{HarnessError, Result};

/// Minimum number of sample pairs: e0..e4.
pub const MIN_SAMPLES: usize = 5;

// ---------------------------------------------------------------------------
// Pair
// ---------------------------------------------------------------------------

/// A key-value pair where either side may be null (`None`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair<K, V> {
    /// The key, `None` for a null key.
    pub key: Option<K>,
    /// The value, `None` for a null value.
    pub value: Option<V>,
}

impl<K, V> Pair<K, V> {
    /// Creates a pair with a non-null key and value.
    #[must_use]
    pub const fn new(key: K, value: V) -> Self {
        Self {
            key: Some(key),
            value: Some(value),
        }
    }

    /// Creates a pair where either side may be null.
    #[must_use]
    pub const fn nullable(key: Option<K>, value: Option<V>) -> Self {
        Self { key, value }
    }

    /// Returns `true` if the key is null.
    #[must_use]
    pub const fn has_null_key(&self) -> bool {
        self.key.is_none()
    }

    /// Returns `true` if the value is null.
    #[must_use]
    pub const fn has_null_value(&self) -> bool {
        self.value.is_none()
    }
}

/// Writes `value` with `Debug`, or `null` when absent.
pub(crate) fn write_nullable<T: fmt::Debug>(
    f: &mut fmt::Formatter<'_>,
    value: Option<&T>,
) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{v:?}"),
        None => f.write_str("null"),
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for Pair<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nullable(f, self.key.as_ref())?;
        f.write_str("=")?;
        write_nullable(f, self.value.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

/// Ordered pool of at least [`MIN_SAMPLES`] pairs with pairwise distinct,
/// non-null keys.
///
/// Fixtures are seeded with a prefix of the pool (see
/// [`CollectionSize::seed_count`](crate::CollectionSize::seed_count)), so e0
/// is present in every non-empty fixture while e3 and e4 never are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Samples<K, V> {
    pairs: Vec<Pair<K, V>>,
}

impl<K: PartialEq, V> Samples<K, V> {
    /// Validates and wraps a sample pool.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::TooFewSamples`] for fewer than
    /// [`MIN_SAMPLES`] pairs and [`HarnessError::DuplicateSampleKey`] when
    /// two pairs share a key.
    pub fn new<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs: Vec<Pair<K, V>> = pairs.into_iter().map(|(k, v)| Pair::new(k, v)).collect();
        if pairs.len() < MIN_SAMPLES {
            return Err(HarnessError::TooFewSamples {
                required: MIN_SAMPLES,
                found: pairs.len(),
            });
        }
        for (second, pair) in pairs.iter().enumerate() {
            if let Some(first) = pairs[..second].iter().position(|p| p.key == pair.key) {
                return Err(HarnessError::DuplicateSampleKey { first, second });
            }
        }
        Ok(Self { pairs })
    }
}

impl<K, V> Samples<K, V> {
    /// Returns every sample pair in pool order.
    #[must_use]
    pub fn pairs(&self) -> &[Pair<K, V>] {
        &self.pairs
    }

    /// Returns sample `e{index}`, or `None` past the end of the pool.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Pair<K, V>> {
        self.pairs.get(index)
    }

    /// Returns the prefix a fixture of class `size` is seeded with.
    #[must_use]
    pub fn seed(&self, size: crate::CollectionSize) -> &[Pair<K, V>] {
        &self.pairs[..size.seed_count()]
    }

    /// Number of pairs in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always `false`: a validated pool holds at least [`MIN_SAMPLES`] pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Clone, V: Clone> Samples<K, V> {
    /// e0: present in every non-empty fixture.
    #[must_use]
    pub fn e0(&self) -> Pair<K, V> {
        self.pairs[0].clone()
    }

    /// e1.
    #[must_use]
    pub fn e1(&self) -> Pair<K, V> {
        self.pairs[1].clone()
    }

    /// e2.
    #[must_use]
    pub fn e2(&self) -> Pair<K, V> {
        self.pairs[2].clone()
    }

    /// e3: never present in a fixture before the operation runs.
    #[must_use]
    pub fn e3(&self) -> Pair<K, V> {
        self.pairs[3].clone()
    }

    /// e4: never present in a fixture before the operation runs.
    #[must_use]
    pub fn e4(&self) -> Pair<K, V> {
        self.pairs[4].clone()
    }
}

/// The conventional string pool: `"one" -> "January"` through
/// `"five" -> "May"`.
#[must_use]
pub fn string_samples() -> Samples<String, String> {
    let pairs = [
        ("one", "January"),
        ("two", "February"),
        ("three", "March"),
        ("four", "April"),
        ("five", "May"),
    ]
    .into_iter()
    .map(|(k, v)| Pair::new(k.to_owned(), v.to_owned()))
    .collect();
    Samples { pairs }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Read-only input of one `put_all` call: an ordered list of pairs with
/// one resolved pair per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<K, V> {
    pairs: Vec<Pair<K, V>>,
}

impl<K, V> Batch<K, V> {
    /// The empty batch.
    #[must_use]
    pub const fn empty() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Number of resolved pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the batch has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over the resolved pairs.
    pub fn iter(&self) -> slice::Iter<'_, Pair<K, V>> {
        self.pairs.iter()
    }

    /// Returns the resolved pairs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Pair<K, V>] {
        &self.pairs
    }
}

impl<K: PartialEq, V> Batch<K, V> {
    /// Resolves `pairs` into a batch.
    ///
    /// A key keeps the position of its first occurrence and the value of
    /// its last one (last-write-wins), like an insertion-ordered map.
    #[must_use]
    pub fn resolve<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = Pair<K, V>>,
    {
        let mut resolved: Vec<Pair<K, V>> = Vec::new();
        for pair in pairs {
            match resolved.iter_mut().find(|p| p.key == pair.key) {
                Some(slot) => slot.value = pair.value,
                None => resolved.push(pair),
            }
        }
        Self { pairs: resolved }
    }
}

impl<K, V> Default for Batch<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: PartialEq, V> FromIterator<Pair<K, V>> for Batch<K, V> {
    fn from_iter<I: IntoIterator<Item = Pair<K, V>>>(iter: I) -> Self {
        Self::resolve(iter)
    }
}

impl<'a, K, V> IntoIterator for &'a Batch<K, V> {
    type Item = &'a Pair<K, V>;
    type IntoIter = slice::Iter<'a, Pair<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// SampleProvider
// ---------------------------------------------------------------------------

/// Source of sample pairs and input batches for the catalog.
///
/// Only [`samples`](Self::samples) is required; the batch builders default
/// to the conventional choices. A [`Suite`](crate::Suite) built from a
/// provider uses its batches for every scenario.
pub trait SampleProvider<K: Clone + PartialEq, V: Clone> {
    /// The sample pool.
    fn samples(&self) -> &Samples<K, V>;

    /// A batch whose keys are absent from every fixture: `{e3, e4}`.
    fn disjoint_batch(&self) -> Batch<K, V> {
        let samples = self.samples();
        Batch::resolve([samples.e3(), samples.e4()])
    }

    /// A batch of the given pairs, resolved last-write-wins.
    fn overlapping_batch(&self, pairs: &[Pair<K, V>]) -> Batch<K, V> {
        Batch::resolve(pairs.iter().cloned())
    }
}

impl<K: Clone + PartialEq, V: Clone> SampleProvider<K, V> for Samples<K, V> {
    fn samples(&self) -> &Self {
        self
    }
}
