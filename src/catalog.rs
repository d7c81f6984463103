//! Test Case Catalog: every distinguishable `put_all` scenario, the
//! capability precondition it runs under, and the outcome it demands.
//!
//! The catalog is a table, not a hierarchy. Each [`CatalogEntry`] pairs a
//! [`Require`] predicate with an input, an [`ErrorRule`] and the post-state
//! [`Check`]s. A scenario whose input would have no net effect tolerates an
//! `UnsupportedOperation` error when bulk insertion is absent; one whose
//! input would change the fixture requires it.

use std::fmt;

use tracing::debug;

use crate::capability::{Capability, CapabilitySet, CollectionSize, Require};
use crate::container::{ErrorKind, MapUnderTest};
use crate::expect::{ErrorRule, Expectation, Snapshot, Violation};
use crate::sample::{Batch, Pair, SampleProvider, Samples};

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// Identifier of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scenario {
    /// Empty batch, bulk insertion supported.
    SupportedNothing,
    /// Empty batch, bulk insertion absent.
    UnsupportedNothing,
    /// `{e3, e4}`, bulk insertion supported.
    SupportedNonePresent,
    /// `{e3, e4}`, bulk insertion absent.
    UnsupportedNonePresent,
    /// `{e3, e0}` against a non-empty fixture, bulk insertion supported.
    SupportedSomePresent,
    /// `{e3, e0}` against a non-empty fixture, bulk insertion absent.
    UnsupportedSomePresent,
    /// `{e0}` against a non-empty fixture, bulk insertion absent.
    UnsupportedAllPresent,
    /// `{(null, v3)}`, null keys allowed.
    NullKeySupported,
    /// `{(null, v3)}`, null keys not allowed.
    NullKeyUnsupported,
    /// `{(k3, null)}`, null values allowed.
    NullValueSupported,
    /// `{(k3, null)}`, null values not allowed.
    NullValueUnsupported,
    /// `put_all(None)`.
    NullBatchReference,
}

impl Scenario {
    /// Every scenario, in catalog order.
    pub const ALL: [Self; 12] = [
        Self::SupportedNothing,
        Self::UnsupportedNothing,
        Self::SupportedNonePresent,
        Self::UnsupportedNonePresent,
        Self::SupportedSomePresent,
        Self::UnsupportedSomePresent,
        Self::UnsupportedAllPresent,
        Self::NullKeySupported,
        Self::NullKeyUnsupported,
        Self::NullValueSupported,
        Self::NullValueUnsupported,
        Self::NullBatchReference,
    ];

    /// Stable name used in reports, configuration and generated tests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SupportedNothing => "put_all_supported_nothing",
            Self::UnsupportedNothing => "put_all_unsupported_nothing",
            Self::SupportedNonePresent => "put_all_supported_none_present",
            Self::UnsupportedNonePresent => "put_all_unsupported_none_present",
            Self::SupportedSomePresent => "put_all_supported_some_present",
            Self::UnsupportedSomePresent => "put_all_unsupported_some_present",
            Self::UnsupportedAllPresent => "put_all_unsupported_all_present",
            Self::NullKeySupported => "put_all_null_key_supported",
            Self::NullKeyUnsupported => "put_all_null_key_unsupported",
            Self::NullValueSupported => "put_all_null_value_supported",
            Self::NullValueUnsupported => "put_all_null_value_unsupported",
            Self::NullBatchReference => "put_all_null_batch_reference",
        }
    }

    /// Looks a scenario up by [`name`](Self::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// The catalog entry for this scenario.
    #[must_use]
    pub fn entry(self) -> &'static CatalogEntry {
        &CATALOG[self as usize]
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Inputs and checks
// ---------------------------------------------------------------------------

/// How a scenario builds its `put_all` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// The empty batch.
    Nothing,
    /// The provider's disjoint batch.
    Disjoint,
    /// The listed samples, by index, resolved last-write-wins.
    Samples(&'static [usize]),
    /// A single pair with a null key and e3's value.
    NullKey,
    /// A single pair with e3's key and a null value.
    NullValue,
    /// No batch at all.
    NullReference,
}

impl Input {
    /// Builds the argument; `None` is the null batch reference.
    pub fn batch<K, V, P>(self, provider: &P) -> Option<Batch<K, V>>
    where
        K: Clone + PartialEq,
        V: Clone,
        P: SampleProvider<K, V>,
    {
        let samples = provider.samples();
        match self {
            Self::Nothing => Some(Batch::empty()),
            Self::Disjoint => Some(provider.disjoint_batch()),
            Self::Samples(indices) => {
                Some(provider.overlapping_batch(&sample_pairs(samples, indices)))
            }
            Self::NullKey => Some(Batch::resolve([Pair::nullable(None, samples.e3().value)])),
            Self::NullValue => Some(Batch::resolve([Pair::nullable(samples.e3().key, None)])),
            Self::NullReference => None,
        }
    }
}

/// Post-state check applied after the outcome was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Contents equal the pre-state.
    Unchanged,
    /// Contents equal the pre-state merged with the batch.
    AddsBatch,
    /// The listed samples' keys are absent.
    MissingSamples(&'static [usize]),
    /// No null key is reachable.
    NullKeyMissing,
    /// No null value is reachable.
    NullValueMissing,
}

fn sample_pairs<K: Clone, V: Clone>(samples: &Samples<K, V>, indices: &[usize]) -> Vec<Pair<K, V>> {
    indices
        .iter()
        .filter_map(|&i| samples.get(i).cloned())
        .collect()
}

// ---------------------------------------------------------------------------
// CatalogEntry
// ---------------------------------------------------------------------------

/// One runnable scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Identifier.
    pub scenario: Scenario,
    /// Capability precondition.
    pub require: Require,
    /// The `put_all` argument.
    pub input: Input,
    /// Acceptable outcomes.
    pub rule: ErrorRule,
    /// Post-state checks, in order.
    pub checks: &'static [Check],
}

impl CatalogEntry {
    /// Returns `true` if this entry may run against `set`.
    #[must_use]
    pub const fn is_eligible(&self, set: CapabilitySet) -> bool {
        self.require.is_satisfied_by(set)
    }

    /// Runs the scenario against `fixture`: captures the pre-state, invokes
    /// `put_all` once, then verifies the outcome and every check.
    ///
    /// # Errors
    ///
    /// The first [`Violation`] found.
    pub fn run<K, V, M, P>(&self, fixture: &mut M, provider: &P) -> Result<(), Violation>
    where
        K: Clone + PartialEq + fmt::Debug,
        V: Clone + PartialEq + fmt::Debug,
        M: MapUnderTest<K, V>,
        P: SampleProvider<K, V>,
    {
        let name = self.scenario.name();
        let before = Snapshot::capture(fixture);
        let batch = self.input.batch(provider);
        let outcome = fixture.put_all(batch.as_ref());
        debug!(scenario = name, ?outcome, "put_all returned");

        let fixture: &M = fixture;
        let expect = Expectation::new(name, &before);
        expect.verify_threw(&outcome, self.rule)?;

        let added = batch.as_ref().map_or(&[][..], Batch::as_slice);
        for check in self.checks {
            match *check {
                Check::Unchanged => expect.verify_unchanged(fixture)?,
                Check::AddsBatch => expect.verify_added(fixture, added)?,
                Check::MissingSamples(indices) => {
                    expect.verify_missing(fixture, &sample_pairs(provider.samples(), indices))?;
                }
                Check::NullKeyMissing => expect.verify_null_key_missing(fixture)?,
                Check::NullValueMissing => expect.verify_null_value_missing(fixture)?,
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// The table
// ---------------------------------------------------------------------------

const BULK: Capability = Capability::SupportsBulkInsert;
const SUPPORTED: Require = Require::ANY.present(BULK);
const UNSUPPORTED: Require = Require::ANY.absent(BULK);
const UNSUPPORTED_OP: ErrorKind = ErrorKind::UnsupportedOperation;
const NULL: ErrorKind = ErrorKind::NullRejected;

/// Every scenario, indexed by `Scenario as usize`.
pub static CATALOG: [CatalogEntry; 12] = [
    CatalogEntry {
        scenario: Scenario::SupportedNothing,
        require: SUPPORTED,
        input: Input::Nothing,
        rule: ErrorRule::Succeed,
        checks: &[Check::Unchanged],
    },
    CatalogEntry {
        scenario: Scenario::UnsupportedNothing,
        require: UNSUPPORTED,
        input: Input::Nothing,
        rule: ErrorRule::Tolerate(UNSUPPORTED_OP),
        checks: &[Check::Unchanged],
    },
    CatalogEntry {
        scenario: Scenario::SupportedNonePresent,
        require: SUPPORTED,
        input: Input::Disjoint,
        rule: ErrorRule::Succeed,
        checks: &[Check::AddsBatch],
    },
    CatalogEntry {
        scenario: Scenario::UnsupportedNonePresent,
        require: UNSUPPORTED,
        input: Input::Disjoint,
        rule: ErrorRule::Require(UNSUPPORTED_OP),
        checks: &[Check::Unchanged, Check::MissingSamples(&[3, 4])],
    },
    CatalogEntry {
        scenario: Scenario::SupportedSomePresent,
        require: SUPPORTED.absent_size(CollectionSize::Empty),
        input: Input::Samples(&[3, 0]),
        rule: ErrorRule::Succeed,
        checks: &[Check::AddsBatch],
    },
    CatalogEntry {
        scenario: Scenario::UnsupportedSomePresent,
        require: UNSUPPORTED.absent_size(CollectionSize::Empty),
        input: Input::Samples(&[3, 0]),
        rule: ErrorRule::Require(UNSUPPORTED_OP),
        checks: &[Check::Unchanged],
    },
    CatalogEntry {
        scenario: Scenario::UnsupportedAllPresent,
        require: UNSUPPORTED.absent_size(CollectionSize::Empty),
        input: Input::Samples(&[0]),
        rule: ErrorRule::Tolerate(UNSUPPORTED_OP),
        checks: &[Check::Unchanged],
    },
    CatalogEntry {
        scenario: Scenario::NullKeySupported,
        require: SUPPORTED.present(Capability::AllowsNullKeys),
        input: Input::NullKey,
        rule: ErrorRule::Succeed,
        checks: &[Check::AddsBatch],
    },
    CatalogEntry {
        scenario: Scenario::NullKeyUnsupported,
        require: SUPPORTED.absent(Capability::AllowsNullKeys),
        input: Input::NullKey,
        rule: ErrorRule::Require(NULL),
        checks: &[Check::Unchanged, Check::NullKeyMissing],
    },
    CatalogEntry {
        scenario: Scenario::NullValueSupported,
        require: SUPPORTED.present(Capability::AllowsNullValues),
        input: Input::NullValue,
        rule: ErrorRule::Succeed,
        checks: &[Check::AddsBatch],
    },
    CatalogEntry {
        scenario: Scenario::NullValueUnsupported,
        require: SUPPORTED.absent(Capability::AllowsNullValues),
        input: Input::NullValue,
        rule: ErrorRule::Require(NULL),
        checks: &[Check::Unchanged, Check::NullValueMissing],
    },
    CatalogEntry {
        scenario: Scenario::NullBatchReference,
        require: SUPPORTED,
        input: Input::NullReference,
        rule: ErrorRule::Require(NULL),
        checks: &[],
    },
];

/// Entries whose precondition `set` satisfies, in catalog order.
pub fn eligible(set: CapabilitySet) -> impl Iterator<Item = &'static CatalogEntry> {
    CATALOG.iter().filter(move |e| e.is_eligible(set))
}
