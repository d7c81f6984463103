//! Expectation Engine: verifies an operation's outcome and the fixture's
//! post-state against its pre-state.
//!
//! The engine never mutates the fixture. Every check returns
//! `Result<(), Violation>`; the first mismatch ends the scenario.

use std::fmt;

use thiserror::Error;

use crate::container::{ContainerError, ErrorKind, MapUnderTest, Outcome};
use crate::sample::Pair;

// ---------------------------------------------------------------------------
// Violation
// ---------------------------------------------------------------------------

/// A failed expectation: which scenario, what was expected, what was seen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{scenario}: expected {expected}; observed {observed}")]
pub struct Violation {
    /// Name of the scenario that failed.
    pub scenario: &'static str,
    /// The condition that did not hold.
    pub expected: String,
    /// The fixture state or error actually observed.
    pub observed: String,
}

// ---------------------------------------------------------------------------
// ErrorRule
// ---------------------------------------------------------------------------

/// Which outcomes of the operation are acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorRule {
    /// The operation must succeed.
    Succeed,
    /// The operation must fail with exactly this kind.
    Require(ErrorKind),
    /// The operation may fail with this kind or succeed.
    Tolerate(ErrorKind),
}

impl ErrorRule {
    /// Returns `true` if `outcome` is acceptable under this rule.
    ///
    /// An error without a recognised kind is never acceptable.
    #[must_use]
    pub fn accepts(self, outcome: &Outcome) -> bool {
        match (self, outcome) {
            (Self::Succeed | Self::Tolerate(_), Ok(())) => true,
            (Self::Require(_), Ok(())) | (Self::Succeed, Err(_)) => false,
            (Self::Require(kind) | Self::Tolerate(kind), Err(e)) => e.kind() == Some(kind),
        }
    }
}

impl fmt::Display for ErrorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeed => f.write_str("no error"),
            Self::Require(kind) => write!(f, "{kind} error"),
            Self::Tolerate(kind) => write!(f, "{kind} error or no error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Entries of a fixture captured before the operation under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<K, V> {
    entries: Vec<Pair<K, V>>,
}

impl<K, V> Snapshot<K, V> {
    /// Captures the current entries of `fixture`.
    #[must_use]
    pub fn capture<M: MapUnderTest<K, V>>(fixture: &M) -> Self {
        Self {
            entries: fixture.entries(),
        }
    }

    /// The captured entries.
    #[must_use]
    pub fn entries(&self) -> &[Pair<K, V>] {
        &self.entries
    }

    /// Number of captured entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Clone + PartialEq, V: Clone> Snapshot<K, V> {
    /// Contents expected after merging `added` into the snapshot: a pair
    /// with a captured key overwrites its value, any other pair is appended.
    #[must_use]
    pub fn merged(&self, added: &[Pair<K, V>]) -> Vec<Pair<K, V>> {
        let mut expected = self.entries.clone();
        for pair in added {
            match expected.iter_mut().find(|p| p.key == pair.key) {
                Some(slot) => slot.value.clone_from(&pair.value),
                None => expected.push(pair.clone()),
            }
        }
        expected
    }
}

/// Renders entries as `{k=v, ...}`.
struct Render<'a, K, V>(&'a [Pair<K, V>]);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for Render<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, pair) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{pair}")?;
        }
        f.write_str("}")
    }
}

/// Renders a possibly-null key or value.
struct Nullable<'a, T>(Option<&'a T>);

impl<T: fmt::Debug> fmt::Display for Nullable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::sample::write_nullable(f, self.0)
    }
}

// ---------------------------------------------------------------------------
// Expectation
// ---------------------------------------------------------------------------

/// Verifier bound to one scenario and the fixture's pre-state.
#[derive(Debug)]
pub struct Expectation<'a, K, V> {
    scenario: &'static str,
    before: &'a Snapshot<K, V>,
}

impl<'a, K, V> Expectation<'a, K, V>
where
    K: Clone + PartialEq + fmt::Debug,
    V: Clone + PartialEq + fmt::Debug,
{
    /// Creates a verifier for `scenario` against the pre-state `before`.
    #[must_use]
    pub const fn new(scenario: &'static str, before: &'a Snapshot<K, V>) -> Self {
        Self { scenario, before }
    }

    fn violation(&self, expected: impl Into<String>, observed: impl Into<String>) -> Violation {
        Violation {
            scenario: self.scenario,
            expected: expected.into(),
            observed: observed.into(),
        }
    }

    fn query_failed(&self, query: &str, err: &ContainerError) -> Violation {
        self.violation(format!("{query} to answer"), format!("{query} failed: {err}"))
    }

    /// Checks the operation's outcome against `rule`.
    ///
    /// # Errors
    ///
    /// A [`Violation`] when the outcome is not accepted, including any error
    /// whose kind the catalog does not recognise.
    pub fn verify_threw(&self, outcome: &Outcome, rule: ErrorRule) -> Result<(), Violation> {
        if rule.accepts(outcome) {
            return Ok(());
        }
        let observed = match outcome {
            Ok(()) => "no error".to_owned(),
            Err(e) => match e.kind() {
                Some(kind) => format!("{kind} error ({e})"),
                None => format!("unexpected error ({e})"),
            },
        };
        Err(self.violation(rule.to_string(), observed))
    }

    /// Checks that the fixture still holds exactly the pre-state entries.
    ///
    /// # Errors
    ///
    /// A [`Violation`] describing the first difference.
    pub fn verify_unchanged<M: MapUnderTest<K, V>>(&self, fixture: &M) -> Result<(), Violation> {
        self.verify_contents(fixture, self.before.entries())
    }

    /// Checks that the fixture holds the pre-state merged with `added` and
    /// nothing else, and that each added pair answers through the queries.
    ///
    /// The size grows by the number of added keys that were not captured
    /// before.
    ///
    /// # Errors
    ///
    /// A [`Violation`] describing the first difference.
    pub fn verify_added<M: MapUnderTest<K, V>>(
        &self,
        fixture: &M,
        added: &[Pair<K, V>],
    ) -> Result<(), Violation> {
        for pair in added {
            let key = pair.key.as_ref();
            match fixture.contains_key(key) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(self.violation(
                        format!("key {} to be present", Nullable(key)),
                        "contains_key returned false",
                    ));
                }
                Err(e) => return Err(self.query_failed("contains_key", &e)),
            }
            match fixture.get(key) {
                Ok(Some(value)) if value == pair.value => {}
                Ok(Some(value)) => {
                    return Err(self.violation(
                        format!("get({}) = {}", Nullable(key), Nullable(pair.value.as_ref())),
                        format!("get returned {}", Nullable(value.as_ref())),
                    ));
                }
                Ok(None) => {
                    return Err(self.violation(
                        format!("get({}) = {}", Nullable(key), Nullable(pair.value.as_ref())),
                        "get returned absent",
                    ));
                }
                Err(e) => return Err(self.query_failed("get", &e)),
            }
        }
        self.verify_contents(fixture, &self.before.merged(added))
    }

    /// Checks that none of `pairs`' keys is present in the fixture.
    ///
    /// # Errors
    ///
    /// A [`Violation`] naming the first key that is still reachable.
    pub fn verify_missing<M: MapUnderTest<K, V>>(
        &self,
        fixture: &M,
        pairs: &[Pair<K, V>],
    ) -> Result<(), Violation> {
        let entries = fixture.entries();
        for pair in pairs {
            let key = pair.key.as_ref();
            let expected = || format!("key {} to be absent", Nullable(key));
            match fixture.contains_key(key) {
                Ok(false) => {}
                Ok(true) => return Err(self.violation(expected(), "contains_key returned true")),
                Err(e) => return Err(self.query_failed("contains_key", &e)),
            }
            match fixture.get(key) {
                Ok(None) => {}
                Ok(Some(value)) => {
                    return Err(self.violation(
                        expected(),
                        format!("get returned {}", Nullable(value.as_ref())),
                    ));
                }
                Err(e) => return Err(self.query_failed("get", &e)),
            }
            if entries.iter().any(|p| p.key == pair.key) {
                return Err(self.violation(
                    expected(),
                    format!("entries {}", Render(&entries)),
                ));
            }
        }
        Ok(())
    }

    /// Checks that no null key is present. A `NullRejected` answer to the
    /// null lookup counts as absence.
    ///
    /// # Errors
    ///
    /// A [`Violation`] if a null key is reachable.
    pub fn verify_null_key_missing<M: MapUnderTest<K, V>>(
        &self,
        fixture: &M,
    ) -> Result<(), Violation> {
        const EXPECTED: &str = "no null key after a rejected null-key insertion";
        match fixture.contains_key(None) {
            Ok(false) => {}
            Ok(true) => return Err(self.violation(EXPECTED, "contains_key(null) returned true")),
            Err(e) if e.kind() == Some(ErrorKind::NullRejected) => {}
            Err(e) => return Err(self.query_failed("contains_key(null)", &e)),
        }
        let entries = fixture.entries();
        if entries.iter().any(Pair::has_null_key) {
            return Err(self.violation(EXPECTED, format!("entries {}", Render(&entries))));
        }
        Ok(())
    }

    /// Checks that no null value is present. A `NullRejected` answer to the
    /// null lookup counts as absence.
    ///
    /// # Errors
    ///
    /// A [`Violation`] if a null value is reachable.
    pub fn verify_null_value_missing<M: MapUnderTest<K, V>>(
        &self,
        fixture: &M,
    ) -> Result<(), Violation> {
        const EXPECTED: &str = "no null value after a rejected null-value insertion";
        match fixture.contains_value(None) {
            Ok(false) => {}
            Ok(true) => {
                return Err(self.violation(EXPECTED, "contains_value(null) returned true"));
            }
            Err(e) if e.kind() == Some(ErrorKind::NullRejected) => {}
            Err(e) => return Err(self.query_failed("contains_value(null)", &e)),
        }
        let entries = fixture.entries();
        if entries.iter().any(Pair::has_null_value) {
            return Err(self.violation(EXPECTED, format!("entries {}", Render(&entries))));
        }
        Ok(())
    }

    /// Exact content check: no duplicate keys, `len()` and the entry
    /// snapshot both match `expected`, every expected pair is present.
    fn verify_contents<M: MapUnderTest<K, V>>(
        &self,
        fixture: &M,
        expected: &[Pair<K, V>],
    ) -> Result<(), Violation> {
        let actual = fixture.entries();
        let want = || format!("contents {}", Render(expected));

        for (i, pair) in actual.iter().enumerate() {
            if actual[i + 1..].iter().any(|p| p.key == pair.key) {
                return Err(self.violation(
                    format!("distinct keys, {}", want()),
                    format!("key {} twice in {}", Nullable(pair.key.as_ref()), Render(&actual)),
                ));
            }
        }
        if fixture.len() != expected.len() {
            return Err(self.violation(
                format!("len() = {}, {}", expected.len(), want()),
                format!("len() = {}, entries {}", fixture.len(), Render(&actual)),
            ));
        }
        if actual.len() != expected.len() || expected.iter().any(|e| !actual.contains(e)) {
            return Err(self.violation(want(), format!("entries {}", Render(&actual))));
        }
        Ok(())
    }
}
