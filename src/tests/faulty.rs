//! Faulty maps: each breaks the contract in one way, and the suite must
//! fail exactly the scenarios that observe that breach.

use std::collections::BTreeSet;

use crate::tests::{init_tracing, int_samples};
use crate::{
    Batch, CaseStatus, ContainerError, MapUnderTest, NoOpPolicy, Outcome, Pair, Policy,
    ReferenceMap, Report, Scenario, Suite,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    /// Writes the batch, then validates it.
    PartialWrite,
    /// Accepts and ignores every batch.
    SilentNoOp,
    /// Writes the batch, then reports the operation unsupported.
    WriteThenUnsupported,
    /// Rejects nulls with `UnsupportedOperation`.
    WrongKind,
    /// Appends pairs without replacing existing keys.
    DuplicateKeys,
    /// Fails on an empty batch.
    RejectsEmpty,
    /// Fails with an unrecognised error on a null batch reference.
    OtherError,
    /// Drops the last pair of every batch.
    DropsLast,
}

const UNSUPPORTED: ContainerError = ContainerError::Unsupported {
    operation: "put_all",
};

/// Behaves like a [`ReferenceMap`] with `policy` except where `fault` says
/// otherwise. Entries are kept raw so that duplicate keys stay observable.
struct Faulty {
    entries: Vec<Pair<i32, i32>>,
    policy: Policy,
    fault: Fault,
}

impl Faulty {
    fn reference(&self) -> ReferenceMap<i32, i32> {
        ReferenceMap::seeded(self.policy, &self.entries)
    }

    fn correct(&mut self, batch: Option<&Batch<i32, i32>>) -> Outcome {
        let mut reference = self.reference();
        let outcome = reference.put_all(batch);
        self.entries = reference.entries();
        outcome
    }

    fn force(&mut self, batch: &Batch<i32, i32>) {
        let mut permissive = ReferenceMap::seeded(Policy::PERMISSIVE, &self.entries);
        permissive
            .put_all(Some(batch))
            .expect("permissive map accepts any batch");
        self.entries = permissive.entries();
    }
}

impl MapUnderTest<i32, i32> for Faulty {
    fn put_all(&mut self, batch: Option<&Batch<i32, i32>>) -> Outcome {
        match (self.fault, batch) {
            (Fault::PartialWrite, Some(b)) => {
                self.force(b);
                self.correct(Some(b))
            }
            (Fault::SilentNoOp, _) => Ok(()),
            (Fault::WriteThenUnsupported, Some(b)) => {
                self.force(b);
                Err(UNSUPPORTED)
            }
            (Fault::WrongKind, Some(b))
                if b.iter().any(|p| p.has_null_key() || p.has_null_value()) =>
            {
                Err(UNSUPPORTED)
            }
            (Fault::DuplicateKeys, Some(b)) => {
                self.entries.extend(b.iter().cloned());
                Ok(())
            }
            (Fault::RejectsEmpty, Some(b)) if b.is_empty() => Err(UNSUPPORTED),
            (Fault::OtherError, None) => Err(ContainerError::Other("null pointer".into())),
            (Fault::DropsLast, Some(b)) if !b.is_empty() => {
                let kept: Batch<i32, i32> = b.iter().take(b.len() - 1).cloned().collect();
                self.correct(Some(&kept))
            }
            (_, batch) => self.correct(batch),
        }
    }

    fn contains_key(&self, key: Option<&i32>) -> Result<bool, ContainerError> {
        self.reference().contains_key(key)
    }

    fn contains_value(&self, value: Option<&i32>) -> Result<bool, ContainerError> {
        self.reference().contains_value(value)
    }

    fn get(&self, key: Option<&i32>) -> Result<Option<Option<i32>>, ContainerError> {
        self.reference().get(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries(&self) -> Vec<Pair<i32, i32>> {
        self.entries.clone()
    }
}

fn run(fault: Fault, policy: Policy) -> Report {
    init_tracing();
    Suite::new(format!("{fault:?}"), int_samples(), move |seed| Faulty {
        entries: seed.to_vec(),
        policy,
        fault,
    })
    .with_capabilities(policy.capabilities())
    .run()
}

fn failed_scenarios(report: &Report) -> BTreeSet<Scenario> {
    report.failures().map(|(case, _)| case.scenario).collect()
}

const LENIENT_READ_ONLY: Policy = Policy {
    no_op: NoOpPolicy::Allow,
    ..Policy::READ_ONLY
};

#[test]
fn partial_write_caught_by_null_rejections() {
    let report = run(Fault::PartialWrite, Policy::NULL_HOSTILE);
    assert_eq!(
        failed_scenarios(&report),
        BTreeSet::from([Scenario::NullKeyUnsupported, Scenario::NullValueUnsupported])
    );
    assert_eq!(report.failed(), 6);
    let (case, violation) = report.failures().next().expect("at least one failure");
    assert_eq!(case.id(), "put_all_null_key_unsupported[EMPTY]");
    assert!(violation.expected.starts_with("len() = 0"));
    assert!(violation.observed.starts_with("len() = 1"));
}

/// Silence is tolerated only for batches with no net effect.
#[test]
fn silent_no_op_caught_only_for_effectful_batches() {
    let report = run(Fault::SilentNoOp, LENIENT_READ_ONLY);
    assert_eq!(
        failed_scenarios(&report),
        BTreeSet::from([Scenario::UnsupportedNonePresent, Scenario::UnsupportedSomePresent])
    );
    for (_, violation) in report.failures() {
        assert_eq!(violation.expected, "UnsupportedOperation error");
        assert_eq!(violation.observed, "no error");
    }
    // Nothing at three sizes, AllPresent at two.
    assert_eq!(report.passed(), 5);
    assert_eq!(report.failed(), 5);
}

#[test]
fn write_then_unsupported_caught_by_unchanged_check() {
    let report = run(Fault::WriteThenUnsupported, Policy::READ_ONLY);
    assert_eq!(
        failed_scenarios(&report),
        BTreeSet::from([Scenario::UnsupportedNonePresent, Scenario::UnsupportedSomePresent])
    );
}

#[test]
fn wrong_error_kind_caught() {
    let report = run(Fault::WrongKind, Policy::NULL_HOSTILE);
    assert_eq!(
        failed_scenarios(&report),
        BTreeSet::from([Scenario::NullKeyUnsupported, Scenario::NullValueUnsupported])
    );
    for (_, violation) in report.failures() {
        assert_eq!(violation.expected, "NullRejected error");
        assert!(violation.observed.starts_with("UnsupportedOperation error"));
    }
}

#[test]
fn duplicate_keys_caught_by_overlap() {
    let report = run(Fault::DuplicateKeys, Policy::PERMISSIVE);
    assert_eq!(
        failed_scenarios(&report),
        BTreeSet::from([Scenario::SupportedSomePresent])
    );
    let (_, violation) = report.failures().next().expect("one failure");
    assert!(violation.observed.starts_with("key 0 twice"));
}

#[test]
fn rejecting_empty_batch_caught_when_supported() {
    let report = run(Fault::RejectsEmpty, Policy::PERMISSIVE);
    assert_eq!(
        failed_scenarios(&report),
        BTreeSet::from([Scenario::SupportedNothing])
    );
    // The same answer is legal without bulk support.
    assert!(run(Fault::RejectsEmpty, LENIENT_READ_ONLY).is_success());
}

#[test]
fn unrecognised_error_is_never_absorbed() {
    let report = run(Fault::OtherError, Policy::PERMISSIVE);
    assert_eq!(
        failed_scenarios(&report),
        BTreeSet::from([Scenario::NullBatchReference])
    );
    let (_, violation) = report.failures().next().expect("one failure");
    assert_eq!(violation.observed, "unexpected error (null pointer)");
}

#[test]
fn dropped_pair_caught_by_additions() {
    let report = run(Fault::DropsLast, Policy::PERMISSIVE);
    // Dropping e0 from {e3, e0} goes unnoticed: e0 is already present.
    assert_eq!(
        failed_scenarios(&report),
        BTreeSet::from([
            Scenario::SupportedNonePresent,
            Scenario::NullKeySupported,
            Scenario::NullValueSupported,
        ])
    );
    let (_, violation) = report.failures().next().expect("failures");
    assert_eq!(violation.expected, "key 4 to be present");
}

#[test]
fn failure_report_names_case_and_condition() {
    let report = run(Fault::WrongKind, Policy::NULL_HOSTILE);
    let text = report.to_string();
    assert!(text.starts_with("suite WrongKind: "));
    assert!(text.contains("FAILED put_all_null_key_unsupported[EMPTY]"));
    assert!(text.contains("expected NullRejected error"));
    assert!(
        report
            .cases()
            .iter()
            .any(|c| matches!(c.status, CaseStatus::Failed(_)))
    );
}
