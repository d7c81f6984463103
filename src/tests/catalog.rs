//! Catalog integrity and the capability × size eligibility matrix.

use std::collections::BTreeSet;

use crate::catalog::eligible;
use crate::tests::int_samples;
use crate::{
    CATALOG, Capability, CapabilitySet, Check, CollectionSize, ErrorKind, ErrorRule, Input, Pair,
    Scenario,
};

use crate::Scenario::{
    NullBatchReference, NullKeySupported, NullKeyUnsupported, NullValueSupported,
    NullValueUnsupported, SupportedNonePresent, SupportedNothing, SupportedSomePresent,
    UnsupportedAllPresent, UnsupportedNonePresent, UnsupportedNothing, UnsupportedSomePresent,
};

fn eligible_set(set: CapabilitySet) -> BTreeSet<Scenario> {
    eligible(set).map(|e| e.scenario).collect()
}

// ---------------------------------------------------------------------------
// Table integrity
// ---------------------------------------------------------------------------

#[test]
fn catalog_indexed_by_scenario() {
    assert_eq!(CATALOG.len(), Scenario::ALL.len());
    for scenario in Scenario::ALL {
        assert_eq!(scenario.entry().scenario, scenario);
    }
}

#[test]
fn names_unique_and_resolvable() {
    let names: BTreeSet<&str> = Scenario::ALL.iter().map(|s| s.name()).collect();
    assert_eq!(names.len(), Scenario::ALL.len());
    for scenario in Scenario::ALL {
        assert!(scenario.name().starts_with("put_all_"));
        assert_eq!(Scenario::from_name(scenario.name()), Some(scenario));
    }
    assert_eq!(Scenario::from_name("put_all_whatever"), None);
}

#[test]
fn no_conflicting_requirements() {
    for entry in &CATALOG {
        assert_eq!(entry.require.conflict(), None, "{}", entry.scenario);
    }
}

#[test]
fn every_scenario_reachable() {
    let mut reached = BTreeSet::new();
    for size in CollectionSize::ALL {
        for bits in 0_u8..8 {
            let caps = Capability::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .map(|(_, c)| c);
            reached.extend(eligible_set(CapabilitySet::from_capabilities(caps, size)));
        }
    }
    assert_eq!(reached.len(), Scenario::ALL.len());
}

/// Tolerated outcomes exist only where the batch has no net effect.
#[test]
fn tolerance_only_for_no_op_inputs() {
    for entry in &CATALOG {
        if let ErrorRule::Tolerate(kind) = entry.rule {
            assert_eq!(kind, ErrorKind::UnsupportedOperation);
            assert!(
                matches!(entry.input, Input::Nothing | Input::Samples(&[0])),
                "{} tolerates an error for an effectful batch",
                entry.scenario
            );
            assert_eq!(entry.checks, &[Check::Unchanged]);
        }
    }
}

#[test]
fn rejections_check_unchanged() {
    for entry in &CATALOG {
        let rejecting = matches!(entry.rule, ErrorRule::Require(_));
        if rejecting && entry.input != Input::NullReference {
            assert_eq!(entry.checks.first(), Some(&Check::Unchanged), "{}", entry.scenario);
        }
    }
}

// ---------------------------------------------------------------------------
// Eligibility matrix
// ---------------------------------------------------------------------------

#[test]
fn unsupported_empty_runs_only_unconditional_rows() {
    let set = CapabilitySet::new(CollectionSize::Empty);
    assert_eq!(
        eligible_set(set),
        BTreeSet::from([UnsupportedNothing, UnsupportedNonePresent])
    );
}

#[test]
fn unsupported_non_empty_adds_overlap_rows() {
    for size in [CollectionSize::One, CollectionSize::Several] {
        // Null capabilities are irrelevant without bulk insertion.
        let set = CapabilitySet::new(size)
            .with(Capability::AllowsNullKeys)
            .with(Capability::AllowsNullValues);
        assert_eq!(
            eligible_set(set),
            BTreeSet::from([
                UnsupportedNothing,
                UnsupportedNonePresent,
                UnsupportedSomePresent,
                UnsupportedAllPresent,
            ])
        );
    }
}

#[test]
fn supported_without_nulls() {
    let set = CapabilitySet::new(CollectionSize::Empty).with(Capability::SupportsBulkInsert);
    assert_eq!(
        eligible_set(set),
        BTreeSet::from([
            SupportedNothing,
            SupportedNonePresent,
            NullKeyUnsupported,
            NullValueUnsupported,
            NullBatchReference,
        ])
    );
}

#[test]
fn supported_with_nulls_non_empty() {
    let set = CapabilitySet::from_capabilities(Capability::ALL, CollectionSize::One);
    assert_eq!(
        eligible_set(set),
        BTreeSet::from([
            SupportedNothing,
            SupportedNonePresent,
            SupportedSomePresent,
            NullKeySupported,
            NullValueSupported,
            NullBatchReference,
        ])
    );
}

#[test]
fn null_key_and_value_gates_are_independent() {
    let set = CapabilitySet::new(CollectionSize::Several)
        .with(Capability::SupportsBulkInsert)
        .with(Capability::AllowsNullKeys);
    let scenarios = eligible_set(set);
    assert!(scenarios.contains(&NullKeySupported));
    assert!(!scenarios.contains(&NullKeyUnsupported));
    assert!(scenarios.contains(&NullValueUnsupported));
    assert!(!scenarios.contains(&NullValueSupported));
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[test]
fn inputs_build_expected_batches() {
    let samples = int_samples();
    let batch = |input: Input| input.batch::<i32, i32, _>(&samples).map(|b| b.as_slice().to_vec());

    assert_eq!(batch(Input::Nothing), Some(vec![]));
    assert_eq!(batch(Input::Disjoint), Some(vec![samples.e3(), samples.e4()]));
    assert_eq!(
        batch(Input::Samples(&[3, 0])),
        Some(vec![samples.e3(), samples.e0()])
    );
    assert_eq!(batch(Input::NullKey), Some(vec![Pair::nullable(None, Some(30))]));
    assert_eq!(batch(Input::NullValue), Some(vec![Pair::nullable(Some(3), None)]));
    assert_eq!(batch(Input::NullReference), None);
}
