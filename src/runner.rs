//! Runs the catalog against freshly seeded fixtures and collects a report.

use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, info, info_span, trace, warn};

use crate::capability::{Capability, CapabilitySet, CollectionSize, Require};
use crate::catalog::{CATALOG, CatalogEntry, Scenario};
use crate::config::SuiteConfig;
use crate::container::MapUnderTest;
use crate::expect::Violation;
use crate::sample::{Pair, SampleProvider, Samples};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What happened to one scenario at one size class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStatus {
    /// Every expectation held.
    Passed,
    /// The capability set does not meet the scenario's precondition.
    Skipped {
        /// The unmet precondition.
        unmet: Require,
    },
    /// Eligible, but suppressed by configuration.
    Suppressed,
    /// An expectation failed.
    Failed(Violation),
}

/// Result of one scenario at one size class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    /// The scenario.
    pub scenario: Scenario,
    /// The fixture's size class.
    pub size: CollectionSize,
    /// Outcome.
    pub status: CaseStatus,
}

impl CaseResult {
    /// Case identifier, e.g. `put_all_supported_nothing[ONE]`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}[{}]", self.scenario, self.size)
    }
}

/// All case results of one suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    suite: String,
    cases: Vec<CaseResult>,
}

impl Report {
    /// Name of the suite that produced the report.
    #[must_use]
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Every case, in run order.
    #[must_use]
    pub fn cases(&self) -> &[CaseResult] {
        &self.cases
    }

    fn count(&self, pred: impl Fn(&CaseStatus) -> bool) -> usize {
        self.cases.iter().filter(|c| pred(&c.status)).count()
    }

    /// Number of passed cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, CaseStatus::Passed))
    }

    /// Number of failed cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, CaseStatus::Failed(_)))
    }

    /// Number of cases skipped for an unmet precondition.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, CaseStatus::Skipped { .. }))
    }

    /// Number of suppressed cases.
    #[must_use]
    pub fn suppressed(&self) -> usize {
        self.count(|s| matches!(s, CaseStatus::Suppressed))
    }

    /// Failed cases with their violations.
    pub fn failures(&self) -> impl Iterator<Item = (&CaseResult, &Violation)> {
        self.cases.iter().filter_map(|c| match &c.status {
            CaseStatus::Failed(v) => Some((c, v)),
            _ => None,
        })
    }

    /// Returns `true` if no case failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Fails the calling test with the full report unless at least one
    /// case was recorded and every executed case passed.
    ///
    /// # Panics
    ///
    /// Panics if any case failed or the run recorded no case at all.
    #[track_caller]
    pub fn assert_passed(&self) {
        assert!(!self.cases.is_empty(), "suite {}: no cases recorded", self.suite);
        assert!(self.is_success(), "{self}");
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "suite {}: {} passed, {} failed, {} skipped, {} suppressed",
            self.suite,
            self.passed(),
            self.failed(),
            self.skipped(),
            self.suppressed(),
        )?;
        for (case, violation) in self.failures() {
            write!(f, "\n  FAILED {}: {violation}", case.id())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Suite
// ---------------------------------------------------------------------------

/// A map implementation's declared capabilities, its fixture factory and
/// the sample pool, ready to run the catalog.
///
/// The factory receives the seed pairs for a size class and must return a
/// fresh map holding exactly those pairs. Each case gets its own fixture.
///
/// Input batches come from the provider `P`, which is usually the
/// [`Samples`] pool itself.
pub struct Suite<K, V, F, P = Samples<K, V>> {
    name: String,
    provider: P,
    capabilities: Vec<Capability>,
    factory: F,
    config: SuiteConfig,
    _pair: PhantomData<fn() -> (K, V)>,
}

impl<K, V, F, P> Suite<K, V, F, P>
where
    K: Clone + PartialEq,
    V: Clone,
    P: SampleProvider<K, V>,
{
    /// Creates a suite with no declared capabilities and the default
    /// configuration.
    #[must_use]
    pub fn new<M>(name: impl Into<String>, provider: P, factory: F) -> Self
    where
        F: Fn(&[Pair<K, V>]) -> M,
        M: MapUnderTest<K, V>,
    {
        Self {
            name: name.into(),
            provider,
            capabilities: Vec::new(),
            factory,
            config: SuiteConfig::default(),
            _pair: PhantomData,
        }
    }
}

impl<K, V, F, P> Suite<K, V, F, P> {
    /// Declares `capability`.
    #[must_use]
    pub fn with_capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Declares every capability in `capabilities`.
    #[must_use]
    pub fn with_capabilities<I>(self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        capabilities
            .into_iter()
            .fold(self, Self::with_capability)
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: SuiteConfig) -> Self {
        self.config = config;
        self
    }

    /// The suite's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// The capability set a fixture of class `size` runs under.
    #[must_use]
    pub fn capability_set(&self, size: CollectionSize) -> CapabilitySet {
        CapabilitySet::from_capabilities(self.capabilities.iter().copied(), size)
    }
}

impl<K, V, F, P> Suite<K, V, F, P>
where
    K: Clone + PartialEq + fmt::Debug,
    V: Clone + PartialEq + fmt::Debug,
    P: SampleProvider<K, V>,
{
    /// Runs every scenario at every configured size class.
    pub fn run<M>(&self) -> Report
    where
        F: Fn(&[Pair<K, V>]) -> M,
        M: MapUnderTest<K, V>,
    {
        self.run_matching(|_| true)
    }

    /// Runs one scenario at every configured size class.
    pub fn run_scenario<M>(&self, scenario: Scenario) -> Report
    where
        F: Fn(&[Pair<K, V>]) -> M,
        M: MapUnderTest<K, V>,
    {
        self.run_matching(|s| s == scenario)
    }

    fn run_matching<M>(&self, include: impl Fn(Scenario) -> bool) -> Report
    where
        F: Fn(&[Pair<K, V>]) -> M,
        M: MapUnderTest<K, V>,
    {
        let _span = info_span!("put_all_suite", suite = %self.name).entered();
        let mut cases = Vec::new();
        for &size in &self.config.sizes {
            for entry in CATALOG.iter().filter(|e| include(e.scenario)) {
                cases.push(self.run_case(entry, size));
            }
        }
        let report = Report {
            suite: self.name.clone(),
            cases,
        };
        info!(
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            suppressed = report.suppressed(),
            "suite finished"
        );
        report
    }

    fn run_case<M>(&self, entry: &CatalogEntry, size: CollectionSize) -> CaseResult
    where
        F: Fn(&[Pair<K, V>]) -> M,
        M: MapUnderTest<K, V>,
    {
        let scenario = entry.scenario;
        let status = if !entry.is_eligible(self.capability_set(size)) {
            trace!(%scenario, %size, require = %entry.require, "skipped");
            CaseStatus::Skipped {
                unmet: entry.require,
            }
        } else if self.config.is_suppressed(scenario) {
            debug!(%scenario, %size, "suppressed");
            CaseStatus::Suppressed
        } else {
            debug!(%scenario, %size, "running");
            match self.seed_and_run(entry, size) {
                Ok(()) => CaseStatus::Passed,
                Err(violation) => {
                    warn!(%scenario, %size, %violation, "failed");
                    CaseStatus::Failed(violation)
                }
            }
        };
        CaseResult {
            scenario,
            size,
            status,
        }
    }

    fn seed_and_run<M>(&self, entry: &CatalogEntry, size: CollectionSize) -> Result<(), Violation>
    where
        F: Fn(&[Pair<K, V>]) -> M,
        M: MapUnderTest<K, V>,
    {
        let seed = self.provider.samples().seed(size);
        let mut fixture = (self.factory)(seed);
        let misseeded = |observed: String| Violation {
            scenario: entry.scenario.name(),
            expected: format!("a {size} fixture seeded with {} entries", seed.len()),
            observed,
        };
        if fixture.len() != seed.len() {
            return Err(misseeded(format!("len() = {}", fixture.len())));
        }
        let entries = fixture.entries();
        if entries.len() != seed.len() || seed.iter().any(|pair| !entries.contains(pair)) {
            let shown: Vec<String> = entries.iter().map(ToString::to_string).collect();
            return Err(misseeded(format!("entries {{{}}}", shown.join(", "))));
        }
        entry.run(&mut fixture, &self.provider)
    }
}
