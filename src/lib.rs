//! Capability-gated conformance suite for map bulk insertion.
//!
//! One canonical catalog of `put_all` scenarios runs against any map
//! implementation. The implementation declares which optional behaviors it
//! has (bulk insertion, null keys, null values); for each scenario the
//! declared set decides whether the operation must succeed, must fail with
//! a specific error kind, or may do either.
//!
//! # Pieces
//!
//! - [`MapUnderTest`]: the boundary a map implements to be tested
//! - [`Samples`] / [`SampleProvider`]: the e0..e4 sample pool and input batches
//! - [`CapabilitySet`] / [`Require`]: declared features and scenario preconditions
//! - [`CATALOG`]: every scenario with its precondition, input and expected outcome
//! - [`Expectation`]: verifies outcomes and post-state against the pre-state
//! - [`Suite`] / [`Report`]: seeds fixtures, runs eligible scenarios, reports
//!
//! # Tolerated outcomes
//!
//! When bulk insertion is absent, a batch that would change nothing (empty,
//! or only pairs already present) may either fail with
//! `UnsupportedOperation` or succeed silently. A batch that would change the
//! map must fail. Both halves of that asymmetry are enforced.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod capability;
pub mod catalog;
pub mod container;
pub mod expect;
pub mod reference;
pub mod sample;

mod config;
mod error;
mod macros;
mod runner;

#[cfg(test)]
mod tests;

pub use adapters::Unmodifiable;
pub use capability::{Capability, CapabilitySet, CollectionSize, Require};
pub use catalog::{CATALOG, CatalogEntry, Check, Input, Scenario};
pub use config::SuiteConfig;
pub use container::{ContainerError, ErrorKind, MapUnderTest, Outcome};
pub use error::{HarnessError, Result};
pub use expect::{ErrorRule, Expectation, Snapshot, Violation};
pub use reference::{NoOpPolicy, Policy, ReferenceMap};
pub use runner::{CaseResult, CaseStatus, Report, Suite};
pub use sample::{Batch, MIN_SAMPLES, Pair, SampleProvider, Samples, string_samples};
