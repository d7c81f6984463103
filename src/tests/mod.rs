mod catalog;
mod faulty;

use tracing_subscriber::EnvFilter;

use crate::{Pair, Policy, ReferenceMap, Samples, Suite};

/// Routes `tracing` output through the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// `k -> 10k` for k in 0..5.
pub fn int_samples() -> Samples<i32, i32> {
    Samples::new((0..5).map(|k| (k, k * 10))).expect("distinct sample keys")
}

/// Suite over a [`ReferenceMap`] that declares exactly what its policy does.
pub fn reference_suite(
    policy: Policy,
) -> Suite<i32, i32, impl Fn(&[Pair<i32, i32>]) -> ReferenceMap<i32, i32>> {
    Suite::new(format!("{policy:?}"), int_samples(), move |seed| {
        ReferenceMap::seeded(policy, seed)
    })
    .with_capabilities(policy.capabilities())
}
