//! Test generation.

/// Generates a module with one `#[test]` per catalog scenario.
///
/// `$suite` is evaluated afresh in every test and must produce a
/// [`Suite`](crate::Suite). Each test runs its scenario at every configured
/// size class and fails with the suite report if any case fails. Scenarios
/// whose precondition is never met pass vacuously.
///
/// ```ignore
/// map_conformance::put_all_conformance!(hash_map, {
///     map_conformance::Suite::new("HashMap", map_conformance::string_samples(), |seed| {
///         let mut map = std::collections::HashMap::new();
///         map.extend(seed.iter().map(|p| (p.key.clone(), p.value.clone())));
///         map
///     })
///     .with_capabilities(map_conformance::Capability::ALL)
/// });
/// ```
#[macro_export]
macro_rules! put_all_conformance {
    ($mod_name:ident, $suite:expr) => {
        $crate::put_all_conformance!(@module $mod_name, $suite;
            put_all_supported_nothing => SupportedNothing,
            put_all_unsupported_nothing => UnsupportedNothing,
            put_all_supported_none_present => SupportedNonePresent,
            put_all_unsupported_none_present => UnsupportedNonePresent,
            put_all_supported_some_present => SupportedSomePresent,
            put_all_unsupported_some_present => UnsupportedSomePresent,
            put_all_unsupported_all_present => UnsupportedAllPresent,
            put_all_null_key_supported => NullKeySupported,
            put_all_null_key_unsupported => NullKeyUnsupported,
            put_all_null_value_supported => NullValueSupported,
            put_all_null_value_unsupported => NullValueUnsupported,
            put_all_null_batch_reference => NullBatchReference,
        );
    };
    (@module $mod_name:ident, $suite:expr; $($test_name:ident => $scenario:ident),* $(,)?) => {
        mod $mod_name {
            #[allow(unused_imports)]
            use super::*;

            $(
                #[test]
                fn $test_name() {
                    let suite = $suite;
                    suite
                        .run_scenario($crate::Scenario::$scenario)
                        .assert_passed();
                }
            )*
        }
    };
}
