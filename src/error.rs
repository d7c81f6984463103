//! Errors raised by the harness itself, as opposed to the map under test.

use thiserror::Error;

/// Result type alias for harness setup operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Misuse of the harness: an invalid sample pool or suite configuration.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The sample pool is smaller than the catalog needs.
    #[error("at least {required} sample pairs are required, got {found}")]
    TooFewSamples {
        /// Minimum pool size.
        required: usize,
        /// Pairs supplied.
        found: usize,
    },

    /// Two sample pairs share a key.
    #[error("sample keys must be distinct: e{first} and e{second} share a key")]
    DuplicateSampleKey {
        /// Index of the first pair.
        first: usize,
        /// Index of the later pair with the same key.
        second: usize,
    },

    /// The suite configuration could not be parsed.
    #[error("invalid suite configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The configuration selects no size class, so nothing would run.
    #[error("suite configuration selects no size class")]
    NoSizes,

    /// The configuration names a scenario the catalog does not contain.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
}
