//! Suite configuration, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::capability::CollectionSize;
use crate::catalog::Scenario;
use crate::error::{HarnessError, Result};

/// Which size classes a suite runs and which scenarios it suppresses.
///
/// ```json
/// { "sizes": ["ONE", "SEVERAL"], "suppressed": ["put_all_null_batch_reference"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Size classes to seed fixtures for, in run order.
    pub sizes: Vec<CollectionSize>,
    /// Scenario names that are reported as suppressed instead of run.
    pub suppressed: Vec<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            sizes: CollectionSize::ALL.to_vec(),
            suppressed: Vec::new(),
        }
    }
}

impl SuiteConfig {
    /// Parses and validates a JSON configuration. Missing fields take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Config`] for malformed JSON or unknown fields,
    /// [`HarnessError::NoSizes`] for an empty size list,
    /// [`HarnessError::UnknownScenario`] for a suppressed name the catalog
    /// does not contain.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that at least one size class is selected and every
    /// suppressed name is a catalog scenario.
    ///
    /// # Errors
    ///
    /// [`HarnessError::NoSizes`] for an empty size list,
    /// [`HarnessError::UnknownScenario`] naming the first unknown entry.
    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(HarnessError::NoSizes);
        }
        match self
            .suppressed
            .iter()
            .find(|name| Scenario::from_name(name).is_none())
        {
            Some(name) => Err(HarnessError::UnknownScenario(name.clone())),
            None => Ok(()),
        }
    }

    /// Returns `true` if `scenario` is suppressed.
    #[must_use]
    pub fn is_suppressed(&self, scenario: Scenario) -> bool {
        self.suppressed.iter().any(|name| name == scenario.name())
    }
}
