//! Session configuration.
//!
//! All fields have defaults, so a config file only needs the keys it wants
//! to change:
//!
//! ```json
//! { "max_sample_count": 10000, "chi_square_bins": 20 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LabError;

/// Default cap on samples per request.
pub const DEFAULT_MAX_SAMPLE_COUNT: usize = 5000;

/// Hard ceiling on samples per request; `max_sample_count` cannot exceed it.
pub const SAMPLE_COUNT_LIMIT: usize = 1_000_000;

/// Tunables for a generation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Requested counts are clamped into `[1, max_sample_count]`.
    pub max_sample_count: usize,
    /// Count used when the caller does not give one.
    pub default_sample_count: usize,
    /// Seed used when the caller does not give one.
    pub default_seed: u32,
    /// Bins for the chi-square test.
    pub chi_square_bins: usize,
    /// Lag for the autocorrelation test.
    pub autocorrelation_lag: usize,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            max_sample_count: DEFAULT_MAX_SAMPLE_COUNT,
            default_sample_count: 200,
            default_seed: 5489,
            chi_square_bins: randlab_tests::DEFAULT_BINS,
            autocorrelation_lag: 1,
        }
    }
}

impl LabConfig {
    /// Load a JSON config file. Missing keys fall back to defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, LabError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| LabError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config: LabConfig = serde_json::from_str(&raw)
            .map_err(|e| LabError::Config(format!("failed to parse {}: {e}", path.display())))?;
        Ok(config.normalized())
    }

    /// Repair values that would make every request degenerate.
    pub fn normalized(mut self) -> Self {
        self.max_sample_count = self.max_sample_count.clamp(1, SAMPLE_COUNT_LIMIT);
        self.default_sample_count = self.default_sample_count.clamp(1, self.max_sample_count);
        self.chi_square_bins = randlab_tests::clamp_bins(self.chi_square_bins);
        self.autocorrelation_lag = self.autocorrelation_lag.max(1);
        self
    }

    /// Clamp a requested sample count into `[1, max_sample_count]`.
    pub fn clamp_count(&self, requested: i64) -> usize {
        let max = self.max_sample_count.clamp(1, SAMPLE_COUNT_LIMIT);
        if requested < 1 {
            1
        } else {
            usize::try_from(requested).map_or(max, |n| n.min(max))
        }
    }
}

/// Clamp any integer seed into `[0, 2^32 − 1]`.
pub fn clamp_seed(requested: i64) -> u32 {
    requested.clamp(0, u32::MAX as i64) as u32
}
