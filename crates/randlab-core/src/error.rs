//! Error types for randlab.

use std::fmt;

/// Errors produced by the generation engine.
///
/// Out-of-range seeds and sample counts are clamped, not reported, and empty
/// sample sets evaluate to neutral results, so only a handful of conditions
/// ever surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabError {
    /// The external entropy primitive could not be reached. Never replaced by
    /// a seeded generator behind the caller's back.
    EntropySourceUnavailable {
        source: &'static str,
        reason: String,
    },
    /// A generator name that matches no known kind.
    UnknownGenerator(String),
    /// Configuration could not be read or parsed.
    Config(String),
}

impl fmt::Display for LabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabError::EntropySourceUnavailable { source, reason } => {
                write!(f, "Entropy source '{source}' is unavailable: {reason}")
            }
            LabError::UnknownGenerator(name) => write!(
                f,
                "Unknown generator '{name}' (expected mt, lcg, csprng or trng)"
            ),
            LabError::Config(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for LabError {}
