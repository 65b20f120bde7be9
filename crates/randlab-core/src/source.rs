//! External entropy sources.
//!
//! The non-seedable generator kind draws from an [`EntropySource`]. The
//! default is [`OsEntropy`], the operating system CSPRNG reached through the
//! `getrandom` crate; it serves both the "CSPRNG" and the "TRNG" selections.
//! Tests and embedders can plug in their own implementation.

use std::sync::Arc;

use crate::error::LabError;

/// Metadata about an entropy source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Unique identifier (e.g. `"os"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
}

/// Trait that every entropy source must implement.
///
/// Sources are stateless from the caller's point of view: draws are not
/// reproducible and there is nothing to seed.
pub trait EntropySource: Send + Sync {
    /// Source metadata.
    fn info(&self) -> &SourceInfo;

    /// Check if this source can be reached on the current machine.
    fn is_available(&self) -> bool;

    /// Fill `out` with uniformly distributed 32-bit words in a single
    /// request. Blocks until the primitive answers.
    fn fill_words(&self, out: &mut [u32]) -> Result<(), LabError>;

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

static OS_INFO: SourceInfo = SourceInfo {
    name: "os",
    description: "Operating system CSPRNG (getrandom)",
};

impl EntropySource for OsEntropy {
    fn info(&self) -> &SourceInfo {
        &OS_INFO
    }

    fn is_available(&self) -> bool {
        let mut probe = [0u8; 4];
        getrandom::fill(&mut probe).is_ok()
    }

    fn fill_words(&self, out: &mut [u32]) -> Result<(), LabError> {
        let mut bytes = vec![0u8; out.len() * 4];
        getrandom::fill(&mut bytes).map_err(|e| LabError::EntropySourceUnavailable {
            source: OS_INFO.name,
            reason: e.to_string(),
        })?;
        for (word, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(())
    }
}

/// The default entropy source for new sessions.
pub fn default_source() -> Arc<dyn EntropySource> {
    Arc::new(OsEntropy)
}
