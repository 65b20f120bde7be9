//! Pluggable generator engine.
//!
//! Three kinds share one interface: two seeded, reproducible generators
//! ([`Mt19937`], [`Lcg`]) and the non-seedable [`EntropySource`]. Every draw
//! is a 32-bit word normalized into `[0, 1)` by dividing by 2^32.

pub mod lcg;
pub mod mt19937;

pub use lcg::Lcg;
pub use mt19937::Mt19937;

use std::str::FromStr;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::error::LabError;
use crate::source::{self, EntropySource};

/// 2^32 as a float; the normalization divisor.
pub const TWO_POW_32: f64 = 4_294_967_296.0;

/// Map a 32-bit word into `[0, 1)`.
pub fn to_unit(word: u32) -> f64 {
    word as f64 / TWO_POW_32
}

/// Which algorithm produces the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    MersenneTwister,
    Lcg,
    /// External entropy; covers both the CSPRNG and the TRNG selections.
    EntropySource,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 3] = [
        GeneratorKind::MersenneTwister,
        GeneratorKind::Lcg,
        GeneratorKind::EntropySource,
    ];

    /// Whether the seed determines the output.
    pub fn is_seeded(self) -> bool {
        !matches!(self, Self::EntropySource)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MersenneTwister => "mersenne-twister",
            Self::Lcg => "lcg",
            Self::EntropySource => "entropy-source",
        }
    }
}

impl std::fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorKind {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mt" | "mt19937" | "mersenne-twister" | "mersenne_twister" => {
                Ok(Self::MersenneTwister)
            }
            "lcg" => Ok(Self::Lcg),
            "entropy-source" | "entropy_source" | "entropy" | "csprng" | "webcrypto" | "trng" => {
                Ok(Self::EntropySource)
            }
            _ => Err(LabError::UnknownGenerator(s.to_string())),
        }
    }
}

/// Generator state, exclusively owned by the request that created it.
pub enum GeneratorState {
    MersenneTwister(Box<Mt19937>),
    LinearCongruential(Lcg),
    EntropySource(Arc<dyn EntropySource>),
}

impl GeneratorState {
    /// Create a generator backed by the OS entropy source.
    pub fn create(kind: GeneratorKind, seed: u32) -> Self {
        Self::create_with_source(kind, seed, &source::default_source())
    }

    /// Create a generator; `entropy` is only used by the entropy kind, which
    /// ignores `seed`.
    pub fn create_with_source(
        kind: GeneratorKind,
        seed: u32,
        entropy: &Arc<dyn EntropySource>,
    ) -> Self {
        debug!("creating {kind} generator (seed {seed})");
        match kind {
            GeneratorKind::MersenneTwister => Self::MersenneTwister(Box::new(Mt19937::new(seed))),
            GeneratorKind::Lcg => Self::LinearCongruential(Lcg::new(seed)),
            GeneratorKind::EntropySource => Self::EntropySource(Arc::clone(entropy)),
        }
    }

    pub fn kind(&self) -> GeneratorKind {
        match self {
            Self::MersenneTwister(_) => GeneratorKind::MersenneTwister,
            Self::LinearCongruential(_) => GeneratorKind::Lcg,
            Self::EntropySource(_) => GeneratorKind::EntropySource,
        }
    }

    /// Next raw 32-bit word.
    pub fn next_word(&mut self) -> Result<u32, LabError> {
        match self {
            Self::MersenneTwister(mt) => Ok(mt.next_word()),
            Self::LinearCongruential(lcg) => Ok(lcg.next_word()),
            Self::EntropySource(src) => {
                let mut word = [0u32; 1];
                src.fill_words(&mut word)?;
                Ok(word[0])
            }
        }
    }

    /// Next sample in `[0, 1)`.
    pub fn next_sample(&mut self) -> Result<f64, LabError> {
        self.next_word().map(to_unit)
    }

    /// Draw `count` samples. The entropy kind requests all words in one call.
    pub fn fill_samples(&mut self, count: usize) -> Result<Vec<f64>, LabError> {
        if let Self::EntropySource(src) = self {
            let mut words = vec![0u32; count];
            src.fill_words(&mut words)?;
            return Ok(words.into_iter().map(to_unit).collect());
        }
        (0..count).map(|_| self.next_sample()).collect()
    }
}

impl std::fmt::Debug for GeneratorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MersenneTwister(mt) => f.debug_tuple("MersenneTwister").field(mt).finish(),
            Self::LinearCongruential(lcg) => {
                f.debug_tuple("LinearCongruential").field(lcg).finish()
            }
            Self::EntropySource(src) => f.debug_tuple("EntropySource").field(&src.name()).finish(),
        }
    }
}
