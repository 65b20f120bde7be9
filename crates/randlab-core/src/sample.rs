//! Generated samples.

use serde::Serialize;

use crate::generator::GeneratorKind;

/// One draw, tagged with its position in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub index: usize,
    pub value: f64,
}

/// An ordered, immutable sequence of samples in `[0, 1)`.
///
/// Order is generation order; the runs and autocorrelation tests depend on
/// it. There is no mutable access: a new request builds a new set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSet {
    kind: GeneratorKind,
    /// `None` for the entropy kind, which ignores seeds.
    seed: Option<u32>,
    samples: Vec<f64>,
}

impl SampleSet {
    pub(crate) fn new(kind: GeneratorKind, seed: u32, samples: Vec<f64>) -> Self {
        Self {
            kind,
            seed: kind.is_seeded().then_some(seed),
            samples,
        }
    }

    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.samples
            .iter()
            .enumerate()
            .map(|(index, &value)| Sample { index, value })
    }
}

impl AsRef<[f64]> for SampleSet {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}
