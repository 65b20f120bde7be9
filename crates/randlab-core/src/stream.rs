//! Batch and incremental sample production.
//!
//! Batch generation returns a whole [`SampleSet`] in one call. Incremental
//! generation is a lazy iterator: each pull draws exactly one sample, and the
//! caller advances it at its own pace (one step per animation frame, say).
//! For the seeded kinds both paths yield identical sequences.
//!
//! Cancellation is cooperative. A [`CancelHandle`] is checked at every step
//! boundary; once it fires the sequence ends and can no longer produce a
//! result. Dropping the iterator has the same effect.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::config::SAMPLE_COUNT_LIMIT;
use crate::error::LabError;
use crate::generator::{GeneratorKind, GeneratorState};
use crate::sample::{Sample, SampleSet};
use crate::source::EntropySource;

/// Shared cancellation flag for one request.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop every sequence bound to this handle at its next step boundary.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Iterator adapter that ends as soon as its handle is cancelled.
#[derive(Debug, Clone)]
pub struct Cancellable<I> {
    inner: I,
    handle: CancelHandle,
}

impl<I> Cancellable<I> {
    pub fn new(inner: I, handle: CancelHandle) -> Self {
        Self { inner, handle }
    }

    pub fn handle(&self) -> &CancelHandle {
        &self.handle
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }
}

impl<I: Iterator> Iterator for Cancellable<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.handle.is_cancelled() {
            return None;
        }
        self.inner.next()
    }
}

/// Keep a requested count within `[1, SAMPLE_COUNT_LIMIT]`.
fn bounded_count(count: usize) -> usize {
    count.clamp(1, SAMPLE_COUNT_LIMIT)
}

/// Generate `count` samples in one call. `count` is clamped into
/// `[1, SAMPLE_COUNT_LIMIT]`.
pub fn generate_batch(
    kind: GeneratorKind,
    seed: u32,
    count: usize,
    entropy: &Arc<dyn EntropySource>,
) -> Result<SampleSet, LabError> {
    let count = bounded_count(count);
    let mut generator = GeneratorState::create_with_source(kind, seed, entropy);
    let samples = generator.fill_samples(count)?;
    debug!("batch: {count} samples from {kind}");
    Ok(SampleSet::new(kind, seed, samples))
}

/// Start an incremental generation with its own cancel handle. `count` is
/// clamped as for [`generate_batch`].
pub fn generate_incremental(
    kind: GeneratorKind,
    seed: u32,
    count: usize,
    entropy: &Arc<dyn EntropySource>,
) -> IncrementalGeneration {
    IncrementalGeneration::new(kind, seed, count, entropy, CancelHandle::new())
}

/// A sample sequence produced one draw per step.
///
/// Owns its generator and its growing buffer, so a superseded stream has no
/// path to any other request's samples.
#[derive(Debug)]
pub struct IncrementalGeneration {
    kind: GeneratorKind,
    seed: u32,
    generator: GeneratorState,
    produced: Vec<f64>,
    target: usize,
    handle: CancelHandle,
    failed: bool,
}

impl IncrementalGeneration {
    pub fn new(
        kind: GeneratorKind,
        seed: u32,
        count: usize,
        entropy: &Arc<dyn EntropySource>,
        handle: CancelHandle,
    ) -> Self {
        let count = bounded_count(count);
        Self {
            kind,
            seed,
            generator: GeneratorState::create_with_source(kind, seed, entropy),
            produced: Vec::with_capacity(count),
            target: count,
            handle,
            failed: false,
        }
    }

    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    pub fn is_complete(&self) -> bool {
        self.produced.len() == self.target
    }

    /// Number of samples this stream will produce.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Samples drawn so far.
    pub fn prefix(&self) -> &[f64] {
        &self.produced
    }

    /// The finished set, or `None` if the stream was cancelled, failed or
    /// has not been fully advanced.
    pub fn finish(self) -> Option<SampleSet> {
        if self.is_cancelled() || self.failed || !self.is_complete() {
            return None;
        }
        Some(SampleSet::new(self.kind, self.seed, self.produced))
    }

    /// Advance to completion, calling `on_sample` with the growing prefix
    /// after every step. Returns `Ok(None)` if cancelled along the way.
    pub fn drive<F>(mut self, mut on_sample: F) -> Result<Option<SampleSet>, LabError>
    where
        F: FnMut(&[f64]),
    {
        while let Some(step) = self.next() {
            step?;
            on_sample(&self.produced);
        }
        Ok(self.finish())
    }
}

impl Iterator for IncrementalGeneration {
    type Item = Result<Sample, LabError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.is_complete() {
            return None;
        }
        if self.is_cancelled() {
            debug!(
                "incremental {} stopped after {}/{} samples",
                self.kind,
                self.produced.len(),
                self.target
            );
            return None;
        }
        match self.generator.next_sample() {
            Ok(value) => {
                let index = self.produced.len();
                self.produced.push(value);
                Some(Ok(Sample { index, value }))
            }
            Err(e) => {
                warn!("incremental {} failed: {e}", self.kind);
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.target - self.produced.len();
        (0, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::tests::{CountingSource, FailingSource};
    use crate::source::default_source;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_incremental_matches_batch_for_seeded_kinds() {
        let src = default_source();
        for kind in [GeneratorKind::MersenneTwister, GeneratorKind::Lcg] {
            let batch = generate_batch(kind, 2024, 1500, &src).unwrap();
            let mut stream = generate_incremental(kind, 2024, 1500, &src);
            for step in stream.by_ref() {
                step.unwrap();
            }
            assert_eq!(stream.finish().unwrap(), batch);
        }
    }

    #[test]
    fn test_batch_is_deterministic() {
        let src = default_source();
        let a = generate_batch(GeneratorKind::MersenneTwister, 77, 300, &src).unwrap();
        let b = generate_batch(GeneratorKind::MersenneTwister, 77, 300, &src).unwrap();
        assert_eq!(a, b);
        let c = generate_batch(GeneratorKind::MersenneTwister, 78, 300, &src).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_incremental_yields_indexed_samples() {
        let src = default_source();
        let samples: Vec<Sample> = generate_incremental(GeneratorKind::Lcg, 1, 3, &src)
            .map(Result::unwrap)
            .collect();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].index, 0);
        assert_eq!(samples[0].value, 1_015_568_748.0 / 4_294_967_296.0);
        assert_eq!(samples[2].index, 2);
    }

    #[test]
    fn test_drive_reports_growing_prefix() {
        let src = default_source();
        let mut lengths = Vec::new();
        let set = generate_incremental(GeneratorKind::MersenneTwister, 5489, 4, &src)
            .drive(|prefix| lengths.push(prefix.len()))
            .unwrap()
            .unwrap();
        assert_eq!(lengths, vec![1, 2, 3, 4]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_cancel_stops_at_next_step() {
        let src = default_source();
        let mut stream = generate_incremental(GeneratorKind::Lcg, 9, 100, &src);
        stream.next().unwrap().unwrap();
        stream.next().unwrap().unwrap();
        stream.handle().cancel();
        assert!(stream.next().is_none());
        assert_eq!(stream.prefix().len(), 2);
        assert!(stream.finish().is_none());
    }

    #[test]
    fn test_drive_cancelled_mid_way_returns_none() {
        let src = default_source();
        let stream = generate_incremental(GeneratorKind::Lcg, 9, 100, &src);
        let handle = stream.handle();
        let mut calls = 0;
        let result = stream
            .drive(|prefix| {
                calls += 1;
                if prefix.len() == 10 {
                    handle.cancel();
                }
            })
            .unwrap();
        assert!(result.is_none());
        assert_eq!(calls, 10);
    }

    #[test]
    fn test_incremental_entropy_draws_one_per_step() {
        let counting = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let src: Arc<dyn EntropySource> = counting.clone();
        let stream = generate_incremental(GeneratorKind::EntropySource, 0, 25, &src);
        let set = stream.drive(|_| {}).unwrap().unwrap();
        assert_eq!(set.len(), 25);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 25);
    }

    #[test]
    fn test_incremental_entropy_failure_ends_stream() {
        let src: Arc<dyn EntropySource> = Arc::new(FailingSource);
        let mut stream = generate_incremental(GeneratorKind::EntropySource, 0, 5, &src);
        assert!(matches!(
            stream.next(),
            Some(Err(LabError::EntropySourceUnavailable { .. }))
        ));
        assert!(stream.next().is_none());
        assert!(stream.finish().is_none());
    }

    #[test]
    fn test_batch_entropy_failure() {
        let src: Arc<dyn EntropySource> = Arc::new(FailingSource);
        let err = generate_batch(GeneratorKind::EntropySource, 0, 5, &src).unwrap_err();
        assert!(matches!(err, LabError::EntropySourceUnavailable { .. }));
    }

    #[test]
    fn test_counts_are_clamped() {
        let src = default_source();
        let set = generate_batch(GeneratorKind::Lcg, 1, 0, &src).unwrap();
        assert_eq!(set.len(), 1);
        let stream = generate_incremental(GeneratorKind::Lcg, 1, 0, &src);
        assert_eq!(stream.target(), 1);

        let stream = generate_incremental(GeneratorKind::Lcg, 1, usize::MAX, &src);
        assert_eq!(stream.target(), SAMPLE_COUNT_LIMIT);
        let set = generate_batch(GeneratorKind::Lcg, 1, usize::MAX, &src).unwrap();
        assert_eq!(set.len(), SAMPLE_COUNT_LIMIT);
    }

    #[test]
    fn test_cancellable_adapter() {
        let handle = CancelHandle::new();
        let mut it = Cancellable::new(0..10, handle.clone());
        assert_eq!(it.next(), Some(0));
        assert_eq!(it.next(), Some(1));
        handle.cancel();
        assert_eq!(it.next(), None);
        assert!(it.handle().is_cancelled());
    }
}
