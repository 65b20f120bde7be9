//! Caller-owned generation sessions.
//!
//! A [`Session`] bundles configuration, an entropy source and the cancel
//! handle of the request currently in flight. Starting a new generation
//! request cancels the previous one, so a superseded incremental stream or
//! reveal stops at its next step and never touches the new request's data.
//!
//! Generator state is not kept between requests: every request rebuilds it
//! from `(kind, seed)`, which makes each request reproducible on its own.

use std::sync::Arc;

use log::debug;
use randlab_tests::{Reveal, TestResult, TestResultSet};
use uuid::Uuid;

use crate::config::{LabConfig, clamp_seed};
use crate::error::LabError;
use crate::generator::GeneratorKind;
use crate::sample::SampleSet;
use crate::source::{self, EntropySource};
use crate::stream::{self, CancelHandle, Cancellable, IncrementalGeneration};

pub struct Session {
    id: Uuid,
    config: LabConfig,
    entropy: Arc<dyn EntropySource>,
    active: CancelHandle,
}

impl Session {
    /// New session drawing external entropy from the OS.
    pub fn new(config: LabConfig) -> Self {
        Self::with_entropy_source(config, source::default_source())
    }

    pub fn with_entropy_source(config: LabConfig, entropy: Arc<dyn EntropySource>) -> Self {
        let id = Uuid::new_v4();
        debug!("session {id} using entropy source '{}'", entropy.name());
        Self {
            id,
            config: config.normalized(),
            entropy,
            active: CancelHandle::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    pub fn entropy_source(&self) -> &Arc<dyn EntropySource> {
        &self.entropy
    }

    /// Cancel the in-flight request and open a new one.
    fn begin_request(&mut self) -> CancelHandle {
        self.active.cancel();
        self.active = CancelHandle::new();
        self.active.clone()
    }

    /// Generate a full sample set. `seed` and `count` are clamped into range.
    pub fn generate(
        &mut self,
        kind: GeneratorKind,
        seed: i64,
        count: i64,
    ) -> Result<SampleSet, LabError> {
        self.begin_request();
        let seed = clamp_seed(seed);
        let count = self.config.clamp_count(count);
        debug!("session {}: generate {count} x {kind} (seed {seed})", self.id);
        stream::generate_batch(kind, seed, count, &self.entropy)
    }

    /// Start an incremental generation bound to a fresh request.
    pub fn generate_incremental(
        &mut self,
        kind: GeneratorKind,
        seed: i64,
        count: i64,
    ) -> IncrementalGeneration {
        let handle = self.begin_request();
        let seed = clamp_seed(seed);
        let count = self.config.clamp_count(count);
        debug!(
            "session {}: incremental {count} x {kind} (seed {seed})",
            self.id
        );
        IncrementalGeneration::new(kind, seed, count, &self.entropy, handle)
    }

    /// Run all three tests with the configured bin count and lag.
    pub fn evaluate_all(&self, samples: &SampleSet) -> TestResultSet {
        self.evaluate_with(samples, None, None)
    }

    /// Run all three tests, overriding the configured bin count or lag.
    /// Bins are clamped into `[MIN_BINS, MAX_BINS]` and lag is at least 1.
    pub fn evaluate_with(
        &self,
        samples: &SampleSet,
        bins: Option<usize>,
        lag: Option<usize>,
    ) -> TestResultSet {
        let bins = randlab_tests::clamp_bins(bins.unwrap_or(self.config.chi_square_bins));
        let lag = lag.unwrap_or(self.config.autocorrelation_lag).max(1);
        randlab_tests::evaluate_all(samples.as_slice(), bins, lag)
    }

    /// Reveal a finished result step by step. The next generation request
    /// (or [`Session::cancel`]) ends the reveal.
    pub fn reveal_incrementally(&self, result: TestResult) -> Cancellable<Reveal> {
        Cancellable::new(randlab_tests::reveal(result), self.active.clone())
    }

    /// Cancel whatever is in flight.
    pub fn cancel(&self) {
        debug!("session {}: cancel", self.id);
        self.active.cancel();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("entropy", &self.entropy.name())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(LabConfig::default())
    }
}
