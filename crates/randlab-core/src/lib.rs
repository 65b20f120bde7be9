//! # randlab-core
//!
//! Random-number generation engine for the randlab workbench.
//!
//! Three generator kinds sit behind one interface: a bit-exact MT19937, a
//! 32-bit linear congruential generator and a non-seedable external entropy
//! source (the OS CSPRNG by default). Samples are produced either in one
//! batch or incrementally through a cancellable iterator, and evaluated with
//! the test battery from [`randlab_tests`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use randlab_core::{GeneratorKind, LabConfig, Session};
//!
//! let mut session = Session::new(LabConfig::default());
//! let samples = session.generate(GeneratorKind::MersenneTwister, 5489, 1000)?;
//! let results = session.evaluate_all(&samples);
//! println!("chi-square {:.3} passed={}", results.chi_square.statistic, results.passed);
//! # Ok::<(), randlab_core::LabError>(())
//! ```
//!
//! ## Architecture
//!
//! GeneratorState → SampleStream (batch | incremental) → SampleSet → tests
//!
//! A [`Session`] owns the configuration and the cancel handle of the request
//! in flight; a new request cancels the previous one at its next step.

pub mod config;
pub mod error;
pub mod generator;
pub mod sample;
pub mod session;
pub mod source;
pub mod stream;

pub use config::{LabConfig, SAMPLE_COUNT_LIMIT, clamp_seed};
pub use error::LabError;
pub use generator::{GeneratorKind, GeneratorState, Lcg, Mt19937, to_unit};
pub use sample::{Sample, SampleSet};
pub use session::Session;
pub use source::{EntropySource, OsEntropy, SourceInfo, default_source};
pub use stream::{
    CancelHandle, Cancellable, IncrementalGeneration, generate_batch, generate_incremental,
};

pub use randlab_tests::{
    MAX_BINS, MIN_BINS, Reveal, RevealFrame, RevealItem, TestKind, TestResult, TestResultSet,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
