//! Randomness test battery for unit-interval sample sequences.
//!
//! Provides the descriptive statistics (mean, population variance) and three
//! statistical tests over samples in `[0, 1)`: chi-square goodness-of-fit,
//! a runs-up/runs-down test and lag-k autocorrelation. Each test returns a
//! result struct carrying its statistic, the diagnostic detail needed to
//! display it (per-bin counts, run directions, lagged products), a p-value,
//! a letter grade and a pass/fail verdict.
//!
//! Empty or too-short input is a valid "nothing generated yet" state: every
//! test returns a neutral, passing result instead of failing.
//!
//! The [`reveal`] module turns an already-computed [`TestResult`] into a
//! sequence of frames for step-by-step presentation.

pub mod reveal;

pub use reveal::{Reveal, RevealFrame, RevealItem, reveal};

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::erfc;

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Default number of chi-square bins.
pub const DEFAULT_BINS: usize = 10;

/// Smallest usable bin count (one degree of freedom).
pub const MIN_BINS: usize = 2;

/// Largest bin count accepted; larger requests are lowered to this.
pub const MAX_BINS: usize = 1000;

/// Critical value of χ²(9) at α = 0.05. Only valid for exactly 10 bins.
pub const CHI_SQUARE_CRITICAL_10_BINS: f64 = 16.919;

/// Significance level used to derive critical values for other bin counts.
pub const SIGNIFICANCE: f64 = 0.05;

/// Runs test accepts |observed − expected| up to this many standard deviations.
pub const RUNS_SIGMA_LIMIT: f64 = 2.0;

/// Autocorrelation coefficients at or above this magnitude fail.
pub const AUTOCORRELATION_LIMIT: f64 = 0.1;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Which test produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    ChiSquare,
    Runs,
    Autocorrelation,
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChiSquare => write!(f, "chi_square"),
            Self::Runs => write!(f, "runs"),
            Self::Autocorrelation => write!(f, "autocorrelation"),
        }
    }
}

/// Direction of change between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    /// `sign(current − previous)`.
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Self::Up
        } else if current < previous {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// Chi-square goodness-of-fit against the uniform distribution.
#[derive(Debug, Clone, Serialize)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub bins: usize,
    /// Observed count per bin.
    pub observed: Vec<u64>,
    /// Expected count per bin (`N / bins`).
    pub expected: f64,
    /// `(O − E)² / E` per bin; sums to `statistic`.
    pub contributions: Vec<f64>,
    pub degrees_of_freedom: usize,
    pub critical_value: f64,
    pub p_value: Option<f64>,
    pub grade: char,
    pub passed: bool,
}

/// Runs up and down.
#[derive(Debug, Clone, Serialize)]
pub struct RunsResult {
    pub runs: usize,
    pub expected: f64,
    pub std_dev: f64,
    pub z_score: f64,
    /// `directions[j]` is the direction from sample `j` to sample `j + 1`.
    pub directions: Vec<Direction>,
    pub p_value: Option<f64>,
    pub grade: char,
    pub passed: bool,
}

/// Autocorrelation at a single lag.
#[derive(Debug, Clone, Serialize)]
pub struct AutocorrelationResult {
    pub lag: usize,
    pub coefficient: f64,
    pub numerator: f64,
    pub denominator: f64,
    /// `(x_i − mean)(x_{i+lag} − mean)` per pair; sums to `numerator`.
    pub products: Vec<f64>,
    pub p_value: Option<f64>,
    pub grade: char,
    pub passed: bool,
}

/// Result of a single randomness test, tagged by kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestResult {
    ChiSquare(ChiSquareResult),
    Runs(RunsResult),
    Autocorrelation(AutocorrelationResult),
}

impl TestResult {
    pub fn kind(&self) -> TestKind {
        match self {
            Self::ChiSquare(_) => TestKind::ChiSquare,
            Self::Runs(_) => TestKind::Runs,
            Self::Autocorrelation(_) => TestKind::Autocorrelation,
        }
    }

    /// Human-readable test name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChiSquare(_) => "Chi-Square",
            Self::Runs(_) => "Runs Test",
            Self::Autocorrelation(_) => "Autocorrelation",
        }
    }

    pub fn passed(&self) -> bool {
        match self {
            Self::ChiSquare(r) => r.passed,
            Self::Runs(r) => r.passed,
            Self::Autocorrelation(r) => r.passed,
        }
    }

    /// Headline statistic: χ², run count or correlation coefficient.
    pub fn statistic(&self) -> f64 {
        match self {
            Self::ChiSquare(r) => r.statistic,
            Self::Runs(r) => r.runs as f64,
            Self::Autocorrelation(r) => r.coefficient,
        }
    }

    pub fn p_value(&self) -> Option<f64> {
        match self {
            Self::ChiSquare(r) => r.p_value,
            Self::Runs(r) => r.p_value,
            Self::Autocorrelation(r) => r.p_value,
        }
    }

    pub fn grade(&self) -> char {
        match self {
            Self::ChiSquare(r) => r.grade,
            Self::Runs(r) => r.grade,
            Self::Autocorrelation(r) => r.grade,
        }
    }
}

/// Descriptive statistics and all three tests over one sample set.
#[derive(Debug, Clone, Serialize)]
pub struct TestResultSet {
    pub sample_count: usize,
    pub mean: f64,
    pub variance: f64,
    pub chi_square: ChiSquareResult,
    pub runs: RunsResult,
    pub autocorrelation: AutocorrelationResult,
    /// True when every test passed.
    pub passed: bool,
}

impl TestResultSet {
    /// The three test results in display order.
    pub fn results(&self) -> Vec<TestResult> {
        vec![
            TestResult::ChiSquare(self.chi_square.clone()),
            TestResult::Runs(self.runs.clone()),
            TestResult::Autocorrelation(self.autocorrelation.clone()),
        ]
    }
}

/// Assign a letter grade based on p-value.
///
/// - A: p >= 0.1
/// - B: p >= 0.01
/// - C: p >= 0.001
/// - D: p >= 0.0001
/// - F: otherwise or None
pub fn grade_from_p(p: Option<f64>) -> char {
    match p {
        Some(p) if p >= 0.1 => 'A',
        Some(p) if p >= 0.01 => 'B',
        Some(p) if p >= 0.001 => 'C',
        Some(p) if p >= 0.0001 => 'D',
        _ => 'F',
    }
}

/// Two-sided p-value of a standard normal z score.
fn normal_two_sided_p(z: f64) -> f64 {
    erfc(z.abs() / 2.0_f64.sqrt()).clamp(0.0, 1.0)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Descriptive statistics
// ═══════════════════════════════════════════════════════════════════════════════

/// Arithmetic mean. Returns 0 for empty input.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population variance (divisor N). Returns 0 for fewer than two samples.
pub fn variance(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    samples.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / samples.len() as f64
}

// ═══════════════════════════════════════════════════════════════════════════════
// Chi-square
// ═══════════════════════════════════════════════════════════════════════════════

/// Critical χ² value for `bins` equal-width bins at α = 0.05.
///
/// Ten bins use the tabulated 16.919. Any other count is looked up from the
/// χ²(bins − 1) quantile function rather than reusing that constant.
pub fn chi_square_critical_value(bins: usize) -> f64 {
    let bins = clamp_bins(bins);
    if bins == DEFAULT_BINS {
        return CHI_SQUARE_CRITICAL_10_BINS;
    }
    match ChiSquared::new((bins - 1) as f64) {
        Ok(dist) => dist.inverse_cdf(1.0 - SIGNIFICANCE),
        Err(_) => f64::INFINITY,
    }
}

/// Clamp a requested bin count into `[MIN_BINS, MAX_BINS]`.
pub fn clamp_bins(bins: usize) -> usize {
    bins.clamp(MIN_BINS, MAX_BINS)
}

/// Bin index of a sample; 1.0 lands in the last bin.
fn bin_index(value: f64, bins: usize) -> usize {
    ((value * bins as f64).floor() as usize).min(bins - 1)
}

/// Chi-square goodness-of-fit of `samples` against `bins` equal-width bins.
pub fn chi_square_test(samples: &[f64], bins: usize) -> ChiSquareResult {
    let bins = clamp_bins(bins);
    let n = samples.len();
    let mut observed = vec![0u64; bins];
    for &v in samples {
        observed[bin_index(v, bins)] += 1;
    }

    let critical_value = chi_square_critical_value(bins);
    let degrees_of_freedom = bins - 1;

    if n == 0 {
        return ChiSquareResult {
            statistic: 0.0,
            bins,
            observed,
            expected: 0.0,
            contributions: vec![0.0; bins],
            degrees_of_freedom,
            critical_value,
            p_value: Some(1.0),
            grade: 'A',
            passed: true,
        };
    }

    let expected = n as f64 / bins as f64;
    let contributions: Vec<f64> = observed
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .collect();
    let statistic: f64 = contributions.iter().sum();
    let p_value = ChiSquared::new(degrees_of_freedom as f64)
        .ok()
        .map(|dist| dist.sf(statistic));

    ChiSquareResult {
        statistic,
        bins,
        observed,
        expected,
        contributions,
        degrees_of_freedom,
        critical_value,
        p_value,
        grade: grade_from_p(p_value),
        passed: statistic < critical_value,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runs
// ═══════════════════════════════════════════════════════════════════════════════

/// Runs up and down.
///
/// Directions start at the second sample, so the first comparison never
/// reaches before index 0. A new run starts whenever the direction differs
/// from the previous one.
pub fn runs_test(samples: &[f64]) -> RunsResult {
    let n = samples.len();
    if n < 2 {
        return RunsResult {
            runs: 0,
            expected: 0.0,
            std_dev: 0.0,
            z_score: 0.0,
            directions: Vec::new(),
            p_value: Some(1.0),
            grade: 'A',
            passed: true,
        };
    }

    let directions: Vec<Direction> = samples
        .windows(2)
        .map(|w| Direction::between(w[0], w[1]))
        .collect();
    let runs = 1 + directions.windows(2).filter(|d| d[0] != d[1]).count();

    let nf = n as f64;
    let expected = (2.0 * nf - 1.0) / 3.0;
    let std_dev = ((16.0 * nf - 29.0) / 90.0).sqrt();
    let deviation = runs as f64 - expected;
    let z_score = deviation / std_dev;
    let p_value = Some(normal_two_sided_p(z_score));

    RunsResult {
        runs,
        expected,
        std_dev,
        z_score,
        directions,
        p_value,
        grade: grade_from_p(p_value),
        passed: deviation.abs() <= RUNS_SIGMA_LIMIT * std_dev,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Autocorrelation
// ═══════════════════════════════════════════════════════════════════════════════

/// Autocorrelation coefficient at `lag`.
pub fn autocorrelation_test(samples: &[f64], lag: usize) -> AutocorrelationResult {
    let n = samples.len();
    if n <= lag {
        return AutocorrelationResult {
            lag,
            coefficient: 0.0,
            numerator: 0.0,
            denominator: 0.0,
            products: Vec::new(),
            p_value: Some(1.0),
            grade: 'A',
            passed: true,
        };
    }

    let m = mean(samples);
    let products: Vec<f64> = samples
        .iter()
        .zip(&samples[lag..])
        .map(|(a, b)| (a - m) * (b - m))
        .collect();
    let numerator: f64 = products.iter().sum();
    let denominator: f64 = samples.iter().map(|x| (x - m) * (x - m)).sum();
    let coefficient = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };
    let p_value = Some(normal_two_sided_p(coefficient * (n as f64).sqrt()));

    AutocorrelationResult {
        lag,
        coefficient,
        numerator,
        denominator,
        products,
        p_value,
        grade: grade_from_p(p_value),
        passed: coefficient.abs() < AUTOCORRELATION_LIMIT,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Run the descriptive statistics and all three tests.
pub fn evaluate_all(samples: &[f64], bins: usize, lag: usize) -> TestResultSet {
    let chi_square = chi_square_test(samples, bins);
    let runs = runs_test(samples);
    let autocorrelation = autocorrelation_test(samples, lag);
    let passed = chi_square.passed && runs.passed && autocorrelation.passed;
    TestResultSet {
        sample_count: samples.len(),
        mean: mean(samples),
        variance: variance(samples),
        chi_square,
        runs,
        autocorrelation,
        passed,
    }
}
