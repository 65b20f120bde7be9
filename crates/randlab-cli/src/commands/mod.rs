pub mod generate;
pub mod lab;
pub mod report;
pub mod server;

use std::fmt::Display;

use randlab_core::{CancelHandle, GeneratorKind, LabConfig, LabError, Session};

/// Print an error and exit with status 1.
pub fn fail(err: impl Display) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(1);
}

/// Load the config file if one was given, otherwise use defaults.
pub fn load_config(path: Option<&str>) -> LabConfig {
    match path {
        Some(p) => LabConfig::load_from_path(p).unwrap_or_else(|e| fail(e)),
        None => LabConfig::default(),
    }
}

/// Parse a generator name (`mt`, `lcg`, `csprng`, `trng`, ...).
pub fn parse_kind(s: &str) -> Result<GeneratorKind, LabError> {
    s.parse()
}

/// Requested seed and count, with config defaults for missing values.
pub fn resolve_request(config: &LabConfig, seed: Option<i64>, count: Option<i64>) -> (i64, i64) {
    (
        seed.unwrap_or(i64::from(config.default_seed)),
        count.unwrap_or(config.default_sample_count as i64),
    )
}

/// Cancel `handle` on Ctrl-C. The handler can only be installed once per
/// process; a second install is logged and ignored.
pub fn cancel_on_ctrlc(handle: CancelHandle) {
    if let Err(e) = ctrlc::set_handler(move || handle.cancel()) {
        log::warn!("could not install Ctrl-C handler: {e}");
    }
}

/// Describe the seed of a generator kind for headers.
pub fn seed_label(kind: GeneratorKind, seed: Option<u32>) -> String {
    match seed {
        Some(s) if kind.is_seeded() => format!("seed {s}"),
        _ => "unseeded".to_string(),
    }
}

/// Horizontal bar of `width` cells scaled so that `max` fills the row.
pub fn bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

pub fn pass_label(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

pub fn make_session(config: LabConfig) -> Session {
    Session::new(config)
}
