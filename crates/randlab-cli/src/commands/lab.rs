//! Animated walkthrough: samples arrive one per step, then each test result
//! is revealed element by element. Ctrl-C cancels the request; the stream
//! and every reveal bound to it stop at their next step.

use std::io::Write;
use std::time::Duration;

use randlab_core::{LabConfig, RevealFrame, RevealItem, TestResult};
use randlab_tests::Direction;

/// Direction markers per output line.
const MARKERS_PER_LINE: usize = 60;

pub fn run(config: LabConfig, kind: &str, seed: Option<i64>, count: Option<i64>, delay_ms: u64) {
    let kind = super::parse_kind(kind).unwrap_or_else(|e| super::fail(e));
    let (seed, count) = super::resolve_request(&config, seed, count);
    let mut session = super::make_session(config);
    let delay = Duration::from_millis(delay_ms);

    let stream = session.generate_incremental(kind, seed, count);
    super::cancel_on_ctrlc(stream.handle());
    let target = stream.target();

    println!("Generating {target} samples from {kind}...");
    let outcome = stream.drive(|prefix| {
        print!("\r  {}", progress_line(prefix, target));
        let _ = std::io::stdout().flush();
        pause(delay);
    });
    println!();

    let set = match outcome {
        Ok(Some(set)) => set,
        Ok(None) => {
            println!("Cancelled.");
            return;
        }
        Err(e) => super::fail(e),
    };

    let results = session.evaluate_all(&set);
    println!(
        "\n  mean {:.6}   variance {:.6}\n",
        results.mean, results.variance
    );

    for result in results.results() {
        if !reveal(&session, result, delay) {
            println!("\nCancelled.");
            return;
        }
    }

    println!(
        "\nOverall: {}",
        if results.passed {
            "all tests passed"
        } else {
            "at least one test failed"
        }
    );
}

/// Play one reveal. Returns false if the request was cancelled.
fn reveal(session: &randlab_core::Session, result: TestResult, delay: Duration) -> bool {
    let header = format!("{} ({})", result.name(), result.kind());
    let verdict = format!(
        "  => statistic {:.4}, grade {}, {}",
        result.statistic(),
        result.grade(),
        super::pass_label(result.passed())
    );
    let bins = match &result {
        TestResult::ChiSquare(r) => r.bins,
        _ => 0,
    };
    let max_observed = match &result {
        TestResult::ChiSquare(r) => r.observed.iter().copied().max().unwrap_or(0),
        _ => 0,
    };

    println!("{header}");
    let frames = session.reveal_incrementally(result);
    let handle = frames.handle().clone();
    for frame in frames {
        match &frame.item {
            RevealItem::Direction { .. } => {
                print!("{}", render_frame(&frame, bins, max_observed));
                if frame.visible % MARKERS_PER_LINE == 0 || frame.is_last() {
                    println!();
                }
                let _ = std::io::stdout().flush();
            }
            _ => println!("{}", render_frame(&frame, bins, max_observed)),
        }
        pause(delay);
    }
    if handle.is_cancelled() {
        return false;
    }
    println!("{verdict}\n");
    true
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

fn progress_line(prefix: &[f64], target: usize) -> String {
    let last = prefix.last().copied().unwrap_or(0.0);
    format!("{:>6}/{target}  latest {last:.6}", prefix.len())
}

fn direction_marker(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "↑",
        Direction::Down => "↓",
        Direction::Flat => "→",
    }
}

/// Text for one reveal frame. `bins` and `max_observed` only matter for
/// chi-square frames.
fn render_frame(frame: &RevealFrame, bins: usize, max_observed: u64) -> String {
    match &frame.item {
        RevealItem::Bin {
            index,
            observed,
            expected,
            contribution,
        } => {
            let width = 1.0 / bins.max(1) as f64;
            let lo = *index as f64 * width;
            format!(
                "  [{lo:.2}, {:.2})  {:<20} O={observed:<5} E={expected:<8.2} +{contribution:.4}  Σ={:.4}",
                lo + width,
                super::bar(*observed, max_observed, 20),
                frame.running_total.unwrap_or(0.0)
            )
        }
        RevealItem::Direction { direction, .. } => direction_marker(*direction).to_string(),
        RevealItem::Product { index, value } => format!(
            "  pair {index:>5}  {value:+.6}  Σ={:+.6}",
            frame.running_total.unwrap_or(0.0)
        ),
    }
}
