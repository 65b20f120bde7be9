use std::io::Write;
use std::time::Duration;

use randlab_core::{LabConfig, SampleSet};

pub fn run(
    config: LabConfig,
    kind: &str,
    seed: Option<i64>,
    count: Option<i64>,
    format: &str,
    incremental: bool,
    delay_ms: u64,
) {
    let kind = super::parse_kind(kind).unwrap_or_else(|e| super::fail(e));
    let (seed, count) = super::resolve_request(&config, seed, count);
    let mut session = super::make_session(config);
    let json = format == "json";

    let set = if incremental {
        let stream = session.generate_incremental(kind, seed, count);
        super::cancel_on_ctrlc(stream.handle());
        let delay = Duration::from_millis(delay_ms);
        let outcome = stream.drive(|prefix| {
            if !json {
                let index = prefix.len() - 1;
                println!("{}", format_sample(index, prefix[index]));
                let _ = std::io::stdout().flush();
            }
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        });
        match outcome {
            Ok(Some(set)) => set,
            Ok(None) => {
                eprintln!("Cancelled.");
                std::process::exit(130);
            }
            Err(e) => super::fail(e),
        }
    } else {
        let set = session
            .generate(kind, seed, count)
            .unwrap_or_else(|e| super::fail(e));
        if !json {
            for sample in set.iter() {
                println!("{}", format_sample(sample.index, sample.value));
            }
        }
        set
    };

    if json {
        match to_json(&set) {
            Ok(s) => println!("{s}"),
            Err(e) => super::fail(e),
        }
    } else {
        eprintln!(
            "{} samples from {} ({})",
            set.len(),
            set.kind(),
            super::seed_label(set.kind(), set.seed())
        );
    }
}

fn format_sample(index: usize, value: f64) -> String {
    format!("{index:>6}  {value:.10}")
}

fn to_json(set: &SampleSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(set)
}
