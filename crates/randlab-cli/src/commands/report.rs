use serde::Serialize;

use randlab_core::{GeneratorKind, LabConfig, TestResultSet};

/// Everything written by `--output`.
#[derive(Serialize)]
struct ReportFile<'a> {
    version: &'static str,
    generator: GeneratorKind,
    seed: Option<u32>,
    results: &'a TestResultSet,
}

pub fn run(
    config: LabConfig,
    kind: &str,
    seed: Option<i64>,
    count: Option<i64>,
    bins: Option<usize>,
    lag: Option<usize>,
    output_path: Option<&str>,
) {
    let kind = super::parse_kind(kind).unwrap_or_else(|e| super::fail(e));
    let (seed, count) = super::resolve_request(&config, seed, count);
    let mut session = super::make_session(config);

    let set = session
        .generate(kind, seed, count)
        .unwrap_or_else(|e| super::fail(e));
    println!(
        "Running test battery on {} samples from {} ({})...\n",
        set.len(),
        set.kind(),
        super::seed_label(set.kind(), set.seed())
    );

    let results = session.evaluate_with(&set, bins, lag);
    print!("{}", summary_table(&results));

    if let Some(path) = output_path {
        let report = ReportFile {
            version: randlab_core::VERSION,
            generator: set.kind(),
            seed: set.seed(),
            results: &results,
        };
        if let Err(e) = write_report(path, &report) {
            eprintln!("Failed to write report to {path}: {e}");
        } else {
            println!("\nReport saved to: {path}");
        }
    }
}

fn write_report(path: &str, report: &ReportFile<'_>) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
}

fn summary_table(results: &TestResultSet) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Mean:     {:.6}  (ideal 0.5)\n", results.mean));
    out.push_str(&format!(
        "  Variance: {:.6}  (ideal {:.6})\n\n",
        results.variance,
        1.0 / 12.0
    ));
    out.push_str(&format!("{}\n", "=".repeat(60)));
    out.push_str(&format!(
        "{:<18} {:>12} {:>10} {:>6} {:>6}\n",
        "Test", "Statistic", "p-value", "Grade", "Result"
    ));
    out.push_str(&format!("{}\n", "-".repeat(60)));
    for r in results.results() {
        let p = r
            .p_value()
            .map(|p| format!("{p:.4}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<16} {:>12.4} {:>10} {:>6} {:>6}\n",
            r.name(),
            r.statistic(),
            p,
            r.grade(),
            super::pass_label(r.passed())
        ));
    }
    out.push_str(&format!("{}\n", "-".repeat(60)));
    out.push_str(&format!(
        "  Overall: {}\n",
        if results.passed {
            "all tests passed"
        } else {
            "at least one test failed"
        }
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use randlab_core::Session;

    #[test]
    fn test_summary_lists_every_test() {
        let mut session = Session::default();
        let set = session.generate(GeneratorKind::MersenneTwister, 5489, 500).unwrap();
        let table = summary_table(&session.evaluate_all(&set));
        assert!(table.contains("Chi-Square"));
        assert!(table.contains("Runs Test"));
        assert!(table.contains("Autocorrelation"));
        assert!(table.contains("Overall"));
    }

    #[test]
    fn test_empty_results_are_neutral() {
        let results = randlab_tests::evaluate_all(&[], 10, 1);
        let table = summary_table(&results);
        assert!(table.contains("all tests passed"));
    }

    #[test]
    fn test_write_report_json() {
        let mut session = Session::default();
        let set = session.generate(GeneratorKind::Lcg, 1, 100).unwrap();
        let results = session.evaluate_all(&set);
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.json");
        let report = ReportFile {
            version: randlab_core::VERSION,
            generator: set.kind(),
            seed: set.seed(),
            results: &results,
        };
        write_report(path.to_str().unwrap(), &report).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["generator"], "lcg");
        assert_eq!(value["results"]["sample_count"], 100);
        assert_eq!(value["results"]["chi_square"]["observed"].as_array().unwrap().len(), 10);
    }
}
