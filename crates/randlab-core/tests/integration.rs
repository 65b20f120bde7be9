//! Integration tests for randlab-core.
//!
//! These tests exercise the full pipeline:
//! session → generation (batch or incremental) → test battery → reveal.

use std::sync::Arc;

use randlab_core::{
    EntropySource, GeneratorKind, LabConfig, LabError, RevealItem, Session, SourceInfo,
    TestResult, generate_batch, generate_incremental,
};

struct UnpluggedSource;

static UNPLUGGED: SourceInfo = SourceInfo {
    name: "unplugged",
    description: "never answers",
};

impl EntropySource for UnpluggedSource {
    fn info(&self) -> &SourceInfo {
        &UNPLUGGED
    }
    fn is_available(&self) -> bool {
        false
    }
    fn fill_words(&self, _out: &mut [u32]) -> Result<(), LabError> {
        Err(LabError::EntropySourceUnavailable {
            source: "unplugged",
            reason: "device removed".to_string(),
        })
    }
}

#[test]
fn mersenne_twister_reference_sequence() {
    let mut session = Session::default();
    let set = session
        .generate(GeneratorKind::MersenneTwister, 5489, 5000)
        .unwrap();
    let words: Vec<u32> = set
        .as_slice()
        .iter()
        .map(|v| (v * 4_294_967_296.0) as u32)
        .collect();
    assert_eq!(words[0], 3_499_211_612);
    assert_eq!(words[1], 581_869_302);

    // 10000 draws exceeds max_sample_count; drive the generator directly.
    let mut mt = randlab_core::Mt19937::new(5489);
    let mut last = 0;
    for _ in 0..10_000 {
        last = mt.next_word();
    }
    assert_eq!(last, 4_123_659_995);
}

#[test]
fn lcg_first_sample() {
    let mut session = Session::default();
    let set = session.generate(GeneratorKind::Lcg, 1, 1).unwrap();
    assert_eq!(set.as_slice()[0], 1_015_568_748.0 / 4_294_967_296.0);
}

#[test]
fn incremental_equals_batch_for_seeded_kinds() {
    let source = randlab_core::default_source();
    for kind in [GeneratorKind::MersenneTwister, GeneratorKind::Lcg] {
        for seed in [0u32, 1, 5489, u32::MAX] {
            let batch = generate_batch(kind, seed, 1000, &source).unwrap();
            let streamed = generate_incremental(kind, seed, 1000, &source)
                .drive(|_| {})
                .unwrap()
                .unwrap();
            assert_eq!(batch, streamed, "{kind} seed {seed}");
        }
    }
}

#[test]
fn superseded_stream_never_touches_new_request() {
    let mut session = Session::default();
    let mut old = session.generate_incremental(GeneratorKind::Lcg, 11, 1000);
    for _ in 0..10 {
        old.next().unwrap().unwrap();
    }

    let mut fresh = session.generate_incremental(GeneratorKind::Lcg, 11, 20);
    fresh.next().unwrap().unwrap();

    // Old stream keeps its own 10 samples and produces nothing more.
    assert!(old.next().is_none());
    assert_eq!(old.prefix().len(), 10);
    assert_eq!(fresh.prefix().len(), 1);

    let set = fresh.drive(|_| {}).unwrap().unwrap();
    assert_eq!(set.len(), 20);
    assert_eq!(&old.prefix()[..10], &set.as_slice()[..10]);
}

#[test]
fn entropy_failure_surfaces_to_caller() {
    let mut session =
        Session::with_entropy_source(LabConfig::default(), Arc::new(UnpluggedSource));
    match session.generate(GeneratorKind::EntropySource, 0, 100) {
        Err(LabError::EntropySourceUnavailable { source, .. }) => assert_eq!(source, "unplugged"),
        other => panic!("expected entropy failure, got {other:?}"),
    }

    let mut stream = session.generate_incremental(GeneratorKind::EntropySource, 0, 100);
    assert!(matches!(stream.next(), Some(Err(_))));
    assert!(stream.next().is_none());
}

#[test]
fn os_entropy_samples_in_unit_interval() {
    let mut session = Session::default();
    let set = session.generate(GeneratorKind::EntropySource, 0, 2000).unwrap();
    assert_eq!(set.len(), 2000);
    assert_eq!(set.seed(), None);
    assert!(set.iter().all(|s| (0.0..1.0).contains(&s.value)));
}

#[test]
fn evaluation_of_mersenne_twister_output_is_plausible() {
    let mut session = Session::default();
    let set = session
        .generate(GeneratorKind::MersenneTwister, 5489, 5000)
        .unwrap();
    let results = session.evaluate_all(&set);
    assert_eq!(results.sample_count, 5000);
    assert!((results.mean - 0.5).abs() < 0.03, "mean {}", results.mean);
    assert!(
        (results.variance - 1.0 / 12.0).abs() < 0.01,
        "variance {}",
        results.variance
    );
    assert_eq!(results.chi_square.observed.iter().sum::<u64>(), 5000);
    assert!(results.autocorrelation.coefficient.abs() < 0.1);
}

#[test]
fn chi_square_reveal_ends_at_final_statistic() {
    let mut session = Session::default();
    let set = session.generate(GeneratorKind::Lcg, 3, 500).unwrap();
    let results = session.evaluate_all(&set);
    let statistic = results.chi_square.statistic;

    let frames: Vec<_> = session
        .reveal_incrementally(TestResult::ChiSquare(results.chi_square))
        .collect();
    assert_eq!(frames.len(), 10);
    assert!(matches!(frames[0].item, RevealItem::Bin { index: 0, .. }));
    let last = frames.last().unwrap();
    assert!(last.is_last());
    assert!((last.running_total.unwrap() - statistic).abs() < 1e-9);
}

#[test]
fn autocorrelation_reveal_ends_at_numerator() {
    let mut session = Session::default();
    let set = session.generate(GeneratorKind::MersenneTwister, 8, 100).unwrap();
    let results = session.evaluate_all(&set);
    let numerator = results.autocorrelation.numerator;

    let frames: Vec<_> = session
        .reveal_incrementally(TestResult::Autocorrelation(results.autocorrelation))
        .collect();
    assert_eq!(frames.len(), 99);
    let running = frames.last().unwrap().running_total.unwrap();
    assert!((running - numerator).abs() < 1e-9);
}

#[test]
fn config_file_drives_session() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("lab.json");
    std::fs::write(&path, r#"{ "max_sample_count": 50, "chi_square_bins": 5 }"#).unwrap();
    let config = LabConfig::load_from_path(&path).unwrap();

    let mut session = Session::new(config);
    let set = session.generate(GeneratorKind::Lcg, 1, 10_000).unwrap();
    assert_eq!(set.len(), 50);
    let results = session.evaluate_all(&set);
    assert_eq!(results.chi_square.observed.len(), 5);
}
