//! End-to-end checks of the clustering kernel and the command-line pipeline.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use dendra::config::Config;
use dendra::io::OutputFormat;
use dendra::pipelines::ClusteringPipeline;
use dendra::{
    compute_distance, compute_distance_matrix, hierarchical_cluster, AgglomerativeClusterer,
    Outcome, ProgressController, ProgressIntervals, SampleIdx, SampleMatrix, SteppingClock,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::NamedTempFile;

// --- Helpers ---

fn random_samples(n_samples: usize, vector_size: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_samples * vector_size)
        .map(|_| rng.gen_range(-10.0f32..10.0))
        .collect()
}

fn sample_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Create temp file");
    file.write_all(contents.as_bytes()).expect("Write samples");
    file.flush().expect("Flush samples");
    file
}

fn config(args: &[&str]) -> Config {
    Config::try_parse_from(std::iter::once("dendra").chain(args.iter().copied()))
        .expect("Parse arguments")
        .validate()
        .expect("Valid configuration")
}

// --- Kernel ---

#[test]
fn three_point_scenario() {
    let data = [0.0, 0.0, 0.0, 1.0, 5.0, 5.0];
    let samples = SampleMatrix::new(&data, 3, 2).unwrap();
    let d = hierarchical_cluster(&samples, None)
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(d.heights().len(), 2);
    assert_eq!(d.heights()[0], 1.0);
    assert!((d.heights()[1] - 6.737).abs() < 1e-3);
    assert_eq!(d.merge_a(), &[0, 0]);
    assert_eq!(d.merge_b(), &[1, 1]);
    assert_eq!(d.leaf_order(), &[SampleIdx(0), SampleIdx(1), SampleIdx(2)]);
}

#[test]
fn cancellation_yields_no_result() {
    let data = random_samples(200, 8, 7);
    let samples = SampleMatrix::new(&data, 200, 8).unwrap();

    let mut calls = 0usize;
    let mut cb = |_: i64, _: i64| {
        calls += 1;
        false
    };
    let progress = ProgressController::with_clock(
        Some(&mut cb),
        SteppingClock::new(Duration::from_secs(1)),
        ProgressIntervals::default(),
    );
    let outcome = AgglomerativeClusterer::new(progress).run(&samples).unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(calls, 1);
}

#[test]
fn random_run_is_deterministic() {
    let data = random_samples(60, 5, 42);
    let samples = SampleMatrix::new(&data, 60, 5).unwrap();
    let first = hierarchical_cluster(&samples, None).unwrap().completed().unwrap();
    let second = hierarchical_cluster(&samples, None).unwrap().completed().unwrap();

    assert_eq!(first.heights(), second.heights());
    assert_eq!(first.merge_a(), second.merge_a());
    assert_eq!(first.merge_b(), second.merge_b());
    assert_eq!(first.leaf_order(), second.leaf_order());
}

#[test]
fn callback_sees_both_phases_in_order() {
    let data = random_samples(40, 3, 3);
    let samples = SampleMatrix::new(&data, 40, 3).unwrap();

    let mut events = Vec::new();
    let mut cb = |current: i64, total: i64| {
        events.push((current, total));
        true
    };
    let progress = ProgressController::with_clock(
        Some(&mut cb),
        SteppingClock::new(Duration::from_millis(250)),
        ProgressIntervals::default(),
    );
    let outcome = AgglomerativeClusterer::new(progress).run(&samples).unwrap();
    assert!(outcome.is_completed());

    let first_merge = events.iter().position(|&(c, _)| c >= 0).unwrap();
    assert!(events[..first_merge].iter().all(|&(c, t)| c < 0 && t == 40));
    assert!(events[first_merge..].iter().all(|&(c, t)| c >= 0 && t == 39));
    assert!(events[first_merge..].windows(2).all(|w| w[0].0 <= w[1].0));
}

// --- Properties ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn distance_is_symmetric(
        pair in (1usize..40).prop_flat_map(|m| (
            prop::collection::vec(-100.0f32..100.0, m),
            prop::collection::vec(-100.0f32..100.0, m),
        ))
    ) {
        let (a, b) = pair;
        let ab = compute_distance(&a, &b);
        let ba = compute_distance(&b, &a);
        prop_assert!((ab - ba).abs() <= 1e-4 * ab.max(1.0));
        prop_assert_eq!(compute_distance(&a, &a), 0.0);
    }

    #[test]
    fn matrix_diagonal_is_zero(n in 2usize..20, m in 1usize..12, seed in any::<u64>()) {
        let data = random_samples(n, m, seed);
        let samples = SampleMatrix::new(&data, n, m).unwrap();
        let matrix = compute_distance_matrix(&samples).unwrap();
        for i in 0..n {
            prop_assert_eq!(matrix.get(SampleIdx::from(i), SampleIdx::from(i)), 0.0);
        }
    }

    #[test]
    fn leaf_order_is_permutation(n in 2usize..30, m in 1usize..6, seed in any::<u64>()) {
        let data = random_samples(n, m, seed);
        let samples = SampleMatrix::new(&data, n, m).unwrap();
        let d = hierarchical_cluster(&samples, None).unwrap().completed().unwrap();

        prop_assert_eq!(d.n_merges(), n - 1);
        prop_assert!(d.heights().iter().all(|&h| h >= 0.0));
        for (k, merge) in d.merges().enumerate() {
            prop_assert!(merge.a < merge.b);
            prop_assert!(merge.b < n - k);
        }

        let mut leaves: Vec<usize> = d.leaf_order().iter().map(|s| s.as_usize()).collect();
        leaves.sort_unstable();
        prop_assert_eq!(leaves, (0..n).collect::<Vec<_>>());

        let rows = d.linkage_matrix();
        prop_assert_eq!(rows.last().map(|r| r.size), Some(n));
    }
}

// --- Pipeline ---

#[test]
fn pipeline_writes_json() {
    let input = sample_file("# x y\n0 0\n0 1\n5 5\n", ".tsv");
    let output = NamedTempFile::new().unwrap();
    let cfg = config(&[
        "--input",
        input.path().to_str().unwrap(),
        "--out",
        output.path().to_str().unwrap(),
        "--quiet",
    ]);
    assert_eq!(cfg.format, OutputFormat::Json);

    let outcome = ClusteringPipeline::new(cfg).run().unwrap();
    assert!(outcome.is_completed());

    let text = std::fs::read_to_string(output.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["n_samples"], 3);
    assert_eq!(json["merge_a"], serde_json::json!([0, 0]));
    assert_eq!(json["leaf_order"], serde_json::json!([0, 1, 2]));
}

#[test]
fn pipeline_writes_labelled_newick() {
    let input = sample_file("id,x,y\nleft,0,0\nmid,0,1\nfar,5,5\n", ".csv");
    let output = NamedTempFile::new().unwrap();
    let cfg = config(&[
        "--input",
        input.path().to_str().unwrap(),
        "--out",
        output.path().to_str().unwrap(),
        "--header",
        "--labels",
        "--format",
        "newick",
        "--quiet",
    ]);

    ClusteringPipeline::new(cfg).run().unwrap();
    let text = std::fs::read_to_string(output.path()).unwrap();
    assert!(text.starts_with("((left:1,mid:1):"));
    assert!(text.contains(",far:6.73"));
    assert!(text.trim_end().ends_with(");"));
}

#[test]
fn pipeline_rejects_single_sample() {
    let input = sample_file("1 2 3\n", ".tsv");
    let cfg = config(&["--input", input.path().to_str().unwrap(), "--quiet"]);
    let err = ClusteringPipeline::new(cfg).run().unwrap_err();
    assert!(err.to_string().contains("at least 2 samples"));
}
