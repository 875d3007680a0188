use matrixpp_site::history::{self, append_run};
use matrixpp_site::schema::DEFAULT_SUITE;
use matrixpp_site::{commit, compare, ingest, Error};
use std::fs;

const EVENT: &str = r#"{
  "ref": "refs/heads/main",
  "head_commit": {
    "author": {"email": "samestimable2016@gmail.com", "name": "sam20908", "username": "sam20908"},
    "committer": {"email": "samestimable2016@gmail.com", "name": "sam20908", "username": "sam20908"},
    "distinct": true,
    "id": "97185dca5fd49a784f5a10dce5406ee219d56c43",
    "message": "Fix bench push",
    "timestamp": "2020-12-06T19:13:47-08:00",
    "tree_id": "1ba438a939199dfe3d5299d3af92495962112e7b",
    "url": "https://github.com/sam20908/matrixpp/commit/97185dca5fd49a784f5a10dce5406ee219d56c43"
  }
}"#;

fn report(value: f64) -> String {
    format!(
        r#"{{"benchmarks": [{{"name": "determinant_5x5", "run_type": "iteration", "iterations": 643476,
            "real_time": {value}, "cpu_time": {value}, "time_unit": "ns", "threads": 1}}]}}"#
    )
}

#[test]
fn successive_ci_appends_grow_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let event = dir.path().join("event.json");
    let reports = dir.path().join("reports");
    let data = dir.path().join("dev/bench/data.js");
    fs::write(&event, EVENT).unwrap();
    fs::create_dir_all(&reports).unwrap();

    let dates = [1607394225819u64, 1607394509597, 1607395000000];
    let mut snapshots = Vec::new();
    for (i, date) in dates.iter().enumerate() {
        fs::write(reports.join("determinant.json"), report(1000.0 + i as f64 * 100.0)).unwrap();

        let commit = commit::load_commit(&event).unwrap();
        let run = ingest::build_run(commit, *date, "googlecpp", &[reports.clone()]).unwrap();
        let existing = history::load(&data).unwrap();
        let doc = append_run(existing, DEFAULT_SUITE, run, "https://github.com/sam20908/matrixpp").unwrap();
        history::save(&data, &doc).unwrap();
        snapshots.push(history::load(&data).unwrap().unwrap());
    }

    for pair in snapshots.windows(2) {
        assert!(pair[0].is_prefix_of(&pair[1]));
        assert!(pair[1].runs(DEFAULT_SUITE).len() > pair[0].runs(DEFAULT_SUITE).len());
    }

    let last = snapshots.last().unwrap();
    last.validate().unwrap();
    assert_eq!(last.last_update, 1607395000000);
    assert_eq!(
        Some(last.last_update),
        last.runs(DEFAULT_SUITE).iter().map(|r| r.date).max()
    );

    let cmp = compare::compare_latest(last, DEFAULT_SUITE).unwrap();
    assert_eq!(cmp.deltas[0].previous, Some(1100.0));
    assert_eq!(cmp.deltas[0].current, 1200.0);
}

#[test]
fn stale_run_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let event = dir.path().join("event.json");
    let report_file = dir.path().join("bench.json");
    let data = dir.path().join("data.js");
    fs::write(&event, EVENT).unwrap();
    fs::write(&report_file, report(1000.0)).unwrap();

    let commit = commit::load_commit(&event).unwrap();
    let run = ingest::build_run(commit.clone(), 2000, "googlecpp", &[report_file.clone()]).unwrap();
    let doc = append_run(None, DEFAULT_SUITE, run, "https://github.com/sam20908/matrixpp").unwrap();
    history::save(&data, &doc).unwrap();
    let before = fs::read_to_string(&data).unwrap();

    let stale = ingest::build_run(commit, 1500, "googlecpp", &[report_file]).unwrap();
    let err = append_run(history::load(&data).unwrap(), DEFAULT_SUITE, stale, "").unwrap_err();
    assert!(matches!(err, Error::OutOfOrder { last: 2000, date: 1500 }));
    assert_eq!(fs::read_to_string(&data).unwrap(), before);
}
