//! Turn Google Benchmark JSON output into bench records for a run.

use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::schema::{BenchExtra, BenchRecord, Commit, Run};

#[derive(Debug, Deserialize)]
struct GoogleBenchOutput {
    #[serde(default)]
    benchmarks: Vec<GoogleBenchEntry>,
}

#[derive(Debug, Deserialize)]
struct GoogleBenchEntry {
    name: String,
    #[serde(default)]
    run_type: Option<String>,
    iterations: u64,
    real_time: f64,
    cpu_time: f64,
    time_unit: String,
    #[serde(default = "one_thread")]
    threads: u32,
}

fn one_thread() -> u32 {
    1
}

/// Parse one `--benchmark_format=json` report. Aggregate rows (mean, stddev, ...)
/// are skipped so each benchmark contributes its raw iteration row only.
pub fn parse_googlecpp(json: &str) -> std::result::Result<Vec<BenchRecord>, String> {
    let output: GoogleBenchOutput = serde_json::from_str(json).map_err(|e| e.to_string())?;

    let records: Vec<BenchRecord> = output
        .benchmarks
        .into_iter()
        .filter(|b| b.run_type.as_deref() != Some("aggregate"))
        .map(|b| {
            let extra = BenchExtra {
                iterations: b.iterations,
                cpu_time: b.cpu_time,
                cpu_unit: b.time_unit.clone(),
                threads: b.threads,
            };
            BenchRecord::new(b.name, b.real_time, format!("{}/iter", b.time_unit), &extra)
        })
        .collect();

    if records.is_empty() {
        return Err("no benchmarks in report".to_string());
    }
    Ok(records)
}

/// Expand files and directories into the sorted list of `.json` reports.
pub fn collect_inputs(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for root in roots {
        if root.is_file() {
            out.push(root.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in walkdir::WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| Error::Ingest {
                path: root.clone(),
                message: e.to_string(),
            })?;
            let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
            if entry.file_type().is_file() && is_json {
                found.push(entry.path().to_path_buf());
            }
        }
        found.sort();
        out.extend(found);
    }

    if out.is_empty() {
        return Err(Error::NoInputs);
    }
    Ok(out)
}

fn parse_file(path: &Path) -> Result<Vec<BenchRecord>> {
    let text = fs::read_to_string(path)?;
    let records = parse_googlecpp(&text).map_err(|message| Error::Ingest {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!("{}: {} benches", path.display(), records.len());
    Ok(records)
}

/// Parse every report in parallel; records keep input file order.
pub fn parse_inputs(files: &[PathBuf]) -> Result<Vec<BenchRecord>> {
    let per_file: Vec<Vec<BenchRecord>> = files
        .par_iter()
        .map(|f| parse_file(f))
        .collect::<Result<_>>()?;
    Ok(per_file.into_iter().flatten().collect())
}

/// Build a run from harness reports under `inputs`.
pub fn build_run(commit: Commit, date: u64, tool: &str, inputs: &[PathBuf]) -> Result<Run> {
    let files = collect_inputs(inputs)?;
    let benches = parse_inputs(&files)?;
    Ok(Run {
        commit,
        date,
        tool: tool.to_string(),
        benches,
    })
}
