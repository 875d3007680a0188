use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// Suite name every CI run is filed under.
pub const DEFAULT_SUITE: &str = "Benchmark";

/// Harness name recorded for Google Benchmark output.
pub const DEFAULT_TOOL: &str = "googlecpp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub author: Identity,
    pub committer: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct: Option<bool>,
    pub id: String,
    pub message: String,
    /// ISO-8601 commit timestamp, kept verbatim.
    pub timestamp: String,
    pub tree_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchRecord {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub extra: String,
}

impl BenchRecord {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>, extra: &BenchExtra) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
            extra: extra.to_string(),
        }
    }

    /// Structured view of the `extra` text.
    pub fn stats(&self) -> Result<BenchExtra> {
        BenchExtra::parse(&self.extra).map_err(|message| Error::MalformedExtra {
            name: self.name.clone(),
            message,
        })
    }
}

/// Auxiliary statistics stored in [`BenchRecord::extra`].
///
/// The on-disk form is three `key: value` lines:
///
/// ```text
/// iterations: 643476
/// cpu: 1080.0893832870227 ns
/// threads: 1
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BenchExtra {
    pub iterations: u64,
    pub cpu_time: f64,
    pub cpu_unit: String,
    pub threads: u32,
}

impl BenchExtra {
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let mut iterations = None;
        let mut cpu = None;
        let mut threads = None;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| format!("expected `key: value`, got {line:?}"))?;
            let value = value.trim();
            match key.trim() {
                "iterations" => {
                    iterations = Some(value.parse::<u64>().map_err(|e| format!("iterations: {e}"))?)
                }
                "cpu" => {
                    let (time, unit) = value.split_once(' ').unwrap_or((value, ""));
                    let time = time.parse::<f64>().map_err(|e| format!("cpu: {e}"))?;
                    cpu = Some((time, unit.trim().to_string()));
                }
                "threads" => threads = Some(value.parse::<u32>().map_err(|e| format!("threads: {e}"))?),
                other => return Err(format!("unknown key {other:?}")),
            }
        }

        let (cpu_time, cpu_unit) = cpu.ok_or("missing cpu")?;
        Ok(Self {
            iterations: iterations.ok_or("missing iterations")?,
            cpu_time,
            cpu_unit,
            threads: threads.ok_or("missing threads")?,
        })
    }
}

impl fmt::Display for BenchExtra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iterations: {}\ncpu: {} {}\nthreads: {}",
            self.iterations, self.cpu_time, self.cpu_unit, self.threads
        )
    }
}

/// One execution of the benchmark suite against one commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub commit: Commit,
    /// Epoch milliseconds at which the run was recorded.
    pub date: u64,
    pub tool: String,
    pub benches: Vec<BenchRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDocument {
    pub last_update: u64,
    pub repo_url: String,
    pub entries: BTreeMap<String, Vec<Run>>,
}

impl HistoryDocument {
    pub fn runs(&self, suite: &str) -> &[Run] {
        self.entries.get(suite).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn run_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
