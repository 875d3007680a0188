//! Benchmark history document: storage format and the append contract.
//!
//! The document lives in `dev/bench/data.js` so the chart page can load it
//! with a plain `<script>` tag.
//!
//! # File Format
//!
//! ```text
//! window.BENCHMARK_DATA = {
//!   "lastUpdate": <epoch ms of the last appended run>,
//!   "repoUrl": "<repository url>",
//!   "entries": { "<suite>": [ <run>, ... ] }
//! }
//! ```
//!
//! Runs within a suite are ordered by `date` and only ever appended.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::schema::{HistoryDocument, Run};

/// Assignment that precedes the JSON body.
const PREFIX: &str = "window.BENCHMARK_DATA =";

/// Parse a history document, with or without the assignment prefix.
pub fn decode(text: &str) -> Result<HistoryDocument> {
    let body = text.trim();
    let body = body.strip_prefix(PREFIX).unwrap_or(body).trim();
    let body = body.strip_suffix(';').unwrap_or(body);
    if body.is_empty() {
        return Err(Error::MalformedHistory {
            message: "empty document".to_string(),
        });
    }
    serde_json::from_str(body).map_err(|e| Error::MalformedHistory {
        message: e.to_string(),
    })
}

pub fn encode(doc: &HistoryDocument) -> Result<String> {
    let json = serde_json::to_string_pretty(doc)?;
    Ok(format!("{PREFIX} {json}\n"))
}

/// Load the document at `path`; `None` when the file does not exist yet.
pub fn load(path: &Path) -> Result<Option<HistoryDocument>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No history at {}, starting fresh", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    decode(&text).map(Some)
}

/// Write the document atomically: temp file in the target directory, then rename.
pub fn save(path: &Path, doc: &HistoryDocument) -> Result<()> {
    let text = encode(doc)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// SHA-256 of the encoded document, lowercase hex.
pub fn digest(doc: &HistoryDocument) -> Result<String> {
    let text = encode(doc)?;
    let d: [u8; 32] = Sha256::digest(text.as_bytes()).into();
    Ok(d.iter().map(|b| format!("{b:02x}")).collect())
}

fn check_run(run: &Run) -> Result<()> {
    if run.benches.is_empty() {
        return Err(Error::EmptyRun);
    }
    if let Some(bad) = run
        .benches
        .iter()
        .find(|b| !b.value.is_finite() || b.value < 0.0)
    {
        return Err(Error::InvalidValue {
            name: bad.name.clone(),
            value: bad.value,
        });
    }
    Ok(())
}

/// Append `run` to `suite`, producing the next snapshot of the document.
///
/// A run whose date does not strictly follow `lastUpdate` is rejected;
/// existing entries are never reordered.
pub fn append_run(
    existing: Option<HistoryDocument>,
    suite: &str,
    run: Run,
    repo_url: &str,
) -> Result<HistoryDocument> {
    check_run(&run)?;

    let mut doc = match existing {
        Some(doc) => {
            if run.date <= doc.last_update {
                return Err(Error::OutOfOrder {
                    last: doc.last_update,
                    date: run.date,
                });
            }
            doc
        }
        None => HistoryDocument {
            last_update: run.date,
            repo_url: repo_url.to_string(),
            entries: Default::default(),
        },
    };

    tracing::info!(
        "Appending {} benches for {} to suite {suite}",
        run.benches.len(),
        run.commit.id
    );
    doc.last_update = run.date;
    doc.entries.entry(suite.to_string()).or_default().push(run);
    Ok(doc)
}

/// How strictly `lastUpdate` must track the newest run date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LastUpdateCheck {
    /// `lastUpdate == max(date)`, what [`append_run`] writes.
    #[default]
    Exact,
    /// `lastUpdate >= max(date)`, for snapshots stamped separately from their run.
    AtLeast,
}

impl HistoryDocument {
    /// Check every invariant a well-formed history holds.
    pub fn validate(&self) -> Result<()> {
        self.validate_with(LastUpdateCheck::Exact)
    }

    pub fn validate_with(&self, check: LastUpdateCheck) -> Result<()> {
        let mut max_date = None;
        for (suite, runs) in &self.entries {
            for pair in runs.windows(2) {
                if pair[1].date < pair[0].date {
                    return Err(Error::Invariant {
                        message: format!(
                            "suite {suite}: run {} ({}) precedes run {} ({})",
                            pair[1].commit.id, pair[1].date, pair[0].commit.id, pair[0].date
                        ),
                    });
                }
            }
            for run in runs {
                check_run(run).map_err(|e| Error::Invariant {
                    message: format!("suite {suite}, commit {}: {e}", run.commit.id),
                })?;
            }
            if let Some(last) = runs.iter().map(|r| r.date).max() {
                max_date = max_date.max(Some(last));
            }
        }

        let ok = match (max_date, check) {
            (None, _) => true,
            (Some(max), LastUpdateCheck::Exact) => max == self.last_update,
            (Some(max), LastUpdateCheck::AtLeast) => self.last_update >= max,
        };
        if !ok {
            return Err(Error::Invariant {
                message: format!(
                    "lastUpdate {} does not match latest run date {}",
                    self.last_update,
                    max_date.unwrap_or_default()
                ),
            });
        }
        Ok(())
    }

    /// True when every suite of `self` is a prefix of the same suite in `later`.
    pub fn is_prefix_of(&self, later: &HistoryDocument) -> bool {
        self.entries.iter().all(|(suite, runs)| {
            let next = later.runs(suite);
            next.len() >= runs.len() && next[..runs.len()] == runs[..]
        })
    }
}
