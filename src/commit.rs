//! Commit metadata for a run, read from the CI push event.

use chrono::DateTime;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::schema::Commit;

#[derive(Deserialize)]
#[serde(untagged)]
enum CommitSource {
    Event { head_commit: Commit },
    Bare(Commit),
}

/// Parse either a push-event payload (`head_commit`) or a bare commit object.
pub fn parse_commit(text: &str) -> Result<Commit> {
    let commit = match serde_json::from_str::<CommitSource>(text)? {
        CommitSource::Event { head_commit } => head_commit,
        CommitSource::Bare(commit) => commit,
    };
    DateTime::parse_from_rfc3339(&commit.timestamp).map_err(|e| Error::MalformedCommit {
        message: format!("commit {} timestamp {:?}: {e}", commit.id, commit.timestamp),
    })?;
    Ok(commit)
}

pub fn load_commit(path: &Path) -> Result<Commit> {
    let text = fs::read_to_string(path)?;
    parse_commit(&text).map_err(|e| match e {
        Error::Json(e) => Error::Ingest {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
        other => other,
    })
}
