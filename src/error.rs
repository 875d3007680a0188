//! Error types and exit codes for matrixpp-site

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for history and lookup operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },

    #[error("Rate limited on {url}")]
    RateLimited { url: String },

    #[error("Secondary rate limit on {url}")]
    AbuseLimited { url: String },

    #[error("Malformed history document: {message}")]
    MalformedHistory { message: String },

    #[error("Failed to ingest {path}: {message}")]
    Ingest { path: PathBuf, message: String },

    #[error("Malformed commit: {message}")]
    MalformedCommit { message: String },

    #[error("Unknown snippet {name:?}")]
    UnknownSnippet { name: String },

    #[error("No benchmark inputs found")]
    NoInputs,

    #[error("Run has no benches")]
    EmptyRun,

    #[error("Bench {name} has invalid value {value}")]
    InvalidValue { name: String, value: f64 },

    #[error("Malformed extra field for {name}: {message}")]
    MalformedExtra { name: String, message: String },

    #[error("Run date {date} does not follow last update {last}")]
    OutOfOrder { last: u64, date: u64 },

    #[error("History invariant violated: {message}")]
    Invariant { message: String },
}

impl Error {
    /// Map the error category onto a process exit code:
    /// - 1: IO error
    /// - 2: malformed input (JSON, ingestion, extra)
    /// - 3: history ordering or invariant violation
    /// - 4: network failure
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Io(_) => 1,
            Self::Json(_)
            | Self::MalformedHistory { .. }
            | Self::Ingest { .. }
            | Self::MalformedCommit { .. }
            | Self::NoInputs
            | Self::UnknownSnippet { .. }
            | Self::MalformedExtra { .. } => 2,
            Self::EmptyRun
            | Self::InvalidValue { .. }
            | Self::OutOfOrder { .. }
            | Self::Invariant { .. } => 3,
            Self::Http(_)
            | Self::Status { .. }
            | Self::RateLimited { .. }
            | Self::AbuseLimited { .. } => 4,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// True when the API answered 404, i.e. the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Result type alias for matrixpp-site operations
pub type Result<T> = std::result::Result<T, Error>;
