//! Text output of the CLI commands.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::history::{self, LastUpdateCheck};
use crate::schema::HistoryDocument;

/// Write `text` to `out`, or print it to stdout when no file is given.
pub fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => fs::write(path, text)?,
        None => println!("{}", text.trim_end()),
    }
    Ok(())
}

/// Load the history at `path`; a missing file is an error here.
pub fn load_existing(path: &Path) -> Result<HistoryDocument> {
    history::load(path)?.ok_or_else(|| Error::MalformedHistory {
        message: format!("{} does not exist", path.display()),
    })
}

/// Validate `doc` and describe it: runs per suite, `lastUpdate` and digest.
pub fn validation_report(path: &Path, doc: &HistoryDocument, check: LastUpdateCheck) -> Result<String> {
    doc.validate_with(check)?;

    let mut report = format!("{}\n", path.display());
    for (suite, runs) in &doc.entries {
        report.push_str(&format!("  {suite}: {} runs\n", runs.len()));
    }
    report.push_str(&format!("  lastUpdate: {}\n", doc.last_update));
    report.push_str(&format!("  sha256: {}\n", history::digest(doc)?));
    Ok(report)
}
