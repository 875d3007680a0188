//! Tooling behind the matrixpp website: the append-only benchmark history
//! committed by CI, and the release/repository lookups shown on the home page.

pub mod commit;
pub mod compare;
pub mod error;
pub mod github;
pub mod history;
pub mod ingest;
pub mod report;
pub mod schema;
pub mod site;
pub mod snippets;

pub use error::{Error, Result};
