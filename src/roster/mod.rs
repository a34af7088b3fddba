//! Participant roster.
//!
//! The roster itself is an external collaborator; this crate depends on two
//! operation shapes (read an ordered list of entries, and optionally record
//! a participant's new round), not on the storage engine behind them.

mod sqlite;
mod submission;

pub use sqlite::SqliteRoster;
pub use submission::SubmissionList;

use async_trait::async_trait;

/// One participant's tracked state across rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub participant_id: String,
    /// Recipient identity; opaque routing string.
    pub email: String,
    /// Intake endpoint tasks are posted to. When unknown the dispatcher
    /// falls back to the configured evaluation URL.
    pub endpoint: Option<String>,
    /// Per-participant secret, when one was supplied at seeding.
    pub secret: Option<String>,
    pub round: u32,
    pub repo_url: Option<String>,
    pub commit_sha: Option<String>,
    pub pages_url: Option<String>,
}

/// Errors from a roster source.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("roster database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("malformed submission row at line {line}: {detail}")]
    MalformedRow { line: usize, detail: String },
}

/// Read (and optionally update) operations on the participant roster.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Return all entries in a stable iteration order.
    async fn load(&self) -> Result<Vec<RosterEntry>, RosterError>;

    /// Persist a participant's new round number.
    async fn record_round(&self, participant_id: &str, round: u32) -> Result<(), RosterError>;
}
