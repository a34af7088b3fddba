//! Round-1 seeding from a submission CSV.
//!
//! The file lists one participant per row under an `endpoint,email,secret`
//! header. An unreadable or malformed file is a configuration error and
//! aborts the run before any dispatch begins.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{RosterEntry, RosterError, RosterSource};

/// Roster seeded from a delimited submission file.
pub struct SubmissionList {
    path: PathBuf,
}

impl SubmissionList {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl RosterSource for SubmissionList {
    async fn load(&self) -> Result<Vec<RosterEntry>, RosterError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_submissions(&content)
    }

    /// The submission file is a read-only seed; round updates land in the
    /// persistent roster once participants submit.
    async fn record_round(&self, participant_id: &str, _round: u32) -> Result<(), RosterError> {
        tracing::debug!(participant_id, "submission list does not persist rounds");
        Ok(())
    }
}

fn parse_submissions(content: &str) -> Result<Vec<RosterEntry>, RosterError> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or_else(|| RosterError::MalformedRow {
        line: 1,
        detail: "empty submission file".to_string(),
    })?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let index_of = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| RosterError::MalformedRow {
                line: 1,
                detail: format!("missing column '{name}'"),
            })
    };
    let endpoint_col = index_of("endpoint")?;
    let email_col = index_of("email")?;
    let secret_col = index_of("secret")?;

    let mut entries = Vec::new();
    for (i, line) in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < columns.len() {
            return Err(RosterError::MalformedRow {
                line: i + 1,
                detail: format!("expected {} fields, got {}", columns.len(), fields.len()),
            });
        }
        let email = fields[email_col].to_string();
        entries.push(RosterEntry {
            // Seed rows have no persistent id yet; the email doubles as one.
            participant_id: email.clone(),
            email,
            endpoint: Some(fields[endpoint_col].to_string()),
            secret: Some(fields[secret_col].to_string()),
            round: 1,
            repo_url: None,
            commit_sha: None,
            pages_url: None,
        });
    }
    Ok(entries)
}
