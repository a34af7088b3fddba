//! SQLite-backed roster.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use super::{RosterEntry, RosterError, RosterSource};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS repos (
    id TEXT PRIMARY KEY,
    timestamp INTEGER,
    email TEXT,
    task TEXT,
    round INTEGER,
    nonce TEXT,
    endpoint TEXT,
    repo_url TEXT,
    commit_sha TEXT,
    pages_url TEXT
);
";

/// Roster stored in the deployment database's `repos` table.
///
/// A connection is opened per operation; the pipeline touches the store a
/// handful of times per run, never concurrently.
pub struct SqliteRoster {
    path: PathBuf,
}

impl SqliteRoster {
    /// Open the roster database, creating the table if absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { path })
    }

    fn connect(&self) -> Result<Connection, RosterError> {
        Ok(Connection::open(&self.path)?)
    }

    /// Insert a new entry.
    pub fn insert(&self, entry: &RosterEntry) -> Result<(), RosterError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO repos (id, timestamp, email, round, endpoint, repo_url, commit_sha, pages_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.participant_id,
                chrono::Utc::now().timestamp(),
                entry.email,
                entry.round,
                entry.endpoint,
                entry.repo_url,
                entry.commit_sha,
                entry.pages_url,
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl RosterSource for SqliteRoster {
    async fn load(&self) -> Result<Vec<RosterEntry>, RosterError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, email, endpoint, round, repo_url, commit_sha, pages_url
             FROM repos ORDER BY timestamp, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RosterEntry {
                participant_id: row.get(0)?,
                email: row.get(1)?,
                endpoint: row.get(2)?,
                secret: None,
                round: row.get::<_, Option<i64>>(3)?.unwrap_or(1) as u32,
                repo_url: row.get(4)?,
                commit_sha: row.get(5)?,
                pages_url: row.get(6)?,
            })
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    async fn record_round(&self, participant_id: &str, round: u32) -> Result<(), RosterError> {
        let conn = self.connect()?;
        let updated = conn.execute(
            "UPDATE repos SET round = ?1 WHERE id = ?2",
            params![round, participant_id],
        )?;
        if updated == 0 {
            tracing::warn!(participant_id, "record_round matched no roster entry");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, email: &str) -> RosterEntry {
        RosterEntry {
            participant_id: id.to_string(),
            email: email.to_string(),
            endpoint: Some("http://localhost:9000/intake".to_string()),
            secret: None,
            round: 1,
            repo_url: Some(format!("https://github.com/{email}/site")),
            commit_sha: None,
            pages_url: Some(format!("https://{email}.github.io/site/")),
        }
    }

    #[tokio::test]
    async fn test_insert_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let roster = SqliteRoster::open(dir.path().join("deploy.db")).unwrap();

        roster.insert(&entry("p1", "a@example.com")).unwrap();
        roster.insert(&entry("p2", "b@example.com")).unwrap();

        let entries = roster.load().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].participant_id, "p1");
        assert_eq!(entries[1].email, "b@example.com");
        assert_eq!(entries[0].round, 1);
    }

    #[tokio::test]
    async fn test_record_round_updates_entry() {
        let dir = tempfile::tempdir().unwrap();
        let roster = SqliteRoster::open(dir.path().join("deploy.db")).unwrap();
        roster.insert(&entry("p1", "a@example.com")).unwrap();

        roster.record_round("p1", 2).await.unwrap();

        let entries = roster.load().await.unwrap();
        assert_eq!(entries[0].round, 2);
    }

    #[tokio::test]
    async fn test_record_round_for_unknown_participant_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let roster = SqliteRoster::open(dir.path().join("deploy.db")).unwrap();
        assert!(roster.record_round("ghost", 2).await.is_ok());
    }
}
