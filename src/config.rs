//! Process configuration.
//!
//! All components receive an explicit [`Config`] at construction; there is no
//! ambient global state. Environment variables supply initial values, with
//! defaults for every option. Absent real values make the network calls
//! fail, not the process refuse to start.

use std::path::PathBuf;

/// Pipeline configuration with environment-backed defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the roster database.
    pub db_path: PathBuf,
    /// Callback endpoint participants must notify on completion.
    pub evaluation_url: String,
    /// Delimited file of `{endpoint, email, secret}` rows for round-1 seeding.
    pub submission_csv: PathBuf,
    /// Token embedded in payloads when no per-participant secret is known.
    pub shared_secret: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("../data/deploy.db"),
            evaluation_url: "http://localhost:4000/evaluation/notify".to_string(),
            submission_csv: PathBuf::from("./submission.csv"),
            shared_secret: "replace_me".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults for any option that is unset.
    ///
    /// Recognized variables: `DB_PATH`, `EVALUATION_URL`, `SUBMISSION_CSV`,
    /// `SHARED_SECRET`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: std::env::var("DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            evaluation_url: std::env::var("EVALUATION_URL").unwrap_or(defaults.evaluation_url),
            submission_csv: std::env::var("SUBMISSION_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.submission_csv),
            shared_secret: std::env::var("SHARED_SECRET").unwrap_or(defaults.shared_secret),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.db_path, PathBuf::from("../data/deploy.db"));
        assert_eq!(
            config.evaluation_url,
            "http://localhost:4000/evaluation/notify"
        );
        assert_eq!(config.submission_csv, PathBuf::from("./submission.csv"));
        assert_eq!(config.shared_secret, "replace_me");
    }
}
