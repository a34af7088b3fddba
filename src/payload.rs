//! Task payload construction.
//!
//! Each round of the challenge is described by a template from a closed
//! enumeration. Templates produce the brief, the acceptance checks, and the
//! sample attachments; new task kinds are added as new variants, never by
//! interpolating free-form instructions at runtime.

use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;

/// A task template. One variant per challenge round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTemplate {
    /// Round 1: summarize a CSV of sales data on a published page.
    SalesSummary,
    /// Round 2: visualize the previous round's results in a chart.
    ResultsChart,
}

impl TaskTemplate {
    /// Stable identifier used as the prefix of the task label.
    pub fn id(&self) -> &'static str {
        match self {
            TaskTemplate::SalesSummary => "sum-of-sales",
            TaskTemplate::ResultsChart => "results-chart",
        }
    }

    /// The round this template belongs to.
    pub fn round(&self) -> u32 {
        match self {
            TaskTemplate::SalesSummary => 1,
            TaskTemplate::ResultsChart => 2,
        }
    }

    fn brief(&self, seed: u64) -> String {
        match self {
            TaskTemplate::SalesSummary => format!(
                "Publish a single-page site that fetches data.csv from attachments, \
                 sums its sales column, sets the title to 'Sales Summary {}', \
                 displays the total inside #total-sales, and loads Bootstrap 5 from jsdelivr.",
                seed
            ),
            TaskTemplate::ResultsChart => {
                "Round 2: generate a site that visualizes your previous results in a chart"
                    .to_string()
            }
        }
    }

    fn checks(&self) -> Vec<String> {
        let checks: &[&str] = match self {
            TaskTemplate::SalesSummary => &[
                "Repo has MIT license",
                "README.md is professional",
                "Page displays total inside #total-sales",
            ],
            TaskTemplate::ResultsChart => &[
                "Chart displays total correctly",
                "MIT license",
                "README present",
            ],
        };
        checks.iter().map(|c| c.to_string()).collect()
    }

    fn attachments(&self) -> Vec<Attachment> {
        match self {
            TaskTemplate::SalesSummary => {
                let csv = "product,sale\nA,100\nB,50\n";
                vec![Attachment::inline("data.csv", "text/csv", csv.as_bytes())]
            }
            TaskTemplate::ResultsChart => Vec::new(),
        }
    }

    /// Build a payload for one recipient.
    ///
    /// When `seed` is `None`, one is derived from the current time: unlikely
    /// to collide across human-paced runs, but not unique by construction.
    /// The task label is deterministic for a given (template, seed) pair, so
    /// task identity can be reconstructed from the label alone. The nonce is
    /// freshly random on every call regardless of seed.
    pub fn build(
        &self,
        seed: Option<u64>,
        email: &str,
        secret: &str,
        evaluation_url: &str,
    ) -> TaskPayload {
        let seed = seed.unwrap_or_else(|| (chrono::Utc::now().timestamp() as u64) % 100_000);
        TaskPayload {
            email: email.to_string(),
            secret: secret.to_string(),
            task: task_label(self.id(), seed),
            round: self.round(),
            nonce: uuid::Uuid::new_v4().to_string(),
            brief: self.brief(seed),
            checks: self.checks(),
            evaluation_url: evaluation_url.to_string(),
            attachments: self.attachments(),
        }
    }
}

/// Label combining the template identifier with the first five digits of the
/// seed.
fn task_label(template_id: &str, seed: u64) -> String {
    let digits = seed.to_string();
    let prefix = &digits[..digits.len().min(5)];
    format!("{}-{}", template_id, prefix)
}

/// The task notification wire payload posted to a participant's intake
/// endpoint. Field names are the wire names participant servers accept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPayload {
    /// Recipient identity, used for routing and later roster lookup.
    pub email: String,
    /// Shared secret the recipient echoes back when notifying completion.
    pub secret: String,
    /// Task label, e.g. `sum-of-sales-81234`.
    pub task: String,
    pub round: u32,
    /// Fresh per-payload token; lets the receiving side de-duplicate retried
    /// deliveries.
    pub nonce: String,
    pub brief: String,
    pub checks: Vec<String>,
    /// Absolute URL the recipient must notify on completion.
    pub evaluation_url: String,
    pub attachments: Vec<Attachment>,
}
