//! Artifact verification.
//!
//! Two unrelated properties of a participant's deployed artifact are checked
//! independently: a license rule against the repository's raw content, and a
//! rendered-page rule against the published page. Check failures are data
//! (a failing outcome with a reason), never raised errors, so one entry's
//! failure cannot abort a roster pass.

mod license;
mod page;

pub use license::LicenseVerifier;
pub use page::PageVerifier;

use async_trait::async_trait;

use crate::pace::{run_paced, Pacing};
use crate::roster::RosterEntry;

/// Pass/fail plus a human-readable reason for one checked property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub pass: bool,
    pub reason: String,
}

impl CheckOutcome {
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            pass: true,
            reason: reason.into(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            pass: false,
            reason: reason.into(),
        }
    }
}

/// One verification channel over a remote artifact URL.
#[async_trait]
pub trait ArtifactCheck: Send + Sync {
    async fn check(&self, url: &str) -> CheckOutcome;
}

/// Combined verdict for one roster entry. Immutable once composed; the
/// caller logs or persists it.
#[derive(Debug, Clone)]
pub struct VerificationVerdict {
    pub license: CheckOutcome,
    pub page: CheckOutcome,
}

/// Runs both checks per roster entry and composes the verdicts.
pub struct Evaluator {
    license: Box<dyn ArtifactCheck>,
    page: Box<dyn ArtifactCheck>,
    pacing: Pacing,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            license: Box::new(LicenseVerifier::new()),
            page: Box::new(PageVerifier::new()),
            pacing: Pacing::default(),
        }
    }

    /// Swap in alternative checks or pacing.
    pub fn with_checks(
        license: Box<dyn ArtifactCheck>,
        page: Box<dyn ArtifactCheck>,
        pacing: Pacing,
    ) -> Self {
        Self {
            license,
            page,
            pacing,
        }
    }

    /// Verify one entry. The two checks never short-circuit each other; an
    /// entry with no recorded URL for a channel fails that channel outright.
    pub async fn evaluate(&self, entry: &RosterEntry) -> VerificationVerdict {
        let license = match &entry.repo_url {
            Some(url) => self.license.check(url).await,
            None => CheckOutcome::fail("not applicable"),
        };
        let page = match &entry.pages_url {
            Some(url) => self.page.check(url).await,
            None => CheckOutcome::fail("not applicable"),
        };

        tracing::info!(
            participant = %entry.participant_id,
            license_pass = license.pass,
            license_reason = %license.reason,
            page_pass = page.pass,
            page_reason = %page.reason,
            "evaluated"
        );

        VerificationVerdict { license, page }
    }

    /// Verify a whole roster in iteration order, one verdict per entry.
    pub async fn evaluate_roster(&self, entries: &[RosterEntry]) -> Vec<VerificationVerdict> {
        run_paced(&self.pacing, entries.to_vec(), |entry| async move {
            self.evaluate(&entry).await
        })
        .await
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct StaticCheck {
        outcome: CheckOutcome,
    }

    #[async_trait]
    impl ArtifactCheck for StaticCheck {
        async fn check(&self, _url: &str) -> CheckOutcome {
            self.outcome.clone()
        }
    }

    /// Fails exactly the URLs it is told to, passes the rest.
    struct SelectiveCheck {
        failing_url: String,
    }

    #[async_trait]
    impl ArtifactCheck for SelectiveCheck {
        async fn check(&self, url: &str) -> CheckOutcome {
            if url == self.failing_url {
                CheckOutcome::fail("Error loading page: connection refused")
            } else {
                CheckOutcome::pass("Required element exists")
            }
        }
    }

    fn entry(id: &str) -> RosterEntry {
        RosterEntry {
            participant_id: id.to_string(),
            email: format!("{id}@example.com"),
            endpoint: None,
            secret: None,
            round: 1,
            repo_url: Some(format!("https://github.com/{id}/site")),
            commit_sha: None,
            pages_url: Some(format!("https://{id}.github.io/site/")),
        }
    }

    fn quick_pacing() -> Pacing {
        Pacing::Sequential {
            pause: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_checks_are_independent() {
        let evaluator = Evaluator::with_checks(
            Box::new(StaticCheck {
                outcome: CheckOutcome::fail("Error fetching LICENSE: timed out"),
            }),
            Box::new(StaticCheck {
                outcome: CheckOutcome::pass("Required element exists"),
            }),
            quick_pacing(),
        );

        let verdict = evaluator.evaluate(&entry("p1")).await;
        assert!(!verdict.license.pass);
        assert!(verdict.page.pass);
    }

    #[tokio::test]
    async fn test_missing_urls_short_circuit_to_not_applicable() {
        let evaluator = Evaluator::with_checks(
            Box::new(StaticCheck {
                outcome: CheckOutcome::pass("MIT found on main"),
            }),
            Box::new(StaticCheck {
                outcome: CheckOutcome::pass("Required element exists"),
            }),
            quick_pacing(),
        );

        let mut bare = entry("p1");
        bare.repo_url = None;
        bare.pages_url = None;

        let verdict = evaluator.evaluate(&bare).await;
        assert!(!verdict.license.pass);
        assert_eq!(verdict.license.reason, "not applicable");
        assert!(!verdict.page.pass);
        assert_eq!(verdict.page.reason, "not applicable");
    }

    #[tokio::test]
    async fn test_roster_pass_yields_one_verdict_per_entry() {
        let entries = vec![entry("p1"), entry("p2"), entry("p3")];
        let evaluator = Evaluator::with_checks(
            Box::new(StaticCheck {
                outcome: CheckOutcome::pass("MIT found on main"),
            }),
            Box::new(SelectiveCheck {
                failing_url: entries[1].pages_url.clone().unwrap(),
            }),
            quick_pacing(),
        );

        let verdicts = evaluator.evaluate_roster(&entries).await;
        assert_eq!(verdicts.len(), 3);
        assert!(verdicts[0].page.pass);
        assert!(!verdicts[1].page.pass);
        assert!(verdicts[2].page.pass);
    }
}
