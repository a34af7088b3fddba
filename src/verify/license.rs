//! License compliance check against repository raw content.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{ArtifactCheck, CheckOutcome};

const GITHUB_HOST: &str = "github.com";
const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";
/// Conventional default-branch names, probed in order.
const CANDIDATE_BRANCHES: [&str; 2] = ["main", "master"];
const LICENSE_MARKER: &str = "MIT License";

/// Checks that a GitHub repository carries an MIT license on its default
/// branch, probing `main` then `master`.
pub struct LicenseVerifier {
    client: Client,
    raw_base: String,
    fetch_timeout: Duration,
}

impl LicenseVerifier {
    pub fn new() -> Self {
        Self::with_raw_base(DEFAULT_RAW_BASE)
    }

    /// Point the verifier at an alternative raw-content host.
    pub fn with_raw_base(raw_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            raw_base: raw_base.into(),
            fetch_timeout: Duration::from_secs(10),
        }
    }

    /// Decide license compliance for `repo_url`.
    ///
    /// A transport error on any candidate branch is decisive for the whole
    /// check; remaining branches are not probed.
    pub async fn check(&self, repo_url: &str) -> CheckOutcome {
        let Some((owner, repo)) = parse_github_repo(repo_url) else {
            return CheckOutcome::fail("Not a github repo");
        };

        for branch in CANDIDATE_BRANCHES {
            let raw = format!("{}/{}/{}/{}/LICENSE", self.raw_base, owner, repo, branch);
            match self
                .client
                .get(&raw)
                .timeout(self.fetch_timeout)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => match response.text().await {
                    Ok(body) if body.contains(LICENSE_MARKER) => {
                        return CheckOutcome::pass(format!("MIT found on {branch}"));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        return CheckOutcome::fail(format!("Error fetching LICENSE: {e}"));
                    }
                },
                // Completed non-2xx response: this branch simply has no
                // LICENSE; try the next candidate.
                Ok(_) => {}
                Err(e) => {
                    return CheckOutcome::fail(format!("Error fetching LICENSE: {e}"));
                }
            }
        }

        CheckOutcome::fail("No MIT found on main/master")
    }
}

impl Default for LicenseVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactCheck for LicenseVerifier {
    async fn check(&self, url: &str) -> CheckOutcome {
        LicenseVerifier::check(self, url).await
    }
}

/// Extract `(owner, repo)` from an HTTPS GitHub repository URL. Anything
/// else (other hosts, other schemes, too few path segments) is not a
/// recognized repository.
fn parse_github_repo(repo_url: &str) -> Option<(String, String)> {
    let url = Url::parse(repo_url).ok()?;
    if url.scheme() != "https" || url.host_str() != Some(GITHUB_HOST) {
        return None;
    }
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?.to_string();
    let repo = segments.next()?.to_string();
    Some((owner, repo))
}
