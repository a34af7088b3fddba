//! Rendered-page check via a headless browser.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;

use super::{ArtifactCheck, CheckOutcome};

/// DOM markers that satisfy the check; either one suffices.
const MARKER_SELECTORS: [&str; 2] = ["#total-sales", "#brief"];
const LOAD_TIMEOUT: Duration = Duration::from_secs(20);

/// Loads a participant's published page in an isolated headless Chromium
/// instance and looks for the required DOM markers.
///
/// One browser per check: consecutive checks share no cookies or DOM state.
/// The instance is torn down on every exit path.
pub struct PageVerifier {
    load_timeout: Duration,
}

impl PageVerifier {
    pub fn new() -> Self {
        Self {
            load_timeout: LOAD_TIMEOUT,
        }
    }

    pub fn with_load_timeout(load_timeout: Duration) -> Self {
        Self { load_timeout }
    }

    /// Render `pages_url` and report whether a marker element exists.
    pub async fn check(&self, pages_url: &str) -> CheckOutcome {
        let config = match BrowserConfig::builder()
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .build()
        {
            Ok(config) => config,
            Err(e) => return CheckOutcome::fail(format!("Error loading page: {e}")),
        };

        let (mut browser, mut handler) = match Browser::launch(config).await {
            Ok(pair) => pair,
            Err(e) => return CheckOutcome::fail(format!("Error loading page: {e}")),
        };
        let driver = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let outcome = self.probe(&browser, pages_url).await;

        if let Err(e) = browser.close().await {
            tracing::debug!(error = %e, "browser close failed");
        }
        let _ = browser.wait().await;
        driver.abort();

        outcome
    }

    async fn probe(&self, browser: &Browser, pages_url: &str) -> CheckOutcome {
        let page = match tokio::time::timeout(self.load_timeout, browser.new_page(pages_url)).await
        {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => return CheckOutcome::fail(format!("Error loading page: {e}")),
            Err(_) => {
                return CheckOutcome::fail(format!(
                    "Error loading page: timed out after {:?}",
                    self.load_timeout
                ))
            }
        };

        for selector in MARKER_SELECTORS {
            if page.find_element(selector).await.is_ok() {
                return CheckOutcome::pass("Required element exists");
            }
        }
        CheckOutcome::fail("Element missing")
    }
}

impl Default for PageVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactCheck for PageVerifier {
    async fn check(&self, url: &str) -> CheckOutcome {
        PageVerifier::check(self, url).await
    }
}
