//! Round dispatch and progression.
//!
//! A round is one pass over the roster: build a payload per participant,
//! deliver it, record the outcome. Progression to the next round filters the
//! roster through an advancement policy over the completed round's verdicts.
//! No cross-round retry and no resumption: a pass runs to completion.

use crate::config::Config;
use crate::delivery::{Deliver, DeliveryOutcome, HttpDelivery};
use crate::pace::{run_paced, Pacing};
use crate::payload::TaskTemplate;
use crate::roster::RosterEntry;
use crate::verify::VerificationVerdict;

/// Decides from a verdict whether a participant advances.
pub type AdvancePolicy = fn(&VerificationVerdict) -> bool;

/// Default policy: every participant advances regardless of verdict.
pub fn advance_all(_verdict: &VerificationVerdict) -> bool {
    true
}

/// Advance only participants that passed both checks.
pub fn advance_passing(verdict: &VerificationVerdict) -> bool {
    verdict.license.pass && verdict.page.pass
}

/// Posts one round's task to every roster entry.
pub struct Dispatcher {
    transport: Box<dyn Deliver>,
    callback_url: String,
    /// Endpoint used when an entry has no intake endpoint on record.
    fallback_endpoint: String,
    shared_secret: String,
    pacing: Pacing,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self::with_transport(Box::new(HttpDelivery::new()), config, Pacing::default())
    }

    pub fn with_transport(transport: Box<dyn Deliver>, config: &Config, pacing: Pacing) -> Self {
        Self {
            transport,
            callback_url: config.evaluation_url.clone(),
            fallback_endpoint: config.evaluation_url.clone(),
            shared_secret: config.shared_secret.clone(),
            pacing,
        }
    }

    /// Build and deliver `template` to every entry, yielding one outcome per
    /// entry in roster order. A failed delivery never aborts the pass.
    pub async fn dispatch(
        &self,
        entries: Vec<RosterEntry>,
        template: TaskTemplate,
    ) -> Vec<(RosterEntry, DeliveryOutcome)> {
        run_paced(&self.pacing, entries, |entry| async move {
            let secret = entry.secret.as_deref().unwrap_or(&self.shared_secret);
            let payload = template.build(None, &entry.email, secret, &self.callback_url);
            let endpoint = entry.endpoint.as_deref().unwrap_or(&self.fallback_endpoint);

            let outcome = self.transport.deliver(endpoint, &payload).await;
            tracing::info!(
                email = %entry.email,
                endpoint,
                task = %payload.task,
                succeeded = outcome.succeeded,
                status = ?outcome.http_status,
                attempts = outcome.attempts_made,
                "dispatched"
            );
            (entry, outcome)
        })
        .await
    }
}

/// Select the entries that advance to the next round.
///
/// `verdicts` must be aligned with `entries` (one verdict per entry, same
/// order), as produced by a full evaluation pass.
pub fn select_advancing(
    entries: Vec<RosterEntry>,
    verdicts: &[VerificationVerdict],
    policy: AdvancePolicy,
) -> Vec<RosterEntry> {
    entries
        .into_iter()
        .zip(verdicts)
        .filter(|(_, verdict)| policy(verdict))
        .map(|(entry, _)| entry)
        .collect()
}
