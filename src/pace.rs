//! Pacing strategy for iterating remote calls.
//!
//! Deliveries and evaluations across roster entries are independent, but
//! remote hosts should not be hammered. Sequential processing with a pause
//! between entries is the default; bounded concurrency is an opt-in that
//! keeps results in input order so outcomes stay attributable.

use std::future::Future;
use std::time::Duration;

use futures::StreamExt;

/// How a batch of independent per-entry operations is scheduled.
#[derive(Debug, Clone)]
pub enum Pacing {
    /// One entry at a time, pausing between entries.
    Sequential { pause: Duration },
    /// Up to `limit` entries in flight at once.
    Bounded { limit: usize },
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::Sequential {
            pause: Duration::from_secs(1),
        }
    }
}

/// Run `task` over every item under the given pacing. Results are returned
/// in the order of the input items in both modes.
pub async fn run_paced<T, R, F, Fut>(pacing: &Pacing, items: Vec<T>, task: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    match pacing {
        Pacing::Sequential { pause } => {
            let total = items.len();
            let mut results = Vec::with_capacity(total);
            for (i, item) in items.into_iter().enumerate() {
                results.push(task(item).await);
                if i + 1 < total {
                    tokio::time::sleep(*pause).await;
                }
            }
            results
        }
        Pacing::Bounded { limit } => {
            futures::stream::iter(items)
                .map(task)
                .buffered((*limit).max(1))
                .collect()
                .await
        }
    }
}
