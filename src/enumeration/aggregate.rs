use std::sync::mpsc::Receiver;

use log::{debug, warn};

use crate::credential::Credential;
use crate::error::CredHubError;

/// Values handed from a worker to the aggregator.
pub(crate) enum WorkerEvent {
    Found(Credential),
    Failed(CredHubError),
}

/// Drains `events` until every sender is gone, then reports either the full
/// credential list or the first error observed.
///
/// Returning early would strand workers blocked on a send, so errors are only
/// acted on once the stream is exhausted.
pub(crate) fn aggregate(events: Receiver<WorkerEvent>) -> Result<Vec<Credential>, CredHubError> {
    let mut credentials = Vec::new();
    let mut first_error: Option<CredHubError> = None;
    let mut failures = 0usize;

    for event in events {
        match event {
            WorkerEvent::Found(credential) => credentials.push(credential),
            WorkerEvent::Failed(err) => {
                failures += 1;
                warn!("[credhub-pool] {err}");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    debug!(
        "[credhub-pool] aggregation finished: {} credential(s), {} failure(s)",
        credentials.len(),
        failures
    );

    match first_error {
        Some(err) => Err(err),
        None => Ok(credentials),
    }
}
