use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use log::{debug, info};

use super::aggregate::{WorkerEvent, aggregate};
use crate::credential::Credential;
use crate::error::CredHubError;

/// Fixed-size pool of threads fetching version histories in parallel.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    concurrency: usize,
}

impl WorkerPool {
    /// A concurrency of zero is raised to one.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs `fetch` once for every entry in `paths` and gathers the results.
    ///
    /// A failing path does not stop the workers; the remaining paths are still
    /// fetched and the first failure is returned once all workers are done.
    /// Every worker thread has been joined by the time this returns.
    pub fn enumerate<F>(
        &self,
        paths: Vec<String>,
        fetch: F,
    ) -> Result<Vec<Credential>, CredHubError>
    where
        F: Fn(&str) -> Result<Vec<Credential>, CredHubError> + Sync,
    {
        let started = Instant::now();
        let total = paths.len();
        let workers = self.concurrency.min(total.max(1));
        info!("[credhub-pool] fetching versions for {total} path(s) with {workers} worker(s)");

        let (path_tx, path_rx) = mpsc::sync_channel::<String>(0);
        let path_rx = Arc::new(Mutex::new(path_rx));
        let (event_tx, event_rx) = mpsc::sync_channel::<WorkerEvent>(0);

        let result = thread::scope(|scope| {
            for worker in 0..workers {
                let path_rx = Arc::clone(&path_rx);
                let event_tx = event_tx.clone();
                let fetch = &fetch;
                scope.spawn(move || run_worker(worker, path_rx, event_tx, fetch));
            }
            // Workers hold the only remaining handles: the path queue closes for
            // the producer once they all exit, and the event stream closes for
            // the aggregator at the same point.
            drop(path_rx);
            drop(event_tx);

            scope.spawn(move || {
                for path in paths {
                    if path_tx.send(path).is_err() {
                        break;
                    }
                }
            });

            aggregate(event_rx)
        });

        debug!(
            "[credhub-pool] enumeration of {total} path(s) finished in {}ms",
            started.elapsed().as_millis()
        );
        result
    }
}

fn run_worker<F>(
    worker: usize,
    paths: Arc<Mutex<Receiver<String>>>,
    events: SyncSender<WorkerEvent>,
    fetch: &F,
) where
    F: Fn(&str) -> Result<Vec<Credential>, CredHubError>,
{
    let mut processed = 0usize;
    loop {
        let next = match paths.lock() {
            Ok(queue) => queue.recv(),
            Err(_) => break,
        };
        let Ok(path) = next else {
            break;
        };
        processed += 1;

        match fetch(&path) {
            Ok(versions) => {
                for credential in versions {
                    if events.send(WorkerEvent::Found(credential)).is_err() {
                        return;
                    }
                }
            }
            Err(err) => {
                if events.send(WorkerEvent::Failed(err)).is_err() {
                    return;
                }
            }
        }
    }
    debug!("[credhub-pool] worker {worker} exiting after {processed} path(s)");
}
