use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info};
use webhook::NormalizedRecord;

use crate::engine::TriageWorker;

const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Backlog depth before ingress would start blocking on enqueue; generous
/// enough that a burst of webhooks never back-pressures the HTTP response.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Create the in-process triage job channel: the sender half is handed to
/// `webhook::AppState`, the receiver half drives [`run`].
#[must_use]
pub fn channel(capacity: usize) -> (mpsc::Sender<NormalizedRecord>, mpsc::Receiver<NormalizedRecord>) {
    mpsc::channel(capacity)
}

/// Cooperative stop flag for [`run`], mirroring
/// `original_source/backend/webhook_handler.py`'s `TriageJobQueue.stop_processing`.
#[derive(Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drain `receiver` until `stop` is set, running each job through
/// `worker.process`. Polls with a 1-second timeout so a stop request is
/// noticed promptly even with no jobs in flight. Jobs already dequeued
/// are always run to completion; only the next pickup is interrupted.
pub async fn run(worker: Arc<TriageWorker>, mut receiver: mpsc::Receiver<NormalizedRecord>, stop: StopFlag) {
    info!("triage worker loop started");

    while !stop.is_stopped() {
        match tokio::time::timeout(POLL_INTERVAL, receiver.recv()).await {
            Ok(Some(record)) => {
                let issue_id = record.issue_id.clone();
                worker.process(record).await;
                info!(issue_id, "triage job complete");
            }
            Ok(None) => {
                error!("triage job queue closed, stopping worker loop");
                break;
            }
            Err(_) => continue,
        }
    }

    info!("triage worker loop stopped");
}
