//! Background triage execution.
//!
//! Ticket creation must return success to the client even when triage
//! subsequently fails, so triage is handed to a dedicated worker task with
//! its own failure channel instead of being awaited inline. Enqueueing
//! never blocks and never fails the caller; run failures are logged and
//! forwarded on the failure channel for operational visibility.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use uuid::Uuid;

use crate::pipeline::TriagePipeline;

// ---------------------------------------------------------------------------
// TriageFailure
// ---------------------------------------------------------------------------

/// One failed run, as delivered on the worker's failure channel.
#[derive(Debug, Clone)]
pub struct TriageFailure {
    pub ticket_id: Uuid,
    pub error: String,
}

// ---------------------------------------------------------------------------
// TriageWorker
// ---------------------------------------------------------------------------

/// Handle for enqueueing tickets onto the background triage task.
pub struct TriageWorker {
    tx: mpsc::UnboundedSender<Uuid>,
    handle: JoinHandle<()>,
}

impl TriageWorker {
    /// Spawn the worker task. Returns the handle and the failure channel;
    /// dropping the receiver is fine, failures are still logged.
    pub fn spawn(pipeline: Arc<TriagePipeline>) -> (Self, mpsc::UnboundedReceiver<TriageFailure>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Uuid>();
        let (failure_tx, failure_rx) = mpsc::unbounded_channel::<TriageFailure>();

        let handle = tokio::spawn(async move {
            while let Some(ticket_id) = rx.recv().await {
                let pipeline = pipeline.clone();
                // The pipeline is synchronous (embedded store); keep it off
                // the async executor threads.
                let result =
                    tokio::task::spawn_blocking(move || pipeline.run(ticket_id)).await;
                match result {
                    Ok(Ok(suggestion)) => {
                        debug!(
                            ticket = %ticket_id,
                            auto_closed = suggestion.auto_closed,
                            "background triage complete"
                        );
                    }
                    Ok(Err(e)) => {
                        error!(ticket = %ticket_id, error = %e, "background triage failed");
                        let _ = failure_tx.send(TriageFailure {
                            ticket_id,
                            error: e.to_string(),
                        });
                    }
                    Err(join_err) => {
                        error!(ticket = %ticket_id, error = %join_err, "triage task panicked");
                        let _ = failure_tx.send(TriageFailure {
                            ticket_id,
                            error: join_err.to_string(),
                        });
                    }
                }
            }
        });

        (Self { tx, handle }, failure_rx)
    }

    /// Queue a ticket for triage. Returns immediately; a stopped worker
    /// drops the id, it never propagates an error to ticket creation.
    pub fn enqueue(&self, ticket_id: Uuid) {
        if self.tx.send(ticket_id).is_err() {
            error!(ticket = %ticket_id, "triage worker is gone, ticket not triaged");
        }
    }

    /// Close the queue and wait for in-flight runs to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.handle.await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::ticket::Ticket;
    use crate::types::TicketStatus;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<Store>, Arc<TriagePipeline>) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(Store::open(&crate::paths::db_path(dir.path())).unwrap());
        let pipeline = Arc::new(TriagePipeline::new(store.clone(), dir.path()));
        (dir, store, pipeline)
    }

    #[tokio::test]
    async fn enqueued_ticket_is_triaged() {
        let (_dir, store, pipeline) = setup();
        let ticket = Ticket::create(&store, "t", "refund my invoice", "a@x.com", None).unwrap();

        let (worker, _failures) = TriageWorker::spawn(pipeline);
        worker.enqueue(ticket.id);
        worker.shutdown().await;

        let loaded = Ticket::load(&store, ticket.id).unwrap();
        assert_eq!(loaded.status, TicketStatus::WaitingHuman);
        assert!(loaded.suggestion_id.is_some());
    }

    #[tokio::test]
    async fn failure_lands_on_the_channel_not_the_caller() {
        let (_dir, _store, pipeline) = setup();
        let missing = Uuid::new_v4();

        let (worker, mut failures) = TriageWorker::spawn(pipeline);
        // enqueue itself must not error
        worker.enqueue(missing);
        worker.shutdown().await;

        let failure = failures.recv().await.expect("failure should be reported");
        assert_eq!(failure.ticket_id, missing);
        assert!(failure.error.contains("not found"));
    }

    #[tokio::test]
    async fn worker_keeps_running_after_a_failure() {
        let (_dir, store, pipeline) = setup();
        let ticket = Ticket::create(&store, "t", "d", "a@x.com", None).unwrap();

        let (worker, mut failures) = TriageWorker::spawn(pipeline);
        worker.enqueue(Uuid::new_v4());
        worker.enqueue(ticket.id);
        worker.shutdown().await;

        assert!(failures.recv().await.is_some());
        let loaded = Ticket::load(&store, ticket.id).unwrap();
        assert_eq!(loaded.status, TicketStatus::WaitingHuman);
    }
}
