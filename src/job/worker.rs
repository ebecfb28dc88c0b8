//! Bounded job queue and the worker pool draining it.
//!
//! Accepted jobs wait in a fixed-capacity channel and a fixed number of
//! workers run them. When the channel is full new jobs are refused, so the
//! caller can answer with a retryable error instead of piling up work.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use super::model::JobDescriptor;
use super::orchestrator::JobOrchestrator;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("job queue is full")]
    Full,
    #[error("job queue is closed")]
    Closed,
}

/// Handle used to submit jobs. Cheap to clone.
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::Sender<JobDescriptor>,
}

/// The spawned workers. Join after every `JobQueue` clone is dropped to let
/// them finish the jobs already queued.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl JobQueue {
    pub fn start(
        orchestrator: Arc<JobOrchestrator>,
        worker_count: usize,
        capacity: usize,
    ) -> (JobQueue, WorkerPool) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));

        let handles = (0..worker_count.max(1))
            .map(|worker_id| {
                let receiver = receiver.clone();
                let orchestrator = orchestrator.clone();
                tokio::spawn(async move {
                    run_worker(worker_id, receiver, orchestrator).await;
                })
            })
            .collect();

        log::info!(
            "Started {} form workers, queue capacity {}",
            worker_count.max(1),
            capacity.max(1)
        );
        (JobQueue { sender }, WorkerPool { handles })
    }

    /// Queue a job without waiting for room.
    pub fn try_enqueue(&self, job: JobDescriptor) -> Result<(), QueueError> {
        self.sender.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => QueueError::Full,
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
        })
    }
}

impl WorkerPool {
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                log::error!("Form worker terminated abnormally: {}", e);
            }
        }
    }
}

async fn run_worker(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<JobDescriptor>>>,
    orchestrator: Arc<JobOrchestrator>,
) {
    log::debug!("Form worker {} started", worker_id);

    loop {
        let next = receiver.lock().await.recv().await;
        let Some(job) = next else {
            break;
        };
        log::debug!("Form worker {} picked up job {}", worker_id, job.job_id);
        orchestrator.run(&job).await;
    }

    log::debug!("Form worker {} stopped", worker_id);
}
