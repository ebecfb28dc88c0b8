//! Tests for the bounded job queue and its worker pool.

mod common;

use std::sync::Arc;

use common::{job, orchestrator, GatedTransactionStore, MockRecorder, MockStorage, MockTransactionStore};
use taxform_worker::job::{JobQueue, QueueError, StatusUpdate};

#[tokio::test]
async fn test_queued_jobs_each_get_one_terminal_update() {
    let store = Arc::new(MockTransactionStore::new(Vec::new()));
    let storage = Arc::new(MockStorage::new());
    let recorder = Arc::new(MockRecorder::new());
    let orchestrator = Arc::new(orchestrator(store, storage.clone(), recorder.clone()));

    let (queue, workers) = JobQueue::start(orchestrator, 3, 16);
    for i in 0..10 {
        let form_type = if i % 2 == 0 { "schedule_c" } else { "1099" };
        queue
            .try_enqueue(job(&format!("job-{}", i), &format!("user-{}", i), form_type))
            .unwrap();
    }

    let updates = recorder.wait_for_updates(10).await;
    drop(queue);
    workers.join().await;

    let mut job_ids: Vec<_> = updates.iter().map(|(id, _)| id.clone()).collect();
    job_ids.sort();
    job_ids.dedup();
    assert_eq!(job_ids.len(), 10, "every job recorded exactly once");
    assert!(updates
        .iter()
        .all(|(_, update)| matches!(update, StatusUpdate::Done { .. })));
    assert_eq!(storage.uploads().await.len(), 10);
}

#[tokio::test]
async fn test_full_queue_rejects_new_jobs() {
    let store = Arc::new(GatedTransactionStore::new());
    let storage = Arc::new(MockStorage::new());
    let recorder = Arc::new(MockRecorder::new());
    let orchestrator = Arc::new(orchestrator(store.clone(), storage, recorder.clone()));

    let (queue, workers) = JobQueue::start(orchestrator, 1, 1);

    // The single worker takes the first job and blocks on the fetch.
    queue.try_enqueue(job("running", "u", "1099")).unwrap();
    store.wait_started().await;

    // One slot of waiting room.
    queue.try_enqueue(job("waiting", "u", "1099")).unwrap();
    assert_eq!(
        queue.try_enqueue(job("refused", "u", "1099")),
        Err(QueueError::Full)
    );

    store.release(2);
    let updates = recorder.wait_for_updates(2).await;
    drop(queue);
    workers.join().await;

    let ids: Vec<_> = updates.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["running", "waiting"]);
    assert_eq!(store.call_count(), 2);
}

#[tokio::test]
async fn test_workers_finish_queued_jobs_after_queue_is_dropped() {
    let store = Arc::new(GatedTransactionStore::new());
    let storage = Arc::new(MockStorage::new());
    let recorder = Arc::new(MockRecorder::new());
    let orchestrator = Arc::new(orchestrator(store.clone(), storage, recorder.clone()));

    let (queue, workers) = JobQueue::start(orchestrator, 1, 4);
    queue.try_enqueue(job("a", "u", "schedule_c")).unwrap();
    queue.try_enqueue(job("b", "u", "schedule_c")).unwrap();
    drop(queue);

    store.release(2);
    workers.join().await;

    assert_eq!(recorder.updates().await.len(), 2);
}
