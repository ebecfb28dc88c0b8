#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, Notify, Semaphore};

use taxform_worker::forms::CategoryLabels;
use taxform_worker::job::{
    JobDescriptor, JobOrchestrator, JobStatusRecorder, StatusError, StatusUpdate,
};
use taxform_worker::ledger::{StoreError, Transaction, TransactionStore};
use taxform_worker::storage::ObjectStorage;

pub const PUBLIC_URL_PREFIX: &str = "https://test.supabase.co/storage/v1/object/public/forms/";

/// Build a transaction; an empty `category` stands for an uncategorized row.
pub fn tx(merchant: &str, category: &str, amount: Decimal) -> Transaction {
    Transaction {
        id: format!("{}-{}-{}", merchant, category, amount),
        date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
        amount,
        merchant: merchant.to_string(),
        category: Some(category.to_string()),
    }
}

pub fn job(job_id: &str, user_id: &str, form_type: &str) -> JobDescriptor {
    JobDescriptor {
        job_id: job_id.to_string(),
        user_id: user_id.to_string(),
        form_type: form_type.to_string(),
    }
}

/// Mock transaction store returning a fixed ledger
pub struct MockTransactionStore {
    transactions: Vec<Transaction>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTransactionStore {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn new_failing() -> Self {
        Self {
            transactions: Vec::new(),
            should_fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TransactionStore for MockTransactionStore {
    async fn fetch_for_user(&self, _user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(StoreError::Transport("connection refused".to_string()));
        }
        Ok(self.transactions.clone())
    }
}

/// Transaction store that holds every fetch until permits are released.
pub struct GatedTransactionStore {
    gate: Semaphore,
    started: Notify,
    calls: AtomicUsize,
}

impl GatedTransactionStore {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            started: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Wait until a fetch has begun.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self, fetches: usize) {
        self.gate.add_permits(fetches);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TransactionStore for GatedTransactionStore {
    async fn fetch_for_user(&self, _user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
        Ok(Vec::new())
    }
}

/// Mock implementation of ObjectStorage for testing
pub struct MockStorage {
    uploads: Mutex<Vec<(String, Vec<u8>, String)>>,
    should_fail: bool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            should_fail: false,
        }
    }

    pub fn new_failing() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    /// (key, bytes, content type) of every successful upload.
    pub async fn uploads(&self) -> Vec<(String, Vec<u8>, String)> {
        self.uploads.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MockStorage {
    async fn upload_file(
        &self,
        key: &str,
        file_data: &[u8],
        content_type: &str,
    ) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock upload failure".to_string());
        }
        self.uploads.lock().await.push((
            key.to_string(),
            file_data.to_vec(),
            content_type.to_string(),
        ));
        Ok(self.get_asset_url(key))
    }

    fn get_asset_url(&self, key: &str) -> String {
        format!("{}{}", PUBLIC_URL_PREFIX, key)
    }
}

/// Mock status recorder that keeps every update it receives
pub struct MockRecorder {
    updates: Mutex<Vec<(String, StatusUpdate)>>,
    should_fail: bool,
}

impl MockRecorder {
    pub fn new() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            should_fail: false,
        }
    }

    pub fn new_failing() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    pub async fn updates(&self) -> Vec<(String, StatusUpdate)> {
        self.updates.lock().await.clone()
    }

    /// Poll until `count` updates arrived, panicking after five seconds.
    pub async fn wait_for_updates(&self, count: usize) -> Vec<(String, StatusUpdate)> {
        let waited = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let updates = self.updates().await;
                if updates.len() >= count {
                    return updates;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        waited.expect("timed out waiting for status updates")
    }
}

#[async_trait::async_trait]
impl JobStatusRecorder for MockRecorder {
    async fn update(&self, job_id: &str, update: &StatusUpdate) -> Result<(), StatusError> {
        self.updates
            .lock()
            .await
            .push((job_id.to_string(), update.clone()));
        if self.should_fail {
            return Err(StatusError::Transport("status store down".to_string()));
        }
        Ok(())
    }
}

pub fn orchestrator<S>(
    store: Arc<S>,
    storage: Arc<MockStorage>,
    recorder: Arc<MockRecorder>,
) -> JobOrchestrator
where
    S: TransactionStore + Send + Sync + 'static,
{
    JobOrchestrator::new(
        store,
        storage,
        recorder,
        Arc::new(CategoryLabels::default()),
    )
}
