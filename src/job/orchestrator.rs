//! Runs one form job from accepted to a terminal status.
//!
//! fetch transactions -> pick generator -> render -> upload -> record.
//! Any failing step ends the job. Exactly one terminal status is written.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::model::{FormKind, JobDescriptor};
use super::status::{JobStatusRecorder, StatusUpdate};
use crate::forms::common::storage_timestamp;
use crate::forms::{CategoryLabels, Form1099Generator, Generator, RenderError, ScheduleCGenerator};
use crate::ledger::TransactionStore;
use crate::metrics;
use crate::storage::ObjectStorage;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Why a job failed. The `Display` text is what the status record shows.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to fetch transactions")]
    FetchTransactions,
    #[error("failed to generate form: unknown form type: {0}")]
    UnknownFormType(String),
    #[error("failed to generate form: {0}")]
    Generate(#[from] RenderError),
    #[error("failed to upload form")]
    Upload,
}

pub struct JobOrchestrator {
    transactions: Arc<dyn TransactionStore + Send + Sync>,
    storage: Arc<dyn ObjectStorage + Send + Sync>,
    recorder: Arc<dyn JobStatusRecorder + Send + Sync>,
    schedule_c: ScheduleCGenerator,
    form_1099: Form1099Generator,
}

impl JobOrchestrator {
    pub fn new(
        transactions: Arc<dyn TransactionStore + Send + Sync>,
        storage: Arc<dyn ObjectStorage + Send + Sync>,
        recorder: Arc<dyn JobStatusRecorder + Send + Sync>,
        labels: Arc<CategoryLabels>,
    ) -> Self {
        Self {
            transactions,
            storage,
            recorder,
            schedule_c: ScheduleCGenerator::new(labels),
            form_1099: Form1099Generator::new(),
        }
    }

    /// Run the job to completion and record its outcome.
    pub async fn run(&self, job: &JobDescriptor) {
        self.run_at(job, Utc::now()).await;
    }

    /// Like `run`, with the generation timestamp used for the storage key.
    pub async fn run_at(&self, job: &JobDescriptor, generated_at: DateTime<Utc>) {
        log::info!(
            "Job {}: generating {} for user {}",
            job.job_id,
            job.form_type,
            job.user_id
        );

        let update = match self.process(job, generated_at).await {
            Ok(result_url) => {
                log::info!("Job {}: done, form at {}", job.job_id, result_url);
                metrics::record_job_outcome("done");
                StatusUpdate::Done { result_url }
            }
            Err(e) => {
                log::error!("Job {}: {}", job.job_id, e);
                metrics::record_job_outcome("error");
                StatusUpdate::Error {
                    message: e.to_string(),
                }
            }
        };

        if let Err(e) = self.recorder.update(&job.job_id, &update).await {
            log::error!("Job {}: failed to record job status: {}", job.job_id, e);
        }
    }

    async fn process(
        &self,
        job: &JobDescriptor,
        generated_at: DateTime<Utc>,
    ) -> Result<String, JobError> {
        let transactions = self
            .transactions
            .fetch_for_user(&job.user_id)
            .await
            .map_err(|e| {
                log::error!("Job {}: transaction fetch failed: {}", job.job_id, e);
                JobError::FetchTransactions
            })?;
        log::info!(
            "Job {}: fetched {} transactions",
            job.job_id,
            transactions.len()
        );

        let kind: FormKind = job.form_type.parse().map_err(JobError::UnknownFormType)?;
        let form = self.generator_for(kind).generate(&transactions)?;
        log::debug!(
            "Job {}: rendered {} page(s), {} bytes",
            job.job_id,
            form.document.page_count(),
            form.pdf.len()
        );

        let key = storage_key(&job.user_id, kind, generated_at);
        log::info!("Job {}: uploading form to {}", job.job_id, key);
        self.storage
            .upload_file(&key, &form.pdf, PDF_CONTENT_TYPE)
            .await
            .map_err(|e| {
                log::error!("Job {}: upload failed: {}", job.job_id, e);
                JobError::Upload
            })
    }

    fn generator_for(&self, kind: FormKind) -> &dyn Generator {
        match kind {
            FormKind::ScheduleC => &self.schedule_c,
            FormKind::Form1099 => &self.form_1099,
        }
    }
}

/// `{user}/{form}_{YYYYMMDD_HHMMSS}.pdf`
pub fn storage_key(user_id: &str, kind: FormKind, generated_at: DateTime<Utc>) -> String {
    format!(
        "{}/{}_{}.pdf",
        user_id,
        kind.as_str(),
        storage_timestamp(generated_at)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_storage_key_format() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap();
        assert_eq!(
            storage_key("user-42", FormKind::ScheduleC, at),
            "user-42/schedule_c_20241231_235958.pdf"
        );
        assert_eq!(
            storage_key("user-42", FormKind::Form1099, at),
            "user-42/1099_20241231_235958.pdf"
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            JobError::FetchTransactions.to_string(),
            "failed to fetch transactions"
        );
        assert_eq!(JobError::Upload.to_string(), "failed to upload form");
        assert_eq!(
            JobError::UnknownFormType("w2".to_string()).to_string(),
            "failed to generate form: unknown form type: w2"
        );
    }
}
