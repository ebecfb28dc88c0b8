//! Job status records in the `form_jobs` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use postgrest::Postgrest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::SupabaseConfig;

const FORM_JOBS_TABLE: &str = "form_jobs";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

/// The terminal outcome of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    Done { result_url: String },
    Error { message: String },
}

impl StatusUpdate {
    pub fn status(&self) -> JobStatus {
        match self {
            StatusUpdate::Done { .. } => JobStatus::Done,
            StatusUpdate::Error { .. } => JobStatus::Error,
        }
    }

    pub fn to_row(&self, updated_at: DateTime<Utc>) -> StatusRow<'_> {
        let (result_url, error_message) = match self {
            StatusUpdate::Done { result_url } => (Some(result_url.as_str()), None),
            StatusUpdate::Error { message } => (None, Some(message.as_str())),
        };
        StatusRow {
            status: self.status(),
            error_message,
            result_url,
            updated_at,
        }
    }
}

/// Column values written to `form_jobs`.
#[derive(Serialize, Debug)]
pub struct StatusRow<'a> {
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_url: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("status store unreachable: {0}")]
    Transport(String),
    #[error("status store rejected update with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("failed to encode status update: {0}")]
    Encode(#[from] serde_json::Error),
}

#[async_trait]
pub trait JobStatusRecorder {
    async fn update(&self, job_id: &str, update: &StatusUpdate) -> Result<(), StatusError>;
}

pub struct PostgrestStatusRecorder {
    client: Postgrest,
    service_role_key: String,
}

impl PostgrestStatusRecorder {
    pub fn new(config: &SupabaseConfig) -> Self {
        let client = Postgrest::new(format!(
            "{}/rest/v1",
            config.supabase_url.trim_end_matches('/')
        ))
        .insert_header("apikey", config.service_role_key.clone());

        Self {
            client,
            service_role_key: config.service_role_key.clone(),
        }
    }
}

#[async_trait]
impl JobStatusRecorder for PostgrestStatusRecorder {
    async fn update(&self, job_id: &str, update: &StatusUpdate) -> Result<(), StatusError> {
        let body = serde_json::to_string(&update.to_row(Utc::now()))?;

        let response = self
            .client
            .from(FORM_JOBS_TABLE)
            .auth(&self.service_role_key)
            .eq("id", job_id)
            .update(body)
            .execute()
            .await
            .map_err(|e| StatusError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(StatusError::Rejected { status, body });
        }
        Ok(())
    }
}
