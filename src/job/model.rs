use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /generate-form`.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormJobRequest {
    pub job_id: String,
    pub user_id: String,
    /// `schedule_c` or `1099`.
    pub form_type: String,
}

impl FormJobRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.job_id.trim().is_empty() {
            return Err("jobId must not be empty".to_string());
        }
        if self.user_id.trim().is_empty() {
            return Err("userId must not be empty".to_string());
        }
        Ok(())
    }
}

/// An accepted unit of work. Never mutated after acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub job_id: String,
    pub user_id: String,
    /// Requested form, as sent. Resolved to a `FormKind` when the job runs.
    pub form_type: String,
}

impl From<FormJobRequest> for JobDescriptor {
    fn from(request: FormJobRequest) -> Self {
        Self {
            job_id: request.job_id,
            user_id: request.user_id,
            form_type: request.form_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    ScheduleC,
    Form1099,
}

impl FormKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::ScheduleC => "schedule_c",
            FormKind::Form1099 => "1099",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "schedule_c" => Ok(FormKind::ScheduleC),
            "1099" => Ok(FormKind::Form1099),
            other => Err(other.to_string()),
        }
    }
}
