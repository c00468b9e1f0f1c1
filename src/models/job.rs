use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fallback span for a job stored without an end or a duration
pub const FALLBACK_JOB_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Scheduled and in-progress jobs hold the employee's time
    pub fn is_committed(self) -> bool {
        matches!(self, JobStatus::Scheduled | JobStatus::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status {0:?}")]
pub struct UnknownJobStatus(String);

impl FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(JobStatus::Scheduled),
            "in_progress" => Ok(JobStatus::InProgress),
            "completed" => Ok(JobStatus::Completed),
            "cancelled" => Ok(JobStatus::Cancelled),
            other => Err(UnknownJobStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = UnknownJobStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A persisted job row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub organization_id: i32,
    pub contract_id: Option<i32>,
    pub assigned_employee_id: Option<i32>,
    pub scheduled_for: DateTime<Utc>,
    pub scheduled_end: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub tasks: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// End of the job for overlap checks, falling back to
    /// `scheduled_for + duration_minutes` (or one hour) when no end is stored.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.scheduled_end.unwrap_or_else(|| {
            let minutes = self
                .duration_minutes
                .filter(|m| *m > 0)
                .map(i64::from)
                .unwrap_or(FALLBACK_JOB_MINUTES);
            self.scheduled_for + Duration::minutes(minutes)
        })
    }
}

/// One concrete occurrence expanded from a contract template, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobInstanceDraft {
    pub scheduled_for: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub tasks: Vec<String>,
    pub assigned_employee_id: Option<i32>,
    pub source_contract_id: i32,
}

impl JobInstanceDraft {
    pub fn duration_minutes(&self) -> i64 {
        (self.scheduled_end - self.scheduled_for).num_minutes()
    }

    /// Stable key for one contract occurrence, used by the job store to
    /// ignore a second insert of the same slot.
    pub fn idempotency_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source_contract_id.to_be_bytes());
        hasher.update(b"|");
        hasher.update(self.scheduled_for.to_rfc3339().as_bytes());
        hex::encode(hasher.finalize())
    }
}
