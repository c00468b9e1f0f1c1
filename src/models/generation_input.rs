use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Job, JobInstanceDraft};
use crate::scheduling::Minutes;

/// Input for generating jobs from a contract's weekly schedule
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateJobsInput {
    pub weeks_ahead: i64,
    /// Rotation order; defaults to the contract roster when omitted
    pub employee_ids: Option<Vec<i32>>,
    #[schema(example = "09:00")]
    pub default_start_time: Option<String>,
    /// Minutes as a number, or a duration such as "90m" or "2h"
    pub default_duration_minutes: Option<Minutes>,
}

/// Advisory warning: the assigned employee already holds overlapping work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConflict {
    pub scheduled_for: DateTime<Utc>,
    pub employee_id: i32,
    pub conflicting_job_id: Uuid,
    pub message: String,
}

/// Drafts that would be created, nothing persisted
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPreview {
    pub jobs: Vec<JobInstanceDraft>,
    pub warnings: Vec<ScheduleConflict>,
}

/// Response after persisting generated jobs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateJobsResponse {
    pub created: usize,
    /// Occurrences that already existed and were left alone
    pub skipped: usize,
    pub jobs: Vec<Job>,
    pub warnings: Vec<ScheduleConflict>,
}
