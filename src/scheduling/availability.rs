use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::Minutes;
use crate::models::{Job, JobInstanceDraft, ScheduleConflict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Busy,
}

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap when each starts before the other ends. Touching ends do not.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Range of existing jobs to load for a window: the window widened by
/// `margin` on both sides so jobs stored without an end are still caught.
pub fn query_range(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    margin: Minutes,
) -> (DateTime<Utc>, DateTime<Utc>) {
    (window_start - margin.as_duration(), window_end + margin.as_duration())
}

fn holds_window(job: &Job, employee_id: i32, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    job.status.is_committed()
        && job.assigned_employee_id == Some(employee_id)
        && overlaps(job.scheduled_for, job.effective_end(), start, end)
}

/// Mark each candidate busy when one of their scheduled or in-progress jobs
/// overlaps `[window_start, window_end)`.
///
/// Advisory only: every candidate appears in the result and nothing here
/// fails because someone is busy.
pub fn check_availability(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    candidate_ids: &[i32],
    existing_jobs: &[Job],
) -> BTreeMap<i32, Availability> {
    candidate_ids
        .iter()
        .map(|&employee_id| {
            let busy = existing_jobs
                .iter()
                .any(|job| holds_window(job, employee_id, window_start, window_end));
            let status = if busy { Availability::Busy } else { Availability::Available };
            (employee_id, status)
        })
        .collect()
}

/// Warnings for assigned drafts whose employee already holds an
/// overlapping job. Unassigned drafts never conflict.
pub fn conflicts_for_drafts(drafts: &[JobInstanceDraft], existing_jobs: &[Job]) -> Vec<ScheduleConflict> {
    drafts
        .iter()
        .filter_map(|draft| {
            let employee_id = draft.assigned_employee_id?;
            let job = existing_jobs
                .iter()
                .find(|job| holds_window(job, employee_id, draft.scheduled_for, draft.scheduled_end))?;
            Some(ScheduleConflict {
                scheduled_for: draft.scheduled_for,
                employee_id,
                conflicting_job_id: job.id,
                message: format!(
                    "Employee {} already has a job from {} to {}",
                    employee_id,
                    job.scheduled_for.format("%Y-%m-%d %H:%M"),
                    job.effective_end().format("%H:%M")
                ),
            })
        })
        .collect()
}
