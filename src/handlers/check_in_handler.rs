use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extractors::Organization,
    models::{CheckIn, CheckInInput, CheckInResponse, JobStatus},
    scheduling::{geofence, GeoPoint, GeofenceVerdict},
    AppError, AppResult, AppState,
};

/// POST /api/jobs/{id}/check-in - GPS-verified start of a scheduled job
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/check-in",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ("X-Organization-Id" = i32, Header, description = "Organization the job belongs to")
    ),
    request_body = CheckInInput,
    responses(
        (status = 200, description = "Checked in; job is now in progress", body = CheckInResponse),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job not scheduled or assigned to someone else"),
        (status = 422, description = "Invalid coordinates or outside the site geofence")
    ),
    tag = "check-ins"
)]
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Organization(organization_id): Organization,
    Path(job_id): Path<Uuid>,
    Json(input): Json<CheckInInput>,
) -> AppResult<Json<CheckInResponse>> {
    let reported = GeoPoint::new(input.latitude, input.longitude)?;

    let site = state
        .jobs
        .find_job_site(organization_id, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    if site.job.status != JobStatus::Scheduled {
        return Err(AppError::Conflict(format!(
            "Job {} is {}, only scheduled jobs can be checked into",
            job_id,
            site.job.status.as_str()
        )));
    }
    if let Some(assignee) = site.job.assigned_employee_id {
        if assignee != input.employee_id {
            return Err(AppError::Conflict(format!(
                "Job {} is assigned to employee {}",
                job_id, assignee
            )));
        }
    }

    let (distance_meters, verified) =
        match geofence::verify(site.location(), reported, state.config.geofence_radius_meters) {
            GeofenceVerdict::Within { distance_meters } => (Some(distance_meters), true),
            GeofenceVerdict::Unverified => (None, false),
            GeofenceVerdict::Outside {
                distance_meters,
                radius_meters,
            } => {
                counter!("check_ins_total", "outcome" => "rejected").increment(1);
                tracing::warn!(job_id = %job_id, employee_id = input.employee_id, distance_meters, "Check-in outside geofence");
                return Err(AppError::Validation(format!(
                    "Check-in is {:.0} m from the job site, allowed radius is {:.0} m",
                    distance_meters, radius_meters
                )));
            }
        };

    let record = CheckIn {
        id: Uuid::new_v4(),
        job_id,
        employee_id: input.employee_id,
        latitude: reported.latitude,
        longitude: reported.longitude,
        distance_meters,
        verified,
        checked_in_at: Utc::now(),
    };

    let job = state.jobs.record_check_in(organization_id, &record).await?;

    let outcome = if verified { "verified" } else { "unverified" };
    counter!("check_ins_total", "outcome" => outcome).increment(1);
    tracing::info!(job_id = %job_id, employee_id = input.employee_id, verified, "Employee checked in");

    Ok(Json(CheckInResponse {
        job,
        distance_meters,
        verified,
    }))
}
