use axum::{extract::State, Json};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    extractors::Organization,
    models::{AvailabilityInput, AvailabilityResponse, EmployeeAvailability},
    scheduling, AppError, AppResult, AppState,
};

/// POST /api/availability - Which employees already hold work in a time window
#[utoipa::path(
    post,
    path = "/api/availability",
    params(
        ("X-Organization-Id" = i32, Header, description = "Organization the employees belong to")
    ),
    request_body = AvailabilityInput,
    responses(
        (status = 200, description = "Availability per employee; busy is a warning only", body = AvailabilityResponse),
        (status = 422, description = "Empty window or no employees")
    ),
    tag = "availability"
)]
pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Organization(organization_id): Organization,
    Json(input): Json<AvailabilityInput>,
) -> AppResult<Json<AvailabilityResponse>> {
    if input.window_start >= input.window_end {
        return Err(AppError::Validation(
            "windowStart must be before windowEnd".to_string(),
        ));
    }
    if input.employee_ids.is_empty() {
        return Err(AppError::Validation("employeeIds must not be empty".to_string()));
    }

    let candidates: Vec<i32> = input
        .employee_ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let (from, to) = scheduling::query_range(
        input.window_start,
        input.window_end,
        state.config.default_duration,
    );
    let existing = state
        .jobs
        .committed_jobs(organization_id, &candidates, from, to)
        .await?;

    let employees = scheduling::check_availability(input.window_start, input.window_end, &candidates, &existing)
        .into_iter()
        .map(|(employee_id, status)| EmployeeAvailability { employee_id, status })
        .collect();

    Ok(Json(AvailabilityResponse {
        window_start: input.window_start,
        window_end: input.window_end,
        employees,
    }))
}
