use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    extractors::Organization,
    models::{
        contract::time_of_day, ContractStatus, GenerateJobsInput, GenerateJobsResponse, GenerationPreview,
        JobInstanceDraft, ScheduleConflict,
    },
    scheduling::{self, GenerationRequest},
    AppError, AppResult, AppState,
};

/// Largest horizon the API accepts in one call
pub const MAX_WEEKS_AHEAD: i64 = 52;

struct GenerationPlan {
    drafts: Vec<JobInstanceDraft>,
    warnings: Vec<ScheduleConflict>,
}

/// Expand, rotate and conflict-check without persisting anything
async fn plan_generation(
    state: &AppState,
    organization: Organization,
    contract_id: i32,
    input: GenerateJobsInput,
    now: DateTime<Utc>,
) -> AppResult<GenerationPlan> {
    let Organization(organization_id) = organization;

    if input.weeks_ahead > MAX_WEEKS_AHEAD {
        return Err(AppError::Validation(format!(
            "weeksAhead must be at most {}, got {}",
            MAX_WEEKS_AHEAD, input.weeks_ahead
        )));
    }

    let contract = state
        .contracts
        .find_contract(organization_id, contract_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Contract {} not found", contract_id)))?;

    if contract.status != ContractStatus::Active {
        return Err(AppError::Validation(format!(
            "Contract {} is {}; only active contracts can generate jobs",
            contract_id,
            contract.status.as_str()
        )));
    }

    let employee_ids = input
        .employee_ids
        .unwrap_or_else(|| contract.employee_ids.clone());

    let mut seen = BTreeSet::new();
    if let Some(duplicate) = employee_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(AppError::Validation(format!(
            "Employee {} is listed more than once",
            duplicate
        )));
    }

    let missing = state
        .contracts
        .missing_employees(organization_id, &employee_ids)
        .await?;
    if !missing.is_empty() {
        let ids: Vec<String> = missing.iter().map(i32::to_string).collect();
        return Err(AppError::NotFound(format!("Employees not found: {}", ids.join(", "))));
    }

    let default_start_time = match input.default_start_time.as_deref() {
        Some(text) => time_of_day::parse(text).ok_or_else(|| {
            AppError::Validation(format!("defaultStartTime {:?} is not HH:MM", text))
        })?,
        None => state.config.default_start_time,
    };

    let request = GenerationRequest {
        contract_id,
        weeks_ahead: input.weeks_ahead,
        schedule_days: contract.schedule_days,
        employee_ids,
        default_start_time,
        default_duration: input
            .default_duration_minutes
            .unwrap_or(state.config.default_duration),
    };

    let local_now = now.with_timezone(&state.config.schedule_offset);
    let drafts: Vec<_> =
        scheduling::expand(&request, contract.start_date, contract.end_date, local_now)?.collect();
    let drafts = scheduling::assign(drafts, &request.employee_ids);

    let warnings = match (drafts.first(), drafts.iter().map(|d| d.scheduled_end).max()) {
        (Some(first), Some(last_end)) if !request.employee_ids.is_empty() => {
            let (from, to) = scheduling::query_range(first.scheduled_for, last_end, request.default_duration);
            let roster: Vec<i32> = request
                .employee_ids
                .iter()
                .copied()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let existing = state
                .jobs
                .committed_jobs(organization_id, &roster, from, to)
                .await?;
            scheduling::conflicts_for_drafts(&drafts, &existing)
        }
        _ => vec![],
    };

    if !warnings.is_empty() {
        counter!("schedule_conflicts_total").increment(warnings.len() as u64);
        tracing::debug!(contract_id, conflicts = warnings.len(), "Generated drafts overlap existing jobs");
    }

    Ok(GenerationPlan { drafts, warnings })
}

/// POST /api/contracts/{id}/generate-jobs/preview - Show the jobs a generation would create
#[utoipa::path(
    post,
    path = "/api/contracts/{id}/generate-jobs/preview",
    params(
        ("id" = i32, Path, description = "Contract ID"),
        ("X-Organization-Id" = i32, Header, description = "Organization the contract belongs to")
    ),
    request_body = GenerateJobsInput,
    responses(
        (status = 200, description = "Drafts and conflict warnings; nothing is persisted", body = GenerationPreview),
        (status = 404, description = "Contract or employee not found"),
        (status = 422, description = "Contract not active, empty schedule or invalid horizon")
    ),
    tag = "generation"
)]
pub async fn preview_jobs(
    State(state): State<Arc<AppState>>,
    organization: Organization,
    Path(contract_id): Path<i32>,
    Json(input): Json<GenerateJobsInput>,
) -> AppResult<Json<GenerationPreview>> {
    let plan = plan_generation(&state, organization, contract_id, input, Utc::now()).await?;

    Ok(Json(GenerationPreview {
        jobs: plan.drafts,
        warnings: plan.warnings,
    }))
}

/// POST /api/contracts/{id}/generate-jobs - Create jobs from the contract's weekly schedule
#[utoipa::path(
    post,
    path = "/api/contracts/{id}/generate-jobs",
    params(
        ("id" = i32, Path, description = "Contract ID"),
        ("X-Organization-Id" = i32, Header, description = "Organization the contract belongs to")
    ),
    request_body = GenerateJobsInput,
    responses(
        (status = 200, description = "Jobs created; occurrences that already exist are skipped", body = GenerateJobsResponse),
        (status = 404, description = "Contract or employee not found"),
        (status = 422, description = "Contract not active, empty schedule or invalid horizon")
    ),
    tag = "generation"
)]
pub async fn generate_jobs(
    State(state): State<Arc<AppState>>,
    organization: Organization,
    Path(contract_id): Path<i32>,
    Json(input): Json<GenerateJobsInput>,
) -> AppResult<Json<GenerateJobsResponse>> {
    let weeks_ahead = input.weeks_ahead;
    let plan = plan_generation(&state, organization, contract_id, input, Utc::now()).await?;

    let jobs = state.jobs.insert_drafts(organization.0, &plan.drafts).await?;
    let created = jobs.len();
    let skipped = plan.drafts.len() - created;

    counter!("jobs_generated_total").increment(created as u64);
    if skipped > 0 {
        counter!("jobs_generation_skipped_total").increment(skipped as u64);
    }

    tracing::info!(
        organization_id = organization.0,
        contract_id,
        weeks_ahead,
        created,
        skipped,
        warnings = plan.warnings.len(),
        "Generated jobs from contract schedule"
    );

    Ok(Json(GenerateJobsResponse {
        created,
        skipped,
        jobs,
        warnings: plan.warnings,
    }))
}
