use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FieldRota API",
        version = "1.0.0",
        description = "Recurring job generation, availability and check-in API for field-service crews"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,
        crate::handlers::health::readiness_check,

        // Generation
        crate::handlers::generation_handler::preview_jobs,
        crate::handlers::generation_handler::generate_jobs,

        // Availability
        crate::handlers::availability_handler::check_availability,

        // Durations
        crate::handlers::durations_handler::parse_duration,

        // Check-ins
        crate::handlers::check_in_handler::check_in,
    ),
    components(
        schemas(
            // Core models
            crate::models::Contract,
            crate::models::ContractStatus,
            crate::models::DayOfWeek,
            crate::models::ScheduleDayTemplate,
            crate::models::Job,
            crate::models::JobStatus,
            crate::models::JobInstanceDraft,
            crate::models::ScheduleConflict,
            crate::models::CheckIn,
            crate::scheduling::Availability,
            crate::scheduling::Minutes,
            crate::scheduling::GeoPoint,

            // Input models
            crate::models::GenerateJobsInput,
            crate::models::GenerateJobsResponse,
            crate::models::GenerationPreview,
            crate::models::AvailabilityInput,
            crate::models::AvailabilityResponse,
            crate::models::EmployeeAvailability,
            crate::models::ParseDurationInput,
            crate::models::ParseDurationResponse,
            crate::models::CheckInInput,
            crate::models::CheckInResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "generation", description = "Recurring job generation from contracts"),
        (name = "availability", description = "Employee availability for a time window"),
        (name = "durations", description = "Duration text parsing"),
        (name = "check-ins", description = "GPS-verified job check-ins"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/health/ready",
            "/api/contracts/{id}/generate-jobs",
            "/api/contracts/{id}/generate-jobs/preview",
            "/api/availability",
            "/api/durations/parse",
            "/api/jobs/{id}/check-in",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
