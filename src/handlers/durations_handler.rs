use axum::Json;

use crate::{
    models::{ParseDurationInput, ParseDurationResponse},
    scheduling::parse_duration_minutes,
    AppResult,
};

/// POST /api/durations/parse - Normalize a free-text duration to minutes
#[utoipa::path(
    post,
    path = "/api/durations/parse",
    request_body = ParseDurationInput,
    responses(
        (status = 200, description = "Duration in whole minutes", body = ParseDurationResponse),
        (status = 422, description = "Unrecognized duration")
    ),
    tag = "durations"
)]
pub async fn parse_duration(Json(input): Json<ParseDurationInput>) -> AppResult<Json<ParseDurationResponse>> {
    let minutes = parse_duration_minutes(&input.text)?;

    Ok(Json(ParseDurationResponse {
        minutes: minutes.get(),
    }))
}
