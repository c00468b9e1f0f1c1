use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::scheduling::Availability;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInput {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub employee_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAvailability {
    pub employee_id: i32,
    pub status: Availability,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub employees: Vec<EmployeeAvailability>,
}
