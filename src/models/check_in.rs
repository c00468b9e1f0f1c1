use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Job;
use crate::scheduling::GeoPoint;

/// A job together with the geocoded location of its customer site
#[derive(Debug, Clone, FromRow)]
pub struct JobSite {
    #[sqlx(flatten)]
    pub job: Job,
    pub site_latitude: Option<f64>,
    pub site_longitude: Option<f64>,
}

impl JobSite {
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.site_latitude, self.site_longitude) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: Uuid,
    pub job_id: Uuid,
    pub employee_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: Option<f64>,
    pub verified: bool,
    pub checked_in_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInInput {
    pub employee_id: i32,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub job: Job,
    pub distance_meters: Option<f64>,
    pub verified: bool,
}
