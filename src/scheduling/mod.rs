//! Recurring job generation: expanding contract templates into dated
//! drafts, rotating employees across them, and flagging overlaps with
//! work they already hold. Everything here is pure and synchronous; the
//! handlers do the loading and persisting.

pub mod availability;
pub mod duration;
pub mod geofence;
pub mod recurrence;
pub mod rotation;

pub use availability::{check_availability, conflicts_for_drafts, query_range, Availability};
pub use duration::{parse_duration_minutes, Minutes, ParseDurationError};
pub use geofence::{GeoError, GeoPoint, GeofenceVerdict};
pub use recurrence::{expand, GenerationRequest};
pub use rotation::assign;

use crate::models::DayOfWeek;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Contract has no schedule days to generate jobs from")]
    EmptySchedule,

    #[error("weeksAhead must be positive, got {0}")]
    NonPositiveHorizon(i64),

    #[error("Schedule lists {0} more than once")]
    DuplicateDay(DayOfWeek),
}
