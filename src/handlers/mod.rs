pub mod availability_handler;
pub mod check_in_handler;
pub mod durations_handler;
pub mod generation_handler;
pub mod health;
pub mod metrics;

pub use health::{health_check, readiness_check};
pub use metrics::{metrics_handler, setup_metrics_recorder, MetricsState};
