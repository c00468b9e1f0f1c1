use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::{
    db::memory::MemoryStore,
    extractors::tenant::ORGANIZATION_HEADER,
    models::{Contract, ContractStatus, DayOfWeek, ScheduleDayTemplate},
    scheduling::Minutes,
    startup, AppConfig, AppState, MetricsState,
};

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://localhost/fieldrota_test".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origin: "http://localhost:3000".to_string(),
        default_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        default_duration: Minutes::new(60).unwrap(),
        schedule_offset: FixedOffset::east_opt(0).unwrap(),
        geofence_radius_meters: 200.0,
        run_migrations: false,
    }
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let state = Arc::new(AppState {
            contracts: store.clone(),
            jobs: store.clone(),
            config: test_config(),
            metrics: Arc::new(MetricsState {
                handle: PrometheusBuilder::new().build_recorder().handle(),
            }),
        });
        Self { store, state }
    }

    pub fn router(&self) -> Router {
        startup::build_router(self.state.clone())
    }
}

/// Monday and Thursday mornings, running since the start of 2026
pub fn active_contract(id: i32, employee_ids: Vec<i32>) -> Contract {
    Contract {
        id,
        organization_id: 1,
        name: format!("Office cleaning #{id}"),
        status: ContractStatus::Active,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        end_date: None,
        schedule_days: vec![
            ScheduleDayTemplate {
                day: DayOfWeek::Monday,
                start_time: NaiveTime::from_hms_opt(9, 0, 0),
                duration_minutes: Minutes::new(120),
                tasks: vec!["Vacuum".to_string()],
            },
            ScheduleDayTemplate {
                day: DayOfWeek::Thursday,
                start_time: NaiveTime::from_hms_opt(14, 0, 0),
                duration_minutes: Minutes::new(90),
                tasks: vec!["Windows".to_string()],
            },
        ],
        employee_ids,
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn post_json(router: &Router, uri: &str, organization_id: i32, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(ORGANIZATION_HEADER, organization_id.to_string())
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}
