use chrono::{FixedOffset, NaiveTime};
use std::env;
use std::net::SocketAddr;

use crate::models::contract::time_of_day;
use crate::scheduling::{parse_duration_minutes, Minutes};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub default_start_time: NaiveTime,
    pub default_duration: Minutes,
    /// Offset of the business time zone; template times are local to it
    pub schedule_offset: FixedOffset,
    pub geofence_radius_meters: f64,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let database_url = lookup("DATABASE_URL").ok_or("DATABASE_URL must be set")?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("BIND_ADDR is not a socket address: {}", e))?;

        let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        let default_start_time = match lookup("DEFAULT_START_TIME") {
            Some(text) => time_of_day::parse(&text)
                .ok_or_else(|| format!("DEFAULT_START_TIME {:?} is not HH:MM", text))?,
            None => NaiveTime::from_hms_opt(9, 0, 0).ok_or("invalid built-in start time")?,
        };

        let default_duration = match lookup("DEFAULT_DURATION") {
            Some(text) => parse_duration_minutes(&text)
                .map_err(|e| format!("DEFAULT_DURATION: {}", e))?,
            None => Minutes::new(60).ok_or("invalid built-in duration")?,
        };

        let offset_minutes = lookup("SCHEDULE_UTC_OFFSET_MINUTES")
            .map(|v| v.parse::<i32>())
            .transpose()
            .map_err(|e| format!("SCHEDULE_UTC_OFFSET_MINUTES: {}", e))?
            .unwrap_or(0);
        let schedule_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| format!("SCHEDULE_UTC_OFFSET_MINUTES {} is out of range", offset_minutes))?;

        let geofence_radius_meters = lookup("GEOFENCE_RADIUS_METERS")
            .map(|v| v.parse::<f64>())
            .transpose()
            .map_err(|e| format!("GEOFENCE_RADIUS_METERS: {}", e))?
            .unwrap_or(200.0);
        if !geofence_radius_meters.is_finite() || geofence_radius_meters <= 0.0 {
            return Err("GEOFENCE_RADIUS_METERS must be a positive number".to_string());
        }

        let run_migrations = lookup("RUN_MIGRATIONS")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin,
            default_start_time,
            default_duration,
            schedule_offset,
            geofence_radius_meters,
            run_migrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/fieldrota")]).unwrap();

        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.cors_origin, "http://localhost:3000");
        assert_eq!(cfg.default_start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(cfg.default_duration.get(), 60);
        assert_eq!(cfg.schedule_offset.local_minus_utc(), 0);
        assert_eq!(cfg.geofence_radius_meters, 200.0);
        assert!(!cfg.run_migrations);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://db/fieldrota"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("DEFAULT_START_TIME", "07:30"),
            ("DEFAULT_DURATION", "2h"),
            ("SCHEDULE_UTC_OFFSET_MINUTES", "-300"),
            ("GEOFENCE_RADIUS_METERS", "150.5"),
            ("RUN_MIGRATIONS", "true"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.default_start_time, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(cfg.default_duration.get(), 120);
        assert_eq!(cfg.schedule_offset.local_minus_utc(), -300 * 60);
        assert_eq!(cfg.geofence_radius_meters, 150.5);
        assert!(cfg.run_migrations);
    }

    #[test]
    fn test_invalid_values() {
        assert!(config(&[]).unwrap_err().contains("DATABASE_URL"));
        assert!(config(&[("DATABASE_URL", "x"), ("DEFAULT_DURATION", "0")]).is_err());
        assert!(config(&[("DATABASE_URL", "x"), ("DEFAULT_START_TIME", "noon")]).is_err());
        assert!(config(&[("DATABASE_URL", "x"), ("GEOFENCE_RADIUS_METERS", "-1")]).is_err());
        assert!(config(&[("DATABASE_URL", "x"), ("SCHEDULE_UTC_OFFSET_MINUTES", "100000")]).is_err());
    }
}
