use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),

    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }
}

/// Great-circle distance in meters
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeofenceVerdict {
    Within { distance_meters: f64 },
    Outside { distance_meters: f64, radius_meters: f64 },
    /// The site has no coordinates to compare against
    Unverified,
}

pub fn verify(site: Option<GeoPoint>, reported: GeoPoint, radius_meters: f64) -> GeofenceVerdict {
    let Some(site) = site else {
        return GeofenceVerdict::Unverified;
    };

    let distance_meters = haversine_meters(site, reported);
    if distance_meters <= radius_meters {
        GeofenceVerdict::Within { distance_meters }
    } else {
        GeofenceVerdict::Outside { distance_meters, radius_meters }
    }
}
