use geo::{Distance as _, Haversine};
use serde_json::{Value, json};
use thiserror::Error;

use crate::markers::Coordinate;

/// Fixed urban average speed used for the duration estimate (km/h).
pub const AVERAGE_SPEED_KMH: f64 = 30.0;

/// A straight-line route between the user and a selected marker.
///
/// This is deliberately a great-circle approximation, not a road-network
/// route: the waypoints are exactly `[origin, destination]` and the result
/// is rendered as a dashed line with distance/duration labels, never as
/// turn-by-turn guidance.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub waypoints: [Coordinate; 2],
    pub distance_km: f64,
    pub duration_min: u32,
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("non-finite coordinate in route input")]
    NonFiniteCoordinate,
}

/// Compute the great-circle route estimate between two coordinates.
///
/// Distance is the Haversine distance; duration assumes a fixed
/// 30 km/h urban average. Pure and idempotent.
pub fn calculate(origin: Coordinate, destination: Coordinate) -> Result<Route, RouteError> {
    for c in [origin, destination] {
        if !c.latitude.is_finite() || !c.longitude.is_finite() {
            return Err(RouteError::NonFiniteCoordinate);
        }
    }

    let distance_km = Haversine.distance(origin.to_point(), destination.to_point()) / 1000.0;
    let duration_min = (distance_km / AVERAGE_SPEED_KMH * 60.0).round() as u32;

    Ok(Route {
        waypoints: [origin, destination],
        distance_km,
        duration_min,
    })
}

/// Converts a route into a GeoJSON LineString feature collection for the
/// rendering adapter.
pub fn route_to_geojson(route: &Route) -> Value {
    let coordinates: Vec<Vec<f64>> = route
        .waypoints
        .iter()
        .map(|c| vec![c.longitude, c.latitude])
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {
                "distanceKm": route.distance_km,
                "durationMin": route.duration_min,
            },
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates
            }
        }]
    })
}
