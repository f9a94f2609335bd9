//! Where the truck parks, and which spot is closest to the visitor.

use food_en_k_core::entity::Location;
use tracing::instrument;

use crate::cms::{ContentApi, FilterOp, PopulateNode, Query};

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default search radius for [`nearby`].
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// A location with its distance from the visitor.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationWithDistance {
    pub location: Location,
    pub distance_km: f64,
}

impl LocationWithDistance {
    /// Distance rounded to one decimal, e.g. `3,4 km`.
    #[must_use]
    pub fn distance_label(&self) -> String {
        format!("{:.1} km", self.distance_km).replace('.', ",")
    }
}

fn image_populate() -> Vec<PopulateNode> {
    vec![PopulateNode::new("image")]
}

/// Active, published locations sorted by name.
#[instrument(skip(api))]
pub async fn fetch_locations(api: &ContentApi) -> Vec<Location> {
    let query = Query::new()
        .published()
        .filter("isActive", FilterOp::Eq, true)
        .populate_tree(image_populate())
        .sort(["name:asc"]);

    api.fetch_entities("locations", &query).await.into_data()
}

/// One location by document id.
#[instrument(skip(api))]
pub async fn fetch_location(api: &ContentApi, id: &str) -> Option<Location> {
    let query = Query::new().populate_tree(image_populate());
    api.fetch_entity("locations", id, &query).await.into_data()
}

/// Great-circle distance between two points, in kilometres.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Locations within `max_km` of a point, closest first.
#[must_use]
pub fn nearby(locations: &[Location], lat: f64, lon: f64, max_km: f64) -> Vec<LocationWithDistance> {
    let mut found: Vec<LocationWithDistance> = locations
        .iter()
        .map(|location| LocationWithDistance {
            distance_km: distance_km(lat, lon, location.latitude, location.longitude),
            location: location.clone(),
        })
        .filter(|l| l.distance_km <= max_km)
        .collect();
    found.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    found
}

/// `address, postal_code city`.
#[must_use]
pub fn format_address(location: &Location) -> String {
    format!(
        "{}, {} {}",
        location.address, location.postal_code, location.city
    )
}

/// `HH:MM` from `HH:MM`, `HH:MM:SS` or `HH:MM:SS.mmm`.
fn short_time(time: &str) -> String {
    time.split(':').take(2).collect::<Vec<_>>().join(":")
}

/// Free-text hours, else the start/end slot, else a placeholder.
#[must_use]
pub fn format_opening_hours(location: &Location) -> String {
    if let Some(hours) = location.opening_hours.as_deref().filter(|h| !h.is_empty()) {
        return hours.to_string();
    }
    match (location.start_time.as_deref(), location.end_time.as_deref()) {
        (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
            format!("{} - {}", short_time(start), short_time(end))
        }
        _ => "Horaires non spécifiés".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn location(name: &str, lat: f64, lon: f64) -> Location {
        serde_json::from_value(json!({
            "id": 1,
            "name": name,
            "address": "1219 Avenue des Champs Blancs",
            "city": "Cesson-Sévigné",
            "postal_code": "35510",
            "latitude": lat,
            "longitude": lon,
            "isActive": true
        }))
        .unwrap()
    }

    #[test]
    fn test_distance_rennes_saint_malo() {
        let d = distance_km(48.1173, -1.6778, 48.6493, -2.0257);
        assert!((d - 65.0).abs() < 2.0, "got {d}");
        assert!(distance_km(48.0, -1.0, 48.0, -1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nearby_sorted_and_bounded() {
        let locations = vec![
            location("Saint-Malo", 48.6493, -2.0257),
            location("Cesson", 48.1211, -1.6033),
            location("Rennes centre", 48.1113, -1.6800),
        ];
        let found = nearby(&locations, 48.1173, -1.6778, DEFAULT_MAX_DISTANCE_KM);
        let names: Vec<&str> = found.iter().map(|l| l.location.name.as_str()).collect();
        assert_eq!(names, vec!["Rennes centre", "Cesson"]);
        assert!(found[0].distance_label().ends_with(" km"));
    }

    #[test]
    fn test_format_address() {
        assert_eq!(
            format_address(&location("B-Com", 0.0, 0.0)),
            "1219 Avenue des Champs Blancs, 35510 Cesson-Sévigné"
        );
    }

    #[test]
    fn test_opening_hours() {
        let mut l = location("B-Com", 0.0, 0.0);
        assert_eq!(format_opening_hours(&l), "Horaires non spécifiés");

        l.start_time = Some("11:30:00.000".into());
        l.end_time = Some("14:00".into());
        assert_eq!(format_opening_hours(&l), "11:30 - 14:00");

        l.opening_hours = Some("Mardi midi".into());
        assert_eq!(format_opening_hours(&l), "Mardi midi");
    }
}
