//! Great-circle distance helpers for ranking nearby candidates

use crate::address::Coordinates;
use crate::places::NearbyPlace;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

fn distance_from(origin: Coordinates, place: &NearbyPlace) -> f64 {
    place
        .coordinates()
        .map(|c| haversine_km(origin, c))
        .unwrap_or(f64::INFINITY)
}

/// Order candidates closest first; places without geometry go last
pub fn sort_by_distance(places: &mut [NearbyPlace], origin: Coordinates) {
    places.sort_by(|a, b| distance_from(origin, a).total_cmp(&distance_from(origin, b)));
}

/// The candidate closest to `origin`
pub fn closest_place(places: &[NearbyPlace], origin: Coordinates) -> Option<&NearbyPlace> {
    places
        .iter()
        .min_by(|a, b| distance_from(origin, a).total_cmp(&distance_from(origin, b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::{Geometry, LatLng};

    fn at(id: &str, lat: f64, lng: f64) -> NearbyPlace {
        NearbyPlace {
            place_id: id.to_string(),
            name: id.to_string(),
            vicinity: None,
            types: vec![],
            geometry: Some(Geometry {
                location: LatLng { lat, lng },
            }),
            rating: None,
        }
    }

    #[test]
    fn test_haversine_known_distance() {
        // New Delhi to Mumbai, roughly 1150 km
        let delhi = Coordinates::new(28.6139, 77.2090);
        let mumbai = Coordinates::new(19.0760, 72.8777);
        let d = haversine_km(delhi, mumbai);
        assert!((d - 1150.0).abs() < 10.0, "got {}", d);
        assert_eq!(haversine_km(delhi, delhi), 0.0);
    }

    #[test]
    fn test_closest_and_sort() {
        let origin = Coordinates::new(28.6139, 77.2090);
        let mut places = vec![
            at("far", 28.6200, 77.2200),
            NearbyPlace {
                geometry: None,
                ..at("nowhere", 0.0, 0.0)
            },
            at("near", 28.6140, 77.2091),
        ];

        assert_eq!(closest_place(&places, origin).unwrap().place_id, "near");

        sort_by_distance(&mut places, origin);
        let order: Vec<_> = places.iter().map(|p| p.place_id.as_str()).collect();
        assert_eq!(order, vec!["near", "far", "nowhere"]);
    }

    #[test]
    fn test_closest_of_empty() {
        assert!(closest_place(&[], Coordinates::new(0.0, 0.0)).is_none());
    }
}
