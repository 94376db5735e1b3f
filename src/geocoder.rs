//! Coordinate to address resolution
//!
//! Resolution walks four tiers and stops at the first that yields text:
//! a known place, the device geocoder, the geocoding web service, and finally
//! the raw coordinates. The result therefore always has a displayable street.

use crate::address::{Coordinates, DEFAULT_LABEL};
use crate::device::{present, DeviceAddress, DeviceGeocoder};
use crate::places::{GeocodeResult, PlaceDetails, PlacesClient};

/// Which tier produced a [`ResolvedAddress`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeSource {
    Place,
    Device,
    Remote,
    Coordinates,
}

/// Address text derived for a coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAddress {
    pub street: String,
    pub landmark: String,
    /// Text for the search box
    pub display: String,
    /// Set only when resolved through a place identifier
    pub place: Option<PlaceDetails>,
    pub source: GeocodeSource,
}

impl ResolvedAddress {
    /// The place name, or the residential default
    pub fn label(&self) -> &str {
        self.place
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or(DEFAULT_LABEL)
    }
}

/// Reverse geocoder with device and web-service tiers
pub struct ReverseGeocoder<G> {
    places: PlacesClient,
    device: G,
}

impl<G: DeviceGeocoder> ReverseGeocoder<G> {
    pub fn new(places: PlacesClient, device: G) -> Self {
        Self { places, device }
    }

    pub fn places(&self) -> &PlacesClient {
        &self.places
    }

    /// Resolve a coordinate, going through the place first when one is known
    pub async fn resolve_address(
        &self,
        latitude: f64,
        longitude: f64,
        place_id: Option<&str>,
    ) -> ResolvedAddress {
        let coords = Coordinates::new(latitude, longitude);

        if let Some(place_id) = place_id {
            if let Some(details) = self.places.fetch_details(place_id).await {
                return resolve_from_place(details);
            }
            log::debug!("no details for {}, geocoding {}", place_id, coords);
        }

        match self.device.reverse_geocode(coords).await {
            Ok(candidates) => {
                if let Some(first) = candidates.first() {
                    return from_device(first, coords);
                }
                log::debug!("device geocoder found nothing at {}", coords);
            }
            Err(e) => log::warn!("device geocoder failed at {}: {}", coords, e),
        }

        match self.places.reverse_geocode(coords).await {
            Ok(Some(result)) => {
                if let Some(resolved) = from_remote(&result) {
                    return resolved;
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("geocoding service failed at {}: {}", coords, e),
        }

        from_coordinates(coords)
    }
}

/// Street text for a known place: its formatted address minus the last two
/// segments (city and country). Addresses with two or fewer segments yield
/// an empty street.
pub fn resolve_from_place(details: PlaceDetails) -> ResolvedAddress {
    let parts: Vec<&str> = details.formatted_address.split(',').map(str::trim).collect();
    let keep = parts.len().saturating_sub(2);
    let street = parts[..keep].join(", ");

    ResolvedAddress {
        street,
        landmark: String::new(),
        display: details.name.clone(),
        place: Some(details),
        source: GeocodeSource::Place,
    }
}

fn from_device(addr: &DeviceAddress, coords: Coordinates) -> ResolvedAddress {
    let street_parts: Vec<&str> = [present(&addr.street_number), present(&addr.street)]
        .into_iter()
        .flatten()
        .collect();
    let area_parts: Vec<&str> = [
        present(&addr.subregion),
        present(&addr.city),
        present(&addr.region),
    ]
    .into_iter()
    .flatten()
    .collect();

    let street_line = street_parts.join(" ");
    let mut street = if street_parts.is_empty() {
        area_parts.join(", ")
    } else {
        format!("{}, {}", street_line, area_parts.join(", "))
    };
    if street.trim().is_empty() {
        street = "Address found".to_string();
    }

    let landmark = present(&addr.district)
        .or_else(|| present(&addr.subregion))
        .unwrap_or_default()
        .to_string();

    let display_parts: Vec<&str> = [
        Some(street_line.as_str()).filter(|s| !s.is_empty()),
        present(&addr.subregion),
        present(&addr.city),
    ]
    .into_iter()
    .flatten()
    .collect();
    let display = if display_parts.is_empty() {
        coords.to_string()
    } else {
        display_parts.join(", ")
    };

    ResolvedAddress {
        street,
        landmark,
        display,
        place: None,
        source: GeocodeSource::Device,
    }
}

fn from_remote(result: &GeocodeResult) -> Option<ResolvedAddress> {
    let mut street: &str = "";
    let mut sublocality: &str = "";
    let mut locality: &str = "";

    for component in &result.address_components {
        if component.has_type("route") || component.has_type("street_address") {
            street = component.long_name.as_str();
        }
        if component.has_type("sublocality_level_1") || component.has_type("sublocality") {
            sublocality = component.long_name.as_str();
        }
        if component.has_type("locality") {
            locality = component.long_name.as_str();
        }
    }

    let readable: Vec<&str> = [street, sublocality, locality]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    let street = if readable.is_empty() {
        result.formatted_address.clone()
    } else {
        readable.join(", ")
    };

    if street.trim().is_empty() {
        return None;
    }

    let display = if result.formatted_address.is_empty() {
        street.clone()
    } else {
        result.formatted_address.clone()
    };

    Some(ResolvedAddress {
        street,
        landmark: sublocality.to_string(),
        display,
        place: None,
        source: GeocodeSource::Remote,
    })
}

/// Last resort: the coordinates themselves
pub fn from_coordinates(coords: Coordinates) -> ResolvedAddress {
    ResolvedAddress {
        street: format!("Coordinates: {}", coords),
        landmark: String::new(),
        display: coords.to_string(),
        place: None,
        source: GeocodeSource::Coordinates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::AddressComponent;

    fn place(formatted: &str) -> PlaceDetails {
        PlaceDetails {
            name: "Pizza Hut".to_string(),
            business_type: "Restaurant".to_string(),
            formatted_address: formatted.to_string(),
            phone_number: None,
            photos: vec![],
            rating: None,
            user_ratings_total: None,
            open_now: None,
            website: None,
            business_status: None,
            place_id: "pz1".to_string(),
            geometry: None,
        }
    }

    #[test]
    fn test_place_street_drops_city_and_country() {
        let resolved = resolve_from_place(place(
            "Shop 4, Connaught Place, Block A, New Delhi, India",
        ));
        assert_eq!(resolved.street, "Shop 4, Connaught Place, Block A");
        assert_eq!(resolved.display, "Pizza Hut");
        assert_eq!(resolved.label(), "Pizza Hut");
        assert_eq!(resolved.source, GeocodeSource::Place);
    }

    #[test]
    fn test_place_street_short_address_is_empty() {
        assert_eq!(resolve_from_place(place("New Delhi, India")).street, "");
        assert_eq!(resolve_from_place(place("")).street, "");
    }

    #[test]
    fn test_device_formatting() {
        let addr = DeviceAddress {
            street_number: Some("12".to_string()),
            street: Some("Janpath".to_string()),
            district: Some("Connaught Place".to_string()),
            subregion: Some("New Delhi".to_string()),
            city: Some("Delhi".to_string()),
            region: Some("DL".to_string()),
            ..Default::default()
        };
        let resolved = from_device(&addr, Coordinates::new(28.6, 77.2));
        assert_eq!(resolved.street, "12 Janpath, New Delhi, Delhi, DL");
        assert_eq!(resolved.landmark, "Connaught Place");
        assert_eq!(resolved.display, "12 Janpath, New Delhi, Delhi");
        assert_eq!(resolved.label(), "Home");
    }

    #[test]
    fn test_device_without_street() {
        let addr = DeviceAddress {
            subregion: Some("New Delhi".to_string()),
            city: Some(" ".to_string()),
            ..Default::default()
        };
        let resolved = from_device(&addr, Coordinates::new(28.6, 77.2));
        assert_eq!(resolved.street, "New Delhi");
        assert_eq!(resolved.landmark, "New Delhi");
        assert_eq!(resolved.display, "New Delhi");

        let empty = from_device(&DeviceAddress::default(), Coordinates::new(28.6, 77.2));
        assert_eq!(empty.street, "Address found");
        assert_eq!(empty.display, "28.6000, 77.2000");
    }

    #[test]
    fn test_remote_components() {
        let component = |name: &str, types: &[&str]| AddressComponent {
            long_name: name.to_string(),
            short_name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        };
        let result = GeocodeResult {
            formatted_address: "Janpath Rd, Connaught Place, New Delhi, Delhi 110001, India"
                .to_string(),
            address_components: vec![
                component("Janpath Road", &["route"]),
                component("Connaught Place", &["sublocality_level_1", "sublocality", "political"]),
                component("New Delhi", &["locality", "political"]),
            ],
            geometry: None,
            place_id: None,
        };

        let resolved = from_remote(&result).unwrap();
        assert_eq!(resolved.street, "Janpath Road, Connaught Place, New Delhi");
        assert_eq!(resolved.landmark, "Connaught Place");
        assert_eq!(resolved.display, result.formatted_address);
    }

    #[test]
    fn test_remote_empty_result_falls_through() {
        let result = GeocodeResult {
            formatted_address: String::new(),
            address_components: vec![],
            geometry: None,
            place_id: None,
        };
        assert!(from_remote(&result).is_none());
    }

    #[test]
    fn test_coordinates_tier() {
        let resolved = from_coordinates(Coordinates::new(28.61394, 77.20902));
        assert_eq!(resolved.street, "Coordinates: 28.6139, 77.2090");
        assert_eq!(resolved.display, "28.6139, 77.2090");
        assert_eq!(resolved.source, GeocodeSource::Coordinates);
    }
}
