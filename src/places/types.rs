//! Types for the maps/places web service

use serde::{Deserialize, Serialize};

use crate::address::Coordinates;

/// Status string the service returns on success
pub const STATUS_OK: &str = "OK";

/// A `{lat, lng}` pair as the service encodes it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinates {
    fn from(value: LatLng) -> Self {
        Coordinates::new(value.lat, value.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// One typed component of a geocoding result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,

    #[serde(default)]
    pub short_name: String,

    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

/// A reverse-geocoding result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: String,

    #[serde(default)]
    pub address_components: Vec<AddressComponent>,

    pub geometry: Option<Geometry>,

    pub place_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredFormatting {
    pub main_text: String,

    #[serde(default)]
    pub secondary_text: String,
}

/// An autocomplete prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub place_id: String,

    pub description: String,

    #[serde(default)]
    pub structured_formatting: Option<StructuredFormatting>,

    #[serde(default)]
    pub types: Vec<String>,
}

impl PlaceSuggestion {
    /// Bold first line of a suggestion row
    pub fn main_text(&self) -> &str {
        self.structured_formatting
            .as_ref()
            .map(|f| f.main_text.as_str())
            .unwrap_or(&self.description)
    }
}

/// A photo reference attached to a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacePhoto {
    pub photo_reference: String,

    #[serde(default)]
    pub height: u32,

    #[serde(default)]
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct OpeningHours {
    pub open_now: Option<bool>,
}

/// Place details exactly as the service returns them
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct PlaceResult {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub opening_hours: Option<OpeningHours>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub business_status: Option<String>,
}

/// A resolved business or point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub name: String,

    /// Human label derived from the category tags
    pub business_type: String,

    #[serde(default)]
    pub formatted_address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub photos: Vec<PlacePhoto>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_status: Option<String>,

    pub place_id: String,

    #[serde(default)]
    pub geometry: Option<Coordinates>,
}

impl PlaceDetails {
    pub(crate) fn from_result(place_id: &str, result: PlaceResult) -> Self {
        Self {
            name: result.name.unwrap_or_else(|| "Unknown Place".to_string()),
            business_type: super::business_type_label(&result.types).to_string(),
            formatted_address: result.formatted_address.unwrap_or_default(),
            phone_number: result.formatted_phone_number,
            photos: result.photos,
            rating: result.rating,
            user_ratings_total: result.user_ratings_total,
            open_now: result.opening_hours.and_then(|h| h.open_now),
            website: result.website,
            business_status: result.business_status,
            place_id: place_id.to_string(),
            geometry: result.geometry.map(|g| g.location.into()),
        }
    }
}

/// A nearby-search candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub place_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub vicinity: Option<String>,

    #[serde(default)]
    pub types: Vec<String>,

    #[serde(default)]
    pub geometry: Option<Geometry>,

    #[serde(default)]
    pub rating: Option<f64>,
}

impl NearbyPlace {
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.geometry.as_ref().map(|g| g.location.into())
    }

    /// Political areas, roads and localities are not businesses
    pub fn is_business(&self) -> bool {
        !self
            .types
            .iter()
            .any(|t| matches!(t.as_str(), "political" | "route" | "locality"))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AutocompleteResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub predictions: Vec<PlaceSuggestion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResponse {
    pub status: String,
    pub error_message: Option<String>,
    pub result: Option<PlaceResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NearbyResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<NearbyPlace>,
}
