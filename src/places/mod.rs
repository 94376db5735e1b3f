//! Maps/places web service client
//!
//! Every endpoint answers with a `status` field. Anything other than `OK`
//! (including `ZERO_RESULTS`) is reported as "no result" rather than as an
//! error; only transport and decoding failures surface as [`Error`].

mod types;

use reqwest::Client;

use crate::address::Coordinates;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

pub use types::*;

/// Fields requested from the details endpoint
pub const DETAILS_FIELDS: &str = "name,formatted_address,geometry,photos,rating,user_ratings_total,opening_hours,formatted_phone_number,website,types,business_status";

/// Category tag to display label, highest priority first
const BUSINESS_TYPES: &[(&str, &str)] = &[
    ("restaurant", "Restaurant"),
    ("cafe", "Cafe"),
    ("food", "Food Place"),
    ("bar", "Bar"),
    ("store", "Store"),
    ("clothing_store", "Clothing Store"),
    ("supermarket", "Supermarket"),
    ("grocery_or_supermarket", "Grocery Store"),
    ("shopping_mall", "Shopping Mall"),
    ("hospital", "Hospital"),
    ("pharmacy", "Pharmacy"),
    ("bank", "Bank"),
    ("atm", "ATM"),
    ("gas_station", "Gas Station"),
    ("parking", "Parking"),
    ("lodging", "Hotel"),
    ("gym", "Gym"),
    ("school", "School"),
    ("bakery", "Bakery"),
    ("meal_delivery", "Food Delivery"),
    ("meal_takeaway", "Takeaway"),
];

/// Label for a place's category tags; the first table entry present wins.
pub fn business_type_label<S: AsRef<str>>(types: &[S]) -> &'static str {
    BUSINESS_TYPES
        .iter()
        .find(|(tag, _)| types.iter().any(|t| t.as_ref() == *tag))
        .map(|(_, label)| *label)
        .unwrap_or("Location")
}

fn is_ok(endpoint: &str, status: &str, message: Option<&str>) -> bool {
    if status == STATUS_OK {
        return true;
    }
    log::warn!(
        "{} returned {}{}",
        endpoint,
        status,
        message.map(|m| format!(": {}", m)).unwrap_or_default()
    );
    false
}

/// Client for the maps/places web service
#[derive(Debug, Clone)]
pub struct PlacesClient {
    base_url: String,
    api_key: String,
    client: Client,
    autocomplete_radius_m: u32,
    nearby_radius_m: u32,
    photo_max_width: u32,
}

impl PlacesClient {
    /// Create a new PlacesClient
    pub fn new(options: &ClientOptions, client: Client) -> Self {
        Self {
            base_url: options.maps_base_url.clone(),
            api_key: options.maps_api_key.clone(),
            client,
            autocomplete_radius_m: options.autocomplete_radius_m,
            nearby_radius_m: options.nearby_radius_m,
            photo_max_width: options.photo_max_width,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/maps/api/{}", self.base_url, path)
    }

    /// First reverse-geocoding result for a coordinate
    pub async fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> Result<Option<GeocodeResult>, Error> {
        let response = Fetch::get(&self.client, &self.endpoint("geocode/json"))
            .query("latlng", coords.to_query())
            .query("key", &self.api_key)
            .execute::<GeocodeResponse>()
            .await?;

        if !is_ok("geocode", &response.status, response.error_message.as_deref()) {
            return Ok(None);
        }
        Ok(response.results.into_iter().next())
    }

    /// Autocomplete suggestions, optionally biased toward a position
    pub async fn autocomplete(
        &self,
        input: &str,
        bias: Option<Coordinates>,
    ) -> Result<Vec<PlaceSuggestion>, Error> {
        let mut request = Fetch::get(&self.client, &self.endpoint("place/autocomplete/json"))
            .query("input", input)
            .query("key", &self.api_key);

        if let Some(center) = bias {
            request = request
                .query("location", center.to_query())
                .query("radius", self.autocomplete_radius_m);
        }

        let response = request.execute::<AutocompleteResponse>().await?;
        if !is_ok(
            "autocomplete",
            &response.status,
            response.error_message.as_deref(),
        ) {
            return Ok(Vec::new());
        }
        Ok(response.predictions)
    }

    /// Structured details for a place
    pub async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, Error> {
        let response = Fetch::get(&self.client, &self.endpoint("place/details/json"))
            .query("place_id", place_id)
            .query("fields", DETAILS_FIELDS)
            .query("key", &self.api_key)
            .execute::<DetailsResponse>()
            .await?;

        if !is_ok("details", &response.status, response.error_message.as_deref()) {
            return Ok(None);
        }
        Ok(response
            .result
            .map(|result| PlaceDetails::from_result(place_id, result)))
    }

    /// Raw nearby search around a coordinate
    pub async fn nearby_search(
        &self,
        coords: Coordinates,
        radius_m: u32,
    ) -> Result<Vec<NearbyPlace>, Error> {
        let response = Fetch::get(&self.client, &self.endpoint("place/nearbysearch/json"))
            .query("location", coords.to_query())
            .query("radius", radius_m)
            .query("key", &self.api_key)
            .execute::<NearbyResponse>()
            .await?;

        if !is_ok("nearby", &response.status, response.error_message.as_deref()) {
            return Ok(Vec::new());
        }
        Ok(response.results)
    }

    /// Business-like places within the configured tap radius, in service order
    pub async fn find_nearby(&self, coords: Coordinates) -> Result<Vec<NearbyPlace>, Error> {
        let places = self.nearby_search(coords, self.nearby_radius_m).await?;
        let total = places.len();
        let businesses: Vec<_> = places.into_iter().filter(NearbyPlace::is_business).collect();
        log::debug!(
            "nearby search at {}: {} results, {} businesses",
            coords,
            total,
            businesses.len()
        );
        Ok(businesses)
    }

    /// Place details, with transport failures treated as "no result"
    pub async fn fetch_details(&self, place_id: &str) -> Option<PlaceDetails> {
        match self.place_details(place_id).await {
            Ok(details) => details,
            Err(e) => {
                log::warn!("place details for {} failed: {}", place_id, e);
                None
            }
        }
    }

    /// URL of a place photo
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        let mut url = format!("{}/maps/api/place/photo", self.base_url);
        url.push_str(&format!(
            "?maxwidth={}&photo_reference={}&key={}",
            max_width,
            url::form_urlencoded::byte_serialize(photo_reference.as_bytes()).collect::<String>(),
            url::form_urlencoded::byte_serialize(self.api_key.as_bytes()).collect::<String>()
        ));
        url
    }

    /// URL of a place's first photo at the configured width
    pub fn cover_photo_url(&self, place: &PlaceDetails) -> Option<String> {
        place
            .photos
            .first()
            .map(|photo| self.photo_url(&photo.photo_reference, self.photo_max_width))
    }
}
