//! Location picker session
//!
//! Owns the in-progress marker, form and resolved place for one picker
//! screen, and drives the geocoder, place search, nearby search and composer
//! through plain method calls.

use std::sync::Arc;

use crate::address::{Address, AddressComponents, Coordinates};
use crate::cache::{AddressCache, KeyValueStore};
use crate::composer::AddressComposer;
use crate::config::ClientOptions;
use crate::device::{Accuracy, DeviceGeocoder, LocationProvider, PermissionStatus};
use crate::error::Error;
use crate::geo;
use crate::geocoder::{self, GeocodeSource, ResolvedAddress, ReverseGeocoder};
use crate::places::{NearbyPlace, PlaceDetails, PlaceSuggestion, PlacesClient};
use crate::search::PlaceSearch;

/// What a tap on the map produced
#[derive(Debug, Clone, PartialEq)]
pub enum MapTapOutcome {
    /// Businesses near the tap, for the user to choose from
    Candidates(Vec<NearbyPlace>),
    /// No business nearby; the tapped point was reverse geocoded
    Resolved(ResolvedAddress),
}

pub struct LocationPicker<L, G> {
    location: L,
    geocoder: ReverseGeocoder<G>,
    search: PlaceSearch,
    marker: Option<Coordinates>,
    components: AddressComponents,
    place: Option<PlaceDetails>,
    nearby: Vec<NearbyPlace>,
    search_text: String,
    sort_nearby: bool,
}

impl<L: LocationProvider, G: DeviceGeocoder> LocationPicker<L, G> {
    pub fn new(location: L, geocoder: ReverseGeocoder<G>, options: &ClientOptions) -> Self {
        let source: Arc<PlacesClient> = Arc::new(geocoder.places().clone());
        Self {
            location,
            search: PlaceSearch::new(source, options),
            geocoder,
            marker: None,
            components: AddressComponents::default(),
            place: None,
            nearby: Vec::new(),
            search_text: String::new(),
            sort_nearby: false,
        }
    }

    /// Present nearby candidates closest first instead of in service order
    pub fn with_nearby_sorted_by_distance(mut self, value: bool) -> Self {
        self.sort_nearby = value;
        self
    }

    fn places(&self) -> &PlacesClient {
        self.geocoder.places()
    }

    fn apply_resolved(&mut self, resolved: &ResolvedAddress) {
        self.components.street_address = resolved.street.clone();
        if resolved.source != GeocodeSource::Place {
            self.components.landmark = resolved.landmark.clone();
        }
        match &resolved.place {
            Some(place) => self.components.apply_place(place),
            None => self.components.clear_place(),
        }
        self.place = resolved.place.clone();
        self.search_text = resolved.display.clone();
    }

    /// Initial fill from the device position
    pub async fn start(&mut self) -> Result<ResolvedAddress, Error> {
        self.use_current_location().await
    }

    /// Move the marker to the device position and resolve it.
    ///
    /// A refused permission leaves the form untouched.
    pub async fn use_current_location(&mut self) -> Result<ResolvedAddress, Error> {
        let status = self.location.request_permission().await?;
        if status != PermissionStatus::Granted {
            log::info!("location permission {:?}", status);
            return Err(Error::PermissionDenied);
        }

        let position = self.location.current_position(Accuracy::Balanced).await?;
        let coords = position.coords;

        self.marker = Some(coords);
        self.place = None;
        self.nearby.clear();

        let resolved = self
            .geocoder
            .resolve_address(coords.latitude, coords.longitude, None)
            .await;
        self.apply_resolved(&resolved);
        Ok(resolved)
    }

    /// Forward a search box change to the debounced search
    pub fn search(&mut self, text: &str) -> u64 {
        self.search_text = text.to_string();
        self.search.on_query_changed(text, self.marker)
    }

    pub fn suggestions(&self) -> Vec<PlaceSuggestion> {
        self.search.suggestions()
    }

    pub fn place_search(&self) -> &PlaceSearch {
        &self.search
    }

    /// Fetch details for a place and project them onto the form
    pub async fn fetch_details(&mut self, place_id: &str) -> Option<PlaceDetails> {
        let details = self.places().fetch_details(place_id).await?;
        self.components.apply_place(&details);
        self.place = Some(details.clone());
        Some(details)
    }

    /// Jump to an autocomplete suggestion.
    ///
    /// Returns `None` when the place could not be resolved to a position.
    pub async fn select_suggestion(&mut self, place_id: &str) -> Option<ResolvedAddress> {
        let details = self.places().fetch_details(place_id).await?;
        let coords = match details.geometry {
            Some(coords) => coords,
            None => {
                log::warn!("place {} has no geometry", place_id);
                return None;
            }
        };

        self.search.clear();
        self.nearby.clear();
        self.marker = Some(coords);

        let resolved = geocoder::resolve_from_place(details);
        self.apply_resolved(&resolved);
        Some(resolved)
    }

    /// Drop the marker on a raw coordinate
    pub async fn tap_map(&mut self, coords: Coordinates) -> MapTapOutcome {
        self.marker = Some(coords);
        self.place = None;
        self.components.clear_place();

        let mut candidates = match self.places().find_nearby(coords).await {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("nearby search at {} failed: {}", coords, e);
                Vec::new()
            }
        };

        if !candidates.is_empty() {
            if self.sort_nearby {
                geo::sort_by_distance(&mut candidates, coords);
            }
            self.nearby = candidates.clone();
            return MapTapOutcome::Candidates(candidates);
        }

        self.nearby.clear();
        let resolved = self
            .geocoder
            .resolve_address(coords.latitude, coords.longitude, None)
            .await;
        self.apply_resolved(&resolved);
        MapTapOutcome::Resolved(resolved)
    }

    /// Pick one of the candidates offered by [`tap_map`](Self::tap_map)
    pub async fn select_nearby(&mut self, candidate: &NearbyPlace) -> Option<PlaceDetails> {
        self.nearby.clear();

        let details = self.fetch_details(&candidate.place_id).await;

        self.search_text = candidate.name.clone();
        self.components.street_address = candidate.vicinity.clone().unwrap_or_default();

        if let Some(coords) = details
            .as_ref()
            .and_then(|d| d.geometry)
            .or_else(|| candidate.coordinates())
        {
            self.marker = Some(coords);
        }
        details
    }

    pub fn set_flat_number(&mut self, value: &str) {
        self.components.flat_number = value.to_string();
    }

    pub fn set_landmark(&mut self, value: &str) {
        self.components.landmark = value.to_string();
    }

    pub fn set_society(&mut self, value: &str) {
        self.components.society = value.to_string();
    }

    pub fn set_street_address(&mut self, value: &str) {
        self.components.street_address = value.to_string();
    }

    pub fn marker(&self) -> Option<Coordinates> {
        self.marker
    }

    pub fn components(&self) -> &AddressComponents {
        &self.components
    }

    pub fn place(&self) -> Option<&PlaceDetails> {
        self.place.as_ref()
    }

    pub fn nearby(&self) -> &[NearbyPlace] {
        &self.nearby
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Validate and build the final address without persisting it
    pub fn confirm(&self) -> Result<Address, Error> {
        Ok(AddressComposer::compose(
            self.marker,
            &self.components,
            self.place.as_ref(),
        )?)
    }

    /// Confirm and store as the current address, optionally also adding it to
    /// the saved list as the new default.
    pub async fn confirm_and_save<S: KeyValueStore>(
        &self,
        cache: &AddressCache<S>,
        save_to_list: bool,
    ) -> Result<Address, Error> {
        let address = self.confirm()?;

        if save_to_list {
            cache.add_saved_address(address.clone(), true).await?;
        } else {
            cache.set_current_address(&address).await?;
        }
        cache.mark_location_setup_complete().await?;
        Ok(address)
    }
}
