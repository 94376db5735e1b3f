//! Delivery address records
//!
//! [`Address`] is what the location picker produces and what the local cache
//! persists as the user's current address. [`SavedAddress`] adds the identity
//! and default flag used by the saved-address list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;
use crate::places::PlaceDetails;

/// Label given to addresses that are not attached to a place
pub const DEFAULT_LABEL: &str = "Home";

/// Label given to addresses captured from the device's live position
pub const CURRENT_LOCATION_LABEL: &str = "Current Location";

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `lat,lng` as expected by the maps web service
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A structured delivery address
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// "Home", "Current Location" or a business name
    #[serde(default)]
    pub label: String,

    /// Building or place name
    #[serde(default)]
    pub society: String,

    /// Formatted street/area text
    #[serde(default)]
    pub street: String,

    /// Unit identifier; required unless a business is attached
    #[serde(default)]
    pub flat_number: String,

    #[serde(default)]
    pub landmark: String,

    /// Single rendered line composed from the fields above
    #[serde(default)]
    pub full_address: String,

    #[serde(default)]
    pub coordinates: Option<Coordinates>,

    /// Present when the address refers to a resolved business
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_details: Option<PlaceDetails>,
}

impl Address {
    /// Shown when nothing has been saved yet
    pub fn placeholder() -> Self {
        Self {
            label: "Location".to_string(),
            society: "Name of the society/house".to_string(),
            street: "Tap to set address".to_string(),
            ..Default::default()
        }
    }

    /// Best single line for a header: full address, street, society, or a prompt
    pub fn display_text(&self) -> &str {
        [&self.full_address, &self.street, &self.society]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .map(|s| s.as_str())
            .unwrap_or("Tap to set location")
    }

    /// Whether this address points at a business rather than a residence
    pub fn is_business(&self) -> bool {
        self.business_details.is_some()
    }
}

/// An entry of the saved-address list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAddress {
    pub id: String,

    #[serde(flatten)]
    pub address: Address,

    #[serde(default)]
    pub is_default: bool,
}

impl SavedAddress {
    /// Wrap an address with a fresh identifier
    pub fn new(address: Address) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            address,
            is_default: false,
        }
    }
}

/// Flag `id` as the only default entry.
///
/// Fails without touching the list when `id` is not present.
pub fn mark_default(addresses: &mut [SavedAddress], id: &str) -> Result<(), Error> {
    if !addresses.iter().any(|a| a.id == id) {
        return Err(Error::not_found(format!("saved address {}", id)));
    }
    for entry in addresses.iter_mut() {
        entry.is_default = entry.id == id;
    }
    Ok(())
}

/// Remove the entry with `id`, returning it. Other entries are untouched.
pub fn remove_by_id(addresses: &mut Vec<SavedAddress>, id: &str) -> Option<SavedAddress> {
    let index = addresses.iter().position(|a| a.id == id)?;
    Some(addresses.remove(index))
}

/// Editable picker form state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddressComponents {
    pub street_address: String,
    pub landmark: String,
    pub flat_number: String,
    pub society: String,
    pub place_name: String,
    pub place_type: String,
}

impl AddressComponents {
    /// Project a resolved place onto the form
    pub fn apply_place(&mut self, place: &PlaceDetails) {
        self.place_name = place.name.clone();
        self.place_type = place.business_type.clone();
        self.society = place.name.clone();
    }

    /// Forget any place projection, keeping what the user typed
    pub fn clear_place(&mut self) {
        self.place_name.clear();
        self.place_type.clear();
    }
}
