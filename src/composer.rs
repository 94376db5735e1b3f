//! Turns picker form state into a confirmed [`Address`]

use crate::address::{Address, AddressComponents, Coordinates, DEFAULT_LABEL};
use crate::error::ValidationError;
use crate::places::PlaceDetails;

/// Validates picker input and assembles the final address. Does not persist.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressComposer;

impl AddressComposer {
    pub fn compose(
        marker: Option<Coordinates>,
        components: &AddressComponents,
        place: Option<&PlaceDetails>,
    ) -> Result<Address, ValidationError> {
        let marker = marker.ok_or(ValidationError::MissingLocation)?;

        if place.is_none() && components.flat_number.trim().is_empty() {
            return Err(ValidationError::MissingFlatNumber);
        }

        let (label, full_address) = match place {
            Some(place) => (
                place.name.clone(),
                format!(
                    "{} {}, {}",
                    place.name, components.society, components.street_address
                ),
            ),
            None => (
                DEFAULT_LABEL.to_string(),
                format!(
                    "{} / {}, {}",
                    components.flat_number.trim(),
                    components.society,
                    components.street_address
                ),
            ),
        };

        Ok(Address {
            label,
            society: components.society.clone(),
            street: components.street_address.clone(),
            flat_number: components.flat_number.trim().to_string(),
            landmark: components.landmark.clone(),
            full_address,
            coordinates: Some(marker),
            business_details: place.cloned(),
        })
    }
}
