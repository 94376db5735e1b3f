//! Background refresh of the home screen's address from the live position

use crate::address::{Address, CURRENT_LOCATION_LABEL};
use crate::cache::{AddressCache, KeyValueStore};
use crate::device::{present, Accuracy, DeviceGeocoder, LocationProvider, PermissionStatus};
use crate::error::Error;

/// Replace the current address with the device's live position.
///
/// Returns `Ok(None)` when permission is refused or the device geocoder has
/// nothing for the position; the stored address is then left as it was.
pub async fn refresh_live_address<L, G, S>(
    location: &L,
    geocoder: &G,
    cache: &AddressCache<S>,
) -> Result<Option<Address>, Error>
where
    L: LocationProvider,
    G: DeviceGeocoder,
    S: KeyValueStore,
{
    if location.request_permission().await? != PermissionStatus::Granted {
        log::debug!("location permission denied, keeping stored address");
        return Ok(None);
    }

    let position = location.current_position(Accuracy::Balanced).await?;
    let candidates = geocoder.reverse_geocode(position.coords).await?;
    let place = match candidates.into_iter().next() {
        Some(place) => place,
        None => return Ok(None),
    };

    let name = present(&place.name).unwrap_or_default();
    let street = present(&place.street)
        .or_else(|| present(&place.district))
        .unwrap_or_default();
    let city = present(&place.city).unwrap_or_default();

    let address = Address {
        label: CURRENT_LOCATION_LABEL.to_string(),
        society: name.to_string(),
        street: street.to_string(),
        flat_number: String::new(),
        landmark: present(&place.subregion).unwrap_or_default().to_string(),
        full_address: format!("{}, {}, {}", name, present(&place.street).unwrap_or_default(), city),
        coordinates: Some(position.coords),
        business_details: None,
    };

    cache.set_current_address(&address).await?;
    Ok(Some(address))
}
