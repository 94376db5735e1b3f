//! Device capabilities the host application supplies
//!
//! Location permission, position fixes and on-device reverse geocoding are
//! platform services. The library only describes them; the embedding app
//! implements these traits on top of its platform APIs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::address::Coordinates;
use crate::error::Error;

/// Outcome of a foreground location permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Requested fix accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Accuracy {
    Lowest,
    Low,
    #[default]
    Balanced,
    High,
    Highest,
    BestForNavigation,
}

/// A position fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coords: Coordinates,

    /// Horizontal accuracy in meters, when the platform reports one
    pub accuracy_m: Option<f64>,
}

/// Device location access
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_permission(&self) -> Result<PermissionStatus, Error>;

    async fn current_position(&self, accuracy: Accuracy) -> Result<Position, Error>;
}

/// One candidate from the platform geocoder
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceAddress {
    pub name: Option<String>,
    pub street_number: Option<String>,
    pub street: Option<String>,
    pub district: Option<String>,
    pub subregion: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Best-effort on-device reverse geocoding
#[async_trait]
pub trait DeviceGeocoder: Send + Sync {
    /// Candidates for a coordinate; may be empty
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Vec<DeviceAddress>, Error>;
}

/// Geocoder for hosts without a native one; always defers to the web service
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait]
impl DeviceGeocoder for Unavailable {
    async fn reverse_geocode(&self, _coords: Coordinates) -> Result<Vec<DeviceAddress>, Error> {
        Err(Error::general("device geocoder unavailable"))
    }
}

/// Treat blank strings from the platform as missing
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
