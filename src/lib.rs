//! Outter client library
//!
//! Address and location resolution for the Outter delivery app: a local
//! address cache, reverse geocoding with fallbacks, debounced place search,
//! place details, nearby businesses and address composition. Also carries
//! the thin clients for the identity, document and order backends.

pub mod account;
pub mod address;
pub mod auth;
pub mod cache;
pub mod composer;
pub mod config;
pub mod device;
pub mod documents;
pub mod error;
pub mod fetch;
pub mod geo;
pub mod geocoder;
pub mod live;
pub mod orders;
pub mod picker;
pub mod places;
pub mod search;

use std::sync::Arc;

use reqwest::Client;

use crate::account::AccountService;
use crate::auth::IdentityClient;
use crate::config::ClientOptions;
use crate::device::{DeviceGeocoder, LocationProvider};
use crate::documents::DocumentClient;
use crate::error::Error;
use crate::geocoder::ReverseGeocoder;
use crate::orders::OrdersClient;
use crate::picker::LocationPicker;
use crate::places::PlacesClient;
use crate::search::PlaceSearch;

/// The main entry point for the Outter client
#[derive(Debug, Clone)]
pub struct Outter {
    /// HTTP client shared by every service client
    pub http_client: Client,
    /// Identity client; holds the signed-in session
    pub identity: IdentityClient,
    /// Client options
    pub options: ClientOptions,
}

impl Outter {
    /// Create a new client
    ///
    /// # Example
    ///
    /// ```
    /// use outter::{config::ClientOptions, Outter};
    ///
    /// let options = ClientOptions::default()
    ///     .with_maps_api_key("maps-key")
    ///     .with_identity_api_key("identity-key");
    /// let outter = Outter::new(options).unwrap();
    /// let places = outter.places();
    /// ```
    pub fn new(options: ClientOptions) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;
        let identity = IdentityClient::new(&options, http_client.clone());

        Ok(Self {
            http_client,
            identity,
            options,
        })
    }

    /// Create a client configured from `OUTTER_*` environment variables
    pub fn from_env() -> Result<Self, Error> {
        Self::new(ClientOptions::from_env())
    }

    /// Get a reference to the identity client
    pub fn identity(&self) -> &IdentityClient {
        &self.identity
    }

    pub fn places(&self) -> PlacesClient {
        PlacesClient::new(&self.options, self.http_client.clone())
    }

    /// Document client, authorized as the signed-in user when there is one
    pub fn documents(&self) -> DocumentClient {
        let documents = DocumentClient::new(&self.options, self.http_client.clone());
        match self.identity.session() {
            Some(session) => documents.with_auth(&session.id_token),
            None => documents,
        }
    }

    /// Order client, authorized as the signed-in user when there is one
    pub fn orders(&self) -> OrdersClient {
        let orders = OrdersClient::new(&self.options, self.http_client.clone());
        match self.identity.session() {
            Some(session) => orders.with_auth(&session.id_token),
            None => orders,
        }
    }

    pub fn account(&self) -> AccountService {
        AccountService::new(
            &self.options,
            self.identity.clone(),
            DocumentClient::new(&self.options, self.http_client.clone()),
        )
    }

    /// Reverse geocoder falling back to the given on-device geocoder
    pub fn geocoder<G: DeviceGeocoder>(&self, device: G) -> ReverseGeocoder<G> {
        ReverseGeocoder::new(self.places(), device)
    }

    /// Debounced place search for a search box
    pub fn place_search(&self) -> PlaceSearch {
        PlaceSearch::new(Arc::new(self.places()), &self.options)
    }

    /// A fresh location picker session
    pub fn picker<L, G>(&self, location: L, device: G) -> LocationPicker<L, G>
    where
        L: LocationProvider,
        G: DeviceGeocoder,
    {
        LocationPicker::new(location, self.geocoder(device), &self.options)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::Outter;
    pub use crate::address::{Address, Coordinates, SavedAddress};
    pub use crate::cache::{AddressCache, FileStore, KeyValueStore, MemoryStore};
    pub use crate::composer::AddressComposer;
    pub use crate::config::ClientOptions;
    pub use crate::device::{DeviceGeocoder, LocationProvider, PermissionStatus};
    pub use crate::error::{Error, ValidationError};
    pub use crate::geocoder::{ResolvedAddress, ReverseGeocoder};
    pub use crate::picker::{LocationPicker, MapTapOutcome};
    pub use crate::places::{PlaceDetails, PlacesClient};
}
