//! Configuration options for the Outter client

use std::env;
use std::time::Duration;

/// Configuration options for the Outter client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the maps/places web service
    pub maps_base_url: String,

    /// API key sent with every maps/places request
    pub maps_api_key: String,

    /// Base URL of the identity service
    pub identity_base_url: String,

    /// API key of the identity service
    pub identity_api_key: String,

    /// Base URL of the document service
    pub documents_base_url: String,

    /// Project the document database belongs to
    pub project_id: String,

    /// Collection holding one profile document per user
    pub users_collection: String,

    /// Base URL of the tabular order service
    pub tabular_url: String,

    /// API key of the tabular order service
    pub tabular_key: String,

    /// Table receiving order header rows
    pub orders_table: String,

    /// Table receiving order line-item rows
    pub order_items_table: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Keystroke inactivity before an autocomplete request is sent
    pub search_debounce: Duration,

    /// Queries shorter than this never reach the network
    pub min_query_chars: usize,

    /// Radius of the location bias applied to autocomplete, in meters
    pub autocomplete_radius_m: u32,

    /// Radius of the nearby search issued on a map tap, in meters
    pub nearby_radius_m: u32,

    /// Default width requested for place photos
    pub photo_max_width: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            maps_base_url: "https://maps.googleapis.com".to_string(),
            maps_api_key: String::new(),
            identity_base_url: "https://identitytoolkit.googleapis.com".to_string(),
            identity_api_key: String::new(),
            documents_base_url: "https://firestore.googleapis.com".to_string(),
            project_id: String::new(),
            users_collection: "users".to_string(),
            tabular_url: String::new(),
            tabular_key: String::new(),
            orders_table: "orders".to_string(),
            order_items_table: "order_items".to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            search_debounce: Duration::from_millis(500),
            min_query_chars: 2,
            autocomplete_radius_m: 50_000,
            nearby_radius_m: 50,
            photo_max_width: 400,
        }
    }
}

impl ClientOptions {
    /// Build options from `OUTTER_*` environment variables, keeping defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(value) = env::var("OUTTER_MAPS_BASE_URL") {
            options.maps_base_url = value;
        }
        if let Ok(value) = env::var("OUTTER_MAPS_API_KEY") {
            options.maps_api_key = value;
        }
        if let Ok(value) = env::var("OUTTER_IDENTITY_BASE_URL") {
            options.identity_base_url = value;
        }
        if let Ok(value) = env::var("OUTTER_IDENTITY_API_KEY") {
            options.identity_api_key = value;
        }
        if let Ok(value) = env::var("OUTTER_DOCUMENTS_BASE_URL") {
            options.documents_base_url = value;
        }
        if let Ok(value) = env::var("OUTTER_PROJECT_ID") {
            options.project_id = value;
        }
        if let Ok(value) = env::var("OUTTER_TABULAR_URL") {
            options.tabular_url = value;
        }
        if let Ok(value) = env::var("OUTTER_TABULAR_KEY") {
            options.tabular_key = value;
        }
        if let Some(ms) = env::var("OUTTER_SEARCH_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            options.search_debounce = Duration::from_millis(ms);
        }
        if let Some(secs) = env::var("OUTTER_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            options.request_timeout = Some(Duration::from_secs(secs));
        }

        options
    }

    /// Set the maps/places base URL
    pub fn with_maps_base_url(mut self, value: &str) -> Self {
        self.maps_base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the maps/places API key
    pub fn with_maps_api_key(mut self, value: &str) -> Self {
        self.maps_api_key = value.to_string();
        self
    }

    /// Set the identity service base URL
    pub fn with_identity_base_url(mut self, value: &str) -> Self {
        self.identity_base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the identity service API key
    pub fn with_identity_api_key(mut self, value: &str) -> Self {
        self.identity_api_key = value.to_string();
        self
    }

    /// Set the document service base URL
    pub fn with_documents_base_url(mut self, value: &str) -> Self {
        self.documents_base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the document database project
    pub fn with_project_id(mut self, value: &str) -> Self {
        self.project_id = value.to_string();
        self
    }

    /// Set the tabular order service URL and key
    pub fn with_tabular(mut self, url: &str, key: &str) -> Self {
        self.tabular_url = url.trim_end_matches('/').to_string();
        self.tabular_key = key.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the search debounce interval
    pub fn with_search_debounce(mut self, value: Duration) -> Self {
        self.search_debounce = value;
        self
    }

    /// Set the nearby search radius
    pub fn with_nearby_radius_m(mut self, value: u32) -> Self {
        self.nearby_radius_m = value;
        self
    }

    /// Set the autocomplete bias radius
    pub fn with_autocomplete_radius_m(mut self, value: u32) -> Self {
        self.autocomplete_radius_m = value;
        self
    }
}
