//! Error handling for the Outter client

use std::fmt;
use thiserror::Error;

/// Unified error type for the Outter client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Local file errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Identity backend errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Document backend errors
    #[error("Document error: {0}")]
    Document(String),

    /// Tabular order backend errors
    #[error("Database error: {0}")]
    Database(String),

    /// Local key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Location permission was refused
    #[error("Location permission denied")]
    PermissionDenied,

    /// A referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A required form field is missing or malformed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new document error
    pub fn document<T: fmt::Display>(msg: T) -> Self {
        Error::Document(msg.to_string())
    }

    /// Create a new database error
    pub fn database<T: fmt::Display>(msg: T) -> Self {
        Error::Database(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new not-found error
    pub fn not_found<T: fmt::Display>(msg: T) -> Self {
        Error::NotFound(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}

/// Form validation failures, worded for display in a blocking alert
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a location")]
    MissingLocation,

    #[error("Please enter your Flat / House number")]
    MissingFlatNumber,

    #[error("Please fill all fields")]
    MissingFields,

    #[error("Please enter an item name")]
    EmptyItemName,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please enter 6 digit OTP")]
    InvalidOtp,
}

pub type Result<T> = std::result::Result<T, Error>;
