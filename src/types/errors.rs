use std::fmt;

// === StorageError ===

/// Errors raised by key/value storage backends.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// Failed to serialize a value before writing it.
    SerializationError(String),
    /// The backend is unavailable (e.g. a poisoned lock).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}

// === ApiError ===

/// Errors related to calls against the remote recommendation API.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, reset).
    Network(String),
    /// The API answered with a non-success HTTP status.
    Status(u16),
    /// The response body could not be decoded.
    Decode(String),
    /// The HTTP client could not be constructed.
    ClientBuild(String),
}

impl ApiError {
    /// Returns the HTTP status code for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Status(code) => write!(f, "HTTP error! Status: {}", code),
            ApiError::Decode(msg) => write!(f, "Invalid response: {}", msg),
            ApiError::ClientBuild(msg) => write!(f, "HTTP client error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// === SettingsError ===

/// Errors related to client settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === InputError ===

/// Errors for user input rejected before any request is made.
#[derive(Debug, PartialEq)]
pub enum InputError {
    /// The minimum rating is outside 1..=5.
    RatingOutOfRange(f64),
    /// No restaurant id was supplied to the detail view.
    MissingRestaurantId,
    /// The restaurant id is not an integer.
    InvalidRestaurantId(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::RatingOutOfRange(_) => {
                write!(f, "Enter a value between 1 and 5 for rating")
            }
            InputError::MissingRestaurantId => write!(f, "No restaurant selected"),
            InputError::InvalidRestaurantId(raw) => {
                write!(f, "Invalid restaurant id: {}", raw)
            }
        }
    }
}

impl std::error::Error for InputError {}
