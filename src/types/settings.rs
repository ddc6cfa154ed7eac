use serde::{Deserialize, Serialize};

/// Storage key the click history is persisted under.
pub const DEFAULT_HISTORY_KEY: &str = "restaurant_clicks";

/// Number of distinct restaurants the click history remembers.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Rating used when the search form carries no usable value.
pub const DEFAULT_MIN_RATING: f64 = 3.5;

/// Top-level client settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientSettings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub search: SearchSettings,
}

impl ClientSettings {
    /// Rejects settings the rest of the client cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        let base = self.api.base_url.trim();
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                self.api.base_url
            ));
        }
        if self.api.timeout_secs == Some(0) {
            return Err("api.timeout_secs must be greater than zero".to_string());
        }
        if self.history.storage_key.trim().is_empty() {
            return Err("history.storage_key cannot be empty".to_string());
        }
        if self.history.capacity == 0 {
            return Err("history.capacity must be at least 1".to_string());
        }
        if !(1.0..=5.0).contains(&self.search.default_rating) {
            return Err(format!(
                "search.default_rating must be between 1 and 5, got {}",
                self.search.default_rating
            ));
        }
        Ok(())
    }
}

/// Remote recommendation API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Whether clicks are reported to `/track-click`.
    #[serde(default = "default_true")]
    pub track_clicks: bool,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            track_clicks: true,
        }
    }
}

/// Click history settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistorySettings {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_storage_key() -> String {
    DEFAULT_HISTORY_KEY.to_string()
}

fn default_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            capacity: default_capacity(),
        }
    }
}

/// Search form settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    #[serde(default = "default_rating")]
    pub default_rating: f64,
}

fn default_rating() -> f64 {
    DEFAULT_MIN_RATING
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_rating: default_rating(),
        }
    }
}
