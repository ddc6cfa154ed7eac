//! Page flows of the recommendation site.
//!
//! Each flow calls the API, catches every failure locally and returns a
//! [`Panel`] to show in place of results. Nothing here returns `Err`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::managers::click_history_manager::{ClickHistoryCache, ClickHistoryCacheTrait};
use crate::services::api_client::RecommendationApi;
use crate::storage::KeyValueStore;
use crate::types::errors::{ApiError, InputError, StorageError};
use crate::types::history::ClickHistory;
use crate::types::panel::Panel;
use crate::types::restaurant::{RecommendationQuery, RestaurantId, SearchForm};
use crate::types::settings::{SearchSettings, DEFAULT_MIN_RATING};

pub const NO_HISTORY_MESSAGE: &str =
    "No recommendations yet. Start searching and clicking restaurants!";
pub const HOME_TITLE: &str = "Recommended For You";

const HOME_STATUS_REASON: &str = "Failed to get recommendations";
const DETAIL_STATUS_REASON: &str = "Restaurant not found";

/// Builds the `/recommend` body from raw form input.
///
/// The rating is read from the longest numeric prefix, so `"4 stars"` is 4.
/// An empty, non-numeric, zero or NaN rating falls back to `default_rating`.
/// A parsed rating outside 1..=5 is rejected.
pub fn parse_query(
    form: &SearchForm,
    default_rating: f64,
) -> Result<RecommendationQuery, InputError> {
    let rating = match leading_number(&form.rating) {
        Some(value) if value != 0.0 && !value.is_nan() => value,
        _ => default_rating,
    };

    if !(1.0..=5.0).contains(&rating) {
        return Err(InputError::RatingOutOfRange(rating));
    }

    Ok(RecommendationQuery {
        cuisine: form.cuisine.trim().to_string(),
        price_range: form.price_range.trim().to_string(),
        rating,
    })
}

/// Parses the longest prefix of `raw` (after leading whitespace) that reads as
/// a decimal number, with an optional sign, fraction and exponent.
fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let unsigned = s.trim_start_matches(['+', '-']);
    if unsigned.starts_with("Infinity") && s.len() - unsigned.len() <= 1 {
        return Some(if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let candidate_len = s
        .char_indices()
        .find(|(_, c)| !matches!(c, '0'..='9' | '.' | '+' | '-' | 'e' | 'E'))
        .map_or(s.len(), |(i, _)| i);

    (1..=candidate_len)
        .rev()
        .find_map(|end| s[..end].parse::<f64>().ok())
}

/// Composes the click history cache with the recommendation API.
pub struct RecommendationService<S: KeyValueStore, A: RecommendationApi> {
    history: ClickHistoryCache<S>,
    api: Arc<A>,
    default_rating: f64,
}

impl<S: KeyValueStore, A: RecommendationApi> RecommendationService<S, A> {
    pub fn new(history: ClickHistoryCache<S>, api: Arc<A>, settings: &SearchSettings) -> Self {
        let default_rating = if (1.0..=5.0).contains(&settings.default_rating) {
            settings.default_rating
        } else {
            DEFAULT_MIN_RATING
        };
        Self {
            history,
            api,
            default_rating,
        }
    }

    /// Search page: posts the form to `/recommend`.
    pub async fn search(&self, form: &SearchForm) -> Panel {
        let query = match parse_query(form, self.default_rating) {
            Ok(query) => query,
            Err(e) => return Panel::error(format!("Error: {}", e)),
        };

        match self.api.recommend(&query).await {
            Ok(restaurants) => {
                info!(
                    count = restaurants.len(),
                    cuisine = %query.cuisine,
                    "recommendations loaded"
                );
                Panel::Results {
                    title: None,
                    restaurants,
                }
            }
            Err(e) => {
                warn!(error = %e, "recommendation request failed");
                Panel::error(format!("Error: {}", e))
            }
        }
    }

    /// Home page: restaurants similar to the most recent click.
    ///
    /// With no click history the request is skipped and an info panel returned.
    pub async fn home_recommendations(&self) -> Panel {
        let seed = match self.history.most_recent() {
            Some(id) => id,
            None => return Panel::info(NO_HISTORY_MESSAGE),
        };

        match self.api.similar(seed).await {
            Ok(restaurants) => Panel::Results {
                title: Some(HOME_TITLE.to_string()),
                restaurants,
            },
            Err(e) => {
                warn!(%seed, error = %e, "similar restaurants request failed");
                Panel::error(format!(
                    "Failed to load recommendations: {}",
                    reason(&e, HOME_STATUS_REASON)
                ))
            }
        }
    }

    /// Detail page for the id taken from the page address, if any.
    pub async fn restaurant_details(&self, raw_id: Option<&str>) -> Panel {
        let id = match parse_restaurant_id(raw_id) {
            Ok(id) => id,
            Err(InputError::MissingRestaurantId) => {
                return Panel::error(InputError::MissingRestaurantId.to_string())
            }
            Err(e) => return Panel::error(format!("Error loading details: {}", e)),
        };

        match self.api.restaurant(id).await {
            Ok(restaurant) => Panel::Detail { restaurant },
            Err(e) => {
                warn!(%id, error = %e, "restaurant details request failed");
                Panel::error(format!(
                    "Error loading details: {}",
                    reason(&e, DETAIL_STATUS_REASON)
                ))
            }
        }
    }

    /// A restaurant card was clicked: record it and return the updated history.
    ///
    /// A failed write is logged and the previously stored history is returned.
    pub fn select_restaurant(&mut self, id: RestaurantId) -> ClickHistory {
        match self.history.record_click(id) {
            Ok(history) => history,
            Err(e) => {
                warn!(%id, error = %e, "failed to persist click history");
                self.history.load()
            }
        }
    }

    pub fn history(&self) -> ClickHistory {
        self.history.load()
    }

    pub fn clear_history(&mut self) -> Result<(), StorageError> {
        self.history.clear()
    }
}

fn parse_restaurant_id(raw: Option<&str>) -> Result<RestaurantId, InputError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    match raw {
        None => Err(InputError::MissingRestaurantId),
        Some(s) => s
            .parse()
            .map_err(|_| InputError::InvalidRestaurantId(s.to_string())),
    }
}

/// Non-success statuses get a page-specific reason; other failures show their own text.
fn reason(error: &ApiError, status_reason: &str) -> String {
    match error {
        ApiError::Status(_) => status_reason.to_string(),
        other => other.to_string(),
    }
}
