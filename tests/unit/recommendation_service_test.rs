//! Tests for the page flows in `RecommendationService`, using an in-process
//! fake API so every outcome is deterministic.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use restaurant_recommender::managers::click_history_manager::ClickHistoryCache;
use restaurant_recommender::services::api_client::{ClickTracker, RecommendationApi};
use restaurant_recommender::services::recommendation_service::{
    RecommendationService, HOME_TITLE, NO_HISTORY_MESSAGE,
};
use restaurant_recommender::storage::MemoryStore;
use restaurant_recommender::types::errors::ApiError;
use restaurant_recommender::types::panel::Panel;
use restaurant_recommender::types::restaurant::{
    RecommendationQuery, Restaurant, RestaurantId, SearchForm,
};
use restaurant_recommender::types::settings::SearchSettings;

/// How the fake API answers every call.
#[derive(Clone, Copy)]
enum Mode {
    Ok,
    Status(u16),
    Offline,
}

#[derive(Debug, PartialEq)]
enum Call {
    Recommend(RecommendationQuery),
    Similar(RestaurantId),
    Restaurant(RestaurantId),
}

struct FakeApi {
    mode: Mode,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn answer<T>(&self, call: Call, ok: T) -> Result<T, ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.mode {
            Mode::Ok => Ok(ok),
            Mode::Status(code) => Err(ApiError::Status(code)),
            Mode::Offline => Err(ApiError::Network("connection refused".to_string())),
        }
    }
}

fn restaurant(id: i64, name: &str) -> Restaurant {
    Restaurant {
        id: RestaurantId(id),
        name: name.to_string(),
        cuisine: "Thai".to_string(),
        price_range: "$".to_string(),
        avg_price_per_person: 12.0,
        rating: 4.1,
        review_count: 33,
        city: "Austin".to_string(),
        popular_hours: "12pm-2pm".to_string(),
        address: Some("9 Elm St".to_string()),
        website: None,
    }
}

#[async_trait]
impl RecommendationApi for FakeApi {
    async fn recommend(&self, query: &RecommendationQuery) -> Result<Vec<Restaurant>, ApiError> {
        self.answer(Call::Recommend(query.clone()), vec![restaurant(1, "Basil")])
    }

    async fn similar(&self, id: RestaurantId) -> Result<Vec<Restaurant>, ApiError> {
        self.answer(Call::Similar(id), vec![restaurant(2, "Lemongrass")])
    }

    async fn restaurant(&self, id: RestaurantId) -> Result<Restaurant, ApiError> {
        self.answer(Call::Restaurant(id), restaurant(id.0, "Basil"))
    }
}

#[derive(Default)]
struct RecordingTracker {
    seen: Mutex<Vec<RestaurantId>>,
}

impl ClickTracker for RecordingTracker {
    fn notify_click(&self, id: RestaurantId) {
        self.seen.lock().unwrap().push(id);
    }
}

fn service(api: Arc<FakeApi>) -> RecommendationService<MemoryStore, FakeApi> {
    RecommendationService::new(
        ClickHistoryCache::new(MemoryStore::new()),
        api,
        &SearchSettings::default(),
    )
}

fn form(cuisine: &str, price_range: &str, rating: &str) -> SearchForm {
    SearchForm {
        cuisine: cuisine.to_string(),
        price_range: price_range.to_string(),
        rating: rating.to_string(),
    }
}

// ─── Search ───

#[tokio::test]
async fn test_search_returns_results_panel() {
    let api = FakeApi::new(Mode::Ok);
    let svc = service(api.clone());

    let panel = svc.search(&form("Thai", "$", "4")).await;

    assert_eq!(panel.restaurants().len(), 1);
    assert!(matches!(panel, Panel::Results { title: None, .. }));
    assert_eq!(
        api.calls(),
        vec![Call::Recommend(RecommendationQuery {
            cuisine: "Thai".to_string(),
            price_range: "$".to_string(),
            rating: 4.0,
        })]
    );
}

#[tokio::test]
async fn test_search_blank_rating_defaults_to_three_and_a_half() {
    let api = FakeApi::new(Mode::Ok);
    let svc = service(api.clone());

    svc.search(&form("Thai", "", "")).await;

    match api.calls().as_slice() {
        [Call::Recommend(query)] => assert_eq!(query.rating, 3.5),
        other => panic!("unexpected calls: {:?}", other),
    }
}

#[tokio::test]
async fn test_search_out_of_range_rating_skips_request() {
    let api = FakeApi::new(Mode::Ok);
    let svc = service(api.clone());

    let panel = svc.search(&form("Thai", "$", "9")).await;

    assert_eq!(
        panel,
        Panel::error("Error: Enter a value between 1 and 5 for rating")
    );
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_search_status_failure_is_inline_error() {
    let svc = service(FakeApi::new(Mode::Status(500)));

    let panel = svc.search(&form("Thai", "$", "4")).await;

    assert_eq!(panel, Panel::error("Error: HTTP error! Status: 500"));
}

#[tokio::test]
async fn test_search_network_failure_is_inline_error() {
    let svc = service(FakeApi::new(Mode::Offline));

    let panel = svc.search(&form("Thai", "$", "4")).await;

    assert_eq!(panel, Panel::error("Error: Network error: connection refused"));
}

// ─── Home ───

#[tokio::test]
async fn test_home_with_empty_history_skips_similar_fetch() {
    let api = FakeApi::new(Mode::Ok);
    let svc = service(api.clone());

    let panel = svc.home_recommendations().await;

    assert_eq!(panel, Panel::info(NO_HISTORY_MESSAGE));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_home_seeds_similar_with_most_recent_click() {
    let api = FakeApi::new(Mode::Ok);
    let mut svc = service(api.clone());
    svc.select_restaurant(RestaurantId(3));
    svc.select_restaurant(RestaurantId(8));
    svc.select_restaurant(RestaurantId(3));

    let panel = svc.home_recommendations().await;

    assert_eq!(api.calls(), vec![Call::Similar(RestaurantId(3))]);
    match panel {
        Panel::Results { title, restaurants } => {
            assert_eq!(title.as_deref(), Some(HOME_TITLE));
            assert_eq!(restaurants[0].name, "Lemongrass");
        }
        other => panic!("expected results, got {:?}", other),
    }
}

#[tokio::test]
async fn test_home_failure_messages() {
    let mut svc = service(FakeApi::new(Mode::Status(500)));
    svc.select_restaurant(RestaurantId(1));
    assert_eq!(
        svc.home_recommendations().await,
        Panel::error("Failed to load recommendations: Failed to get recommendations")
    );

    let mut svc = service(FakeApi::new(Mode::Offline));
    svc.select_restaurant(RestaurantId(1));
    assert_eq!(
        svc.home_recommendations().await,
        Panel::error("Failed to load recommendations: Network error: connection refused")
    );
}

// ─── Details ───

#[tokio::test]
async fn test_details_without_id() {
    let api = FakeApi::new(Mode::Ok);
    let svc = service(api.clone());

    assert_eq!(svc.restaurant_details(None).await, Panel::error("No restaurant selected"));
    assert_eq!(svc.restaurant_details(Some("  ")).await, Panel::error("No restaurant selected"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_details_with_bad_id() {
    let svc = service(FakeApi::new(Mode::Ok));

    assert_eq!(
        svc.restaurant_details(Some("abc")).await,
        Panel::error("Error loading details: Invalid restaurant id: abc")
    );
}

#[tokio::test]
async fn test_details_found() {
    let api = FakeApi::new(Mode::Ok);
    let svc = service(api.clone());

    let panel = svc.restaurant_details(Some("12")).await;

    assert_eq!(api.calls(), vec![Call::Restaurant(RestaurantId(12))]);
    match panel {
        Panel::Detail { restaurant } => {
            assert_eq!(restaurant.id, RestaurantId(12));
            assert_eq!(restaurant.address.as_deref(), Some("9 Elm St"));
        }
        other => panic!("expected detail, got {:?}", other),
    }
}

#[tokio::test]
async fn test_details_not_found() {
    let svc = service(FakeApi::new(Mode::Status(404)));

    assert_eq!(
        svc.restaurant_details(Some("12")).await,
        Panel::error("Error loading details: Restaurant not found")
    );
}

// ─── Clicks ───

#[tokio::test]
async fn test_select_restaurant_records_and_notifies() {
    let tracker = Arc::new(RecordingTracker::default());
    let cache = ClickHistoryCache::new(MemoryStore::new()).with_tracker(tracker.clone());
    let mut svc =
        RecommendationService::new(cache, FakeApi::new(Mode::Ok), &SearchSettings::default());

    svc.select_restaurant(RestaurantId(1));
    let history = svc.select_restaurant(RestaurantId(2));

    assert_eq!(history.as_slice(), &[RestaurantId(1), RestaurantId(2)]);
    assert_eq!(*tracker.seen.lock().unwrap(), vec![RestaurantId(1), RestaurantId(2)]);
}

#[tokio::test]
async fn test_clear_history_resets_home() {
    let mut svc = service(FakeApi::new(Mode::Ok));
    svc.select_restaurant(RestaurantId(4));

    svc.clear_history().unwrap();

    assert!(svc.history().is_empty());
    assert_eq!(svc.home_recommendations().await, Panel::info(NO_HISTORY_MESSAGE));
}
