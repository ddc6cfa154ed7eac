//! HTTP client for the remote recommendation API.
//!
//! Endpoints consumed:
//! - `POST {base}/recommend` with a [`RecommendationQuery`] body
//! - `GET {base}/similar/{id}`
//! - `GET {base}/restaurant/{id}`
//! - `POST {base}/track-click` with a `{"id": ..}` body, fire-and-forget

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::types::errors::ApiError;
use crate::types::restaurant::{ClickEvent, RecommendationQuery, Restaurant, RestaurantId};
use crate::types::settings::ApiSettings;

/// Read operations against the recommendation API.
#[async_trait]
pub trait RecommendationApi: Send + Sync {
    async fn recommend(&self, query: &RecommendationQuery) -> Result<Vec<Restaurant>, ApiError>;
    async fn similar(&self, id: RestaurantId) -> Result<Vec<Restaurant>, ApiError>;
    async fn restaurant(&self, id: RestaurantId) -> Result<Restaurant, ApiError>;
}

/// Best-effort click reporting.
///
/// `notify_click` returns immediately and hands back no result handle. Delivery
/// failures are never visible to the caller.
pub trait ClickTracker: Send + Sync {
    fn notify_click(&self, id: RestaurantId);
}

/// `reqwest`-backed implementation of [`RecommendationApi`] and [`ClickTracker`].
///
/// Clones share the list of in-flight click notifications.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ApiClient {
    /// Builds a client from the `api` settings section.
    ///
    /// No timeout is applied unless `timeout_secs` is set.
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim().trim_end_matches('/').to_string(),
            client,
            in_flight: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Waits up to `grace` for spawned click notifications to finish.
    ///
    /// Call before the runtime shuts down; dropping a runtime cancels its tasks.
    /// Notifications still pending after `grace` are left to be cancelled.
    pub async fn flush_notifications(&self, grace: Duration) {
        let pending = match self.in_flight.lock() {
            Ok(mut in_flight) => std::mem::take(&mut *in_flight),
            Err(e) => {
                warn!(error = %e, "click notification list poisoned");
                return;
            }
        };
        if pending.is_empty() {
            return;
        }

        let count = pending.len();
        let drain = async {
            for handle in pending {
                let _ = handle.await;
            }
        };
        if tokio::time::timeout(grace, drain).await.is_err() {
            debug!(count, "click notifications still pending at shutdown");
        }
    }

    /// Number of spawned click notifications that have not completed.
    pub fn pending_notifications(&self) -> usize {
        self.in_flight
            .lock()
            .map(|in_flight| in_flight.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request, rejects non-success statuses, then decodes the JSON body.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecommendationApi for ApiClient {
    async fn recommend(&self, query: &RecommendationQuery) -> Result<Vec<Restaurant>, ApiError> {
        let url = self.endpoint("/recommend");
        debug!(
            %url,
            cuisine = %query.cuisine,
            price_range = %query.price_range,
            rating = query.rating,
            "requesting recommendations"
        );
        self.fetch_json(self.client.post(url).json(query)).await
    }

    async fn similar(&self, id: RestaurantId) -> Result<Vec<Restaurant>, ApiError> {
        let url = self.endpoint(&format!("/similar/{}", id));
        debug!(%url, "requesting similar restaurants");
        self.fetch_json(self.client.get(url)).await
    }

    async fn restaurant(&self, id: RestaurantId) -> Result<Restaurant, ApiError> {
        let url = self.endpoint(&format!("/restaurant/{}", id));
        debug!(%url, "requesting restaurant details");
        self.fetch_json(self.client.get(url)).await
    }
}

impl ClickTracker for ApiClient {
    /// Spawns `POST /track-click` on the current tokio runtime and returns.
    ///
    /// Outside a runtime the notification is dropped.
    fn notify_click(&self, id: RestaurantId) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                debug!(%id, "no async runtime, click notification dropped");
                return;
            }
        };

        let request = self
            .client
            .post(self.endpoint("/track-click"))
            .json(&ClickEvent { id });

        let task = handle.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(%id, "click tracked");
                }
                Ok(response) => {
                    debug!(%id, status = response.status().as_u16(), "click tracking rejected");
                }
                Err(e) => {
                    debug!(%id, error = %e, "click tracking failed");
                }
            }
        });

        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.retain(|h| !h.is_finished());
            in_flight.push(task);
        }
    }
}
