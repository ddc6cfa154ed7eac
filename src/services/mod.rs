// Restaurant recommender services
// Services provide the API client, the page flows and settings.

pub mod api_client;
pub mod recommendation_service;
pub mod settings_engine;
