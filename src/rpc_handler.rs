//! RPC method handler for the JSON-lines protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be tested without stdin/stdout.
//! `handle_method` dispatches a method call to the page flows and settings
//! held by [`App`].

use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::App;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::history::ClickHistory;
use crate::types::restaurant::{RestaurantId, SearchForm};

/// Reads a string-ish param; numbers are accepted and rendered as text.
fn param_text(params: &Value, name: &str) -> Option<String> {
    match params.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn param_id(params: &Value) -> Result<RestaurantId, String> {
    match params.get("id") {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(RestaurantId)
            .ok_or_else(|| "invalid id".to_string()),
        Some(Value::String(s)) => s.parse().map_err(|_| format!("invalid id: {}", s)),
        _ => Err("missing id".to_string()),
    }
}

fn history_json(history: &ClickHistory, capacity: usize) -> Value {
    json!({
        "history": history,
        "most_recent": history.most_recent(),
        "capacity": capacity,
    })
}

/// Dispatch an RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
/// Page methods always succeed at the protocol level; their failures are
/// reported inside the returned panel.
pub async fn handle_method(
    app: &Mutex<App>,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Pages ───
        "recommend" => {
            let form = SearchForm {
                cuisine: param_text(params, "cuisine").unwrap_or_default(),
                price_range: param_text(params, "price_range").unwrap_or_default(),
                rating: param_text(params, "rating").unwrap_or_default(),
            };
            let a = app.lock().await;
            let panel = a.service().search(&form).await;
            serde_json::to_value(panel).map_err(|e| e.to_string())
        }
        "home" => {
            let a = app.lock().await;
            let panel = a.service().home_recommendations().await;
            serde_json::to_value(panel).map_err(|e| e.to_string())
        }
        "restaurant.get" => {
            let raw_id = param_text(params, "id");
            let a = app.lock().await;
            let panel = a.service().restaurant_details(raw_id.as_deref()).await;
            serde_json::to_value(panel).map_err(|e| e.to_string())
        }

        // ─── Click history ───
        "click.record" => {
            let id = param_id(params)?;
            let mut a = app.lock().await;
            let capacity = a.settings().history.capacity;
            let history = a.service_mut().select_restaurant(id);
            Ok(history_json(&history, capacity))
        }
        "history.list" => {
            let a = app.lock().await;
            let history = a.service().history();
            Ok(history_json(&history, a.settings().history.capacity))
        }
        "history.clear" => {
            let mut a = app.lock().await;
            a.service_mut().clear_history().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().await;
            serde_json::to_value(a.settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().await;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            a.rebuild_service().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            let mut a = app.lock().await;
            a.settings_engine.reset().map_err(|e| e.to_string())?;
            a.rebuild_service().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
