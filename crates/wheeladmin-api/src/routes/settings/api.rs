//! Settings API endpoints - JSON API

use crate::AppState;
use axum::extract::State;
use axum::response::Json;
use serde_json::Value;

/// Current configuration. The auth password is never serialized; the model
/// key is reported only as present or absent.
pub async fn api_settings(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    let mut value = serde_json::to_value(config.as_ref()).unwrap_or(Value::Null);
    if let Some(model) = value.get_mut("model").and_then(Value::as_object_mut) {
        model.insert("api_key_set".to_string(), Value::Bool(config.model.api_key().is_some()));
    }
    Json(value)
}
