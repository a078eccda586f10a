use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::{config::Config, process::is_available};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready when both external tools resolve on this host
pub async fn health_ready(State(config): State<Arc<Config>>) -> impl IntoResponse {
    let synthesizer = is_available(&config.synthesizer_bin);
    let encoder = is_available(&config.encoder_bin);

    let describe = |available: bool| if available { "available" } else { "missing" };
    let body = Json(json!({
        "status": if synthesizer && encoder { "ready" } else { "not_ready" },
        "synthesizer": describe(synthesizer),
        "encoder": describe(encoder),
    }));

    if synthesizer && encoder {
        (StatusCode::OK, body)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, body)
    }
}
