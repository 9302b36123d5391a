use axum::Json;

pub(super) async fn handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Turn latency API",
        "endpoint": "POST /analyze"
    }))
}
