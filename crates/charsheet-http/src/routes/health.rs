use axum::{routing::get, Router};

use crate::state::AppState;

/// GET /healthz
async fn healthz() -> &'static str {
    "ok"
}

/// Mount at the root, outside `/api`.
pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}
