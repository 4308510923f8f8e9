use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use charsheet_core::CharacterProfile;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/character
///
/// The body is taken as raw bytes so an unparseable document maps to
/// `Invalid JSON body` regardless of `Content-Type`.
async fn create_character(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<CharacterProfile>> {
    let profile = state.service.generate_from_body(&body).await?;
    Ok(Json(profile))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/character", post(create_character))
}
