use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use charsheet_core::render::to_markdown;
use charsheet_core::{CharacterProfile, ProfileStore};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProfileList {
    pub ok: bool,
    pub files: Vec<String>,
}

/// Run a blocking store call off the async runtime.
async fn with_store<T, F>(state: &AppState, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn ProfileStore) -> Result<T, charsheet_core::StoreError> + Send + 'static,
{
    let store = state.store.clone();
    let out = tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("store task failed: {e}")))?;
    Ok(out?)
}

/// GET /api/profiles
async fn list_profiles(State(state): State<AppState>) -> AppResult<Json<ProfileList>> {
    let files = with_store(&state, |store| store.list()).await?;
    Ok(Json(ProfileList { ok: true, files }))
}

/// GET /api/profiles/{file}
async fn get_profile(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> AppResult<Json<CharacterProfile>> {
    let profile = with_store(&state, move |store| store.read(&file)).await?;
    Ok(Json(profile))
}

/// GET /api/profiles/{file}/markdown
async fn get_profile_markdown(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> AppResult<impl IntoResponse> {
    let profile = with_store(&state, move |store| store.read(&file)).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        to_markdown(&profile, &[]),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profiles", get(list_profiles))
        .route("/profiles/{file}", get(get_profile))
        .route("/profiles/{file}/markdown", get(get_profile_markdown))
}
