pub mod character;
pub mod health;
pub mod profiles;

use axum::Router;

use crate::state::AppState;

/// Everything mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(character::router())
        .merge(profiles::router())
}
