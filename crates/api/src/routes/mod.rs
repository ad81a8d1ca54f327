pub mod health;
pub mod navigation;

use axum::Router;

use crate::state::AppState;

/// Routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/navigation", navigation::router())
}
