mod dto;
mod handlers;
pub mod repo;
pub mod service;

use axum::{routing::post, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/meal/submit", post(handlers::submit_meal))
        .route("/meal/nutrition", post(handlers::meal_nutrition))
}
