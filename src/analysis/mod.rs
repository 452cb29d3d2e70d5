mod aggregate;
mod handlers;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", get(handlers::analyze_records))
        .route("/analyze/top-foods", get(handlers::analyze_top_foods))
        .route("/analyze/weekly", get(handlers::analyze_weekly))
}
