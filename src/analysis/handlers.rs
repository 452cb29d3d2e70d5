use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::instrument;

use crate::analysis::aggregate::{self, WINDOW_DAYS};
use crate::dto::UserQuery;
use crate::error::{ApiError, ApiResult};
use crate::meals::repo::{MealRecord, ResolvedFood};
use crate::nutrition::NutritionSummary;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub user_id: String,
    /// Stringified epoch milliseconds, matching the stored wire format.
    pub timestamp: String,
    pub meal_description: String,
    pub foods: Vec<ResolvedFood>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<NutritionSummary>,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub message: String,
    pub records: Vec<RecordView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFoodsResponse {
    pub message: String,
    pub top_foods: Vec<(String, u64)>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyResponse {
    pub message: String,
    pub weekly_calories: [f64; WINDOW_DAYS],
}

/// Full-records variant: everything the user ever logged, ascending by
/// timestamp, with stored summaries where the confirm step ran.
#[instrument(skip(state))]
pub async fn analyze_records(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<RecordsResponse>> {
    let rows = MealRecord::history_by_user(&state.db, &q.user_id)
        .await
        .map_err(ApiError::Persistence)?;

    let records = rows
        .into_iter()
        .map(|row| {
            let summary = row.summary();
            RecordView {
                user_id: q.user_id.clone(),
                timestamp: row.ts_ms.to_string(),
                meal_description: row.meal_description,
                foods: row.foods.0,
                summary,
            }
        })
        .collect();

    Ok(Json(RecordsResponse {
        message: "User food analysis".into(),
        records,
    }))
}

/// Frequency variant: how often each canonical food name appears across the
/// user's records.
#[instrument(skip(state))]
pub async fn analyze_top_foods(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<TopFoodsResponse>> {
    let rows = MealRecord::history_by_user(&state.db, &q.user_id)
        .await
        .map_err(ApiError::Persistence)?;

    let top_foods = aggregate::top_foods(rows.iter().map(|r| r.foods.0.as_slice()));

    Ok(Json(TopFoodsResponse {
        message: "User food analysis".into(),
        top_foods,
    }))
}

/// Seven calendar-day calorie series ending today. Day boundaries are UTC
/// midnights, matching the store's clock.
#[instrument(skip(state))]
pub async fn analyze_weekly(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<WeeklyResponse>> {
    let rows = MealRecord::history_by_user(&state.db, &q.user_id)
        .await
        .map_err(ApiError::Persistence)?;

    let points: Vec<(i64, f64)> = rows
        .iter()
        .filter_map(|row| row.summary().map(|s| (row.ts_ms, s.macros.calories)))
        .collect();

    let weekly_calories = aggregate::weekly_calories(&points, OffsetDateTime::now_utc());

    Ok(Json(WeeklyResponse {
        message: "Weekly calorie intake".into(),
        weekly_calories,
    }))
}
