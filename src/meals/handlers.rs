use axum::{extract::State, Json};
use tracing::{instrument, warn};

use crate::error::{ApiError, ApiResult};
use crate::meals::dto::{
    NutritionRequest, NutritionResponse, SubmitMealRequest, SubmitMealResponse,
};
use crate::meals::service;
use crate::state::AppState;

/// Trimmed description, rejected before anything touches the store.
fn non_empty_description(body: &SubmitMealRequest) -> ApiResult<&str> {
    body.meal_description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::Validation("No input provided.".into()))
}

fn nutrition_message(attached: bool) -> &'static str {
    if attached {
        "Nutrition computed successfully."
    } else {
        "Nutrition computed; no meal record to attach the summary to."
    }
}

#[instrument(skip(state, body), fields(user_id = %body.user_id))]
pub async fn submit_meal(
    State(state): State<AppState>,
    Json(body): Json<SubmitMealRequest>,
) -> ApiResult<Json<SubmitMealResponse>> {
    let description = non_empty_description(&body)?;

    let parsed_foods = service::submit_meal(&state, &body.user_id, description).await?;

    Ok(Json(SubmitMealResponse {
        message: "Meal recorded successfully.".into(),
        user_id: body.user_id,
        parsed_foods,
    }))
}

#[instrument(skip(state, body), fields(user_id = %body.user_id))]
pub async fn meal_nutrition(
    State(state): State<AppState>,
    Json(body): Json<NutritionRequest>,
) -> ApiResult<Json<NutritionResponse>> {
    if body.parsed_foods.is_empty() {
        return Err(ApiError::Validation("parsedFoods must be non-empty.".into()));
    }

    let (food_details, summary) =
        service::compute_nutrition(state.composition.as_ref(), &body.parsed_foods).await?;

    let attached = service::store_summary(&state, &body.user_id, &summary).await?;
    if attached.is_none() {
        warn!(user_id = %body.user_id, "summary not attached, user has no meal records");
    }

    Ok(Json(NutritionResponse {
        message: nutrition_message(attached.is_some()).into(),
        user_id: body.user_id,
        food_details,
        summary,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(meal_description: Option<&str>) -> SubmitMealRequest {
        SubmitMealRequest {
            user_id: "user123".into(),
            meal_description: meal_description.map(str::to_string),
        }
    }

    #[test]
    fn missing_description_is_rejected() {
        let err = non_empty_description(&request(None)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn empty_description_is_rejected() {
        let err = non_empty_description(&request(Some(""))).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn whitespace_only_description_is_rejected() {
        let err = non_empty_description(&request(Some("   \t\n"))).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn description_is_trimmed_before_use() {
        let body = request(Some("  rice and milk  "));
        assert_eq!(non_empty_description(&body).unwrap(), "rice and milk");
    }

    #[test]
    fn nutrition_message_names_the_unattached_case() {
        assert_eq!(nutrition_message(true), "Nutrition computed successfully.");
        assert!(nutrition_message(false).contains("no meal record"));
    }
}
