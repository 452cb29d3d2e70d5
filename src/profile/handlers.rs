use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use tracing::instrument;

use crate::dto::UserQuery;
use crate::error::{ApiError, ApiResult};
use crate::profile::goals;
use crate::profile::repo::UserProfile;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_goal: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: String,
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = UserProfile::get(&state.db, &q.user_id)
        .await
        .map_err(ApiError::Persistence)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let bmr = goals::bmr_for(&profile);
    let calorie_goal = goals::calorie_goal_for(&profile);

    Ok(Json(ProfileResponse {
        profile,
        bmr,
        calorie_goal,
    }))
}

#[instrument(skip(state, body), fields(user_id = %body.user_id))]
pub async fn put_profile(
    State(state): State<AppState>,
    Json(body): Json<UserProfile>,
) -> ApiResult<Json<UpdateProfileResponse>> {
    if body.user_id.trim().is_empty() {
        return Err(ApiError::Validation("userId is required.".into()));
    }

    UserProfile::put(&state.db, &body)
        .await
        .map_err(ApiError::Persistence)?;

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully".into(),
    }))
}
