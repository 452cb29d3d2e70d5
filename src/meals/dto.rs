use serde::{Deserialize, Serialize};

use crate::meals::repo::ResolvedFood;
use crate::nutrition::{FoodDetail, NutritionSummary};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMealRequest {
    pub user_id: String,
    #[serde(default)]
    pub meal_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMealResponse {
    pub message: String,
    pub user_id: String,
    pub parsed_foods: Vec<ResolvedFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRequest {
    pub user_id: String,
    #[serde(default)]
    pub parsed_foods: Vec<ResolvedFood>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionResponse {
    pub message: String,
    pub user_id: String,
    pub food_details: Vec<FoodDetail>,
    pub summary: NutritionSummary,
}
