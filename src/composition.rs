use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// One search hit from the composition database. The pipeline only ever
/// uses the top-ranked hit.
#[derive(Debug, Clone)]
pub struct FoodHit {
    pub description: String,
    pub fdc_id: i64,
}

/// Per-unit label nutrients for one food. Missing label entries read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelNutrients {
    pub calories: f64,
    pub fat: f64,
    pub carbohydrates: f64,
    pub protein: f64,
    pub calcium: f64,
    pub iron: f64,
    pub potassium: f64,
}

#[async_trait]
pub trait CompositionClient: Send + Sync {
    /// Ranked search over the composition database.
    async fn search_foods(&self, query: &str) -> Result<Vec<FoodHit>, ApiError>;
    /// Label nutrients for a single food by its database id.
    async fn label_nutrients(&self, fdc_id: i64) -> Result<LabelNutrients, ApiError>;
}

/// USDA FoodData Central client.
#[derive(Clone)]
pub struct FdcClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FdcClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
struct SearchFood {
    description: String,
    #[serde(rename = "fdcId")]
    fdc_id: i64,
}

#[derive(Debug, Deserialize)]
struct FoodDetailResponse {
    #[serde(rename = "labelNutrients")]
    label_nutrients: Option<RawLabelNutrients>,
    #[serde(rename = "foodNutrients", default)]
    food_nutrients: Vec<RawFoodNutrient>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLabelNutrients {
    calories: Option<NutrientValue>,
    fat: Option<NutrientValue>,
    carbohydrates: Option<NutrientValue>,
    protein: Option<NutrientValue>,
    calcium: Option<NutrientValue>,
    iron: Option<NutrientValue>,
    potassium: Option<NutrientValue>,
}

#[derive(Debug, Deserialize)]
struct NutrientValue {
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawFoodNutrient {
    nutrient: Option<RawNutrientMeta>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawNutrientMeta {
    number: Option<String>,
}

fn value_of(v: &Option<NutrientValue>) -> f64 {
    v.as_ref().and_then(|n| n.value).unwrap_or(0.0)
}

impl FoodDetailResponse {
    /// Branded foods carry `labelNutrients` directly; survey/foundation
    /// foods only have the `foodNutrients` table, keyed by USDA nutrient
    /// number (208 kcal, 203 protein, 204 fat, 205 carbs, 301 Ca, 303 Fe,
    /// 306 K).
    fn into_label_nutrients(self) -> LabelNutrients {
        if let Some(label) = self.label_nutrients {
            return LabelNutrients {
                calories: value_of(&label.calories),
                fat: value_of(&label.fat),
                carbohydrates: value_of(&label.carbohydrates),
                protein: value_of(&label.protein),
                calcium: value_of(&label.calcium),
                iron: value_of(&label.iron),
                potassium: value_of(&label.potassium),
            };
        }

        let mut out = LabelNutrients::default();
        for entry in &self.food_nutrients {
            let (Some(meta), Some(amount)) = (&entry.nutrient, entry.amount) else {
                continue;
            };
            match meta.number.as_deref() {
                Some("208") => out.calories = amount,
                Some("203") => out.protein = amount,
                Some("204") => out.fat = amount,
                Some("205") => out.carbohydrates = amount,
                Some("301") => out.calcium = amount,
                Some("303") => out.iron = amount,
                Some("306") => out.potassium = amount,
                _ => {}
            }
        }
        out
    }
}

#[async_trait]
impl CompositionClient for FdcClient {
    async fn search_foods(&self, query: &str) -> Result<Vec<FoodHit>, ApiError> {
        let url = format!("{}/foods/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("query", query), ("api_key", &self.api_key)])
            .send()
            .await
            .map_err(|e| ApiError::upstream("fdc", e))?;

        if !response.status().is_success() {
            return Err(ApiError::upstream(
                "fdc",
                format!("search returned {}", response.status()),
            ));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::upstream("fdc", e))?;

        Ok(parsed
            .foods
            .into_iter()
            .map(|f| FoodHit {
                description: f.description,
                fdc_id: f.fdc_id,
            })
            .collect())
    }

    async fn label_nutrients(&self, fdc_id: i64) -> Result<LabelNutrients, ApiError> {
        let url = format!("{}/food/{}", self.base_url, fdc_id);
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", &self.api_key)])
            .send()
            .await
            .map_err(|e| ApiError::upstream("fdc", e))?;

        if !response.status().is_success() {
            return Err(ApiError::upstream(
                "fdc",
                format!("food/{} returned {}", fdc_id, response.status()),
            ));
        }

        let parsed: FoodDetailResponse = response
            .json()
            .await
            .map_err(|e| ApiError::upstream("fdc", e))?;

        Ok(parsed.into_label_nutrients())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_nutrients_prefer_the_label_block() {
        let detail: FoodDetailResponse = serde_json::from_value(serde_json::json!({
            "labelNutrients": {
                "calories": { "value": 240.0 },
                "protein": { "value": 8.0 },
                "fat": { "value": 4.5 }
            },
            "foodNutrients": [
                { "nutrient": { "number": "208" }, "amount": 999.0 }
            ]
        }))
        .unwrap();

        let label = detail.into_label_nutrients();
        assert_eq!(label.calories, 240.0);
        assert_eq!(label.protein, 8.0);
        assert_eq!(label.fat, 4.5);
        // Unlisted label entries default to zero.
        assert_eq!(label.iron, 0.0);
    }

    #[test]
    fn label_nutrients_fall_back_to_nutrient_numbers() {
        let detail: FoodDetailResponse = serde_json::from_value(serde_json::json!({
            "foodNutrients": [
                { "nutrient": { "number": "208" }, "amount": 89.0 },
                { "nutrient": { "number": "203" }, "amount": 1.1 },
                { "nutrient": { "number": "205" }, "amount": 22.8 },
                { "nutrient": { "number": "306" }, "amount": 358.0 },
                { "nutrient": { "number": "999" }, "amount": 5.0 }
            ]
        }))
        .unwrap();

        let label = detail.into_label_nutrients();
        assert_eq!(label.calories, 89.0);
        assert_eq!(label.protein, 1.1);
        assert_eq!(label.carbohydrates, 22.8);
        assert_eq!(label.potassium, 358.0);
        assert_eq!(label.fat, 0.0);
    }

    #[test]
    fn search_response_tolerates_missing_foods_key() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.foods.is_empty());
    }
}
