use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::composition::CompositionClient;
use crate::error::{ApiError, ApiResult};
use crate::extract::FoodExtractor;
use crate::meals::repo::{self, MealRecord, ResolvedFood};
use crate::nutrition::{self, FoodDetail, NutritionSummary};
use crate::state::AppState;

/// Extraction plus per-food composition lookup. Foods with zero search hits
/// are dropped from the result, not errors; zero extracted mentions is
/// terminal. Lookups run one at a time.
pub async fn resolve_foods(
    extractor: &dyn FoodExtractor,
    composition: &dyn CompositionClient,
    text: &str,
) -> ApiResult<Vec<ResolvedFood>> {
    let mentions = extractor.extract(text).await?;
    if mentions.is_empty() {
        return Err(ApiError::NoFoodDetected);
    }

    let mut foods = Vec::with_capacity(mentions.len());
    for mention in mentions {
        let hits = composition.search_foods(&mention.name).await?;
        match hits.into_iter().next() {
            Some(top) => foods.push(ResolvedFood {
                food: top.description,
                fdc_id: top.fdc_id,
                quantity: mention.quantity,
                unit: mention.unit,
            }),
            None => warn!(food = %mention.name, "no composition match, dropping"),
        }
    }
    Ok(foods)
}

/// The submission pipeline: resolve the description, then persist exactly
/// one record stamped with the current millisecond timestamp.
pub async fn submit_meal(
    state: &AppState,
    user_id: &str,
    meal_description: &str,
) -> ApiResult<Vec<ResolvedFood>> {
    let foods = resolve_foods(
        state.extractor.as_ref(),
        state.composition.as_ref(),
        meal_description,
    )
    .await?;

    let ts_ms = now_ms();
    MealRecord::insert(&state.db, user_id, ts_ms, meal_description, &foods)
        .await
        .map_err(ApiError::Persistence)?;

    Ok(foods)
}

/// Fetch label nutrients per confirmed food and fold them into a summary.
/// Pure given its inputs; the same food list and the same backing facts
/// always produce the same summary.
pub async fn compute_nutrition(
    composition: &dyn CompositionClient,
    foods: &[ResolvedFood],
) -> ApiResult<(Vec<FoodDetail>, NutritionSummary)> {
    let mut details = Vec::with_capacity(foods.len());
    for food in foods {
        let label_nutrients = composition.label_nutrients(food.fdc_id).await?;
        details.push(FoodDetail {
            food: food.clone(),
            label_nutrients,
        });
    }
    let summary = nutrition::summarize(&details);
    Ok((details, summary))
}

/// Attach the summary to the user's most recent record, if any. The record
/// to annotate is implied by recency because the confirm step always follows
/// the submission it belongs to.
pub async fn store_summary(
    state: &AppState,
    user_id: &str,
    summary: &NutritionSummary,
) -> ApiResult<Option<Uuid>> {
    let Some(record_id) = MealRecord::latest_id_for_user(&state.db, user_id)
        .await
        .map_err(ApiError::Persistence)?
    else {
        return Ok(None);
    };
    repo::upsert_summary(&state.db, record_id, summary)
        .await
        .map_err(ApiError::Persistence)?;
    Ok(Some(record_id))
}

fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::composition::{FoodHit, LabelNutrients};
    use crate::extract::FoodMention;

    struct FakeExtractor(Vec<FoodMention>);

    #[async_trait]
    impl FoodExtractor for FakeExtractor {
        async fn extract(&self, _text: &str) -> ApiResult<Vec<FoodMention>> {
            Ok(self.0.clone())
        }
    }

    /// Search results keyed by query; unlisted queries return no hits.
    struct FakeComposition(Vec<(&'static str, FoodHit)>);

    #[async_trait]
    impl CompositionClient for FakeComposition {
        async fn search_foods(&self, query: &str) -> ApiResult<Vec<FoodHit>> {
            Ok(self
                .0
                .iter()
                .filter(|(q, _)| *q == query)
                .map(|(_, hit)| hit.clone())
                .collect())
        }

        async fn label_nutrients(&self, fdc_id: i64) -> ApiResult<LabelNutrients> {
            Ok(LabelNutrients {
                calories: fdc_id as f64,
                ..Default::default()
            })
        }
    }

    fn hit(description: &str, fdc_id: i64) -> FoodHit {
        FoodHit {
            description: description.into(),
            fdc_id,
        }
    }

    #[tokio::test]
    async fn resolves_each_mention_to_the_top_hit() {
        let extractor = FakeExtractor(vec![
            FoodMention::bare("rice"),
            FoodMention {
                name: "milk".into(),
                quantity: 2.0,
                unit: Some("glass".into()),
            },
        ]);
        let composition = FakeComposition(vec![
            ("rice", hit("RICE, WHITE", 100)),
            ("rice", hit("RICE, BROWN", 101)),
            ("milk", hit("MILK, WHOLE", 200)),
        ]);

        let foods = resolve_foods(&extractor, &composition, "rice and milk")
            .await
            .unwrap();
        assert_eq!(foods.len(), 2);
        assert_eq!(foods[0].food, "RICE, WHITE");
        assert_eq!(foods[0].fdc_id, 100);
        assert_eq!(foods[1].quantity, 2.0);
        assert_eq!(foods[1].unit.as_deref(), Some("glass"));
    }

    #[tokio::test]
    async fn unmatched_foods_are_dropped_silently() {
        let extractor = FakeExtractor(vec![
            FoodMention::bare("rice"),
            FoodMention::bare("xyzzy"),
        ]);
        let composition = FakeComposition(vec![("rice", hit("RICE, WHITE", 100))]);

        let foods = resolve_foods(&extractor, &composition, "rice and xyzzy")
            .await
            .unwrap();
        // Length equals successful matches only; no placeholder entries.
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].food, "RICE, WHITE");
    }

    #[tokio::test]
    async fn zero_mentions_is_no_food_detected() {
        let extractor = FakeExtractor(vec![]);
        let composition = FakeComposition(vec![]);

        let err = resolve_foods(&extractor, &composition, "today is a nice day")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NoFoodDetected));
    }

    #[tokio::test]
    async fn nutrition_is_deterministic_for_the_same_inputs() {
        let composition = FakeComposition(vec![]);
        let foods = vec![
            ResolvedFood {
                food: "RICE".into(),
                fdc_id: 120,
                quantity: 2.0,
                unit: None,
            },
            ResolvedFood {
                food: "MILK".into(),
                fdc_id: 60,
                quantity: 1.0,
                unit: None,
            },
        ];

        let (_, first) = compute_nutrition(&composition, &foods).await.unwrap();
        let (details, second) = compute_nutrition(&composition, &foods).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.macros.calories, 300.0);
        assert_eq!(details.len(), 2);
    }
}
