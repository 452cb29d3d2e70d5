use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::nutrition::{MacroTotals, NutritionSummary, VitaminTotals};

/// A food mention matched to a composition-database entry. Owned entirely
/// by the meal record that embeds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFood {
    pub food: String,
    pub fdc_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

fn default_quantity() -> f64 {
    1.0
}

/// One persisted meal submission. Immutable once written; the summary, when
/// it exists, lives in its own table so the record itself never mutates.
#[derive(Debug, Clone, FromRow)]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: String,
    pub ts_ms: i64,
    pub meal_description: String,
    pub foods: Json<Vec<ResolvedFood>>,
}

#[derive(Debug, FromRow)]
pub struct MealHistoryRow {
    pub id: Uuid,
    pub ts_ms: i64,
    pub meal_description: String,
    pub foods: Json<Vec<ResolvedFood>>,
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub carbohydrates_g: Option<f64>,
    pub calcium_mg: Option<f64>,
    pub iron_mg: Option<f64>,
    pub potassium_mg: Option<f64>,
}

impl MealHistoryRow {
    pub fn summary(&self) -> Option<NutritionSummary> {
        self.calories.map(|calories| NutritionSummary {
            macros: MacroTotals {
                calories,
                protein_g: self.protein_g.unwrap_or(0.0),
                fat_g: self.fat_g.unwrap_or(0.0),
                carbohydrates_g: self.carbohydrates_g.unwrap_or(0.0),
            },
            vitamins: VitaminTotals {
                calcium_mg: self.calcium_mg.unwrap_or(0.0),
                iron_mg: self.iron_mg.unwrap_or(0.0),
                potassium_mg: self.potassium_mg.unwrap_or(0.0),
            },
        })
    }
}

impl MealRecord {
    pub async fn insert(
        db: &PgPool,
        user_id: &str,
        ts_ms: i64,
        meal_description: &str,
        foods: &[ResolvedFood],
    ) -> anyhow::Result<MealRecord> {
        let record = sqlx::query_as::<_, MealRecord>(
            r#"
            INSERT INTO meal_records (id, user_id, ts_ms, meal_description, foods)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, ts_ms, meal_description, foods
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(ts_ms)
        .bind(meal_description)
        .bind(Json(foods))
        .fetch_one(db)
        .await?;
        Ok(record)
    }

    /// Full per-user history with any stored summaries, ascending by
    /// timestamp; the record id breaks millisecond collisions.
    pub async fn history_by_user(
        db: &PgPool,
        user_id: &str,
    ) -> anyhow::Result<Vec<MealHistoryRow>> {
        let rows = sqlx::query_as::<_, MealHistoryRow>(
            r#"
            SELECT r.id, r.ts_ms, r.meal_description, r.foods,
                   s.calories, s.protein_g, s.fat_g, s.carbohydrates_g,
                   s.calcium_mg, s.iron_mg, s.potassium_mg
            FROM meal_records r
            LEFT JOIN meal_summaries s ON s.record_id = r.id
            WHERE r.user_id = $1
            ORDER BY r.ts_ms ASC, r.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn latest_id_for_user(db: &PgPool, user_id: &str) -> anyhow::Result<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM meal_records
            WHERE user_id = $1
            ORDER BY ts_ms DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(id)
    }
}

/// Attach (or replace) the computed summary for a record. The summary is a
/// projection; re-running the aggregation overwrites the previous row.
pub async fn upsert_summary(
    db: &PgPool,
    record_id: Uuid,
    summary: &NutritionSummary,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO meal_summaries
            (record_id, calories, protein_g, fat_g, carbohydrates_g,
             calcium_mg, iron_mg, potassium_mg)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (record_id) DO UPDATE SET
            calories = EXCLUDED.calories,
            protein_g = EXCLUDED.protein_g,
            fat_g = EXCLUDED.fat_g,
            carbohydrates_g = EXCLUDED.carbohydrates_g,
            calcium_mg = EXCLUDED.calcium_mg,
            iron_mg = EXCLUDED.iron_mg,
            potassium_mg = EXCLUDED.potassium_mg
        "#,
    )
    .bind(record_id)
    .bind(summary.macros.calories)
    .bind(summary.macros.protein_g)
    .bind(summary.macros.fat_g)
    .bind(summary.macros.carbohydrates_g)
    .bind(summary.vitamins.calcium_mg)
    .bind(summary.vitamins.iron_mg)
    .bind(summary.vitamins.potassium_mg)
    .execute(db)
    .await?;
    Ok(())
}
