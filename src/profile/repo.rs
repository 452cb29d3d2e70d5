use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// User-declared goals and body metrics. A PUT replaces the whole row;
/// there is no partial update and the last writer wins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub sex: Option<String>,
    pub calorie_target: Option<f64>,
    pub protein_goal_g: Option<f64>,
    pub carbs_goal_g: Option<f64>,
    pub fat_goal_g: Option<f64>,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
}

impl UserProfile {
    pub async fn get(db: &PgPool, user_id: &str) -> anyhow::Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, name, age, weight_kg, height_cm, sex,
                   calorie_target, protein_goal_g, carbs_goal_g, fat_goal_g,
                   dietary_preferences
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    pub async fn put(db: &PgPool, profile: &UserProfile) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles
                (user_id, name, age, weight_kg, height_cm, sex,
                 calorie_target, protein_goal_g, carbs_goal_g, fat_goal_g,
                 dietary_preferences, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, now())
            ON CONFLICT (user_id) DO UPDATE SET
                name = EXCLUDED.name,
                age = EXCLUDED.age,
                weight_kg = EXCLUDED.weight_kg,
                height_cm = EXCLUDED.height_cm,
                sex = EXCLUDED.sex,
                calorie_target = EXCLUDED.calorie_target,
                protein_goal_g = EXCLUDED.protein_goal_g,
                carbs_goal_g = EXCLUDED.carbs_goal_g,
                fat_goal_g = EXCLUDED.fat_goal_g,
                dietary_preferences = EXCLUDED.dietary_preferences,
                updated_at = now()
            "#,
        )
        .bind(&profile.user_id)
        .bind(&profile.name)
        .bind(profile.age)
        .bind(profile.weight_kg)
        .bind(profile.height_cm)
        .bind(&profile.sex)
        .bind(profile.calorie_target)
        .bind(profile.protein_goal_g)
        .bind(profile.carbs_goal_g)
        .bind(profile.fat_goal_g)
        .bind(&profile.dietary_preferences)
        .execute(db)
        .await?;
        Ok(())
    }
}
