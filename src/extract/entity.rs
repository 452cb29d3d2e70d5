use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_comprehend::types::{EntityType, LanguageCode};

use crate::error::ApiError;
use crate::extract::{FoodExtractor, FoodMention};

/// Entity-tagging strategy: run Comprehend entity detection and keep only
/// `OTHER`-typed entities. The detector has no food category, so the
/// generic bucket stands in for "food-like noun phrase".
#[derive(Clone)]
pub struct EntityTagExtractor {
    client: aws_sdk_comprehend::Client,
}

impl EntityTagExtractor {
    pub async fn from_env() -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_comprehend::Client::new(&shared),
        }
    }
}

#[async_trait]
impl FoodExtractor for EntityTagExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<FoodMention>, ApiError> {
        let output = self
            .client
            .detect_entities()
            .text(text)
            .language_code(LanguageCode::En)
            .send()
            .await
            .map_err(|e| ApiError::upstream("comprehend", e))?;

        let mentions = output
            .entities()
            .iter()
            .filter(|entity| entity.r#type() == Some(&EntityType::Other))
            .filter_map(|entity| entity.text().map(FoodMention::bare))
            .collect();

        Ok(mentions)
    }
}
