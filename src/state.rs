use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::composition::{CompositionClient, FdcClient};
use crate::config::{AppConfig, ExtractorStrategy};
use crate::extract::{EntityTagExtractor, FoodExtractor, LlmExtractor};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub extractor: Arc<dyn FoodExtractor>,
    pub composition: Arc<dyn CompositionClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let extractor: Arc<dyn FoodExtractor> = match config.extractor {
            ExtractorStrategy::Entity => Arc::new(EntityTagExtractor::from_env().await),
            ExtractorStrategy::Llm => {
                let llm = config
                    .llm
                    .as_ref()
                    .context("llm strategy selected without llm config")?;
                Arc::new(LlmExtractor::new(llm))
            }
        };

        let composition: Arc<dyn CompositionClient> =
            Arc::new(FdcClient::new(&config.fdc.base_url, &config.fdc.api_key));

        Ok(Self {
            db,
            config,
            extractor,
            composition,
        })
    }
}
