use serde::Deserialize;

/// Which food-extraction backend the submission pipeline uses. Chosen once
/// at startup; requests never select a strategy themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorStrategy {
    Entity,
    Llm,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FdcConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub extractor: ExtractorStrategy,
    pub fdc: FdcConfig,
    pub llm: Option<LlmConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;

        let extractor = match std::env::var("EXTRACTOR_STRATEGY")
            .unwrap_or_else(|_| "entity".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "entity" => ExtractorStrategy::Entity,
            "llm" => ExtractorStrategy::Llm,
            other => anyhow::bail!("unknown EXTRACTOR_STRATEGY: {other}"),
        };

        let fdc = FdcConfig {
            api_key: std::env::var("FDC_API_KEY")?,
            base_url: std::env::var("FDC_BASE_URL")
                .unwrap_or_else(|_| "https://api.nal.usda.gov/fdc/v1".into()),
        };

        let llm = match std::env::var("OPENAI_API_KEY") {
            Ok(api_key) => Some(LlmConfig {
                api_key,
                model: std::env::var("OPENAI_MODEL")
                    .unwrap_or_else(|_| "gpt-3.5-turbo".into()),
                base_url: std::env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            }),
            Err(_) => None,
        };

        if extractor == ExtractorStrategy::Llm && llm.is_none() {
            anyhow::bail!("EXTRACTOR_STRATEGY=llm requires OPENAI_API_KEY");
        }

        Ok(Self {
            database_url,
            extractor,
            fdc,
            llm,
        })
    }
}
