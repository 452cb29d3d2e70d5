mod entity;
mod llm;

pub use entity::EntityTagExtractor;
pub use llm::LlmExtractor;

use async_trait::async_trait;

use crate::error::ApiError;

/// A food mention pulled out of free text, before composition lookup.
/// Quantity defaults to 1 when the extractor cannot estimate one.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodMention {
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
}

impl FoodMention {
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1.0,
            unit: None,
        }
    }
}

/// Capability seam for the two extraction strategies. The pipeline never
/// branches on which implementation sits behind this.
#[async_trait]
pub trait FoodExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Vec<FoodMention>, ApiError>;
}
