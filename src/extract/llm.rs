use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::LlmConfig;
use crate::error::ApiError;
use crate::extract::{FoodExtractor, FoodMention};

const PROMPT_TEMPLATE: &str = "\
You are a nutrition assistant. Extract every food or drink the user ate from \
the meal description below. Respond with ONLY a JSON array, no prose, where \
each element is {\"food\": string, \"quantity\": number, \"unit\": string or null}. \
Use 1 for the quantity when none is stated.\n\nMeal description: \"{user_input}\"";

/// LLM strategy: one templated chat-completion call at temperature 0.
/// The model's reply is validated before it reaches the pipeline; anything
/// that does not parse as the expected array is an upstream failure.
#[derive(Clone)]
pub struct LlmExtractor {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmExtractor {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct LlmFood {
    food: String,
    #[serde(default = "default_quantity")]
    quantity: f64,
    #[serde(default)]
    unit: Option<String>,
}

fn default_quantity() -> f64 {
    1.0
}

/// Validate and parse the model's reply. Models occasionally wrap JSON in a
/// markdown fence; strip that, then require a well-formed array.
pub(crate) fn parse_model_output(content: &str) -> Result<Vec<FoodMention>, ApiError> {
    let mut body = content.trim();
    if let Some(stripped) = body.strip_prefix("```") {
        let stripped = stripped.strip_prefix("json").unwrap_or(stripped);
        body = stripped.strip_suffix("```").unwrap_or(stripped).trim();
    }

    let foods: Vec<LlmFood> = serde_json::from_str(body)
        .map_err(|e| ApiError::upstream("llm", format!("malformed model output: {e}")))?;

    Ok(foods
        .into_iter()
        .filter(|f| !f.food.trim().is_empty())
        .map(|f| FoodMention {
            name: f.food,
            quantity: f.quantity,
            unit: f.unit,
        })
        .collect())
}

#[async_trait]
impl FoodExtractor for LlmExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<FoodMention>, ApiError> {
        let prompt = PROMPT_TEMPLATE.replace("{user_input}", text);
        let payload = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            // Pinned for reproducible parses.
            "temperature": 0,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApiError::upstream("llm", e))?;

        if !response.status().is_success() {
            return Err(ApiError::upstream(
                "llm",
                format!("chat completion returned {}", response.status()),
            ));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::upstream("llm", e))?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ApiError::upstream("llm", "empty choices"))?;

        parse_model_output(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_json_array() {
        let out = parse_model_output(
            r#"[{"food":"rice","quantity":1,"unit":"bowl"},{"food":"milk","quantity":1,"unit":"glass"}]"#,
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "rice");
        assert_eq!(out[0].unit.as_deref(), Some("bowl"));
    }

    #[test]
    fn strips_markdown_fences() {
        let out = parse_model_output("```json\n[{\"food\":\"banana\"}]\n```").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].quantity, 1.0);
        assert_eq!(out[0].unit, None);
    }

    #[test]
    fn malformed_output_is_an_upstream_error() {
        let err = parse_model_output("I had a great lunch!").unwrap_err();
        assert!(matches!(err, ApiError::Upstream { service: "llm", .. }));
    }

    #[test]
    fn blank_food_names_are_dropped() {
        let out = parse_model_output(r#"[{"food":"  "},{"food":"coke","quantity":2}]"#).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "coke");
        assert_eq!(out[0].quantity, 2.0);
    }
}
