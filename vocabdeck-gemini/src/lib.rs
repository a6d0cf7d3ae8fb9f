//! Thin client for the Google generative API. Implements the core
//! `Generator` trait; all failures surface as `GenerationError` and are
//! never retried here.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use vocabdeck_core::{GenerationError, Generator};

const API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TEXT_MODEL: &str = "gemini-2.5-flash";
const IMAGE_MODEL: &str = "imagen-3.0-generate-002";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            text_model: TEXT_MODEL.into(),
            image_model: IMAGE_MODEL.into(),
        }
    }

    /// Reads the key from `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self, GenerationError> {
        let key = std::env::var("GEMINI_API_KEY").map_err(|_| GenerationError::MissingApiKey)?;
        if key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        Ok(Self::new(key))
    }

    pub fn with_models(
        mut self,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> Self {
        self.text_model = text_model.into();
        self.image_model = image_model.into();
        self
    }

    fn endpoint(&self, model: &str, verb: &str) -> String {
        format!("{API_ROOT}/{model}:{verb}?key={}", self.api_key)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate_explanation(
        &self,
        word: &str,
        meaning: &str,
        hint: Option<&str>,
    ) -> Result<String, GenerationError> {
        let mut prompt = format!(
            "You are a helpful language-learning assistant. For the word \"{word}\" \
             (meaning \"{meaning}\"), give one short, memorable explanation that helps \
             a learner remember it: a simple definition, an example sentence, or a vivid \
             analogy. Keep it under 50 words and return only the explanation text."
        );
        if let Some(h) = hint.map(str::trim).filter(|h| !h.is_empty()) {
            prompt.push_str(&format!("\n\nTake this hint into account: {h}"));
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!(%word, model = %self.text_model, "requesting explanation");
        let response = self
            .client
            .post(self.endpoint(&self.text_model, "generateContent"))
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(body));
        }

        let completion: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        completion
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(GenerationError::Empty)
    }

    async fn generate_image(&self, word: &str, meaning: &str) -> Result<String, GenerationError> {
        let prompt = format!(
            "A vibrant, high-quality, photorealistic image representing the word: \
             \"{word}\" (which means \"{meaning}\"). Centered object, clean background, \
             focus on the concept."
        );

        let request = PredictRequest {
            instances: vec![Instance { prompt }],
            parameters: Parameters {
                sample_count: 1,
                output_mime_type: "image/jpeg".into(),
            },
        };

        tracing::debug!(%word, model = %self.image_model, "requesting image");
        let response = self
            .client
            .post(self.endpoint(&self.image_model, "predict"))
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(body));
        }

        let prediction: PredictResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        prediction
            .predictions
            .into_iter()
            .next()
            .map(|p| format!("data:image/jpeg;base64,{}", p.bytes_base64_encoded))
            .ok_or(GenerationError::Empty)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<Instance>,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Instance {
    prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    sample_count: u32,
    output_mime_type: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_model_and_key() {
        let c = GeminiClient::new("test-key");
        let url = c.endpoint("gemini-2.5-flash", "generateContent");
        assert!(url.contains("/gemini-2.5-flash:generateContent"));
        assert!(url.ends_with("key=test-key"));
    }

    #[test]
    fn from_env_requires_key() {
        // Only meaningful when the variable is unset in the test environment.
        if std::env::var("GEMINI_API_KEY").is_err() {
            assert!(matches!(
                GeminiClient::from_env(),
                Err(GenerationError::MissingApiKey)
            ));
        }
    }

    #[test]
    fn request_bodies_serialize_to_api_shape() {
        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hi".into(),
                }],
            }],
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["contents"][0]["parts"][0]["text"], "hi");

        let req = PredictRequest {
            instances: vec![Instance {
                prompt: "p".into(),
            }],
            parameters: Parameters {
                sample_count: 1,
                output_mime_type: "image/jpeg".into(),
            },
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["parameters"]["sampleCount"], 1);
        assert_eq!(v["parameters"]["outputMimeType"], "image/jpeg");
    }
}
