use crate::config::RecognitionConfig;
use crate::error::AnalysisError;
use crate::vision::encoder::EncodedImage;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Instruction sent with every image. The "1-3 foods" bound and the
/// composite-dish preference keep the downstream fan-out small and avoid
/// double-counting dish components.
const RECOGNITION_PROMPT: &str = "List 1-3 main foods in this image, preferring composite \
    dishes like fried rice as single items. Separate with commas. Exclude 'and', 'etc' or \
    additional descriptions.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Identifies the foods in an encoded image. The trait seam exists so the
/// pipeline can be exercised without a live deployment.
#[async_trait]
pub trait FoodRecognizer: Send + Sync {
    /// Returns the raw comma-separated food list, or an `AnalysisError`
    /// that aborts the whole analysis. One attempt, no retries.
    async fn recognize(&self, image: &EncodedImage) -> Result<String, AnalysisError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct RecognitionClient {
    config: RecognitionConfig,
    client: Client,
}

impl RecognitionClient {
    pub fn new(config: RecognitionConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/deployments/{}/chat/completions?api-version={}",
            self.config.base_url, self.config.model, self.config.api_version
        )
    }
}

#[async_trait]
impl FoodRecognizer for RecognitionClient {
    async fn recognize(&self, image: &EncodedImage) -> Result<String, AnalysisError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("api-key", &self.config.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&json!({
                "messages": [
                    {
                        "role": "user",
                        "content": [
                            { "type": "text", "text": RECOGNITION_PROMPT },
                            {
                                "type": "image_url",
                                "image_url": { "url": image.data_url() }
                            }
                        ]
                    }
                ],
                "max_tokens": 2000,
                "temperature": 0.7,
                "top_p": 1,
                "stream": false
            }))
            .send()
            .await
            .map_err(|e| AnalysisError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(AnalysisError::InvalidResponse(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::InvalidResponse(format!("{}: {}", e, body)))?;

        let content = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        debug!("recognition answer: {content:?}");

        if content.trim().is_empty() {
            return Err(AnalysisError::EmptyResult);
        }
        Ok(content)
    }
}
