use anyhow::Result;
use log::{error, info, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::feedback::{parse_feedback, ArtworkFeedback, FeedbackOutcome};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Client for the OpenRouter chat-completions endpoint. One multimodal
/// request per analysis, no streaming, no retries.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        }
    }

    /// Points the client at an OpenRouter-compatible endpoint other than the
    /// hosted default.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Requests a critique and absorbs every failure into the deterministic
    /// fallback. Callers always get a populated outcome; `degraded` marks
    /// the substitution.
    pub async fn critique_or_fallback(
        &self,
        image_data_url: &str,
        course: &str,
        focus_area: &str,
    ) -> FeedbackOutcome {
        match self.request_critique(image_data_url, course, focus_area).await {
            Ok(feedback) => {
                info!("✅ Received structured feedback from OpenRouter");
                FeedbackOutcome::live(feedback)
            }
            Err(e) => {
                error!("❌ Critique request failed, using fallback: {}", e);
                FeedbackOutcome::fallback(course)
            }
        }
    }

    /// The single external call: multimodal user message (prompt + inline
    /// image), strict JSON parse of the first choice's content.
    pub async fn request_critique(
        &self,
        image_data_url: &str,
        course: &str,
        focus_area: &str,
    ) -> Result<ArtworkFeedback> {
        let prompt = build_critique_prompt(course, focus_area);

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": prompt
                        },
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": image_data_url
                            }
                        }
                    ]
                }
            ],
            "max_tokens": 1000,
            "temperature": 0.7
        });

        info!(
            "📤 Requesting critique from {} with model {}",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "OpenRouter API error {}: {}",
                status,
                error_text
            ));
        }

        let chat_response: ChatResponse = response.json().await?;
        let content = chat_response
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| anyhow::anyhow!("No response choices from OpenRouter"))?;

        parse_feedback(content).map_err(|e| {
            warn!("⚠️ Model content was not the requested raw JSON: {}", e);
            e
        })
    }
}

fn build_critique_prompt(course: &str, focus_area: &str) -> String {
    format!(
        "You are an expert creative instructor for Artelier. Analyze this artwork and provide specific feedback for a student taking \"{}\" who wants feedback on \"{}\".\n\nONLY return raw JSON (no explanations, no markdown) like this:\n{{\"strengths\": [\"...\"], \"improvements\": [\"...\"], \"techniques\": [\"...\"], \"nextSteps\": [\"...\"]}}",
        course, focus_area
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::fallback_feedback;

    fn unreachable_client() -> OpenRouterClient {
        // Port 9 (discard) on loopback; nothing listens there, so the send
        // fails fast with a connection error.
        OpenRouterClient::new("test-key".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url("http://127.0.0.1:9".to_string())
    }

    #[test]
    fn prompt_embeds_course_and_focus_area() {
        let prompt = build_critique_prompt("Portrait Photography", "Lighting & Shadows");
        assert!(prompt.contains("\"Portrait Photography\""));
        assert!(prompt.contains("\"Lighting & Shadows\""));
        assert!(prompt.contains("ONLY return raw JSON"));
        assert!(prompt.contains("nextSteps"));
    }

    #[tokio::test]
    async fn network_failure_yields_the_static_fallback() {
        let client = unreachable_client();
        let outcome = client
            .critique_or_fallback(
                "data:image/png;base64,AAAA",
                "Portrait Photography",
                "Lighting & Shadows",
            )
            .await;

        assert!(outcome.degraded);
        assert_eq!(outcome.feedback, fallback_feedback("Portrait Photography"));
        assert!(outcome.feedback.techniques[0].contains("Portrait Photography"));
    }

    #[tokio::test]
    async fn request_critique_propagates_the_network_error() {
        let client = unreachable_client();
        let result = client
            .request_critique("data:image/png;base64,AAAA", "Mixed Media", "Overall Improvement")
            .await;
        assert!(result.is_err());
    }
}
