//! OpenRouter-backed reasoning engine.
//!
//! Sends the compiled document as a single chat-completion request with a
//! strict JSON-schema response format, so conforming providers constrain
//! generation to the declared result shape. The reply content is parsed to a
//! `serde_json::Value` here; typed coercion stays in the
//! [`output`](crate::output) module.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EngineConfig, EngineFuture, ReasoningEngine};
use crate::OPENROUTER_URL;
use crate::error::EngineError;
use crate::prompt::PromptDocument;

// ── Request types ──────────────────────────────────────────────────

#[derive(Serialize, Debug)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize, Debug)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Strict JSON-schema output mode.
#[derive(Serialize, Debug)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize, Debug)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: serde_json::Value,
}

// ── Response types ─────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorBody>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    message: String,
}

#[derive(Deserialize, Debug)]
struct UsageInfo {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

// ── Engine ─────────────────────────────────────────────────────────

/// Async engine over the OpenRouter chat-completions API.
pub struct OpenRouterEngine {
    client: reqwest::Client,
    api_key: String,
    config: EngineConfig,
}

impl OpenRouterEngine {
    /// Create an engine with the given API key and configuration.
    ///
    /// The reqwest-level timeout is set slightly above the configured call
    /// deadline; the deadline itself is enforced with `tokio::time::timeout`
    /// in [`invoke`](ReasoningEngine::invoke) so expiry maps to
    /// [`EngineError::Timeout`] rather than a transport error.
    pub fn new(api_key: impl Into<String>, config: EngineConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent("cordis-rs/0.2")
            .timeout(config.timeout + Duration::from_secs(5))
            .build()
            .map_err(|e| EngineError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn build_request(&self, document: &PromptDocument) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: document.text.clone(),
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "diagnostic_result",
                    strict: true,
                    schema: document.output_schema.clone(),
                },
            },
        }
    }

    async fn post(&self, request: ChatRequest) -> Result<serde_json::Value, EngineError> {
        debug!(
            "engine request: model={}, prompt={} bytes, max_tokens={}",
            request.model,
            request.messages.first().map_or(0, |m| m.content.len()),
            request.max_tokens,
        );
        let start = Instant::now();

        let resp = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::Transport(format!("request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| EngineError::Transport(format!("failed to read response: {e}")))?;

        debug!(
            "engine response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            body.len()
        );

        if !status.is_success() {
            return Err(EngineError::Api(format!("HTTP {status}: {body}")));
        }

        let parsed: RawChatResponse = serde_json::from_str(&body)
            .map_err(|e| EngineError::Malformed(format!("unparseable response envelope: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(EngineError::Api(err.message));
        }
        if let Some(usage) = &parsed.usage {
            debug!(
                "token usage: prompt={}, completion={}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
            );
        }

        let choice = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| EngineError::Refusal("engine returned no choices".to_string()))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(EngineError::Refusal(refusal));
        }

        let content = match choice.message.content {
            Some(content) if !content.trim().is_empty() => content,
            _ => {
                let reason = choice.finish_reason.unwrap_or_else(|| "unknown".to_string());
                return Err(EngineError::Refusal(format!(
                    "engine returned empty content (finish_reason: {reason})"
                )));
            }
        };

        serde_json::from_str(&content)
            .map_err(|e| EngineError::Malformed(format!("reply content is not JSON: {e}")))
    }
}

impl ReasoningEngine for OpenRouterEngine {
    fn invoke(&self, document: &PromptDocument) -> EngineFuture<'_> {
        let request = self.build_request(document);
        let deadline = self.config.timeout;
        Box::pin(async move {
            match tokio::time::timeout(deadline, self.post(request)).await {
                Ok(result) => result,
                Err(_) => Err(EngineError::Timeout(deadline.as_secs())),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticResult;

    fn document() -> PromptDocument {
        PromptDocument {
            text: "Analyze this patient.".to_string(),
            output_schema: crate::json_schema_for::<DiagnosticResult>(),
        }
    }

    fn engine() -> OpenRouterEngine {
        OpenRouterEngine::new("test-key", EngineConfig::default()).unwrap()
    }

    #[test]
    fn request_carries_schema_and_strict_format() {
        let request = engine().build_request(&document());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_schema");
        assert_eq!(json["response_format"]["json_schema"]["strict"], true);
        assert_eq!(
            json["response_format"]["json_schema"]["schema"]["required"]
                .as_array()
                .unwrap()
                .len(),
            3
        );
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Analyze this patient.");
    }

    #[test]
    fn request_uses_configured_model_and_sampling() {
        let config = EngineConfig::default()
            .with_model("test/model")
            .with_max_tokens(256)
            .with_temperature(0.0);
        let engine = OpenRouterEngine::new("k", config).unwrap();
        let request = engine.build_request(&document());
        assert_eq!(request.model, "test/model");
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.temperature, 0.0);
    }

    #[test]
    fn response_envelope_parses_choices() {
        let parsed: RawChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"{\"ok\":true}"},"finish_reason":"stop"}],
                "usage":{"prompt_tokens":100,"completion_tokens":20}}"#,
        )
        .unwrap();
        let choice = parsed.choices.unwrap().into_iter().next().unwrap();
        assert_eq!(choice.message.content.as_deref(), Some("{\"ok\":true}"));
        assert_eq!(choice.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn response_envelope_parses_error_body() {
        let parsed: RawChatResponse =
            serde_json::from_str(r#"{"error":{"message":"model offline"}}"#).unwrap();
        assert_eq!(parsed.error.unwrap().message, "model offline");
        assert!(parsed.choices.is_none());
    }

    #[test]
    fn timeout_error_reports_the_deadline() {
        assert_eq!(
            EngineError::Timeout(60).to_string(),
            "engine call timed out after 60s"
        );
    }
}
