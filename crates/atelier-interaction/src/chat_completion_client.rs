//! ChatCompletionClient - REST client for OpenAI-compatible chat completions.
//!
//! Talks to OpenRouter by default. The design-image tool is announced on every
//! request and tool calls in the reply are decoded into directives.

use async_trait::async_trait;
use atelier_core::config::CompletionSettings;
use atelier_core::{
    ApiCredential, AtelierError, CancellationToken, Completion, CompletionClient, CompletionError,
    CompletionOutcome, Message, ToolCallDirective,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Completion client for `/chat/completions` endpoints.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    credential: Option<ApiCredential>,
    settings: CompletionSettings,
}

impl ChatCompletionClient {
    /// Builds a client. A missing credential is accepted here and reported as
    /// an auth failure on the first call.
    pub fn new(
        settings: CompletionSettings,
        credential: Option<ApiCredential>,
    ) -> Result<Self, AtelierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| AtelierError::internal(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            credential,
            settings,
        })
    }

    fn build_request(&self, history: &[Message]) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if !self.settings.system_prompt.trim().is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: self.settings.system_prompt.clone(),
            });
        }
        messages.extend(history.iter().map(|message| ChatMessage {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }));

        ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages,
            tools: ToolCallDirective::definitions(),
            tool_choice: "auto",
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    async fn send_request(
        &self,
        credential: &ApiCredential,
        body: &ChatCompletionRequest,
    ) -> Result<Completion, CompletionError> {
        let mut request = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(credential.expose())
            .json(body);
        if let Some(referer) = &self.settings.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.settings.app_title {
            request = request.header("X-Title", title);
        }

        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        let body_text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body_text).map_err(|err| {
            CompletionError::upstream(
                Some(status.as_u16()),
                format!("Failed to parse completion response: {err}"),
            )
        })?;

        extract_completion(parsed)
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(
        &self,
        history: &[Message],
        cancel: CancellationToken,
    ) -> Result<CompletionOutcome, CompletionError> {
        if cancel.is_cancelled() {
            return Ok(CompletionOutcome::Cancelled);
        }

        let credential = self.credential.as_ref().ok_or_else(|| {
            CompletionError::Auth(
                "No chat API key configured (set OPENROUTER_API_KEY or ~/.config/atelier/secret.json)"
                    .into(),
            )
        })?;

        let request = self.build_request(history);
        tracing::debug!(
            "[ChatCompletionClient] Sending {} messages to {}",
            request.messages.len(),
            self.settings.model
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("[ChatCompletionClient] Request cancelled in flight");
                return Ok(CompletionOutcome::Cancelled);
            }
            result = self.send_request(credential, &request) => result,
        };

        // A cancel that raced the response wins over it.
        if cancel.is_cancelled() {
            return Ok(CompletionOutcome::Cancelled);
        }

        result.map(CompletionOutcome::Completed)
    }

    fn provider_name(&self) -> &str {
        "chat-completions"
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    tools: Vec<Value>,
    tool_choice: &'static str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    /// Some gateways report failures with a 200 status.
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    /// Absent or `null` on plain text replies.
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_completion(response: ChatCompletionResponse) -> Result<Completion, CompletionError> {
    if let Some(error) = response.error {
        return Err(CompletionError::upstream(None, error.message));
    }

    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| CompletionError::upstream(None, "Completion response had no choices"))?;

    let tool_calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .filter_map(|call| {
            let directive =
                ToolCallDirective::from_tool_call(&call.function.name, &call.function.arguments);
            if directive.is_none() {
                tracing::warn!(
                    "[ChatCompletionClient] Ignoring unknown tool call '{}'",
                    call.function.name
                );
            }
            directive
        })
        .collect();

    Ok(Completion {
        text: message.content.unwrap_or_default(),
        tool_calls,
    })
}

fn map_http_error(status: StatusCode, body: &str) -> CompletionError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Auth(message),
        _ => CompletionError::upstream(Some(status.as_u16()), message),
    }
}

fn map_transport_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Network(format!("Request timed out: {err}"))
    } else {
        CompletionError::Network(format!("Request failed: {err}"))
    }
}
