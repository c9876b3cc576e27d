// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! OpenAI-compatible model backend
//!
//! Implements the ModelBackend trait against the `/v1/chat/completions`
//! wire format, which also covers local OpenAI-compatible servers.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result, TutorError};
use crate::llm::message::{Conversation, Role};
use crate::llm::provider::{
    ChunkStream, CompletionRequest, CompletionResponse, ModelBackend, ResponseChunk, StopReason,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-compatible chat completions backend
pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiBackend {
    /// Create a new backend against the public OpenAI endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Create with a custom base URL (local or proxied deployments)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Convert a conversation to the OpenAI message format
    fn convert_messages(conversation: &Conversation) -> Vec<WireMessage> {
        let mut result = Vec::new();

        if let Some(ref system) = conversation.system_prompt {
            result.push(WireMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for m in &conversation.messages {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            result.push(WireMessage {
                role: role.to_string(),
                content: m.content.clone(),
            });
        }

        result
    }

    fn build_request(&self, request: &CompletionRequest, stream: bool) -> WireRequest {
        WireRequest {
            model: request.model.clone(),
            messages: Self::convert_messages(&request.conversation),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream,
        }
    }

    /// Map an HTTP error status to an ApiError
    fn parse_error(&self, status: u16, body: &str) -> TutorError {
        let message = serde_json::from_str::<WireErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());

        let api_error = match status {
            401 | 403 => ApiError::AuthenticationFailed,
            404 => ApiError::ModelNotFound(message),
            429 => ApiError::RateLimited(60),
            _ => ApiError::ServerError { status, message },
        };

        TutorError::Api(api_error)
    }
}

#[async_trait]
impl ModelBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = self.build_request(&request, false);

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status, &body));
        }

        let completion: WireResponse = response.json().await.map_err(|e| {
            TutorError::Api(ApiError::InvalidResponse(e.to_string()))
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TutorError::Api(ApiError::InvalidResponse("no choices".to_string())))?;

        Ok(CompletionResponse {
            id: completion.id,
            model: completion.model.unwrap_or_default(),
            text: choice.message.map(|m| m.content).unwrap_or_default(),
            stop_reason: choice.finish_reason.as_deref().and_then(map_finish_reason),
        })
    }

    async fn complete_stream(&self, request: CompletionRequest) -> Result<ChunkStream> {
        let body = self.build_request(&request, true);

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status, &body));
        }

        let byte_stream = response.bytes_stream();

        let chunk_stream = byte_stream
            .map(|result| {
                result.map_err(|e| TutorError::Api(ApiError::StreamError(e.to_string())))
            })
            .scan(String::new(), |buffer, result| {
                let chunk = match result {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).to_string(),
                    Err(e) => return futures::future::ready(Some(vec![Err(e)])),
                };

                buffer.push_str(&chunk);

                let mut chunks = Vec::new();

                // Parse SSE events (data: ... lines)
                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim().to_string();
                    *buffer = buffer[line_end + 1..].to_string();

                    if let Some(parsed) = parse_sse_line(&line) {
                        chunks.push(Ok(parsed));
                    }
                }

                futures::future::ready(Some(chunks))
            })
            .flat_map(futures::stream::iter);

        Ok(Box::pin(chunk_stream))
    }
}

/// Parse one SSE line into a response chunk, if it carries one
fn parse_sse_line(line: &str) -> Option<ResponseChunk> {
    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    let data = line.strip_prefix("data: ")?;

    if data == "[DONE]" {
        return Some(ResponseChunk::Done { stop_reason: None });
    }

    let chunk: WireStreamChunk = serde_json::from_str(data).ok()?;
    let choice = chunk.choices.into_iter().next()?;

    if let Some(reason) = choice.finish_reason.as_deref() {
        return Some(ResponseChunk::Done {
            stop_reason: map_finish_reason(reason),
        });
    }

    match choice.delta.and_then(|d| d.content) {
        Some(text) => Some(ResponseChunk::Text(text)),
        None => Some(ResponseChunk::Ping),
    }
}

fn map_finish_reason(reason: &str) -> Option<StopReason> {
    match reason {
        "stop" => Some(StopReason::EndTurn),
        "length" => Some(StopReason::MaxTokens),
        "content_filter" => Some(StopReason::StopSequence),
        _ => None,
    }
}

// ===== Wire types =====

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    id: String,
    model: Option<String>,
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: Option<WireMessage2>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessage2 {
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireStreamChunk {
    choices: Vec<WireStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct WireStreamChoice {
    delta: Option<WireDelta>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireErrorEnvelope {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
}
