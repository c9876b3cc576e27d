// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Model backend trait and related types
//!
//! Defines the abstraction layer for different model backends.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::Result;
use crate::llm::message::Conversation;

/// A pinned, sendable stream of response chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ResponseChunk>> + Send>>;

/// Main trait for model backends
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Get the backend name (e.g., "openai", "scripted")
    fn name(&self) -> &str;

    /// Non-streaming completion: full response text in one call
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Streaming completion: incremental chunks as they are generated
    async fn complete_stream(&self, request: CompletionRequest) -> Result<ChunkStream>;
}

/// Request for a completion
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model to use
    pub model: String,

    /// Conversation history plus the new user message
    pub conversation: Conversation,

    /// Maximum tokens in the response
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(model: impl Into<String>, conversation: Conversation) -> Self {
        Self {
            model: model.into(),
            conversation,
            max_tokens: 4096,
            temperature: 0.7,
        }
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Response from a blocking completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Response id assigned by the backend
    pub id: String,

    /// Model that produced the response
    pub model: String,

    /// Full response text
    pub text: String,

    /// Why the model stopped generating
    pub stop_reason: Option<StopReason>,
}

/// One incremental chunk of a streaming response
///
/// A chunk may carry tagged content blocks, a plain text payload, or
/// nothing user-visible at all. Only text-tagged content is ever surfaced
/// to clients; tool invocations and keep-alive frames stay internal.
#[derive(Debug, Clone)]
pub enum ResponseChunk {
    /// Tagged content blocks (block-structured backends)
    Blocks(Vec<ContentBlock>),

    /// Plain text payload (delta-structured backends)
    Text(String),

    /// Generation finished
    Done { stop_reason: Option<StopReason> },

    /// Keep-alive or metadata-only frame; contributes no visible text
    Ping,
}

/// A tagged block of content within a chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text content
    Text { text: String },

    /// Tool invocation request; never surfaced to clients
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of message
    EndTurn,
    /// Hit max tokens
    MaxTokens,
    /// Stop sequence hit
    StopSequence,
}
