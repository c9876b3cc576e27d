// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! The tutoring engine
//!
//! One engine instance serves many concurrent requests against a shared
//! session store. There is deliberately no transaction spanning "record
//! user message" and "invoke model": a failed model call leaves the user
//! message persisted, and an assistant message is only persisted on
//! success.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::agent::prompt;
use crate::data::MarketData;
use crate::error::{Result, TutorError};
use crate::llm::message::{new_message_id, ChatMessage, Conversation};
use crate::llm::provider::{CompletionRequest, ModelBackend, ResponseChunk};
use crate::parser::{self, ParsedAnalysis};
use crate::session::SessionStore;
use crate::stream::{DeltaAccumulator, EventStream, TutorEvent};

/// Free-form chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Natural-language query
    pub query: String,

    /// Session to continue; a new session is created when absent
    pub session_id: Option<String>,
}

/// Chat response: the assistant message plus the best-effort parse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
    pub session_id: String,
    pub parsed: Option<ParsedAnalysis>,
}

/// Structured analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    pub session_id: Option<String>,
    pub expertise_level: Option<ExpertiseLevel>,
}

/// User expertise hint steering the response register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpertiseLevel {
    Beginner,
    Intermediate,
    Professional,
}

impl FromStr for ExpertiseLevel {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(ExpertiseLevel::Beginner),
            "intermediate" => Ok(ExpertiseLevel::Intermediate),
            "professional" => Ok(ExpertiseLevel::Professional),
            other => Err(TutorError::InvalidInput(format!(
                "unknown expertise level '{other}'"
            ))),
        }
    }
}

/// Model invocation options
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Model identifier passed to the backend
    pub model: String,

    /// Maximum tokens per response
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            model: "gpt-5-nano".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// Orchestrates sessions, model calls, and parsing
pub struct TutorEngine {
    store: SessionStore,
    backend: Arc<dyn ModelBackend>,
    market_data: Arc<dyn MarketData>,
    options: EngineOptions,
}

impl TutorEngine {
    /// Create a new engine over a shared store and backend
    pub fn new(
        store: SessionStore,
        backend: Arc<dyn ModelBackend>,
        market_data: Arc<dyn MarketData>,
        options: EngineOptions,
    ) -> Self {
        Self {
            store,
            backend,
            market_data,
            options,
        }
    }

    /// The shared session store (create/fetch/list/delete surface)
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Free-form chat with a blocking (full-response) model call
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let query = request.query.trim().to_string();
        if query.is_empty() {
            return Err(TutorError::InvalidInput("query must not be empty".to_string()));
        }

        let session_id = self.resolve_session(request.session_id.as_deref())?;
        self.store.append(&session_id, ChatMessage::user(query))?;

        tracing::debug!(
            target: "moat_tutor.agent",
            session_id = %session_id,
            "invoking model backend '{}'",
            self.backend.name()
        );

        let completion = self
            .backend
            .complete(self.completion_request(&session_id))
            .await?;

        let message = ChatMessage::assistant(completion.text.trim());
        self.store.append(&session_id, message.clone())?;

        let parsed = Some(parser::parse(&message.content)).filter(ParsedAnalysis::has_content);

        Ok(ChatResponse {
            message,
            session_id,
            parsed,
        })
    }

    /// Free-form chat with a streaming model call
    ///
    /// The returned stream emits exactly one `meta` first, then a `delta`
    /// per visible chunk, then one terminal `done` or `error`. The
    /// assistant message is appended only when `done` is reached; dropping
    /// the stream stops consumption of model output and persists nothing.
    pub async fn chat_stream(&self, request: ChatRequest) -> Result<EventStream> {
        let query = request.query.trim().to_string();
        if query.is_empty() {
            return Err(TutorError::InvalidInput("query must not be empty".to_string()));
        }

        let session_id = self.resolve_session(request.session_id.as_deref())?;
        self.store.append(&session_id, ChatMessage::user(query))?;

        let completion_request = self.completion_request(&session_id);
        let message_id = new_message_id();
        let store = self.store.clone();
        let backend = self.backend.clone();

        let events = async_stream::stream! {
            // Sent before any model output so the client can persist the
            // session linkage even if generation fails below.
            yield TutorEvent::Meta {
                session_id: session_id.clone(),
                message_id: message_id.clone(),
            };

            let mut chunks = match backend.complete_stream(completion_request).await {
                Ok(chunks) => chunks,
                Err(error) => {
                    tracing::warn!(
                        target: "moat_tutor.agent",
                        session_id = %session_id,
                        "stream setup failed: {error}"
                    );
                    yield TutorEvent::Error {
                        message: error.to_string(),
                    };
                    return;
                }
            };

            let mut accumulator = DeltaAccumulator::new();

            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(ResponseChunk::Done { .. }) => break,
                    Ok(chunk) => {
                        if let Some(text) = accumulator.push(&chunk) {
                            yield TutorEvent::Delta { text };
                        }
                    }
                    Err(error) => {
                        tracing::warn!(
                            target: "moat_tutor.agent",
                            session_id = %session_id,
                            "stream failed mid-generation: {error}"
                        );
                        yield TutorEvent::Error {
                            message: error.to_string(),
                        };
                        return;
                    }
                }
            }

            let full_text = accumulator.finish();
            let message = ChatMessage::assistant_with_id(message_id.clone(), full_text);

            if let Err(error) = store.append(&session_id, message.clone()) {
                yield TutorEvent::Error {
                    message: error.to_string(),
                };
                return;
            }

            let parsed =
                Some(parser::parse(&message.content)).filter(ParsedAnalysis::has_content);

            yield TutorEvent::Done {
                message,
                session_id: session_id.clone(),
                parsed,
            };
        };

        Ok(Box::pin(events))
    }

    /// Structured analysis: ticker + date range through the same
    /// append/invoke/parse pipeline, with caller hints passed to the parser
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<ParsedAnalysis> {
        let ticker = validate_ticker(&request.ticker)?;
        validate_date(&request.start_date)?;
        validate_date(&request.end_date)?;

        let session_id = self.resolve_session(request.session_id.as_deref())?;

        let query = prompt::build_analysis_query(
            &ticker,
            &request.start_date,
            &request.end_date,
            request.expertise_level,
        );
        let query = prompt::attach_reference_data(
            &query,
            &self.market_data.news(&ticker, &request.start_date, &request.end_date),
            &self
                .market_data
                .price_summary(&ticker, &request.start_date, &request.end_date),
            &self.market_data.moat_characteristics(&ticker),
        );

        self.store.append(&session_id, ChatMessage::user(query))?;

        let completion = self
            .backend
            .complete(self.completion_request(&session_id))
            .await?;

        let message = ChatMessage::assistant(completion.text.trim());
        self.store.append(&session_id, message.clone())?;

        Ok(parser::parse_with_hints(
            &message.content,
            Some(&ticker),
            Some(&request.start_date),
            Some(&request.end_date),
        ))
    }

    /// Resolve a supplied session id or create a fresh session
    fn resolve_session(&self, supplied: Option<&str>) -> Result<String> {
        match supplied {
            Some(id) => {
                if self.store.exists(id) {
                    Ok(id.to_string())
                } else {
                    Err(TutorError::SessionNotFound(id.to_string()))
                }
            }
            None => {
                let session = self.store.create();
                tracing::debug!(
                    target: "moat_tutor.agent",
                    session_id = %session.session_id,
                    "created session"
                );
                Ok(session.session_id)
            }
        }
    }

    /// Build the model request from the session's full history
    fn completion_request(&self, session_id: &str) -> CompletionRequest {
        let mut conversation = Conversation::new();
        conversation.set_system(prompt::system_prompt());
        for message in self.store.messages(session_id) {
            conversation.push(message);
        }

        CompletionRequest::new(self.options.model.clone(), conversation)
            .with_max_tokens(self.options.max_tokens)
            .with_temperature(self.options.temperature)
    }
}

fn validate_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(TutorError::InvalidInput("ticker must not be empty".to_string()));
    }
    if ticker.len() > 10 {
        return Err(TutorError::InvalidInput(format!(
            "ticker '{ticker}' is too long"
        )));
    }
    Ok(ticker)
}

fn validate_date(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        TutorError::InvalidInput(format!("invalid date '{date}': use YYYY-MM-DD"))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ticker_uppercases() {
        assert_eq!(validate_ticker(" aapl ").unwrap(), "AAPL");
    }

    #[test]
    fn test_validate_ticker_rejects_empty() {
        assert!(matches!(
            validate_ticker("   "),
            Err(TutorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_ticker_rejects_overlong() {
        assert!(validate_ticker("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2023-01-01").is_ok());
        assert!(validate_date("2023-02-30").is_err());
        assert!(validate_date("01-01-2023").is_err());
        assert!(validate_date("not a date").is_err());
    }

    #[test]
    fn test_expertise_level_from_str() {
        assert_eq!(
            "beginner".parse::<ExpertiseLevel>().unwrap(),
            ExpertiseLevel::Beginner
        );
        assert_eq!(
            "Professional".parse::<ExpertiseLevel>().unwrap(),
            ExpertiseLevel::Professional
        );
        assert!("expert".parse::<ExpertiseLevel>().is_err());
    }

    #[test]
    fn test_engine_options_default() {
        let options = EngineOptions::default();
        assert_eq!(options.max_tokens, 4096);
        assert!((options.temperature - 0.7).abs() < 0.001);
    }
}
