// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Client-facing stream event protocol
//!
//! One generation produces exactly one `meta`, zero or more `delta`s in
//! generation order, then exactly one terminal event (`done` or `error`).
//! Each event encodes as an SSE frame: an event-name marker followed by a
//! single JSON data payload.

use serde::Serialize;

use crate::llm::message::ChatMessage;
use crate::parser::ParsedAnalysis;

/// One event in the client stream
#[derive(Debug, Clone)]
pub enum TutorEvent {
    /// Emitted once, first: session linkage plus the pre-allocated
    /// assistant message id, sent before any model output
    Meta {
        session_id: String,
        message_id: String,
    },

    /// One non-empty extracted text chunk, verbatim
    Delta { text: String },

    /// Terminal success: the finalized assistant message and the
    /// best-effort structured record (null when nothing usable was parsed)
    Done {
        message: ChatMessage,
        session_id: String,
        parsed: Option<ParsedAnalysis>,
    },

    /// Terminal failure: human-readable message; no `done` follows
    Error { message: String },
}

#[derive(Serialize)]
struct MetaPayload<'a> {
    session_id: &'a str,
    message_id: &'a str,
}

#[derive(Serialize)]
struct DeltaPayload<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct DonePayload<'a> {
    message: &'a ChatMessage,
    session_id: &'a str,
    parsed: &'a Option<ParsedAnalysis>,
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    message: &'a str,
}

impl TutorEvent {
    /// Event name used as the SSE event marker
    pub fn name(&self) -> &'static str {
        match self {
            TutorEvent::Meta { .. } => "meta",
            TutorEvent::Delta { .. } => "delta",
            TutorEvent::Done { .. } => "done",
            TutorEvent::Error { .. } => "error",
        }
    }

    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, TutorEvent::Done { .. } | TutorEvent::Error { .. })
    }

    /// JSON data payload for this event
    pub fn data(&self) -> String {
        let json = match self {
            TutorEvent::Meta {
                session_id,
                message_id,
            } => serde_json::to_string(&MetaPayload {
                session_id,
                message_id,
            }),
            TutorEvent::Delta { text } => serde_json::to_string(&DeltaPayload { text }),
            TutorEvent::Done {
                message,
                session_id,
                parsed,
            } => serde_json::to_string(&DonePayload {
                message,
                session_id,
                parsed,
            }),
            TutorEvent::Error { message } => serde_json::to_string(&ErrorPayload { message }),
        };
        json.unwrap_or_else(|_| "null".to_string())
    }

    /// Encode as one SSE frame
    pub fn encode(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.name(), self.data())
    }
}
