// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Tutoring orchestration
//!
//! Sequences session lookup, message persistence, model invocation, and
//! response parsing for both blocking and streaming requests.

pub mod prompt;
mod tutor;

pub use tutor::{
    AnalyzeRequest, ChatRequest, ChatResponse, EngineOptions, ExpertiseLevel, TutorEngine,
};
