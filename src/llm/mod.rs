// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM module for the tutoring engine
//!
//! Provides abstraction over different model backends.

pub mod message;
pub mod provider;
pub mod providers;

pub use message::*;
pub use provider::*;
