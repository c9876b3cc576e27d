// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Conversation session management
//!
//! In-memory session store shared across concurrent request handlers.

mod store;

pub use store::{new_session_id, SessionInfo, SessionStore};
