// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! In-memory session store
//!
//! Holds every conversation for the lifetime of the process. Nothing is
//! persisted across restarts; that is a stated limitation of the store,
//! not an oversight.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TutorError};
use crate::llm::message::ChatMessage;

/// A conversation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session identifier (`session-<uuid4>`)
    pub session_id: String,

    /// Messages in append order; append order is authoritative, not
    /// wall-clock order
    pub messages: Vec<ChatMessage>,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent appended message
    pub last_activity: DateTime<Utc>,
}

impl SessionInfo {
    fn new(session_id: String) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            messages: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }
}

/// Allocate a fresh session id
pub fn new_session_id() -> String {
    format!("session-{}", Uuid::new_v4())
}

type SessionSlot = Arc<RwLock<SessionInfo>>;

/// Shared in-memory store for chat sessions
///
/// The outer map lock is only held long enough to resolve a session slot;
/// each session carries its own lock, so appends to one session never
/// block operations on another.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionSlot>>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session and return a snapshot of it
    pub fn create(&self) -> SessionInfo {
        let session = SessionInfo::new(new_session_id());
        let snapshot = session.clone();

        self.sessions
            .write()
            .expect("session map lock poisoned")
            .insert(session.session_id.clone(), Arc::new(RwLock::new(session)));

        snapshot
    }

    fn slot(&self, session_id: &str) -> Option<SessionSlot> {
        self.sessions
            .read()
            .expect("session map lock poisoned")
            .get(session_id)
            .cloned()
    }

    /// Get a snapshot of a session, if it exists
    pub fn get(&self, session_id: &str) -> Option<SessionInfo> {
        self.slot(session_id)
            .map(|slot| slot.read().expect("session lock poisoned").clone())
    }

    /// Check whether a session exists
    pub fn exists(&self, session_id: &str) -> bool {
        self.sessions
            .read()
            .expect("session map lock poisoned")
            .contains_key(session_id)
    }

    /// Append a message to a session
    ///
    /// Updates `last_activity` to the appended message's timestamp.
    pub fn append(&self, session_id: &str, message: ChatMessage) -> Result<()> {
        let slot = self
            .slot(session_id)
            .ok_or_else(|| TutorError::SessionNotFound(session_id.to_string()))?;

        let mut session = slot.write().expect("session lock poisoned");
        session.last_activity = message.timestamp;
        session.messages.push(message);
        Ok(())
    }

    /// Get all messages in a session, in append order
    ///
    /// Returns an empty list for unknown sessions; this read never fails.
    pub fn messages(&self, session_id: &str) -> Vec<ChatMessage> {
        self.slot(session_id)
            .map(|slot| slot.read().expect("session lock poisoned").messages.clone())
            .unwrap_or_default()
    }

    /// Delete a session
    ///
    /// Returns true if the session existed.
    pub fn delete(&self, session_id: &str) -> bool {
        self.sessions
            .write()
            .expect("session map lock poisoned")
            .remove(session_id)
            .is_some()
    }

    /// List snapshots of all sessions
    pub fn list(&self) -> Vec<SessionInfo> {
        let slots: Vec<SessionSlot> = self
            .sessions
            .read()
            .expect("session map lock poisoned")
            .values()
            .cloned()
            .collect();

        slots
            .iter()
            .map(|slot| slot.read().expect("session lock poisoned").clone())
            .collect()
    }

    /// Remove every session
    pub fn clear(&self) {
        self.sessions
            .write()
            .expect("session map lock poisoned")
            .clear();
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .expect("session map lock poisoned")
            .len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
