// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Streaming response handling
//!
//! Extracts user-visible text from incremental model chunks and encodes
//! the client-facing event protocol.

mod adapter;
mod events;

pub use adapter::DeltaAccumulator;
pub use events::TutorEvent;

/// A pinned, sendable stream of tutor events
pub type EventStream = std::pin::Pin<Box<dyn futures::Stream<Item = TutorEvent> + Send>>;
