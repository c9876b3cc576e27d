// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Token stream adapter
//!
//! Accumulates the user-visible portion of a streaming model response.
//! Tool invocations and keep-alive frames never surface.

use crate::llm::provider::{ContentBlock, ResponseChunk};

/// Accumulator for user-visible streaming text
#[derive(Debug, Default)]
pub struct DeltaAccumulator {
    /// Concatenation of every visible delta so far
    full_text: String,
}

impl DeltaAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one chunk and return the text to forward, if any
    ///
    /// Blocks-tagged chunks contribute the concatenation of their
    /// text-tagged blocks only; plain payloads pass through; everything
    /// else contributes nothing.
    pub fn push(&mut self, chunk: &ResponseChunk) -> Option<String> {
        let text = match chunk {
            ResponseChunk::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    ContentBlock::ToolUse { .. } => None,
                })
                .collect::<String>(),
            ResponseChunk::Text(text) => text.clone(),
            ResponseChunk::Done { .. } | ResponseChunk::Ping => String::new(),
        };

        if text.is_empty() {
            None
        } else {
            self.full_text.push_str(&text);
            Some(text)
        }
    }

    /// Text accumulated so far, untrimmed
    pub fn text(&self) -> &str {
        &self.full_text
    }

    /// Consume the accumulator and return the trimmed full response
    pub fn finish(self) -> String {
        self.full_text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_block(text: &str) -> ContentBlock {
        ContentBlock::Text {
            text: text.to_string(),
        }
    }

    fn tool_block() -> ContentBlock {
        ContentBlock::ToolUse {
            id: "tool-1".to_string(),
            name: "get_stock_news".to_string(),
            input: serde_json::json!({"ticker": "AAPL"}),
        }
    }

    #[test]
    fn test_plain_text_chunk_passes_through() {
        let mut acc = DeltaAccumulator::new();
        let delta = acc.push(&ResponseChunk::Text("Hello ".to_string()));
        assert_eq!(delta.as_deref(), Some("Hello "));
    }

    #[test]
    fn test_blocks_chunk_concatenates_text_blocks() {
        let mut acc = DeltaAccumulator::new();
        let chunk = ResponseChunk::Blocks(vec![
            text_block("Summary"),
            tool_block(),
            text_block(": strong quarter"),
        ]);

        let delta = acc.push(&chunk);
        assert_eq!(delta.as_deref(), Some("Summary: strong quarter"));
    }

    #[test]
    fn test_tool_only_chunk_is_invisible() {
        let mut acc = DeltaAccumulator::new();
        let delta = acc.push(&ResponseChunk::Blocks(vec![tool_block()]));
        assert!(delta.is_none());
        assert_eq!(acc.text(), "");
    }

    #[test]
    fn test_ping_and_done_are_invisible() {
        let mut acc = DeltaAccumulator::new();
        assert!(acc.push(&ResponseChunk::Ping).is_none());
        assert!(acc
            .push(&ResponseChunk::Done { stop_reason: None })
            .is_none());
    }

    #[test]
    fn test_empty_text_chunk_is_invisible() {
        let mut acc = DeltaAccumulator::new();
        assert!(acc.push(&ResponseChunk::Text(String::new())).is_none());
        assert!(acc.push(&ResponseChunk::Blocks(vec![])).is_none());
    }

    #[test]
    fn test_finish_trims_whitespace() {
        let mut acc = DeltaAccumulator::new();
        acc.push(&ResponseChunk::Text("\n  Summary: flat".to_string()));
        acc.push(&ResponseChunk::Text(" quarter.\n\n".to_string()));

        assert_eq!(acc.finish(), "Summary: flat quarter.");
    }

    #[test]
    fn test_full_text_is_delta_concatenation() {
        let mut acc = DeltaAccumulator::new();
        let mut forwarded = String::new();

        for part in ["The ", "stock ", "rallied", "."] {
            if let Some(delta) = acc.push(&ResponseChunk::Text(part.to_string())) {
                forwarded.push_str(&delta);
            }
        }

        assert_eq!(acc.text(), "The stock rallied.");
        assert_eq!(forwarded, "The stock rallied.");
    }

    #[test]
    fn test_unicode_deltas() {
        let mut acc = DeltaAccumulator::new();
        acc.push(&ResponseChunk::Text("Präzise ".to_string()));
        acc.push(&ResponseChunk::Text("分析".to_string()));

        assert_eq!(acc.finish(), "Präzise 分析");
    }
}
