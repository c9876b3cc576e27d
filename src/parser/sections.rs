// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Heading detection and section splitting
//!
//! Model responses loosely follow nine named sections, but heading markup,
//! numbering, and emphasis are not guaranteed and sections may be absent
//! or out of order. Each section id has one tolerant matcher; all matches
//! across all matchers are merged and sorted by offset, and each heading
//! owns the text up to the next heading (or end of text).

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The nine known section identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Summary,
    KeyEvents,
    PriceBehavior,
    MoatAnalysis,
    PlainExplanation,
    ConceptDefinitions,
    LearningOptions,
    ComprehensionCheck,
    NextSteps,
}

impl SectionId {
    /// All section ids, in canonical response order
    pub const ALL: [SectionId; 9] = [
        SectionId::Summary,
        SectionId::KeyEvents,
        SectionId::PriceBehavior,
        SectionId::MoatAnalysis,
        SectionId::PlainExplanation,
        SectionId::ConceptDefinitions,
        SectionId::LearningOptions,
        SectionId::ComprehensionCheck,
        SectionId::NextSteps,
    ];

    /// Heading name fragment matched for this section
    fn heading_name(self) -> &'static str {
        match self {
            SectionId::Summary => "Summary",
            SectionId::KeyEvents => "Key Events",
            SectionId::PriceBehavior => "Price Behavior",
            SectionId::MoatAnalysis => "MOAT Analysis",
            SectionId::PlainExplanation => r"Plain(?:-|\s)Language Explanation",
            SectionId::ConceptDefinitions => "Concept Definitions",
            SectionId::LearningOptions => "Learning Options",
            SectionId::ComprehensionCheck => "Comprehension Check",
            SectionId::NextSteps => "Next Steps",
        }
    }
}

/// Declarative (section-id, matcher) table, built once
///
/// Each matcher tolerates optional `#`/`##` heading markers, `**` emphasis,
/// a leading ordinal number, any casing, and a trailing colon.
static HEADING_TABLE: LazyLock<Vec<(SectionId, Regex)>> = LazyLock::new(|| {
    SectionId::ALL
        .iter()
        .map(|&id| (id, heading_regex(id.heading_name())))
        .collect()
});

fn heading_regex(name: &str) -> Regex {
    let pattern = format!(
        r"(?i)(?:^|\n)(?:##?\s*)?(?:\*\*)?(?:\d{{1,2}}\.\s*)?(?:\*\*)?{name}(?:\*\*)?:?\s*(?:\*\*)?"
    );
    Regex::new(&pattern).expect("heading pattern must be valid")
}

/// One heading occurrence in the response text
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeadingMatch {
    pub id: SectionId,
    /// Offset where the heading (including its leading newline) starts
    pub start: usize,
    /// Offset immediately after the heading text
    pub header_end: usize,
}

/// Find every heading occurrence, merged across all nine matchers and
/// sorted by start offset
pub(crate) fn find_headings(text: &str) -> Vec<HeadingMatch> {
    let mut matches = Vec::new();
    for (id, pattern) in HEADING_TABLE.iter() {
        for found in pattern.find_iter(text) {
            matches.push(HeadingMatch {
                id: *id,
                start: found.start(),
                header_end: found.end(),
            });
        }
    }
    matches.sort_by_key(|m| m.start);
    matches
}

/// Split the response into per-section content spans
///
/// Each heading's span runs to the start of the next heading in merged
/// order, or to end of text. Unmatched sections are simply absent. When
/// the same heading occurs twice, the later occurrence wins.
pub(crate) fn split_into_sections(text: &str) -> HashMap<SectionId, String> {
    let headings = find_headings(text);
    let mut sections = HashMap::new();

    for (i, heading) in headings.iter().enumerate() {
        let span_end = headings
            .get(i + 1)
            .map(|next| next.start)
            .unwrap_or(text.len())
            // A heading directly followed by another heading: the first
            // matcher swallows the newline the next match starts at, so
            // the span collapses to empty rather than running backwards.
            .max(heading.header_end);
        let content = text[heading.header_end..span_end].trim().to_string();
        sections.insert(heading.id, content);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_heading_matches() {
        let sections = split_into_sections("Summary:\nThe stock went up.");
        assert_eq!(
            sections.get(&SectionId::Summary).map(String::as_str),
            Some("The stock went up.")
        );
    }

    #[test]
    fn test_markdown_heading_matches() {
        let sections = split_into_sections("## Key Events\n- earnings beat");
        assert_eq!(
            sections.get(&SectionId::KeyEvents).map(String::as_str),
            Some("- earnings beat")
        );
    }

    #[test]
    fn test_bold_numbered_heading_matches() {
        let sections = split_into_sections("**1. Summary**: Solid quarter.\n**3. Price Behavior**: Up 8%.");
        assert!(sections.contains_key(&SectionId::Summary));
        assert!(sections.contains_key(&SectionId::PriceBehavior));
    }

    #[test]
    fn test_case_insensitive_heading() {
        let sections = split_into_sections("moat analysis:\nStrengthened: Network Effects");
        assert!(sections.contains_key(&SectionId::MoatAnalysis));
    }

    #[test]
    fn test_plain_language_explanation_variants() {
        for heading in ["Plain-Language Explanation:", "Plain Language Explanation:"] {
            let text = format!("{heading}\nIn simple terms, demand grew.");
            let sections = split_into_sections(&text);
            assert!(
                sections.contains_key(&SectionId::PlainExplanation),
                "heading {heading:?} should match"
            );
        }
    }

    #[test]
    fn test_span_runs_to_next_heading() {
        let text = "Summary:\nGood quarter.\nMore detail.\nKey Events:\n- beat estimates";
        let sections = split_into_sections(text);

        assert_eq!(
            sections.get(&SectionId::Summary).map(String::as_str),
            Some("Good quarter.\nMore detail.")
        );
        assert_eq!(
            sections.get(&SectionId::KeyEvents).map(String::as_str),
            Some("- beat estimates")
        );
    }

    #[test]
    fn test_out_of_order_sections() {
        let text = "Next Steps:\n- quiz me\nSummary:\nIt rallied.";
        let sections = split_into_sections(text);

        assert_eq!(
            sections.get(&SectionId::NextSteps).map(String::as_str),
            Some("- quiz me")
        );
        assert_eq!(
            sections.get(&SectionId::Summary).map(String::as_str),
            Some("It rallied.")
        );
    }

    #[test]
    fn test_duplicate_heading_later_wins() {
        let text = "Summary:\nfirst version\nSummary:\nsecond version";
        let sections = split_into_sections(text);
        assert_eq!(
            sections.get(&SectionId::Summary).map(String::as_str),
            Some("second version")
        );
    }

    #[test]
    fn test_adjacent_headings_yield_empty_section() {
        let sections = split_into_sections("Summary:\nKey Events:\n- earnings beat");

        assert_eq!(sections.get(&SectionId::Summary).map(String::as_str), Some(""));
        assert_eq!(
            sections.get(&SectionId::KeyEvents).map(String::as_str),
            Some("- earnings beat")
        );
    }

    #[test]
    fn test_no_headings_yields_empty_map() {
        let sections = split_into_sections("just an unstructured reply with no sections");
        assert!(sections.is_empty());
    }

    #[test]
    fn test_merged_ordering_across_matchers() {
        let text = "Price Behavior: up\nSummary: fine\nKey Events:\n- one";
        let headings = find_headings(text);

        let ids: Vec<SectionId> = headings.iter().map(|h| h.id).collect();
        assert_eq!(
            ids,
            vec![
                SectionId::PriceBehavior,
                SectionId::Summary,
                SectionId::KeyEvents
            ]
        );
    }

    #[test]
    fn test_last_heading_owns_rest_of_text() {
        let text = "Comprehension Check:\nWhich event mattered most?\nAnything else?";
        let sections = split_into_sections(text);
        assert_eq!(
            sections
                .get(&SectionId::ComprehensionCheck)
                .map(String::as_str),
            Some("Which event mattered most?\nAnything else?")
        );
    }
}
