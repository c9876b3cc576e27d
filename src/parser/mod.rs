// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Structured response parser
//!
//! Turns a complete tutoring response into a best-effort structured record.
//! Responses loosely follow nine named sections (Summary, Key Events,
//! Price Behavior, MOAT Analysis, Plain-Language Explanation, Concept
//! Definitions, Learning Options, Comprehension Check, Next Steps); the
//! parser degrades gracefully when the generator strays from that shape.
//! Parsing never fails: a missing section yields an empty value, and the
//! verbatim input is always carried in `raw_response`.

mod extract;
mod sections;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use extract::MOAT_CHARACTERISTICS;
pub use sections::SectionId;

use sections::split_into_sections;

/// MOAT characteristics analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoatAnalysis {
    /// Characteristics that were strengthened over the period
    #[serde(default)]
    pub strengthened: Vec<String>,

    /// Characteristics that were weakened
    #[serde(default)]
    pub weakened: Vec<String>,

    /// Characteristics relevant without a clear direction
    #[serde(default)]
    pub relevant: Vec<String>,

    /// Full section text
    pub explanation: Option<String>,
}

/// A learning path option offered to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningOption {
    /// Identifier derived from the label (lowercased, hyphenated)
    pub id: String,

    /// Display label
    pub label: String,

    /// What this option provides
    pub description: String,
}

/// Structured record extracted from a tutoring response
///
/// Every field is best-effort except `raw_response`, which always holds
/// the exact input text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedAnalysis {
    /// Stock ticker symbol
    pub ticker: Option<String>,

    /// Analysis start date (YYYY-MM-DD)
    pub start_date: Option<String>,

    /// Analysis end date (YYYY-MM-DD)
    pub end_date: Option<String>,

    /// Short overview of what happened
    pub summary: Option<String>,

    /// Major news or developments during the period
    #[serde(default)]
    pub key_events: Vec<String>,

    /// How the stock moved
    pub price_behavior: Option<String>,

    /// MOAT characteristics analysis
    pub moat_analysis: Option<MoatAnalysis>,

    /// Plain-language explanation
    pub plain_explanation: Option<String>,

    /// Financial concepts with their definitions
    #[serde(default)]
    pub concept_definitions: BTreeMap<String, String>,

    /// Available learning paths
    #[serde(default)]
    pub learning_options: Vec<LearningOption>,

    /// Questions to verify understanding
    #[serde(default)]
    pub comprehension_questions: Vec<String>,

    /// Suggested next actions
    #[serde(default)]
    pub next_steps: Vec<String>,

    /// Full unstructured response, verbatim
    pub raw_response: String,
}

impl ParsedAnalysis {
    /// Whether any structured signal was extracted beyond the raw text
    pub fn has_content(&self) -> bool {
        self.ticker.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.summary.is_some()
            || !self.key_events.is_empty()
            || self.price_behavior.is_some()
            || self.moat_analysis.is_some()
            || self.plain_explanation.is_some()
            || !self.concept_definitions.is_empty()
            || !self.learning_options.is_empty()
            || !self.comprehension_questions.is_empty()
            || !self.next_steps.is_empty()
    }
}

/// Parse a response with no caller-supplied metadata
pub fn parse(response_text: &str) -> ParsedAnalysis {
    parse_with_hints(response_text, None, None, None)
}

/// Parse a response, with caller-supplied ticker and dates suppressing the
/// corresponding backfill scans
pub fn parse_with_hints(
    response_text: &str,
    ticker: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> ParsedAnalysis {
    let sections = split_into_sections(response_text);
    let section = |id: SectionId| sections.get(&id).map(String::as_str).unwrap_or("");

    let ticker = ticker
        .map(str::to_string)
        .or_else(|| extract::extract_ticker(response_text));

    let (start_date, end_date) = match (start_date, end_date) {
        (Some(start), Some(end)) => (Some(start.to_string()), Some(end.to_string())),
        (start, end) => {
            let (found_start, found_end) = extract::extract_dates(response_text);
            (
                start.map(str::to_string).or(found_start),
                end.map(str::to_string).or(found_end),
            )
        }
    };

    ParsedAnalysis {
        ticker,
        start_date,
        end_date,
        summary: extract::extract_summary(section(SectionId::Summary)),
        key_events: extract::extract_key_events(section(SectionId::KeyEvents)),
        price_behavior: extract::collapse_whitespace(section(SectionId::PriceBehavior)),
        moat_analysis: extract::parse_moat_analysis(section(SectionId::MoatAnalysis)),
        plain_explanation: extract::collapse_whitespace(section(SectionId::PlainExplanation)),
        concept_definitions: extract::parse_concept_definitions(section(
            SectionId::ConceptDefinitions,
        )),
        learning_options: extract::parse_learning_options(section(SectionId::LearningOptions)),
        comprehension_questions: extract::extract_comprehension_questions(section(
            SectionId::ComprehensionCheck,
        )),
        next_steps: extract::extract_next_steps(section(SectionId::NextSteps)),
        raw_response: response_text.to_string(),
    }
}
