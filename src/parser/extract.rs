// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Per-section extractors and metadata backfill
//!
//! Every extractor is independent and non-throwing: malformed input
//! degrades to an empty value, never an error.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::{LearningOption, MoatAnalysis};

/// Bulleted or numbered list item
static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*•]|\d+\.)\s+(.+)$").expect("bullet pattern must be valid"));

/// Bulleted item with optional surrounding quotes (next-steps suggestions
/// are often quoted phrases)
static QUOTED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:[-*•]|\d+\.)\s+["']?(.+?)["']?$"#).expect("quoted pattern must be valid")
});

/// Leading bullet marker
static LEADING_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*•]\s+").expect("leading bullet pattern must be valid"));

/// `**Term**: definition` pairs
static BOLD_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^*]+)\*\*[:\s]+([^\n]+)").expect("bold term pattern must be valid")
});

/// Strict learning-option line: bullet, emphasized label, colon, description
static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-*•]\s*\*\*([^*]+)\*\*[:\s]+(.+)$").expect("option pattern must be valid")
});

static STRENGTHENED_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)strengthen(?:ed)?[:\s]+([^\n]+)").expect("strengthen pattern must be valid")
});

static WEAKENED_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)weaken(?:ed)?[:\s]+([^\n]+)").expect("weaken pattern must be valid")
});

static RELEVANT_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)relevant[:\s]+([^\n]+)").expect("relevant pattern must be valid")
});

static DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("date pattern must be valid"));

/// Ticker heuristics, first match wins. The word-adjacency pattern can
/// false-positive on emphatic capitalization next to a trigger word; that
/// looseness is intentional and kept.
static TICKER_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\b([A-Z]{1,5})\b(?:\s+stock|\s+moved|\s+from)")
            .expect("ticker pattern must be valid"),
        Regex::new(r"ticker[:\s]+([A-Z]{1,5})\b").expect("ticker pattern must be valid"),
        Regex::new(r"\$([A-Z]{1,5})\b").expect("ticker pattern must be valid"),
    ]
});

/// The five canonical moat characteristics
pub const MOAT_CHARACTERISTICS: [&str; 5] = [
    "Network Effects",
    "Switching Costs",
    "Intangible Assets",
    "Cost Advantages",
    "Efficient Scale",
];

/// First up to three non-empty, non-heading lines, space-joined
pub(crate) fn extract_summary(content: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('#') {
            lines.push(line);
            if lines.len() >= 3 {
                break;
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

/// Loose list policy: bullet and ordinal markers are stripped when
/// present, but unmarked non-empty lines are kept too
pub(crate) fn extract_key_events(content: &str) -> Vec<String> {
    let mut events = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if let Some(caps) = BULLET_ITEM.captures(line) {
            events.push(caps[1].trim().to_string());
        } else if !line.is_empty() && !line.starts_with('#') {
            events.push(line.to_string());
        }
    }
    events
}

/// Same loose policy as key events, with surrounding quotes stripped off
/// bulleted items
pub(crate) fn extract_next_steps(content: &str) -> Vec<String> {
    let mut steps = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if let Some(caps) = QUOTED_ITEM.captures(line) {
            steps.push(caps[1].trim().to_string());
        } else if !line.is_empty() && !line.starts_with('#') {
            steps.push(line.to_string());
        }
    }
    steps
}

/// Collapse all internal whitespace to single spaces
pub(crate) fn collapse_whitespace(content: &str) -> Option<String> {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

fn comma_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).collect()
}

/// Parse the MOAT analysis section
///
/// Keyed `strengthened:`/`weakened:`/`relevant:` clauses each take the
/// rest of their line as a comma-separated list. When none of the three
/// keys appears, any canonical characteristic named in the section lands
/// in `relevant`. The explanation is always the full trimmed section.
pub(crate) fn parse_moat_analysis(content: &str) -> Option<MoatAnalysis> {
    if content.is_empty() {
        return None;
    }

    let mut strengthened = Vec::new();
    let mut weakened = Vec::new();
    let mut relevant = Vec::new();

    if let Some(caps) = STRENGTHENED_CLAUSE.captures(content) {
        strengthened = comma_list(&caps[1]);
    }
    if let Some(caps) = WEAKENED_CLAUSE.captures(content) {
        weakened = comma_list(&caps[1]);
    }
    if let Some(caps) = RELEVANT_CLAUSE.captures(content) {
        relevant = comma_list(&caps[1]);
    }

    if strengthened.is_empty() && weakened.is_empty() && relevant.is_empty() {
        let content_lower = content.to_lowercase();
        for characteristic in MOAT_CHARACTERISTICS {
            if content_lower.contains(&characteristic.to_lowercase()) {
                relevant.push(characteristic.to_string());
            }
        }
    }

    Some(MoatAnalysis {
        strengthened,
        weakened,
        relevant,
        explanation: Some(content.trim().to_string()),
    })
}

/// Parse concept definitions into a term → definition map
///
/// Primary rule matches `**Term**: definition` pairs; when it yields
/// nothing, every colon-containing line is split instead. Later duplicate
/// terms overwrite earlier entries.
pub(crate) fn parse_concept_definitions(content: &str) -> BTreeMap<String, String> {
    let mut definitions = BTreeMap::new();

    for caps in BOLD_TERM.captures_iter(content) {
        definitions.insert(caps[1].trim().to_string(), caps[2].trim().to_string());
    }

    if definitions.is_empty() {
        for line in content.lines() {
            if let Some((term, definition)) = line.split_once(':') {
                let term = term.trim_matches(['-', ' ', '*']).trim();
                let definition = definition.trim();
                if !term.is_empty() && !definition.is_empty() {
                    definitions.insert(term.to_string(), definition.to_string());
                }
            }
        }
    }

    definitions
}

/// Strict list policy: only `- **Label**: description` lines are
/// accepted; loosely shaped lines are discarded. Intentionally different
/// from the loose key-events policy.
pub(crate) fn parse_learning_options(content: &str) -> Vec<LearningOption> {
    let mut options = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if let Some(caps) = OPTION_LINE.captures(line) {
            let label = caps[1].trim().to_string();
            let description = caps[2].trim().to_string();
            let id = label.to_lowercase().replace(' ', "-").replace(':', "");
            options.push(LearningOption {
                id,
                label,
                description,
            });
        }
    }
    options
}

/// Any line ending in `?`, with a leading bullet marker stripped
pub(crate) fn extract_comprehension_questions(content: &str) -> Vec<String> {
    let mut questions = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.ends_with('?') {
            let question = LEADING_BULLET.replace(line, "");
            questions.push(question.trim().to_string());
        }
    }
    questions
}

/// Scan the entire response for a ticker symbol; first pattern wins
pub(crate) fn extract_ticker(text: &str) -> Option<String> {
    for pattern in TICKER_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Scan the entire response for ISO-8601 date tokens
///
/// The first two distinct tokens become (start, end); exactly one distinct
/// token fills both; none leaves both empty.
pub(crate) fn extract_dates(text: &str) -> (Option<String>, Option<String>) {
    let mut seen: Vec<String> = Vec::new();
    for found in DATE_TOKEN.find_iter(text) {
        let token = found.as_str().to_string();
        if !seen.contains(&token) {
            seen.push(token);
        }
        if seen.len() == 2 {
            break;
        }
    }

    match seen.len() {
        0 => (None, None),
        1 => (Some(seen[0].clone()), Some(seen[0].clone())),
        _ => (Some(seen[0].clone()), Some(seen[1].clone())),
    }
}
