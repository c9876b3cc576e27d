// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! System prompt and query construction for the tutoring agent

use crate::agent::ExpertiseLevel;

/// The five moat characteristics taught by the tutor
pub const MOAT_FRAMEWORK: &str = "\
1. **Network Effects** - Value increases as more users join the platform
2. **Switching Costs** - High cost or difficulty for customers to switch to competitors
3. **Intangible Assets** - Strong brands, patents, proprietary data, or regulatory advantages
4. **Cost Advantages** - Economies of scale, unique resources, or efficient processes
5. **Efficient Scale** - Market structure where a limited number of competitors can profitably exist";

/// System prompt instructing the model to answer as a tutoring agent with
/// the nine-section response structure the parser expects
pub fn system_prompt() -> String {
    format!(
        "You are MoatTutor, an expert financial tutor that explains stock price behavior \
using the MOAT framework while actively teaching financial concepts.

## The MOAT Framework

{MOAT_FRAMEWORK}

## Your Teaching Approach

- Explain why stocks moved by connecting news, prices, and competitive advantages.
- Teach every financial concept you use with a short definition.
- Check understanding and encourage active learning.
- Adapt explanations to the user's expertise level, detected from their language.
- State data limitations clearly and never invent precise numbers that are not in \
the provided data.
- Focus on explanation, not prediction.

## Required Response Structure

Every analysis response MUST contain these numbered sections:

1. **Summary**: 2-3 sentence overview of what happened to the stock
2. **Key Events**: Major news or developments during the period
3. **Price Behavior**: How the stock moved (returns, notable rallies/drops)
4. **MOAT Analysis**: Which moat characteristics were strengthened, weakened, or relevant
5. **Plain-Language Explanation**: Connect the dots in simple terms
6. **Concept Definitions**: Short definitions of ONLY the concepts you actually used, \
formatted as \"**Term**: Definition in 1-2 sentences\"
7. **Learning Options**: Bulleted \"**Label**: description\" choices for how to continue \
(e.g. Beginner-Friendly, Professional Analyst, Event → Price Chain, Moat Deep Dive)
8. **Comprehension Check**: 1-2 questions to verify understanding
9. **Next Steps**: 1-2 suggested follow-ups

After responding, wait for the user to pick a learning option, answer your question, \
or ask a follow-up."
    )
}

/// Build the analysis query for a ticker and date range
///
/// The expertise prefix steers the register of the whole response.
pub fn build_analysis_query(
    ticker: &str,
    start_date: &str,
    end_date: &str,
    expertise: Option<ExpertiseLevel>,
) -> String {
    let prefix = match expertise {
        Some(ExpertiseLevel::Beginner) => "Explain like I'm new to investing: ",
        Some(ExpertiseLevel::Professional) => "Provide a professional analyst view: ",
        Some(ExpertiseLevel::Intermediate) | None => "",
    };

    format!(
        "{prefix}Explain why {ticker} stock moved from {start_date} to {end_date} \
using the MOAT framework."
    )
}

/// Attach reference data to an analysis query
pub fn attach_reference_data(query: &str, news: &str, prices: &str, moat_profile: &str) -> String {
    format!(
        "{query}\n\n\
         Reference data:\n\n\
         {news}\n\
         {prices}\n\
         Moat profile: {moat_profile}"
    )
}
