// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Market data providers
//!
//! External collaborators supplying news, price, and moat text for a
//! ticker. All providers return human-readable text with no guaranteed
//! field presence or numeric precision. The mock implementation returns
//! canned data until real feeds are wired in.

/// Source of market data attached to analysis requests
pub trait MarketData: Send + Sync {
    /// News articles for a ticker within a date range
    fn news(&self, ticker: &str, start_date: &str, end_date: &str) -> String;

    /// Price summary for a ticker within a date range
    fn price_summary(&self, ticker: &str, start_date: &str, end_date: &str) -> String;

    /// Competitive advantages (moat characteristics) of a company
    fn moat_characteristics(&self, ticker: &str) -> String;
}

/// Canned market data for development and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct MockMarketData;

impl MockMarketData {
    pub fn new() -> Self {
        Self
    }
}

const MOAT_PROFILES: [(&str, &str); 5] = [
    (
        "AAPL",
        "Strong: Network Effects (ecosystem), Intangible Assets (brand), Switching Costs (ecosystem lock-in)",
    ),
    (
        "MSFT",
        "Strong: Network Effects (enterprise adoption), Intangible Assets (brand, IP), Switching Costs (enterprise integration)",
    ),
    (
        "GOOGL",
        "Strong: Network Effects (search/ads), Intangible Assets (data, brand), Cost Advantages (scale)",
    ),
    (
        "AMZN",
        "Strong: Network Effects (marketplace), Cost Advantages (logistics scale), Efficient Scale (AWS)",
    ),
    (
        "META",
        "Strong: Network Effects (social platforms), Intangible Assets (user data), Switching Costs (social graph)",
    ),
];

const FALLBACK_MOAT_PROFILE: &str =
    "Moderate: Intangible Assets (brand), Cost Advantages (operational efficiency)";

impl MarketData for MockMarketData {
    fn news(&self, ticker: &str, start_date: &str, end_date: &str) -> String {
        format!(
            "News for {ticker} from {start_date} to {end_date}:\n\
             \n\
             1. [2023-01-15] {ticker} announces strong quarterly earnings, beating analyst expectations\n\
             2. [2023-01-20] CEO discusses expansion plans in earnings call\n\
             3. [2023-01-25] New product launch receives positive reviews from industry analysts\n\
             4. [2023-02-01] Regulatory concerns emerge regarding data privacy practices\n\
             5. [2023-02-10] Company announces strategic partnership with major industry player\n"
        )
    }

    fn price_summary(&self, ticker: &str, start_date: &str, end_date: &str) -> String {
        format!(
            "Price data for {ticker} from {start_date} to {end_date}:\n\
             \n\
             Opening Price: $150.25\n\
             Closing Price: $162.80\n\
             Period Return: +8.35%\n\
             High: $165.40 (on 2023-01-28)\n\
             Low: $148.90 (on 2023-02-05)\n\
             Average Daily Volume: 45.2M shares\n\
             Volatility: 18.5% (annualized)\n\
             \n\
             Notable movements:\n\
             - Sharp rally (+6.2%) following earnings announcement\n\
             - Pullback (-4.1%) during regulatory concerns\n\
             - Recovery (+3.8%) after partnership announcement\n"
        )
    }

    fn moat_characteristics(&self, ticker: &str) -> String {
        let ticker = ticker.to_uppercase();
        MOAT_PROFILES
            .iter()
            .find(|(symbol, _)| *symbol == ticker)
            .map(|(_, profile)| profile.to_string())
            .unwrap_or_else(|| FALLBACK_MOAT_PROFILE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_mentions_ticker_and_range() {
        let data = MockMarketData::new();
        let news = data.news("AAPL", "2023-01-01", "2023-02-28");

        assert!(news.contains("News for AAPL from 2023-01-01 to 2023-02-28"));
        assert!(news.contains("quarterly earnings"));
    }

    #[test]
    fn test_price_summary_has_return_and_volatility() {
        let data = MockMarketData::new();
        let prices = data.price_summary("MSFT", "2023-01-01", "2023-02-28");

        assert!(prices.contains("Period Return: +8.35%"));
        assert!(prices.contains("Volatility"));
    }

    #[test]
    fn test_moat_profile_known_ticker() {
        let data = MockMarketData::new();
        assert!(data.moat_characteristics("AAPL").contains("ecosystem lock-in"));
        assert!(data.moat_characteristics("amzn").contains("Efficient Scale (AWS)"));
    }

    #[test]
    fn test_moat_profile_unknown_ticker_falls_back() {
        let data = MockMarketData::new();
        assert_eq!(data.moat_characteristics("ZZZZ"), FALLBACK_MOAT_PROFILE);
    }
}
