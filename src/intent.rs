use serde::{Deserialize, Serialize};

/// A chat turn's classified purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Buy/sell/hold lookup against the valuation table.
    Decision,
    /// Price lookup against the forecast table.
    StockPrice,
    /// No dataset rule applies; the turn goes to the model.
    Open,
}

/// Decision-intent markers, matched as case-insensitive substrings.
const DECISION_KEYWORDS: &[&str] = &[
    "should i buy",
    "should i sell",
    "should i hold",
    "can i buy",
    "decision",
    "buy",
    "sell",
    "hold",
];

const PRICE_KEYWORDS: &[&str] = &["stock price", "price"];

const RECENCY_KEYWORDS: &[&str] = &["this month", "now", "latest", "current"];

fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| lower.contains(keyword))
}

/// Classify one turn. Decision markers take precedence over price markers,
/// so "should I buy at this price" reads as a decision question.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();
    if contains_any(&lower, DECISION_KEYWORDS) {
        Intent::Decision
    } else if contains_any(&lower, PRICE_KEYWORDS) {
        Intent::StockPrice
    } else {
        Intent::Open
    }
}

/// Whether the turn asks for the most recent figure rather than a dated one.
pub fn wants_latest(text: &str) -> bool {
    contains_any(&text.to_lowercase(), RECENCY_KEYWORDS)
}
