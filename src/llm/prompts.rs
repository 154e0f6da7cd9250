//! Fixed prompt text shown to the model and to the user.

/// Prepended to every conversation forwarded to the completion endpoint.
pub const SYSTEM_PROMPT: &str = "You are a professional financial assistant specializing in Sri Lankan banks. Always provide clear, concise, and expert-level answers about bank performance, financial ratios, and economic indicators. Do not mention data sources, CSV files, or how you obtained the data. Focus on delivering actionable insights and professional analysis in your responses.";

/// Seed message of every new chat session.
pub const GREETING: &str = "Hi! I am your banking assistant. Ask me anything about Sri Lankan banks, their performance, or economic indicators.";

/// Shown when a turn arrives before the datasets finished loading.
pub const DATA_LOADING: &str = "Please wait, loading data...";

/// Canned questions offered to the user.
pub const PREDEFINED_QUESTIONS: &[&str] = &[
    "What is the latest stock price of HNB?",
    "Should I buy Commercial Bank stock this month?",
    "Show me the ROE of Sampath in 2024.",
    "What is the inflation rate in 2023-06?",
    "Rank the banks by ROE.",
    "What is the decision for NTB on 2/07/2025?",
];
