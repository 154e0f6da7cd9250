//! # Bank Data Assistant
//!
//! The data and conversation layer of an investment dashboard for Sri
//! Lankan banks: parses the dashboard's CSV datasets, resolves per-bank
//! data blocks out of them, interprets chat turns, and defers open-ended
//! questions to a hosted chat-completion service.
//!
//! ## Core Concepts
//!
//! - **Table**: a raw tabular dataset, rows of string cells, immutable once
//!   parsed. Row lengths may be uneven; missing cells read as empty.
//! - **Entity Block**: the contiguous rows belonging to one bank inside a
//!   table, located by heuristic header matching rather than fixed schema.
//! - **Conversation Context**: the bank, date, and pending clarification
//!   carried from turn to turn as an explicit value.
//! - **Turn Outcome**: each turn ends in a direct dataset answer, a
//!   clarification question, or a deferral to the external model.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bank_data_assistant::*;
//! use std::path::Path;
//!
//! let store = DataStore::load_from_dir(Path::new("public"))?;
//! let ctx = ConversationContext::default();
//!
//! let (outcome, ctx) = process_turn(&store, &ctx, "Should I buy HNB now?");
//! match outcome {
//!     TurnOutcome::Answer { text } => println!("{text}"),
//!     TurnOutcome::Clarify { prompt, .. } => println!("{prompt}"),
//!     TurnOutcome::Defer => println!("(handing this one to the model)"),
//! }
//! ```
//!
//! With the `groq` feature enabled, [`llm::ChatSession`] drives the full
//! loop including the completion-endpoint fallback.

pub mod banks;
pub mod context;
pub mod dates;
pub mod error;
pub mod intent;
pub mod interpreter;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod table;

#[cfg(feature = "groq")]
pub mod llm;

pub use banks::Bank;
pub use context::{ConversationContext, Message, Pending, Role, Source, Transcript};
pub use error::{AssistantError, Result};
pub use intent::Intent;
pub use interpreter::{process_turn, Missing, TurnOutcome};
pub use resolver::{find_entity_block, EntityBlock, PeriodLabel, ResolvedValue};
pub use schema::{DatasetKind, ForecastColumns, ForecastSchema, IndicatorCode};
pub use store::{DataStore, ValuationSummary};
pub use table::Table;

#[cfg(feature = "groq")]
pub use llm::{ChatSession, CompletionClient};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_extraction_end_to_end() {
        // a known alias plus a date in any supported format yields both
        for text in [
            "decision for HNB on 2025-06-27",
            "decision for hnb on 27/06/2025",
            "decision for HNB on 27 June 2025",
            "decision for HNB on June 27, 2025",
        ] {
            assert_eq!(Bank::find_in(text), Some(Bank::Hnb), "for {text:?}");
            assert_eq!(
                dates::extract_date(text),
                chrono::NaiveDate::from_ymd_opt(2025, 6, 27),
                "for {text:?}"
            );
        }
    }

    #[test]
    fn test_marker_and_header_adjacency() {
        let table = Table::from_csv_str("Pan Asia summary\nDate,Decision\n1/2/2025,Buy\n").unwrap();
        let block = find_entity_block(&table, "Pan Asia", PeriodLabel::Date).unwrap();
        assert_eq!(block.header_row(), block.marker_row() + 1);
    }
}
