//! Per-session conversational state: the carried bank/date/pending record
//! and the append-only message log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::banks::Bank;

/// The entity a clarification round-trip is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pending {
    Decision,
    StockPrice,
}

/// What the interpreter carries between turns.
///
/// Threaded through `process_turn` as a value: each turn consumes the prior
/// context and produces the next. A field changes only when the current turn
/// supplies a new value for it; otherwise it persists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub last_bank: Option<Bank>,
    pub last_date: Option<NaiveDate>,
    pub pending: Option<Pending>,
}

impl ConversationContext {
    /// Entities for this turn: what the turn supplied, falling back to what
    /// the context carries.
    pub fn carrying(
        &self,
        bank: Option<Bank>,
        date: Option<NaiveDate>,
    ) -> (Option<Bank>, Option<NaiveDate>) {
        (bank.or(self.last_bank), date.or(self.last_date))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Where an assistant message came from: resolved from the local datasets,
/// or relayed from the external model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Csv,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub source: Source,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            source: Source::External,
        }
    }

    pub fn assistant(text: impl Into<String>, source: Source) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            source,
        }
    }
}

/// Append-only message log for one chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
