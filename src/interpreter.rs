//! The per-turn state machine: classify the turn's intent, extract its
//! entities, resolve against the datasets, and land on one of three terminal
//! outcomes — a direct answer, a clarification question, or a deferral to
//! the external model.
//!
//! `process_turn` is a pure function over `(store, context, text)`: the
//! caller installs the returned context once the turn is committed, so a
//! failed or abandoned turn cannot corrupt the carried state.

use chrono::NaiveDate;
use log::debug;

use crate::banks::Bank;
use crate::context::{ConversationContext, Pending};
use crate::dates;
use crate::intent::{self, Intent};
use crate::resolver::ResolvedValue;
use crate::store::DataStore;

/// Which entity a clarification asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Bank,
    Date,
    BankAndDate,
}

/// Terminal outcome of one interpreted turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Direct answer resolved from the datasets.
    Answer { text: String },
    /// The turn lacked an entity; ask for it and remember what is pending.
    Clarify { missing: Missing, prompt: String },
    /// No dataset rule matched; forward the conversation to the model.
    Defer,
}

pub fn process_turn(
    store: &DataStore,
    ctx: &ConversationContext,
    text: &str,
) -> (TurnOutcome, ConversationContext) {
    let mut intent = intent::classify(text);
    if intent == Intent::Open {
        if let Some(pending) = ctx.pending {
            // a clarification round-trip: the reply usually carries only the
            // missing entity, so the previous turn's intent is reused
            intent = match pending {
                Pending::Decision => Intent::Decision,
                Pending::StockPrice => Intent::StockPrice,
            };
            debug!("no intent markers, resuming pending {pending:?}");
        }
    }

    let turn_bank = Bank::find_in(text);
    let turn_date = dates::extract_date(text);

    match intent {
        Intent::Decision => decision_turn(store, ctx, text, turn_bank, turn_date),
        Intent::StockPrice => price_turn(store, ctx, turn_bank, turn_date),
        Intent::Open => defer(ctx, turn_bank, turn_date),
    }
}

fn decision_turn(
    store: &DataStore,
    ctx: &ConversationContext,
    text: &str,
    turn_bank: Option<Bank>,
    turn_date: Option<NaiveDate>,
) -> (TurnOutcome, ConversationContext) {
    let (bank, date) = ctx.carrying(turn_bank, turn_date);
    let wants_latest = intent::wants_latest(text) || date.is_none();

    let Some(bank) = bank else {
        return (
            TurnOutcome::Clarify {
                missing: Missing::Bank,
                prompt: "Could you please specify which bank's decision you are interested in?"
                    .to_string(),
            },
            ConversationContext {
                last_bank: None,
                last_date: date,
                pending: Some(Pending::Decision),
            },
        );
    };

    let resolved = match date {
        Some(date) => match store.decision_on(bank, date) {
            Ok(value) => Ok(value),
            Err(_) if wants_latest => store.latest_decision(bank),
            Err(error) => Err(error),
        },
        None => store.latest_decision(bank),
    };

    match resolved {
        Ok(ResolvedValue { value, period }) => {
            let text = format!(
                "Based on the available data ({period}), the decision for {bank} is: {value}."
            );
            (
                TurnOutcome::Answer { text },
                ConversationContext {
                    last_bank: Some(bank),
                    last_date: dates::parse_flexible(&period).or(date),
                    pending: None,
                },
            )
        }
        Err(error) if date.is_none() => {
            debug!("decision lookup failed for {bank}: {error}");
            (
                TurnOutcome::Clarify {
                    missing: Missing::Date,
                    prompt: format!("Could you please specify the date for the decision of {bank}?"),
                },
                ConversationContext {
                    last_bank: Some(bank),
                    last_date: None,
                    pending: Some(Pending::Decision),
                },
            )
        }
        Err(error) => {
            // the dataset has no row for the requested date; hand the turn
            // to the model rather than answering wrongly
            debug!("decision lookup failed for {bank}: {error}");
            defer(ctx, turn_bank, turn_date)
        }
    }
}

fn price_turn(
    store: &DataStore,
    ctx: &ConversationContext,
    turn_bank: Option<Bank>,
    turn_date: Option<NaiveDate>,
) -> (TurnOutcome, ConversationContext) {
    let (bank, date) = ctx.carrying(turn_bank, turn_date);

    let (bank, date) = match (bank, date) {
        (None, None) => {
            return (
                TurnOutcome::Clarify {
                    missing: Missing::BankAndDate,
                    prompt: "Could you please specify both the bank and the date you are interested in?"
                        .to_string(),
                },
                ConversationContext {
                    last_bank: None,
                    last_date: None,
                    pending: Some(Pending::StockPrice),
                },
            );
        }
        (None, Some(date)) => {
            return (
                TurnOutcome::Clarify {
                    missing: Missing::Bank,
                    prompt: "Could you please specify which bank's stock price you are interested in?"
                        .to_string(),
                },
                ConversationContext {
                    last_bank: None,
                    last_date: Some(date),
                    pending: Some(Pending::StockPrice),
                },
            );
        }
        (Some(bank), None) => {
            return (
                TurnOutcome::Clarify {
                    missing: Missing::Date,
                    prompt: format!(
                        "Could you please specify the date for the stock price of {bank}?"
                    ),
                },
                ConversationContext {
                    last_bank: Some(bank),
                    last_date: None,
                    pending: Some(Pending::StockPrice),
                },
            );
        }
        (Some(bank), Some(date)) => (bank, date),
    };

    match store.price_on(bank, date) {
        Ok(ResolvedValue { value, period }) => {
            let text = format!(
                "Certainly! The closing stock price of {bank} on {period} was LKR {value}. \
                 If you need more details or want to compare with other banks, just ask!"
            );
            (
                TurnOutcome::Answer { text },
                ConversationContext {
                    last_bank: Some(bank),
                    last_date: Some(date),
                    pending: None,
                },
            )
        }
        Err(error) => {
            debug!("price lookup failed for {bank}: {error}");
            defer(ctx, turn_bank, turn_date)
        }
    }
}

fn defer(
    ctx: &ConversationContext,
    turn_bank: Option<Bank>,
    turn_date: Option<NaiveDate>,
) -> (TurnOutcome, ConversationContext) {
    let (last_bank, last_date) = ctx.carrying(turn_bank, turn_date);
    (
        TurnOutcome::Defer,
        ConversationContext {
            last_bank,
            last_date,
            pending: None,
        },
    )
}
