//! The chat session: transcript, carried context, datasets, and the turn
//! driver that converts every failure into a user-visible message.

use log::{debug, warn};

use crate::context::{ConversationContext, Message, Source, Transcript};
use crate::error::{AssistantError, Result};
use crate::interpreter::{process_turn, TurnOutcome};
use crate::llm::client::{CompletionClient, WireMessage};
use crate::llm::prompts::{DATA_LOADING, GREETING, PREDEFINED_QUESTIONS, SYSTEM_PROMPT};
use crate::schema::DatasetKind;
use crate::store::DataStore;
use crate::table::Table;

/// One user's chat session.
///
/// Turns are serialized by `&mut self`: a second turn cannot start while one
/// is in flight, and dropping an in-flight `send` future abandons its
/// request without touching the transcript or the context, which are only
/// written after the turn completes.
pub struct ChatSession {
    store: Option<DataStore>,
    client: CompletionClient,
    context: ConversationContext,
    transcript: Transcript,
}

impl ChatSession {
    /// Starts with the greeting and no datasets; turns answer with a
    /// loading notice until a store is attached.
    pub fn new(client: CompletionClient) -> Self {
        let mut transcript = Transcript::default();
        transcript.push(Message::assistant(GREETING, Source::External));
        Self {
            store: None,
            client,
            context: ConversationContext::default(),
            transcript,
        }
    }

    pub fn with_store(client: CompletionClient, store: DataStore) -> Self {
        let mut session = Self::new(client);
        session.attach_store(store);
        session
    }

    pub fn attach_store(&mut self, store: DataStore) {
        self.store = Some(store);
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_some()
    }

    pub fn transcript(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn context(&self) -> ConversationContext {
        self.context
    }

    pub fn predefined_questions() -> &'static [&'static str] {
        PREDEFINED_QUESTIONS
    }

    /// Process one chat turn. Blank input is ignored; every failure becomes
    /// an assistant message, so the session itself never dies on a turn.
    pub async fn send(&mut self, text: &str) -> Option<&Message> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.transcript.push(Message::user(text));

        let turn = self
            .require_store()
            .map(|store| process_turn(store, &self.context, text));
        let (outcome, next_context) = match turn {
            Ok(turn) => turn,
            Err(error) => {
                debug!("turn rejected: {error}");
                self.transcript
                    .push(Message::assistant(DATA_LOADING, Source::External));
                return self.transcript.last();
            }
        };
        let reply = match outcome {
            TurnOutcome::Answer { text } => Message::assistant(text, Source::Csv),
            TurnOutcome::Clarify { prompt, .. } => Message::assistant(prompt, Source::Csv),
            TurnOutcome::Defer => {
                let reply_text = match self.forward_to_model().await {
                    Ok(reply_text) => reply_text,
                    Err(error) => {
                        warn!("completion call failed: {error}");
                        apology_for(&error)
                    }
                };
                Message::assistant(reply_text, Source::External)
            }
        };

        // transcript and context commit together, once the turn is done
        self.context = next_context;
        self.transcript.push(reply);
        self.transcript.last()
    }

    fn require_store(&self) -> Result<&DataStore> {
        self.store.as_ref().ok_or(AssistantError::DataNotReady)
    }

    async fn forward_to_model(&self) -> Result<String> {
        let mut history = vec![WireMessage::system(SYSTEM_PROMPT)];
        history.extend(
            self.transcript
                .messages()
                .iter()
                .filter(|message| !message.text.trim().is_empty())
                .map(WireMessage::from),
        );
        self.client.chat(&history).await
    }
}

impl DataStore {
    /// Fetch the four dataset files as static text from `base_url`.
    pub async fn fetch(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::new();
        let base = base_url.trim_end_matches('/');
        Ok(Self::from_tables(
            fetch_table(&client, base, DatasetKind::Forecast).await?,
            fetch_table(&client, base, DatasetKind::Valuation).await?,
            fetch_table(&client, base, DatasetKind::Ratio).await?,
            fetch_table(&client, base, DatasetKind::Environmental).await?,
        ))
    }
}

async fn fetch_table(client: &reqwest::Client, base: &str, kind: DatasetKind) -> Result<Table> {
    let url = format!("{base}/{}", kind.file_name());
    debug!("fetching {url}");
    let text = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Table::from_csv_str(&text)
}

/// The user-facing message for a failed model call.
fn apology_for(error: &AssistantError) -> String {
    match error {
        AssistantError::MalformedResponse(_) => {
            "Sorry, I could not get a response (invalid API response).".to_string()
        }
        AssistantError::ExternalService(detail) => {
            format!("Sorry, I could not get a response. (API error: {detail})")
        }
        _ => "Sorry, I could not connect to the AI assistant at the moment. Please check your \
              internet connection or try again in a few seconds."
            .to_string(),
    }
}
