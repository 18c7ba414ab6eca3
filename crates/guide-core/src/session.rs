//! Chat Session
//!
//! The turn-taking state machine behind the chat widget. A turn is split in
//! two so a UI never holds the session across an `.await`:
//!
//! 1. [`ChatSession::begin_send`] appends the user message, clears the input,
//!    raises the awaiting flag and hands back a [`PendingTurn`].
//! 2. [`ChatSession::settle`] applies the backend outcome for that turn.
//!
//! [`ChatSession::send`] drives both halves against a [`ChatBackend`] for
//! callers that can hold `&mut self` across the request.
//!
//! Every transcript mutation is written through to [`Storage`]. Request and
//! storage failures never escape: the former become an error-marked bot
//! message, the latter are logged.

use tracing::{debug, info, warn};

use crate::backend::ChatBackend;
use crate::config::GuideConfig;
use crate::confirm::Confirm;
use crate::error::Result;
use crate::message::{Message, Transcript};
use crate::storage::Storage;

/// Ticket for the single in-flight request
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "a pending turn keeps the session awaiting until it is settled"]
pub struct PendingTurn {
    text: String,
    epoch: u64,
}

impl PendingTurn {
    /// Text to send to the backend
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// What a send attempt did to the transcript
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty input or a request already in flight; nothing changed
    Skipped,
    /// Bot reply appended
    Replied,
    /// Error-marked apology appended
    Failed,
    /// History was cleared while the request was in flight; reply dropped
    Discarded,
}

/// Transcript, input text and awaiting flag of one chat widget
#[derive(Debug)]
pub struct ChatSession<S: Storage> {
    transcript: Transcript,
    input: String,
    awaiting: bool,

    /// Bumped on clear so replies to pre-clear requests are dropped
    epoch: u64,

    storage: S,
    storage_key: String,
    apology: String,
    clear_prompt: String,
}

impl<S: Storage> ChatSession<S> {
    /// Create a session, restoring any transcript persisted under the
    /// configured key
    pub fn restore(storage: S, config: &GuideConfig) -> Self {
        let transcript = match storage.get(&config.storage_key) {
            Ok(Some(json)) => match Transcript::from_json(&json) {
                Ok(transcript) => {
                    info!(messages = transcript.len(), "Restored chat history");
                    transcript
                }
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable chat history");
                    Transcript::new()
                }
            },
            Ok(None) => Transcript::new(),
            Err(e) => {
                warn!(error = %e, "Could not read chat history");
                Transcript::new()
            }
        };

        Self {
            transcript,
            input: String::new(),
            awaiting: false,
            epoch: 0,
            storage,
            storage_key: config.storage_key.clone(),
            apology: config.apology.clone(),
            clear_prompt: config.clear_prompt.clone(),
        }
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current input text
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a request is in flight
    pub const fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Whether submitting the current input would start a turn
    pub fn can_send(&self) -> bool {
        !self.awaiting && !self.input.trim().is_empty()
    }

    /// Start a turn with the current input text
    pub fn submit(&mut self) -> Option<PendingTurn> {
        let text = self.input.clone();
        self.begin_send(&text)
    }

    /// Start a turn with `text`
    ///
    /// Returns `None` (and changes nothing) when `text` is blank or a request
    /// is already in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingTurn> {
        if self.awaiting || text.trim().is_empty() {
            return None;
        }

        self.transcript.push(Message::user(text));
        self.input.clear();
        self.awaiting = true;
        self.persist();

        debug!(chars = text.len(), "Chat turn started");
        Some(PendingTurn {
            text: text.to_owned(),
            epoch: self.epoch,
        })
    }

    /// Apply the backend outcome for `turn`
    pub fn settle(&mut self, turn: PendingTurn, outcome: Result<String>) -> SendOutcome {
        self.awaiting = false;

        if turn.epoch != self.epoch {
            debug!("Dropping reply to a request issued before history was cleared");
            return SendOutcome::Discarded;
        }

        let result = match outcome {
            Ok(reply) => {
                debug!(chars = reply.len(), "Chat turn settled");
                self.transcript.push(Message::bot(reply));
                SendOutcome::Replied
            }
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                self.transcript.push(Message::bot_error(self.apology.clone()));
                SendOutcome::Failed
            }
        };
        self.persist();
        result
    }

    /// Run a whole turn against `backend`
    pub async fn send<B>(&mut self, backend: &B, text: &str) -> SendOutcome
    where
        B: ChatBackend + ?Sized,
    {
        let Some(turn) = self.begin_send(text) else {
            return SendOutcome::Skipped;
        };
        let outcome = backend.send(turn.text()).await;
        self.settle(turn, outcome)
    }

    /// Empty the transcript and remove it from storage, if the user confirms
    ///
    /// Returns whether anything was cleared.
    pub fn clear_history<C>(&mut self, confirm: &C) -> bool
    where
        C: Confirm + ?Sized,
    {
        if !confirm.confirm(&self.clear_prompt) {
            return false;
        }

        self.transcript.clear();
        self.epoch += 1;
        if let Err(e) = self.storage.remove(&self.storage_key) {
            warn!(error = %e, "Could not remove chat history");
        }

        info!("Chat history cleared");
        true
    }

    fn persist(&self) {
        let written = self
            .transcript
            .to_json()
            .and_then(|json| self.storage.set(&self.storage_key, &json));

        if let Err(e) = written {
            warn!(error = %e, "Could not persist chat history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use async_trait::async_trait;

    use crate::config::DEFAULT_APOLOGY;
    use crate::error::GuideError;
    use crate::storage::MemoryStorage;

    const KEY: &str = "chatHistory";
    const GREETING: &str = "¡Hola! ¿En qué puedo ayudarte?";

    enum Script {
        Reply(&'static str),
        NetworkDown,
        ServerError,
        Malformed,
    }

    struct ScriptedBackend {
        script: Script,
        calls: Cell<usize>,
    }

    impl ScriptedBackend {
        fn new(script: Script) -> Self {
            Self {
                script,
                calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl ChatBackend for ScriptedBackend {
        async fn send(&self, _message: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            match self.script {
                Script::Reply(text) => Ok(text.into()),
                Script::NetworkDown => Err(GuideError::Network("connection refused".into())),
                Script::ServerError => Err(GuideError::Status(500)),
                Script::Malformed => Err(GuideError::MalformedResponse(
                    "missing field `response`".into(),
                )),
            }
        }
    }

    fn session(storage: &MemoryStorage) -> ChatSession<MemoryStorage> {
        ChatSession::restore(storage.clone(), &GuideConfig::default())
    }

    fn summary(session: &ChatSession<MemoryStorage>) -> Vec<(bool, bool, String)> {
        session
            .messages()
            .iter()
            .map(|m| (m.is_user, m.error, m.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_successful_turn() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);
        let backend = ScriptedBackend::new(Script::Reply(GREETING));

        let outcome = session.send(&backend, "Hola").await;

        assert_eq!(outcome, SendOutcome::Replied);
        assert_eq!(
            summary(&session),
            vec![
                (true, false, "Hola".to_owned()),
                (false, false, GREETING.to_owned()),
            ]
        );
        assert!(!session.is_awaiting());
        assert_eq!(backend.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_becomes_apology() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);
        let backend = ScriptedBackend::new(Script::NetworkDown);

        let outcome = session.send(&backend, "Hola").await;

        assert_eq!(outcome, SendOutcome::Failed);
        assert_eq!(
            summary(&session),
            vec![
                (true, false, "Hola".to_owned()),
                (false, true, DEFAULT_APOLOGY.to_owned()),
            ]
        );
        assert!(!session.is_awaiting());
    }

    #[tokio::test]
    async fn test_conversation_usable_after_failure() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);

        let outcome = session.send(&ScriptedBackend::new(Script::ServerError), "Hola").await;
        assert_eq!(outcome, SendOutcome::Failed);
        assert!(session.messages()[1].error);

        let outcome = session
            .send(&ScriptedBackend::new(Script::Reply("Claro")), "¿Y ahora?")
            .await;

        assert_eq!(outcome, SendOutcome::Replied);
        assert_eq!(session.messages().len(), 4);
        assert!(!session.messages()[3].error);
    }

    #[tokio::test]
    async fn test_every_failure_kind_becomes_apology() {
        for script in [Script::NetworkDown, Script::ServerError, Script::Malformed] {
            let storage = MemoryStorage::new();
            let mut session = session(&storage);
            let backend = ScriptedBackend::new(script);

            assert_eq!(session.send(&backend, "Hola").await, SendOutcome::Failed);
            assert_eq!(
                summary(&session),
                vec![
                    (true, false, "Hola".to_owned()),
                    (false, true, DEFAULT_APOLOGY.to_owned()),
                ]
            );
            assert!(!session.is_awaiting());
            assert_eq!(backend.calls.get(), 1);
        }
    }

    #[tokio::test]
    async fn test_failure_text_comes_from_config() {
        let config = GuideConfig {
            apology: "Servicio no disponible.".into(),
            ..GuideConfig::default()
        };
        let mut session = ChatSession::restore(MemoryStorage::new(), &config);

        session.send(&ScriptedBackend::new(Script::Malformed), "Hola").await;

        let reply = &session.messages()[1];
        assert!(reply.error);
        assert_eq!(reply.text, "Servicio no disponible.");
    }

    #[tokio::test]
    async fn test_blank_input_is_noop() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);
        let backend = ScriptedBackend::new(Script::Reply(GREETING));

        for text in ["", "   ", "\t\n"] {
            assert_eq!(session.send(&backend, text).await, SendOutcome::Skipped);
        }

        assert!(session.messages().is_empty());
        assert_eq!(backend.calls.get(), 0);
        assert!(!storage.contains(KEY));
    }

    #[test]
    fn test_single_request_in_flight() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);

        let turn = session.begin_send("Hola").unwrap();
        assert!(session.is_awaiting());
        assert_eq!(turn.text(), "Hola");

        assert!(session.begin_send("¿Hola?").is_none());
        assert_eq!(session.messages().len(), 1);

        assert_eq!(session.settle(turn, Ok(GREETING.into())), SendOutcome::Replied);
        assert!(!session.is_awaiting());
    }

    #[test]
    fn test_submit_uses_and_clears_input() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);

        assert!(!session.can_send());
        session.set_input("  ");
        assert!(!session.can_send());
        assert!(session.submit().is_none());

        session.set_input(" Hola ");
        assert!(session.can_send());
        let turn = session.submit().unwrap();

        assert_eq!(turn.text(), " Hola ");
        assert_eq!(session.input(), "");
        assert!(!session.can_send());
    }

    #[test]
    fn test_message_count_tracks_every_transcript_change() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);

        session.set_input("Hola");
        assert_eq!(session.messages().len(), 0);

        let turn = session.submit().unwrap();
        assert_eq!(session.messages().len(), 1);
        session.set_input("otra pregunta");
        assert_eq!(session.messages().len(), 1);

        session.settle(turn, Ok(GREETING.into()));
        assert_eq!(session.messages().len(), 2);

        assert!(session.clear_history(&true));
        assert_eq!(session.messages().len(), 0);
    }

    #[tokio::test]
    async fn test_history_round_trips_through_storage() {
        let storage = MemoryStorage::new();
        let mut first = session(&storage);
        first.send(&ScriptedBackend::new(Script::Reply(GREETING)), "Hola").await;
        first.send(&ScriptedBackend::new(Script::NetworkDown), "¿El Yunque?").await;

        let restored = session(&storage);

        assert_eq!(restored.messages().len(), 4);
        assert_eq!(summary(&restored), summary(&first));
        assert_eq!(restored.transcript(), first.transcript());
    }

    #[test]
    fn test_user_message_persisted_before_reply() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);

        let _turn = session.begin_send("Hola").unwrap();

        let json = storage.get(KEY).unwrap().unwrap();
        assert_eq!(Transcript::from_json(&json).unwrap().len(), 1);
    }

    fn three_messages(storage: &MemoryStorage) -> ChatSession<MemoryStorage> {
        let transcript: Transcript = vec![
            Message::user("Hola"),
            Message::bot(GREETING),
            Message::user("¿Dónde está El Morro?"),
        ]
        .into();
        storage.set(KEY, &transcript.to_json().unwrap()).unwrap();
        session(storage)
    }

    #[test]
    fn test_clear_history_confirmed() {
        let storage = MemoryStorage::new();
        let mut session = three_messages(&storage);
        assert_eq!(session.messages().len(), 3);

        assert!(session.clear_history(&true));

        assert!(session.messages().is_empty());
        assert!(!storage.contains(KEY));
    }

    #[test]
    fn test_clear_history_declined() {
        let storage = MemoryStorage::new();
        let mut session = three_messages(&storage);
        let before = storage.get(KEY).unwrap();

        let prompt = Cell::new(false);
        let declined = session.clear_history(&|text: &str| {
            prompt.set(text == crate::config::DEFAULT_CLEAR_PROMPT);
            false
        });

        assert!(!declined);
        assert!(prompt.get());
        assert_eq!(session.messages().len(), 3);
        assert_eq!(storage.get(KEY).unwrap(), before);
    }

    #[test]
    fn test_reply_after_clear_is_discarded() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);

        let turn = session.begin_send("Hola").unwrap();
        assert!(session.clear_history(&true));
        // Still single-flight until the old request settles
        assert!(session.is_awaiting());

        let outcome = session.settle(turn, Ok(GREETING.into()));

        assert_eq!(outcome, SendOutcome::Discarded);
        assert!(!session.is_awaiting());
        assert!(session.messages().is_empty());
        assert!(!storage.contains(KEY));
    }

    #[test]
    fn test_unreadable_history_starts_empty() {
        let storage = MemoryStorage::with_entry(KEY, "{not json");
        let session = session(&storage);

        assert!(session.messages().is_empty());
        assert!(storage.contains(KEY));
    }
}
