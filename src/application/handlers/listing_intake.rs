//! Listing intake: slot-filling a draft listing through conversation.
//!
//! Each turn appends the host's message, asks the extraction oracle for a
//! partial update, deep-merges it into the draft and replies with the next
//! question. A failed oracle call appends an apology and leaves the draft as
//! it was.

use std::sync::Arc;

use thiserror::Error;

use super::oracle_call::{apology, bounded};
use crate::application::SessionSettings;
use crate::domain::conversation::ConversationLog;
use crate::domain::draft::{listing_definition, DraftEntity, EntityDefinition, FieldPath, SchemaViolation};
use crate::domain::foundation::{DraftId, SessionId};
use crate::domain::orchestration::{TurnCycle, TurnError, TurnState};
use crate::ports::{DraftStore, DraftStoreError, ExtractionOracle, ExtractionRequest, OracleError};

/// Why a publish or save request was refused.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The draft is not complete; names the first missing field.
    #[error("Cannot publish yet: {missing} is missing")]
    PreconditionFailed { missing: FieldPath },

    #[error("A reply to the previous message is still pending")]
    NotIdle,

    #[error("Session is closed")]
    SessionClosed,

    #[error(transparent)]
    Store(#[from] DraftStoreError),
}

/// A turn whose oracle answer was merged.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTurn {
    /// The assistant turn appended to the log.
    pub reply: String,
    /// Leaves set or changed by this turn.
    pub changed: Vec<FieldPath>,
    /// Parts of the update that were ignored.
    pub violations: Vec<SchemaViolation>,
    pub next_missing: Option<FieldPath>,
}

impl MergedTurn {
    pub fn is_complete(&self) -> bool {
        self.next_missing.is_none()
    }
}

/// How a turn ended. Both variants leave the session idle.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Merged(MergedTurn),
    /// The oracle failed; the draft is unchanged.
    Failed { reply: String, error: OracleError },
}

impl TurnOutcome {
    /// The assistant turn appended to the log.
    pub fn reply(&self) -> &str {
        match self {
            Self::Merged(turn) => &turn.reply,
            Self::Failed { reply, .. } => reply,
        }
    }
}

/// One host's listing intake conversation.
///
/// Owns its log and draft exclusively. At most one oracle call is in flight
/// at a time; `send` refuses input until the previous turn has resolved.
pub struct ListingIntakeSession {
    id: SessionId,
    definition: &'static EntityDefinition,
    cycle: TurnCycle,
    draft: DraftEntity,
    saved_as: Option<DraftId>,
    oracle: Arc<dyn ExtractionOracle>,
    store: Arc<dyn DraftStore>,
    settings: SessionSettings,
}

impl ListingIntakeSession {
    /// Starts an empty listing draft.
    pub fn new(
        oracle: Arc<dyn ExtractionOracle>,
        store: Arc<dyn DraftStore>,
        settings: SessionSettings,
    ) -> Self {
        Self::for_definition(listing_definition(), oracle, store, settings)
    }

    /// Starts an empty draft of any entity kind.
    pub fn for_definition(
        definition: &'static EntityDefinition,
        oracle: Arc<dyn ExtractionOracle>,
        store: Arc<dyn DraftStore>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            id: SessionId::new(),
            definition,
            cycle: TurnCycle::new(settings.max_input_chars),
            draft: DraftEntity::new(),
            saved_as: None,
            oracle,
            store,
            settings,
        }
    }

    /// Continues a saved listing draft with a fresh conversation.
    ///
    /// Later saves update the same record.
    pub async fn resume(
        draft_id: DraftId,
        oracle: Arc<dyn ExtractionOracle>,
        store: Arc<dyn DraftStore>,
        settings: SessionSettings,
    ) -> Result<Self, DraftStoreError> {
        let mut session = Self::new(oracle, store, settings);
        session.draft = session.store.load(session.definition.kind(), draft_id).await?;
        session.saved_as = Some(draft_id);
        tracing::info!(session_id = %session.id, draft_id = %draft_id, "resumed draft");
        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn definition(&self) -> &'static EntityDefinition {
        self.definition
    }

    pub fn draft(&self) -> &DraftEntity {
        &self.draft
    }

    pub fn log(&self) -> &ConversationLog {
        self.cycle.log()
    }

    pub fn state(&self) -> TurnState {
        self.cycle.state()
    }

    /// Record id once the draft has been saved or published.
    pub fn saved_as(&self) -> Option<DraftId> {
        self.saved_as
    }

    pub fn is_complete(&self) -> bool {
        self.definition.evaluator().is_complete(&self.draft)
    }

    pub fn next_missing_field(&self) -> Option<&'static FieldPath> {
        self.definition.evaluator().next_missing_field(&self.draft)
    }

    /// Runs one turn.
    ///
    /// # Errors
    ///
    /// Returns `TurnError` without touching the log when the input is blank or
    /// too long, a turn is already in flight, or the session is closed. Oracle
    /// failures are not errors; they come back as [`TurnOutcome::Failed`].
    pub async fn send(&mut self, input: &str) -> Result<TurnOutcome, TurnError> {
        self.cycle.begin(input)?;

        let request = ExtractionRequest {
            session_id: self.id,
            log: self.cycle.log(),
            draft: &self.draft,
            definition: self.definition,
        };
        let result = bounded(self.settings.oracle_timeout, self.oracle.extract(request)).await;

        let outcome = match result {
            Ok(extraction) => {
                let merged = self
                    .definition
                    .merge_policy()
                    .apply(&self.draft, &extraction.partial_update);
                for violation in &merged.violations {
                    tracing::warn!(session_id = %self.id, %violation, "ignored part of oracle update");
                }
                self.draft = merged.draft;

                let next_missing = self.next_missing_field().cloned();
                let reply = self.reply_for(next_missing.as_ref(), &extraction.follow_up_prompt);
                self.cycle.finish(&reply);

                tracing::info!(
                    session_id = %self.id,
                    changed = merged.changed.len(),
                    complete = next_missing.is_none(),
                    "turn merged"
                );
                TurnOutcome::Merged(MergedTurn {
                    reply,
                    changed: merged.changed,
                    violations: merged.violations,
                    next_missing,
                })
            }
            Err(error) => {
                tracing::warn!(session_id = %self.id, %error, "extraction failed");
                let reply = apology(&error).to_string();
                self.cycle.finish(&reply);
                TurnOutcome::Failed { reply, error }
            }
        };
        Ok(outcome)
    }

    /// A complete draft always gets the confirmation, whatever the oracle
    /// said; an incomplete one falls back to asking for the next field.
    fn reply_for(&self, next_missing: Option<&FieldPath>, follow_up: &str) -> String {
        match next_missing {
            None => self.definition.confirmation().to_string(),
            Some(path) if follow_up.trim().is_empty() => self.definition.question_for(path),
            Some(_) => follow_up.trim().to_string(),
        }
    }

    /// Saves the complete draft and closes the session.
    ///
    /// # Errors
    ///
    /// - `PreconditionFailed` naming the first missing field; nothing changes
    /// - `NotIdle` / `SessionClosed` when the session cannot publish now
    /// - `Store` if persistence failed; the session stays open for a retry
    pub async fn publish(&mut self) -> Result<DraftId, PublishError> {
        self.ensure_idle()?;
        if let Some(missing) = self.next_missing_field() {
            return Err(PublishError::PreconditionFailed {
                missing: missing.clone(),
            });
        }

        let id = self.persist().await?;
        self.cycle
            .close(TurnState::Published)
            .map_err(|_| PublishError::NotIdle)?;
        tracing::info!(session_id = %self.id, draft_id = %id, "listing published");
        Ok(id)
    }

    /// Saves the draft as it stands, complete or not.
    pub async fn save_progress(&mut self) -> Result<DraftId, PublishError> {
        if self.cycle.state().is_closed() {
            return Err(PublishError::SessionClosed);
        }
        let id = self.persist().await?;
        tracing::info!(session_id = %self.id, draft_id = %id, "draft saved");
        Ok(id)
    }

    async fn persist(&mut self) -> Result<DraftId, DraftStoreError> {
        let kind = self.definition.kind();
        let id = match self.saved_as {
            Some(id) => {
                self.store.update(kind, id, &self.draft).await?;
                id
            }
            None => self.store.save(kind, &self.draft).await?,
        };
        self.saved_as = Some(id);
        Ok(id)
    }

    fn ensure_idle(&self) -> Result<(), PublishError> {
        self.cycle.ensure_idle().map_err(|e| match e {
            TurnError::SessionClosed => PublishError::SessionClosed,
            _ => PublishError::NotIdle,
        })
    }

    /// Ends the session. The draft keeps exactly the turns merged so far.
    pub fn abandon(&mut self) -> Result<(), TurnError> {
        self.cycle
            .close(TurnState::Abandoned)
            .map_err(|_| TurnError::SessionClosed)?;
        tracing::info!(session_id = %self.id, "session abandoned");
        Ok(())
    }

    /// Returns a session whose turn future was dropped back to `Idle`.
    pub fn cancel_pending_turn(&mut self) -> bool {
        let cancelled = self.cycle.cancel_pending();
        if cancelled {
            tracing::info!(session_id = %self.id, "pending turn cancelled");
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::oracle::LlmOracle;
    use crate::adapters::storage::InMemoryDraftStore;
    use crate::adapters::validation::JsonResponseValidator;
    use crate::domain::oracle::MAX_FIELD_LENGTH;
    use serde_json::json;
    use std::time::Duration;

    const TURN_1: &str = r#"{"partialUpdate": {"basics": {"title": "Lake House"}}, "followUpPrompt": "Which city is it in?"}"#;
    const TURN_2: &str = r#"{"partialUpdate": {"location": {"city": "Udaipur"}, "pricing": {"basePrice": 9000}}, "followUpPrompt": "How many guests can stay?"}"#;
    const TURN_3: &str = r#"{"partialUpdate": {"capacity": {"maxGuests": 6}, "basics": {"description": "A quiet retreat."}}, "followUpPrompt": "Anything else?"}"#;

    fn session_with(provider: MockAIProvider) -> (ListingIntakeSession, InMemoryDraftStore) {
        let store = InMemoryDraftStore::new();
        let oracle = LlmOracle::new(Arc::new(provider), Arc::new(JsonResponseValidator::new()));
        let session =
            ListingIntakeSession::new(Arc::new(oracle), Arc::new(store.clone()), SessionSettings::default());
        (session, store)
    }

    fn path(p: &str) -> FieldPath {
        FieldPath::parse(p).unwrap()
    }

    mod turns {
        use super::*;

        #[tokio::test]
        async fn merges_each_turn_and_asks_next() {
            let provider = MockAIProvider::new().with_response(TURN_1).with_response(TURN_2);
            let (mut session, _) = session_with(provider);

            let first = session.send("It's called Lake House").await.unwrap();
            assert_eq!(first.reply(), "Which city is it in?");
            assert_eq!(session.next_missing_field(), Some(&path("location.city")));

            let second = session.send("Udaipur, 9000 a night").await.unwrap();
            let TurnOutcome::Merged(turn) = second else {
                panic!("expected merge");
            };
            assert_eq!(turn.next_missing, Some(path("capacity.maxGuests")));
            assert_eq!(session.draft().get(&path("basics.title")), Some(&json!("Lake House")));
            assert_eq!(session.draft().get(&path("pricing.basePrice")), Some(&json!(9000)));
            assert!(!session.is_complete());
            assert_eq!(session.log().len(), 4);
            assert_eq!(session.state(), TurnState::Idle);
        }

        #[tokio::test]
        async fn complete_draft_always_gets_confirmation() {
            let provider = MockAIProvider::new()
                .with_response(TURN_1)
                .with_response(TURN_2)
                .with_response(TURN_3);
            let (mut session, _) = session_with(provider);

            session.send("Lake House").await.unwrap();
            session.send("Udaipur, 9000").await.unwrap();
            let last = session.send("6 guests, a quiet retreat").await.unwrap();

            assert!(session.is_complete());
            assert_eq!(last.reply(), listing_definition().confirmation());
        }

        #[tokio::test]
        async fn empty_follow_up_asks_for_next_missing_field() {
            let provider = MockAIProvider::new().with_response(
                r#"{"partialUpdate": {"basics": {"title": "Lake House"}}, "followUpPrompt": "  "}"#,
            );
            let (mut session, _) = session_with(provider);

            let outcome = session.send("Lake House").await.unwrap();
            assert_eq!(outcome.reply(), "Could you tell me the city of your listing?");
        }

        #[tokio::test]
        async fn unknown_fields_are_ignored_with_a_warning() {
            let provider = MockAIProvider::new().with_response(
                r#"{"partialUpdate": {"basics": {"title": "Lake House"}, "pool": {"heated": true}}, "followUpPrompt": "Which city?"}"#,
            );
            let (mut session, _) = session_with(provider);

            let TurnOutcome::Merged(turn) = session.send("Lake House with a heated pool").await.unwrap()
            else {
                panic!("expected merge");
            };
            assert_eq!(turn.violations.len(), 1);
            assert_eq!(turn.violations[0].path, "pool");
            assert_eq!(turn.changed, vec![path("basics.title")]);
        }

        #[tokio::test]
        async fn merges_text_with_angle_brackets_verbatim() {
            let provider = MockAIProvider::new().with_response(
                r#"{"partialUpdate": {"basics": {"description": "Cosy flat, < 5 min to the lake, sleeps 4"}}, "followUpPrompt": "What is it called?"}"#,
            );
            let (mut session, _) = session_with(provider);

            session.send("Cosy flat, < 5 min to the lake, sleeps 4").await.unwrap();
            assert_eq!(
                session.draft().get(&path("basics.description")),
                Some(&json!("Cosy flat, < 5 min to the lake, sleeps 4"))
            );
        }

        #[tokio::test]
        async fn over_long_value_fails_the_turn_without_merging() {
            let description = "a".repeat(MAX_FIELD_LENGTH + 1);
            let provider = MockAIProvider::new().with_response(
                json!({
                    "partialUpdate": { "basics": { "description": description } },
                    "followUpPrompt": "What is it called?"
                })
                .to_string(),
            );
            let (mut session, _) = session_with(provider);

            let outcome = session.send("a very long description").await.unwrap();
            assert!(matches!(
                outcome,
                TurnOutcome::Failed {
                    error: OracleError::MalformedResponse(_),
                    ..
                }
            ));
            assert!(session.draft().is_empty());
        }

        #[tokio::test]
        async fn refused_input_appends_nothing() {
            let (mut session, _) = session_with(MockAIProvider::new());
            assert_eq!(session.send("   ").await.unwrap_err(), TurnError::EmptyInput);
            assert!(session.log().is_empty());
        }
    }

    mod failures {
        use super::*;

        #[tokio::test]
        async fn unavailable_oracle_leaves_draft_untouched() {
            let provider = MockAIProvider::new()
                .with_response(TURN_1)
                .with_error(MockError::Unavailable {
                    message: "overloaded".into(),
                });
            let (mut session, _) = session_with(provider);
            session.send("Lake House").await.unwrap();
            let draft_before = session.draft().clone();

            let outcome = session.send("It's in Udaipur").await.unwrap();

            assert!(matches!(
                outcome,
                TurnOutcome::Failed {
                    error: OracleError::Unavailable(_),
                    ..
                }
            ));
            assert_eq!(session.draft(), &draft_before);
            assert_eq!(session.log().len(), 4);
            assert_eq!(session.state(), TurnState::Idle);
        }

        #[tokio::test]
        async fn malformed_answer_leaves_draft_untouched() {
            let provider = MockAIProvider::new().with_response("I think the city is Udaipur!");
            let (mut session, _) = session_with(provider);

            let outcome = session.send("Udaipur").await.unwrap();

            assert!(matches!(
                outcome,
                TurnOutcome::Failed {
                    error: OracleError::MalformedResponse(_),
                    ..
                }
            ));
            assert!(session.draft().is_empty());
        }

        #[tokio::test]
        async fn slow_oracle_times_out_as_unavailable() {
            let provider = MockAIProvider::new()
                .with_response(TURN_1)
                .with_delay(Duration::from_millis(200));
            let (mut session, _) = session_with(provider);
            session.settings.oracle_timeout = Duration::from_millis(20);

            let outcome = session.send("Lake House").await.unwrap();
            assert!(matches!(
                outcome,
                TurnOutcome::Failed {
                    error: OracleError::Unavailable(_),
                    ..
                }
            ));
            assert!(session.draft().is_empty());
        }

        #[tokio::test]
        async fn dropped_turn_can_be_cancelled() {
            let provider = MockAIProvider::new()
                .with_response(TURN_1)
                .with_delay(Duration::from_millis(200));
            let (mut session, _) = session_with(provider);

            let dropped =
                tokio::time::timeout(Duration::from_millis(20), session.send("Lake House")).await;
            assert!(dropped.is_err());
            assert_eq!(session.state(), TurnState::AwaitingOracle);
            assert_eq!(session.send("again").await.unwrap_err(), TurnError::TurnInFlight);

            assert!(session.cancel_pending_turn());
            assert_eq!(session.state(), TurnState::Idle);
            assert!(session.draft().is_empty());
        }
    }

    mod publishing {
        use super::*;

        #[tokio::test]
        async fn incomplete_draft_names_first_missing_field() {
            let (mut session, store) = session_with(MockAIProvider::new().with_response(TURN_1));
            session.send("Lake House").await.unwrap();

            let err = session.publish().await.unwrap_err();
            assert!(matches!(
                err,
                PublishError::PreconditionFailed { ref missing } if missing == &path("location.city")
            ));
            assert_eq!(store.record_count().await, 0);
            assert_eq!(session.state(), TurnState::Idle);
        }

        #[tokio::test]
        async fn complete_draft_publishes_and_closes() {
            let provider = MockAIProvider::new()
                .with_response(TURN_1)
                .with_response(TURN_2)
                .with_response(TURN_3);
            let (mut session, store) = session_with(provider);
            for text in ["Lake House", "Udaipur, 9000", "6 guests, quiet"] {
                session.send(text).await.unwrap();
            }

            let id = session.publish().await.unwrap();

            assert_eq!(session.state(), TurnState::Published);
            let kind = listing_definition().kind();
            assert_eq!(&store.load(kind, id).await.unwrap(), session.draft());
            assert_eq!(session.send("one more thing").await.unwrap_err(), TurnError::SessionClosed);
            assert!(matches!(session.publish().await, Err(PublishError::SessionClosed)));
        }

        #[tokio::test]
        async fn save_progress_skips_completeness_and_reuses_record() {
            let (mut session, store) = session_with(MockAIProvider::new().with_response(TURN_1));
            let first = session.save_progress().await.unwrap();
            session.send("Lake House").await.unwrap();
            let second = session.save_progress().await.unwrap();

            assert_eq!(first, second);
            assert_eq!(store.record_count().await, 1);
            let kind = listing_definition().kind();
            assert_eq!(&store.load(kind, first).await.unwrap(), session.draft());
        }

        #[tokio::test]
        async fn resume_restores_saved_draft() {
            let (mut session, store) = session_with(MockAIProvider::new().with_response(TURN_1));
            session.send("Lake House").await.unwrap();
            let id = session.save_progress().await.unwrap();

            let oracle = LlmOracle::new(
                Arc::new(MockAIProvider::new()),
                Arc::new(JsonResponseValidator::new()),
            );
            let resumed = ListingIntakeSession::resume(
                id,
                Arc::new(oracle),
                Arc::new(store),
                SessionSettings::default(),
            )
            .await
            .unwrap();

            assert_eq!(resumed.draft(), session.draft());
            assert_eq!(resumed.saved_as(), Some(id));
            assert!(resumed.log().is_empty());
        }

        #[tokio::test]
        async fn abandon_closes_session() {
            let (mut session, _) = session_with(MockAIProvider::new());
            session.abandon().unwrap();
            assert_eq!(session.state(), TurnState::Abandoned);
            assert_eq!(session.abandon(), Err(TurnError::SessionClosed));
            assert!(matches!(session.save_progress().await, Err(PublishError::SessionClosed)));
        }
    }
}
