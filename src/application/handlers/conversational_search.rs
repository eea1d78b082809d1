//! Conversational search with repeat suppression.
//!
//! The search oracle proposes candidates freely; this session decides what
//! is shown. Candidates outside the corpus are dropped, already-shown ids are
//! filtered by the ledger, and only the ids actually displayed are recorded.

use std::sync::Arc;

use super::oracle_call::{apology, bounded};
use crate::application::SessionSettings;
use crate::domain::conversation::ConversationLog;
use crate::domain::draft::{DraftEntity, MergePolicy, SchemaViolation};
use crate::domain::foundation::SessionId;
use crate::domain::orchestration::{TurnCycle, TurnError, TurnState};
use crate::domain::search::{search_filter_schema, ListingCorpus, ListingSummary, SuggestionLedger};
use crate::ports::{OracleError, SearchOracle, SearchRequest};

const NOTHING_NEW_REPLY: &str =
    "I couldn't find anything new for that. Could you tell me more about what you're looking for?";
const DEFAULT_NARRATIVE: &str = "Here are some places you might like.";

/// A search turn that produced an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionTurn {
    /// The assistant turn appended to the log.
    pub reply: String,
    /// Listings shown this turn, never shown before in this session.
    pub shown: Vec<ListingSummary>,
    /// Candidate ids the oracle made up.
    pub unknown_ids: Vec<String>,
    /// Parts of the inferred filters that were ignored.
    pub violations: Vec<SchemaViolation>,
}

/// How a search turn ended. Both variants leave the session idle.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchTurnOutcome {
    Suggested(SuggestionTurn),
    /// The oracle failed; ledger and filters are unchanged.
    Failed { reply: String, error: OracleError },
}

impl SearchTurnOutcome {
    pub fn reply(&self) -> &str {
        match self {
            Self::Suggested(turn) => &turn.reply,
            Self::Failed { reply, .. } => reply,
        }
    }

    /// Ids shown this turn, in display order.
    pub fn shown_ids(&self) -> Vec<&str> {
        match self {
            Self::Suggested(turn) => turn.shown.iter().map(|l| l.id.as_str()).collect(),
            Self::Failed { .. } => Vec::new(),
        }
    }
}

/// One guest's search conversation.
pub struct SearchSession {
    id: SessionId,
    cycle: TurnCycle,
    ledger: SuggestionLedger,
    filters: DraftEntity,
    corpus: Arc<ListingCorpus>,
    oracle: Arc<dyn SearchOracle>,
    settings: SessionSettings,
}

impl SearchSession {
    pub fn new(
        corpus: Arc<ListingCorpus>,
        oracle: Arc<dyn SearchOracle>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            id: SessionId::new(),
            cycle: TurnCycle::new(settings.max_input_chars),
            ledger: SuggestionLedger::new(),
            filters: DraftEntity::new(),
            corpus,
            oracle,
            settings,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn log(&self) -> &ConversationLog {
        self.cycle.log()
    }

    pub fn state(&self) -> TurnState {
        self.cycle.state()
    }

    pub fn ledger(&self) -> &SuggestionLedger {
        &self.ledger
    }

    /// Preferences accumulated across turns.
    pub fn filters(&self) -> &DraftEntity {
        &self.filters
    }

    /// Runs one search turn.
    ///
    /// # Errors
    ///
    /// Returns `TurnError` without touching the log when the input is refused.
    /// Oracle failures come back as [`SearchTurnOutcome::Failed`].
    pub async fn send(&mut self, input: &str) -> Result<SearchTurnOutcome, TurnError> {
        self.cycle.begin(input)?;

        let request = SearchRequest {
            session_id: self.id,
            log: self.cycle.log(),
            corpus: &self.corpus,
        };
        let result = bounded(self.settings.oracle_timeout, self.oracle.search(request)).await;

        let outcome = match result {
            Ok(answer) => {
                let (known, unknown_ids): (Vec<String>, Vec<String>) = answer
                    .candidate_ids
                    .into_iter()
                    .partition(|id| self.corpus.contains(id));
                for id in &unknown_ids {
                    tracing::warn!(session_id = %self.id, candidate = %id, "dropped candidate outside corpus");
                }

                let mut fresh = self.ledger.filter_new(known.as_slice());
                fresh.truncate(self.settings.max_suggestions_per_turn);
                self.ledger.record(fresh.iter().cloned());

                let merged = MergePolicy::new(search_filter_schema())
                    .apply(&self.filters, &answer.inferred_filters);
                for violation in &merged.violations {
                    tracing::warn!(session_id = %self.id, %violation, "ignored inferred filter");
                }
                self.filters = merged.draft;

                let shown: Vec<ListingSummary> = fresh
                    .iter()
                    .filter_map(|id| self.corpus.get(id).cloned())
                    .collect();
                let reply = match answer.narrative.trim() {
                    _ if shown.is_empty() => NOTHING_NEW_REPLY.to_string(),
                    "" => DEFAULT_NARRATIVE.to_string(),
                    narrative => narrative.to_string(),
                };
                self.cycle.finish(&reply);

                tracing::info!(
                    session_id = %self.id,
                    shown = shown.len(),
                    surfaced_total = self.ledger.len(),
                    "search turn resolved"
                );
                SearchTurnOutcome::Suggested(SuggestionTurn {
                    reply,
                    shown,
                    unknown_ids,
                    violations: merged.violations,
                })
            }
            Err(error) => {
                tracing::warn!(session_id = %self.id, %error, "search failed");
                let reply = apology(&error).to_string();
                self.cycle.finish(&reply);
                SearchTurnOutcome::Failed { reply, error }
            }
        };
        Ok(outcome)
    }

    /// Starts the search over: empty log, ledger and filters.
    pub fn restart(&mut self) -> Result<(), TurnError> {
        self.cycle.restart()?;
        self.ledger.clear();
        self.filters = DraftEntity::new();
        tracing::info!(session_id = %self.id, "search restarted");
        Ok(())
    }

    pub fn abandon(&mut self) -> Result<(), TurnError> {
        self.cycle
            .close(TurnState::Abandoned)
            .map_err(|_| TurnError::SessionClosed)
    }

    /// Returns a session whose turn future was dropped back to `Idle`.
    pub fn cancel_pending_turn(&mut self) -> bool {
        self.cycle.cancel_pending()
    }
}
