//! Live sessions keyed by id.
//!
//! Each session sits behind its own lock, so distinct sessions proceed in
//! parallel while a second caller on a busy session is turned away instead
//! of queued.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::foundation::SessionId;
use crate::domain::orchestration::TurnError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No session with id {0}")]
    NotFound(SessionId),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

/// Registry of independently locked sessions.
pub struct SessionRegistry<T> {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<T>>>>,
}

impl<T> Default for SessionRegistry<T> {
    fn default() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> SessionRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session, replacing any previous one with the same id.
    pub async fn insert(&self, id: SessionId, session: T) {
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
    }

    /// Exclusive access to a session.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown id
    /// - `Turn(TurnInFlight)` if another caller currently holds the session
    pub async fn try_acquire(&self, id: SessionId) -> Result<OwnedMutexGuard<T>, RegistryError> {
        let slot = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))?;
        slot.try_lock_owned()
            .map_err(|_| RegistryError::Turn(TurnError::TurnInFlight))
    }

    /// Removes a session. A caller still holding it keeps its guard.
    pub async fn remove(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::oracle::LlmOracle;
    use crate::adapters::storage::InMemoryDraftStore;
    use crate::adapters::validation::JsonResponseValidator;
    use crate::application::{ListingIntakeSession, SessionSettings};
    use std::time::Duration;

    const TITLE: &str =
        r#"{"partialUpdate": {"basics": {"title": "Lake House"}}, "followUpPrompt": "Which city?"}"#;

    fn intake(delay: Duration) -> ListingIntakeSession {
        let provider = MockAIProvider::new().with_response(TITLE).with_delay(delay);
        let oracle = LlmOracle::new(Arc::new(provider), Arc::new(JsonResponseValidator::new()));
        ListingIntakeSession::new(
            Arc::new(oracle),
            Arc::new(InMemoryDraftStore::new()),
            SessionSettings::default(),
        )
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let registry: SessionRegistry<ListingIntakeSession> = SessionRegistry::new();
        let id = SessionId::new();
        assert!(matches!(
            registry.try_acquire(id).await,
            Err(RegistryError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn busy_session_refuses_second_caller() {
        let registry = Arc::new(SessionRegistry::new());
        let session = intake(Duration::from_millis(100));
        let id = session.id();
        registry.insert(id, session).await;

        let first = {
            let registry = registry.clone();
            tokio::spawn(async move {
                let mut guard = registry.try_acquire(id).await.unwrap();
                guard.send("Lake House").await.unwrap();
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(matches!(
            registry.try_acquire(id).await,
            Err(RegistryError::Turn(TurnError::TurnInFlight))
        ));

        first.await.unwrap();
        let guard = registry.try_acquire(id).await.unwrap();
        assert_eq!(guard.log().len(), 2);
    }

    #[tokio::test]
    async fn distinct_sessions_run_in_parallel() {
        let registry = Arc::new(SessionRegistry::new());
        let mut ids = Vec::new();
        for _ in 0..3 {
            let session = intake(Duration::from_millis(100));
            ids.push(session.id());
            registry.insert(session.id(), session).await;
        }

        let started = std::time::Instant::now();
        let handles: Vec<_> = ids
            .iter()
            .map(|id| {
                let registry = registry.clone();
                let id = *id;
                tokio::spawn(async move {
                    let mut guard = registry.try_acquire(id).await.unwrap();
                    guard.send("Lake House").await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(started.elapsed() < Duration::from_millis(280));
        for id in ids {
            assert!(!registry.try_acquire(id).await.unwrap().draft().is_empty());
        }
    }

    #[tokio::test]
    async fn remove_forgets_session() {
        let registry = SessionRegistry::new();
        let session = intake(Duration::ZERO);
        let id = session.id();
        registry.insert(id, session).await;
        assert!(registry.contains(id).await);

        assert!(registry.remove(id).await);
        assert!(registry.is_empty().await);
        assert!(!registry.remove(id).await);
    }
}
