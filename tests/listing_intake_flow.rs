//! End-to-end listing intake: three conversational turns, then publish to disk.
//!
//! Uses the mock provider behind the real oracle adapter and the YAML file
//! store, so every layer between free text and the saved record is exercised.

use serde_json::json;
use std::sync::Arc;

use staybook::adapters::{FileDraftStore, JsonResponseValidator, LlmOracle, MockAIProvider};
use staybook::application::{ListingIntakeSession, PublishError, SessionSettings, TurnOutcome};
use staybook::domain::draft::{listing_definition, FieldPath};
use staybook::domain::orchestration::TurnState;
use staybook::ports::DraftStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn oracle_answering(answers: &[serde_json::Value]) -> Arc<LlmOracle> {
    let provider = answers
        .iter()
        .fold(MockAIProvider::new(), |p, a| p.with_response(a.to_string()));
    Arc::new(LlmOracle::new(
        Arc::new(provider),
        Arc::new(JsonResponseValidator::new()),
    ))
}

fn path(p: &str) -> FieldPath {
    FieldPath::parse(p).unwrap()
}

fn three_turns() -> Vec<serde_json::Value> {
    vec![
        json!({
            "partialUpdate": { "basics": { "title": "Lake House" } },
            "followUpPrompt": "Which city is it in?"
        }),
        json!({
            "partialUpdate": { "location": { "city": "Udaipur" }, "pricing": { "basePrice": 9000 } },
            "followUpPrompt": "How many guests can stay?"
        }),
        json!({
            "partialUpdate": {
                "capacity": { "maxGuests": 6 },
                "basics": { "description": "A quiet retreat on the lake." }
            },
            "followUpPrompt": "Anything else?"
        }),
    ]
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn three_turns_then_publish_writes_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDraftStore::new(dir.path()));
    let mut session = ListingIntakeSession::new(
        oracle_answering(&three_turns()),
        store.clone(),
        SessionSettings::default(),
    );

    let first = session.send("My place is called Lake House").await.unwrap();
    assert_eq!(first.reply(), "Which city is it in?");
    assert!(matches!(session.publish().await, Err(PublishError::PreconditionFailed { .. })));

    session.send("Udaipur, 9000 a night").await.unwrap();
    let last = session.send("Six guests. It's a quiet retreat on the lake.").await.unwrap();

    let TurnOutcome::Merged(turn) = last else {
        panic!("expected a merged turn");
    };
    assert!(turn.is_complete());
    assert_eq!(turn.reply, listing_definition().confirmation());
    assert_eq!(session.log().len(), 6);

    let id = session.publish().await.unwrap();
    assert_eq!(session.state(), TurnState::Published);

    let record = store
        .load_record(listing_definition().kind(), id)
        .await
        .unwrap();
    assert_eq!(record.draft.get(&path("basics.title")), Some(&json!("Lake House")));
    assert_eq!(record.draft.get(&path("location.city")), Some(&json!("Udaipur")));
    assert_eq!(record.draft.get(&path("capacity.maxGuests")), Some(&json!(6)));
    assert_eq!(record.draft.get(&path("pricing.basePrice")), Some(&json!(9000)));
}

#[tokio::test]
async fn saved_progress_resumes_in_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDraftStore::new(dir.path()));
    let turns = three_turns();

    let mut first = ListingIntakeSession::new(
        oracle_answering(&turns[..2]),
        store.clone(),
        SessionSettings::default(),
    );
    first.send("Lake House").await.unwrap();
    first.send("Udaipur, 9000 a night").await.unwrap();
    let id = first.save_progress().await.unwrap();
    first.abandon().unwrap();

    let mut second = ListingIntakeSession::resume(
        id,
        oracle_answering(&turns[2..]),
        store.clone(),
        SessionSettings::default(),
    )
    .await
    .unwrap();
    assert_eq!(second.next_missing_field(), Some(&path("capacity.maxGuests")));
    assert!(second.log().is_empty());

    second.send("Six guests, quiet retreat").await.unwrap();
    assert_eq!(second.publish().await.unwrap(), id);

    let draft = store.load(listing_definition().kind(), id).await.unwrap();
    assert_eq!(draft.get(&path("basics.title")), Some(&json!("Lake House")));
    assert_eq!(draft.get(&path("capacity.maxGuests")), Some(&json!(6)));
}
