//! End-to-end guest search and document verification over the mock provider.

use serde_json::json;
use std::sync::Arc;

use staybook::adapters::{InMemoryArtifactStorage, JsonResponseValidator, LlmOracle, MockAIProvider};
use staybook::application::{SearchSession, SessionSettings, VerificationGate};
use staybook::domain::foundation::SessionId;
use staybook::domain::search::{ListingCorpus, ListingSummary};
use staybook::domain::verification::{ArtifactStatus, VerificationArtifact};
use staybook::ports::ArtifactStorage;

fn oracle(provider: MockAIProvider) -> Arc<LlmOracle> {
    Arc::new(LlmOracle::new(
        Arc::new(provider),
        Arc::new(JsonResponseValidator::new()),
    ))
}

fn corpus() -> Arc<ListingCorpus> {
    Arc::new(ListingCorpus::new([
        ListingSummary::new("p1", "Lake House", "Udaipur").with_price(9000.0),
        ListingSummary::new("p2", "Palace View", "Udaipur").with_price(12000.0),
        ListingSummary::new("p3", "City Loft", "Jaipur").with_price(4000.0),
        ListingSummary::new("p4", "Garden Cottage", "Udaipur").with_price(3500.0),
    ]))
}

#[tokio::test]
async fn search_never_repeats_a_listing() {
    let provider = MockAIProvider::new()
        .with_response(json!({ "narrative": "Three to start.", "candidateIds": ["p1", "p2", "p3"] }).to_string())
        .with_response(json!({ "narrative": "A cheaper one.", "candidateIds": ["p2", "p4"] }).to_string());
    let mut session = SearchSession::new(corpus(), oracle(provider), SessionSettings::default());

    let first = session.send("somewhere near a lake").await.unwrap();
    assert_eq!(first.shown_ids(), vec!["p1", "p2", "p3"]);

    let second = session.send("under 5000 a night").await.unwrap();
    assert_eq!(second.shown_ids(), vec!["p4"]);
    assert_eq!(second.reply(), "A cheaper one.");
    assert_eq!(session.ledger().len(), 4);
}

#[tokio::test]
async fn blurry_deed_blocks_the_upgrade() {
    let provider = MockAIProvider::new()
        .with_routed_response(
            "proof of ownership",
            json!({
                "isValid": false,
                "detectedKind": "property deed",
                "summary": "Text cannot be read",
                "rejectionReason": "blurry image"
            })
            .to_string(),
        )
        .with_routed_response(
            "government id",
            json!({ "isValid": true, "detectedKind": "passport", "summary": "Valid passport" })
                .to_string(),
        );
    let gate = VerificationGate::new(oracle(provider), SessionSettings::default());

    // uploads are stored before the gate sees them
    let storage = InMemoryArtifactStorage::new();
    let uploads = [
        VerificationArtifact::new(b"%PDF-1.7 deed".to_vec(), "application/pdf", "proof of ownership")
            .unwrap(),
        VerificationArtifact::new(b"\xff\xd8\xff passport".to_vec(), "image/jpeg", "government id")
            .unwrap(),
    ];
    let mut batch = Vec::new();
    for upload in uploads {
        let url = storage.put(upload.bytes(), upload.media_type()).await.unwrap();
        batch.push(upload.with_handle(url));
    }

    let outcome = gate.submit_batch(SessionId::new(), &batch).await;

    assert!(!outcome.upgrade_permitted());
    assert!(matches!(
        &outcome.reports()[0].status,
        ArtifactStatus::Rejected { reason, .. } if reason == "blurry image"
    ));
    assert!(outcome.reports()[1].is_accepted());
    assert_eq!(outcome.failing().count(), 1);
    assert!(batch.iter().all(|a| a.handle().is_some_and(|h| h.starts_with("mem://artifacts/"))));
}
