//! Document verification ahead of a role upgrade.
//!
//! Single-shot: each artifact is pre-checked locally and judged by one oracle
//! call against the storage handle the caller attached. A batch is verified
//! concurrently and reported per artifact; the upgrade is allowed only if
//! every artifact was accepted.

use futures::future::join_all;
use std::sync::Arc;

use super::oracle_call::bounded;
use crate::application::SessionSettings;
use crate::domain::foundation::SessionId;
use crate::domain::verification::{
    ArtifactReport, ArtifactStatus, GateOutcome, VerificationArtifact,
};
use crate::ports::{VerificationOracle, VerificationRequest};

/// Verifies uploads. Holds no per-user state and can be shared.
pub struct VerificationGate {
    oracle: Arc<dyn VerificationOracle>,
    settings: SessionSettings,
}

impl VerificationGate {
    pub fn new(oracle: Arc<dyn VerificationOracle>, settings: SessionSettings) -> Self {
        Self { oracle, settings }
    }

    /// Verifies one artifact.
    pub async fn submit(&self, session_id: SessionId, artifact: &VerificationArtifact) -> ArtifactReport {
        let status = self.judge(session_id, artifact).await;
        match &status {
            ArtifactStatus::Accepted { .. } => {
                tracing::info!(session_id = %session_id, artifact_id = %artifact.id(), "artifact accepted")
            }
            ArtifactStatus::Rejected { reason, .. } => {
                tracing::info!(session_id = %session_id, artifact_id = %artifact.id(), %reason, "artifact rejected")
            }
            ArtifactStatus::Unverified { error } => {
                tracing::warn!(session_id = %session_id, artifact_id = %artifact.id(), %error, "artifact unverified")
            }
        }
        ArtifactReport {
            artifact_id: artifact.id(),
            described_kind: artifact.described_kind().to_string(),
            status,
        }
    }

    /// Verifies every artifact concurrently. Reports keep submission order.
    pub async fn submit_batch(
        &self,
        session_id: SessionId,
        artifacts: &[VerificationArtifact],
    ) -> GateOutcome {
        let reports = join_all(artifacts.iter().map(|a| self.submit(session_id, a))).await;
        let outcome = GateOutcome::new(reports);
        tracing::info!(
            session_id = %session_id,
            artifacts = artifacts.len(),
            upgrade_permitted = outcome.upgrade_permitted(),
            "verification batch resolved"
        );
        outcome
    }

    async fn judge(&self, session_id: SessionId, artifact: &VerificationArtifact) -> ArtifactStatus {
        if let Some(reason) = self.precheck(artifact) {
            return ArtifactStatus::Rejected {
                reason,
                verdict: None,
            };
        }

        let Some(handle) = artifact.handle() else {
            return ArtifactStatus::Unverified {
                error: "artifact was submitted before it was stored".to_string(),
            };
        };

        let request = VerificationRequest {
            session_id,
            artifact,
            handle,
        };
        match bounded(self.settings.oracle_timeout, self.oracle.verify(request)).await {
            Ok(verdict) => match verdict.rejection() {
                None => ArtifactStatus::Accepted { verdict },
                Some(reason) => ArtifactStatus::Rejected {
                    reason,
                    verdict: Some(verdict),
                },
            },
            Err(error) => ArtifactStatus::Unverified {
                error: error.to_string(),
            },
        }
    }

    /// Local checks that need no oracle.
    fn precheck(&self, artifact: &VerificationArtifact) -> Option<String> {
        if artifact.size() == 0 {
            return Some("the file is empty".to_string());
        }
        if !self.settings.accepts_media_type(artifact.media_type()) {
            return Some(format!("{} files are not accepted", artifact.media_type()));
        }
        if artifact.size() > self.settings.max_artifact_bytes {
            return Some(format!(
                "the file is larger than {} bytes",
                self.settings.max_artifact_bytes
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::oracle::LlmOracle;
    use crate::adapters::validation::JsonResponseValidator;
    use std::time::Duration;

    const VALID: &str = r#"{"isValid": true, "detectedKind": "passport", "summary": "Clear scan"}"#;
    const BLURRY: &str = r#"{"isValid": false, "detectedKind": "deed", "summary": "Unreadable", "rejectionReason": "blurry image"}"#;

    fn gate_with(provider: MockAIProvider) -> VerificationGate {
        let oracle = LlmOracle::new(Arc::new(provider), Arc::new(JsonResponseValidator::new()));
        VerificationGate::new(Arc::new(oracle), SessionSettings::default())
    }

    fn unstored(bytes: &[u8], media_type: &str, kind: &str) -> VerificationArtifact {
        VerificationArtifact::new(bytes.to_vec(), media_type, kind).unwrap()
    }

    fn artifact(bytes: &[u8], media_type: &str, kind: &str) -> VerificationArtifact {
        let handle = format!("mem://artifacts/{}", kind.replace(' ', "-"));
        unstored(bytes, media_type, kind).with_handle(handle)
    }

    #[tokio::test]
    async fn reports_each_artifact_of_a_batch() {
        let provider = MockAIProvider::new()
            .with_routed_response("proof of ownership", BLURRY)
            .with_routed_response("passport", VALID)
            .with_delay(Duration::from_millis(10));
        let gate = gate_with(provider);
        let batch = [
            artifact(b"deed scan", "application/pdf", "proof of ownership"),
            artifact(b"passport scan", "image/jpeg", "passport"),
        ];

        let outcome = gate.submit_batch(SessionId::new(), &batch).await;

        assert!(!outcome.upgrade_permitted());
        assert_eq!(outcome.reports().len(), 2);
        assert_eq!(outcome.reports()[0].artifact_id, batch[0].id());
        assert!(matches!(
            &outcome.reports()[0].status,
            ArtifactStatus::Rejected { reason, verdict: Some(_) } if reason == "blurry image"
        ));
        assert!(outcome.reports()[1].is_accepted());
        let failing: Vec<_> = outcome.failing().map(|r| r.artifact_id).collect();
        assert_eq!(failing, vec![batch[0].id()]);
    }

    #[tokio::test]
    async fn oracle_sees_the_callers_handle() {
        let provider = MockAIProvider::new().with_response(VALID);
        let gate = gate_with(provider.clone());

        gate.submit(SessionId::new(), &artifact(b"scan", "image/png", "passport"))
            .await;

        let call = &provider.get_calls()[0];
        assert!(call.messages[0].content.contains("mem://artifacts/passport"));
    }

    #[tokio::test]
    async fn bare_rejection_names_its_reason() {
        let provider = MockAIProvider::new()
            .with_response(r#"{"isValid": false, "rejectionReason": "blurry image"}"#);
        let gate = gate_with(provider);

        let report = gate
            .submit(SessionId::new(), &artifact(b"deed", "application/pdf", "proof of ownership"))
            .await;
        assert!(matches!(
            report.status,
            ArtifactStatus::Rejected { ref reason, verdict: Some(_) } if reason == "blurry image"
        ));
    }

    #[tokio::test]
    async fn all_accepted_permits_upgrade() {
        let provider = MockAIProvider::new().with_response(VALID).with_response(VALID);
        let gate = gate_with(provider);
        let batch = [
            artifact(b"front", "image/png", "id card"),
            artifact(b"back", "image/png", "id card"),
        ];

        assert!(gate.submit_batch(SessionId::new(), &batch).await.upgrade_permitted());
    }

    #[tokio::test]
    async fn empty_batch_never_permits_upgrade() {
        let gate = gate_with(MockAIProvider::new());
        assert!(!gate.submit_batch(SessionId::new(), &[]).await.upgrade_permitted());
    }

    #[tokio::test]
    async fn prechecks_reject_without_calling_oracle() {
        let provider = MockAIProvider::new();
        let gate = gate_with(provider.clone());

        let gif = gate
            .submit(SessionId::new(), &artifact(b"GIF89a", "image/gif", "passport"))
            .await;
        let empty = gate
            .submit(SessionId::new(), &artifact(b"", "image/png", "passport"))
            .await;

        for report in [gif, empty] {
            assert!(matches!(report.status, ArtifactStatus::Rejected { verdict: None, .. }));
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn unstored_artifact_is_unverified_without_calling_oracle() {
        let provider = MockAIProvider::new().with_response(VALID);
        let gate = gate_with(provider.clone());

        let report = gate
            .submit(SessionId::new(), &unstored(b"scan", "image/png", "passport"))
            .await;

        assert!(matches!(report.status, ArtifactStatus::Unverified { .. }));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn oversize_file_is_rejected() {
        let oracle = LlmOracle::new(
            Arc::new(MockAIProvider::new()),
            Arc::new(JsonResponseValidator::new()),
        );
        let mut settings = SessionSettings::default();
        settings.max_artifact_bytes = 4;
        let gate = VerificationGate::new(Arc::new(oracle), settings);

        let report = gate
            .submit(SessionId::new(), &artifact(b"12345", "image/png", "passport"))
            .await;
        assert!(matches!(
            report.status,
            ArtifactStatus::Rejected { ref reason, .. } if reason.contains("larger than 4 bytes")
        ));
    }

    #[tokio::test]
    async fn oracle_failure_marks_only_that_artifact_unverified() {
        let provider = MockAIProvider::new()
            .with_routed_error(
                "selfie",
                MockError::Unavailable {
                    message: "overloaded".into(),
                },
            )
            .with_routed_response("passport", VALID);
        let gate = gate_with(provider);
        let batch = [
            artifact(b"passport scan", "image/jpeg", "passport"),
            artifact(b"selfie", "image/jpeg", "selfie"),
        ];

        let outcome = gate.submit_batch(SessionId::new(), &batch).await;

        assert!(outcome.reports()[0].is_accepted());
        assert!(matches!(
            outcome.reports()[1].status,
            ArtifactStatus::Unverified { .. }
        ));
        assert!(!outcome.upgrade_permitted());
    }
}
