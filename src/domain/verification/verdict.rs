//! Verdicts and per-artifact gate reports.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::ArtifactId;

/// The oracle's judgement of one artifact. Never merged or accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationVerdict {
    pub is_valid: bool,
    /// Empty when the oracle did not say.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub detected_kind: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl VerificationVerdict {
    /// Why the artifact was rejected, if it was.
    ///
    /// Falls back to the summary, then to a generic reason, when the oracle
    /// rejects without saying why.
    pub fn rejection(&self) -> Option<String> {
        if self.is_valid {
            return None;
        }
        let reason = [self.rejection_reason.as_deref(), Some(self.summary.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or("document was not accepted");
        Some(reason.to_string())
    }
}

/// How one artifact fared at the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtifactStatus {
    /// The oracle judged the artifact valid.
    Accepted { verdict: VerificationVerdict },
    /// Rejected by a local pre-check (no verdict) or by the oracle.
    Rejected {
        reason: String,
        verdict: Option<VerificationVerdict>,
    },
    /// The oracle could not be reached or answered garbage. Retry later.
    Unverified { error: String },
}

/// Per-artifact outcome, never collapsed across the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    pub artifact_id: ArtifactId,
    pub described_kind: String,
    #[serde(flatten)]
    pub status: ArtifactStatus,
}

impl ArtifactReport {
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, ArtifactStatus::Accepted { .. })
    }
}

/// Result of verifying a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateOutcome {
    reports: Vec<ArtifactReport>,
}

impl GateOutcome {
    pub(crate) fn new(reports: Vec<ArtifactReport>) -> Self {
        Self { reports }
    }

    /// Reports in submission order.
    pub fn reports(&self) -> &[ArtifactReport] {
        &self.reports
    }

    /// The role upgrade is allowed only when every artifact was accepted.
    pub fn upgrade_permitted(&self) -> bool {
        !self.reports.is_empty() && self.reports.iter().all(ArtifactReport::is_accepted)
    }

    /// Reports that block the upgrade.
    pub fn failing(&self) -> impl Iterator<Item = &ArtifactReport> {
        self.reports.iter().filter(|r| !r.is_accepted())
    }
}
