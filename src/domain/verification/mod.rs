//! Verification domain module.
//!
//! Single-shot document checks that gate a role upgrade.

mod artifact;
mod verdict;

pub use artifact::VerificationArtifact;
pub use verdict::{ArtifactReport, ArtifactStatus, GateOutcome, VerificationVerdict};
