//! Probe outcome classification
//!
//! Maps a probe response to the three-way scan outcome. The calibration
//! point: a forbidden response confirms the bucket exists (S3 returns 403
//! when the bucket is there but the caller lacks permission), so Forbidden
//! classifies as Found.

use crate::probe::HeadResponse;
use tracing::{error, warn};

/// Three-way classification of one candidate's probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Bucket exists (accessible or not)
    Found,

    /// No bucket by that name
    NotFound,

    /// Probe failed; the scan continues
    Error(String),
}

/// Classify a probe response
///
/// Total function: every response maps to exactly one outcome, and
/// classification itself never fails. Unexpected errors are logged here
/// (service errors at warn, transport failures at error) and folded into
/// `Error` so the candidate is reported without aborting the scan.
pub fn classify(bucket: &str, response: HeadResponse) -> ProbeOutcome {
    match response {
        HeadResponse::Allowed | HeadResponse::Forbidden => ProbeOutcome::Found,
        HeadResponse::NotFound => ProbeOutcome::NotFound,
        HeadResponse::Service { code } => {
            warn!(bucket, code = %code, "Unexpected client error while probing bucket");
            ProbeOutcome::Error(code)
        }
        HeadResponse::Transport { detail } => {
            error!(bucket, detail = %detail, "Probe request failed");
            ProbeOutcome::Error(detail)
        }
    }
}
