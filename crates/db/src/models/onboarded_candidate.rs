//! Consolidated onboarding records.

use hrdocs_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from `onboarded_candidates`. Section columns hold point-in-time
/// snapshots of the section rows plus their attachment metadata.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OnboardedCandidate {
    pub id: DbId,
    pub draft_id: String,
    pub candidate_name: String,
    pub email: String,
    pub identity: serde_json::Value,
    pub qualification: serde_json::Value,
    pub offer: serde_json::Value,
    pub bank: serde_json::Value,
    pub employment: serde_json::Value,
    pub status: String,
    pub submitted_by: Option<DbId>,
    pub submitted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Listing row without the snapshots.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CandidateSummary {
    pub id: DbId,
    pub draft_id: String,
    pub candidate_name: String,
    pub email: String,
    pub status: String,
    pub submitted_at: Timestamp,
}

/// Dashboard counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OnboardingCounts {
    /// Drafts with at least one saved section and no consolidated record.
    pub drafts_in_progress: i64,
    pub consolidated: i64,
    pub consolidated_last_30_days: i64,
}

/// Outcome of a consolidation attempt.
#[derive(Debug)]
pub enum ConsolidationOutcome {
    Consolidated(OnboardedCandidate),
    /// A guard failed (`AlreadySubmitted` or `IncompleteOnboarding`); nothing
    /// was written.
    Rejected(hrdocs_core::error::CoreError),
}
