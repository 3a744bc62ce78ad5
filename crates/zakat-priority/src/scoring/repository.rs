use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, ScoringInput};
use super::engine::ScoreResult;

/// Persisted score row: the computed breakdown plus the time it was last written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredScore {
    #[serde(flatten)]
    pub result: ScoreResult,
    pub calculated_at: DateTime<Utc>,
}

impl StoredScore {
    pub fn application_id(&self) -> &ApplicationId {
        &self.result.application_id
    }

    pub fn queue_entry(&self) -> QueueEntry {
        QueueEntry {
            application_id: self.result.application_id.clone(),
            total_priority_score: self.result.total_priority_score,
            recommendation: self.result.system_recommendation.label(),
            calculated_at: self.calculated_at,
        }
    }
}

/// Read side: resolves the joined applicant/application/household snapshot.
///
/// `Ok(None)` means no application matched, which is distinct from a snapshot whose
/// fields are all empty.
pub trait ApplicationSnapshotSource: Send + Sync {
    fn fetch_snapshot(&self, id: &ApplicationId) -> Result<Option<ScoringInput>, SourceError>;
}

/// Write side: one current score row per application.
pub trait ScoreStore: Send + Sync {
    /// Inserts or replaces the row for `result.application_id` and stamps
    /// `calculated_at`. Must be atomic with respect to concurrent writers of the same key.
    fn upsert(&self, result: ScoreResult) -> Result<StoredScore, StoreError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<StoredScore>, StoreError>;
    /// Highest priority first; ties broken by application id.
    fn ranked(&self, limit: usize) -> Result<Vec<StoredScore>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("application data unavailable: {0}")]
    Unavailable(String),
    #[error("application data malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("concurrent write conflict for application {0}")]
    Conflict(ApplicationId),
    #[error("score store unavailable: {0}")]
    Unavailable(String),
}

/// Compact view used by the staff triage queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEntry {
    pub application_id: ApplicationId,
    pub total_priority_score: i64,
    pub recommendation: &'static str,
    pub calculated_at: DateTime<Utc>,
}
