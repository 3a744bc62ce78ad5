//! Applicant priority scoring for zakat aid applications.
//!
//! The engine is a pure function over an application snapshot and an injected rubric.
//! Fetching the snapshot and persisting the result are handled by the collaborator
//! traits in [`repository`] and composed by [`service::PriorityScoringService`].

pub mod domain;
pub(crate) mod engine;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationId, ScoringInput};
pub use engine::{
    compute_score, DebtTier, DependentTier, EligibilityStatus, IncomeTier, MaritalBonus,
    Recommendation, RecommendationThresholds, ScoreComponent, ScoreFactor, ScoreResult,
    ScoreWeights, ScoringConfig, ScoringConfigError, ScoringEngine,
};
pub use import::{SnapshotImportError, SnapshotImporter};
pub use repository::{
    ApplicationSnapshotSource, QueueEntry, ScoreStore, SourceError, StoreError, StoredScore,
};
pub use router::scoring_router;
pub use service::{PriorityScoringService, ScoringServiceError};
