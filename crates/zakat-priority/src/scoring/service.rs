use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{ApplicationId, ScoringInput};
use super::engine::{ScoreResult, ScoringConfig, ScoringEngine};
use super::repository::{
    ApplicationSnapshotSource, ScoreStore, SourceError, StoreError, StoredScore,
};

/// Service composing the snapshot source, score store, and scoring engine.
///
/// Scoring and persistence are separate steps: the engine computes a result, then the
/// store upserts it.
pub struct PriorityScoringService<S, W> {
    source: Arc<S>,
    store: Arc<W>,
    engine: Arc<ScoringEngine>,
}

impl<S, W> PriorityScoringService<S, W>
where
    S: ApplicationSnapshotSource + 'static,
    W: ScoreStore + 'static,
{
    pub fn new(source: Arc<S>, store: Arc<W>, config: ScoringConfig) -> Self {
        Self {
            source,
            store,
            engine: Arc::new(ScoringEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Recompute and persist the score for an application.
    pub fn recalculate(
        &self,
        application_id: &ApplicationId,
    ) -> Result<StoredScore, ScoringServiceError> {
        let input = self.snapshot(application_id)?;
        self.score_snapshot(application_id, &input)
    }

    /// Score an explicit snapshot and persist the outcome.
    pub fn score_snapshot(
        &self,
        application_id: &ApplicationId,
        input: &ScoringInput,
    ) -> Result<StoredScore, ScoringServiceError> {
        let result = self.engine.score(application_id, input);
        let stored = self.store.upsert(result).map_err(|error| {
            warn!(%application_id, %error, "failed to persist priority score");
            ScoringServiceError::Store(error)
        })?;

        info!(
            %application_id,
            total = stored.result.total_priority_score,
            recommendation = stored.result.system_recommendation.label(),
            "priority score recalculated"
        );
        Ok(stored)
    }

    /// Compute the score an application would receive without persisting it.
    pub fn preview(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ScoreResult, ScoringServiceError> {
        let input = self.snapshot(application_id)?;
        Ok(self.engine.score(application_id, &input))
    }

    /// Fetch the current stored score for API responses.
    pub fn get(&self, application_id: &ApplicationId) -> Result<StoredScore, ScoringServiceError> {
        self.store
            .fetch(application_id)?
            .ok_or_else(|| ScoringServiceError::NotFound(application_id.clone()))
    }

    /// Stored scores ordered for staff triage.
    pub fn queue(&self, limit: usize) -> Result<Vec<StoredScore>, ScoringServiceError> {
        Ok(self.store.ranked(limit)?)
    }

    fn snapshot(&self, application_id: &ApplicationId) -> Result<ScoringInput, ScoringServiceError> {
        match self.source.fetch_snapshot(application_id)? {
            Some(input) => Ok(input),
            None => {
                debug!(%application_id, "no application data found for scoring");
                Err(ScoringServiceError::NotFound(application_id.clone()))
            }
        }
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ScoringServiceError {
    /// Infrastructure failures that may succeed when retried with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScoringServiceError::Source(SourceError::Unavailable(_))
                | ScoringServiceError::Store(_)
        )
    }
}
