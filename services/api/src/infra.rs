use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use zakat_priority::scoring::{
    ApplicationId, ApplicationSnapshotSource, ScoreResult, ScoreStore, ScoringInput,
    SourceError, StoreError, StoredScore,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySnapshotSource {
    snapshots: Arc<Mutex<HashMap<ApplicationId, ScoringInput>>>,
}

impl InMemorySnapshotSource {
    pub(crate) fn seeded(entries: Vec<(ApplicationId, ScoringInput)>) -> Self {
        let source = Self::default();
        source
            .snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(entries);
        source
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ApplicationSnapshotSource for InMemorySnapshotSource {
    fn fetch_snapshot(&self, id: &ApplicationId) -> Result<Option<ScoringInput>, SourceError> {
        let guard = self
            .snapshots
            .lock()
            .map_err(|_| SourceError::Unavailable("snapshot mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

/// Score table keyed by application id. The whole upsert runs under one lock, so
/// concurrent writers for the same application never interleave.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreStore {
    rows: Arc<Mutex<HashMap<ApplicationId, StoredScore>>>,
}

impl ScoreStore for InMemoryScoreStore {
    fn upsert(&self, result: ScoreResult) -> Result<StoredScore, StoreError> {
        let mut guard = self
            .rows
            .lock()
            .map_err(|_| StoreError::Unavailable("score mutex poisoned".to_string()))?;

        let mut calculated_at = Utc::now();
        if let Some(previous) = guard.get(&result.application_id) {
            calculated_at = calculated_at.max(previous.calculated_at);
        }

        let stored = StoredScore {
            result,
            calculated_at,
        };
        guard.insert(stored.result.application_id.clone(), stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<StoredScore>, StoreError> {
        let guard = self
            .rows
            .lock()
            .map_err(|_| StoreError::Unavailable("score mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn ranked(&self, limit: usize) -> Result<Vec<StoredScore>, StoreError> {
        let guard = self
            .rows
            .lock()
            .map_err(|_| StoreError::Unavailable("score mutex poisoned".to_string()))?;
        let mut rows: Vec<StoredScore> = guard.values().cloned().collect();
        sort_by_priority(&mut rows);
        rows.truncate(limit);
        Ok(rows)
    }
}

fn sort_by_priority(rows: &mut [StoredScore]) {
    rows.sort_by(|a, b| {
        b.result
            .total_priority_score
            .cmp(&a.result.total_priority_score)
            .then_with(|| a.result.application_id.cmp(&b.result.application_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use zakat_priority::scoring::{compute_score, ScoringConfig, SnapshotImporter};

    fn result_for(id: &str, input: &ScoringInput) -> ScoreResult {
        compute_score(&ApplicationId::from(id), input, &ScoringConfig::default())
    }

    #[test]
    fn upsert_replaces_rows_and_never_moves_timestamp_backwards() {
        let store = InMemoryScoreStore::default();
        let input = ScoringInput::default();

        let first = store.upsert(result_for("APP-1", &input)).expect("insert");
        let second = store.upsert(result_for("APP-1", &input)).expect("update");

        assert!(second.calculated_at >= first.calculated_at);
        assert_eq!(store.ranked(10).expect("ranked").len(), 1);
        assert_eq!(
            store
                .fetch(&ApplicationId::from("APP-1"))
                .expect("fetch")
                .expect("row"),
            second
        );
    }

    #[test]
    fn seeded_source_distinguishes_missing_from_empty() {
        let source = InMemorySnapshotSource::seeded(vec![(
            ApplicationId::from("APP-EMPTY"),
            ScoringInput::default(),
        )]);

        assert_eq!(source.len(), 1);
        assert_eq!(
            source
                .fetch_snapshot(&ApplicationId::from("APP-EMPTY"))
                .expect("fetch"),
            Some(ScoringInput::default())
        );
        assert_eq!(
            source
                .fetch_snapshot(&ApplicationId::from("APP-NONE"))
                .expect("fetch"),
            None
        );
    }

    #[test]
    fn fixture_export_seeds_every_application() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/applications.csv");
        let snapshots = SnapshotImporter::from_path(path).expect("fixture imports");
        let source = InMemorySnapshotSource::seeded(snapshots);

        assert_eq!(source.len(), 4);
        let divorced = source
            .fetch_snapshot(&ApplicationId::from("APP-4"))
            .expect("fetch")
            .expect("seeded");
        assert_eq!(divorced.marital_status.as_deref(), Some("Divorced"));
    }
}
