use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::scoring::domain::{ApplicationId, ScoringInput};
use crate::scoring::engine::{ScoreResult, ScoringConfig, ScoringEngine};
use crate::scoring::repository::{
    ApplicationSnapshotSource, ScoreStore, SourceError, StoreError, StoredScore,
};
use crate::scoring::{scoring_router, PriorityScoringService};

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig::with_reference_values(Decimal::from(2208), Decimal::from(25000))
}

pub(super) fn scoring_engine() -> ScoringEngine {
    ScoringEngine::new(scoring_config())
}

/// Widowed Fakir household well below the poverty line with heavy debts.
pub(super) fn destitute_household() -> ScoringInput {
    ScoringInput {
        applicant_salary: Some(Decimal::from(300)),
        marital_status: Some("Widowed".to_string()),
        total_household_income: Some(Decimal::from(500)),
        outstanding_debts: Some(Decimal::from(2000)),
        number_of_dependents: Some(4),
        dependent_count: Some(6),
        asnaf_category: Some("Fakir".to_string()),
    }
}

/// Single applicant earning several times the poverty line.
pub(super) fn comfortable_household() -> ScoringInput {
    ScoringInput {
        applicant_salary: Some(Decimal::from(10000)),
        marital_status: Some("Single".to_string()),
        total_household_income: Some(Decimal::from(10000)),
        outstanding_debts: Some(Decimal::ZERO),
        number_of_dependents: Some(0),
        dependent_count: Some(0),
        asnaf_category: None,
    }
}

pub(super) fn app_id(raw: &str) -> ApplicationId {
    ApplicationId::from(raw)
}

#[derive(Default, Clone)]
pub(super) struct MemorySource {
    snapshots: Arc<Mutex<HashMap<ApplicationId, ScoringInput>>>,
}

impl MemorySource {
    pub(super) fn with(entries: Vec<(&str, ScoringInput)>) -> Self {
        let source = Self::default();
        for (id, input) in entries {
            source.put(id, input);
        }
        source
    }

    pub(super) fn put(&self, id: &str, input: ScoringInput) {
        self.snapshots
            .lock()
            .expect("source mutex poisoned")
            .insert(app_id(id), input);
    }
}

impl ApplicationSnapshotSource for MemorySource {
    fn fetch_snapshot(&self, id: &ApplicationId) -> Result<Option<ScoringInput>, SourceError> {
        Ok(self
            .snapshots
            .lock()
            .expect("source mutex poisoned")
            .get(id)
            .cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    rows: Arc<Mutex<HashMap<ApplicationId, StoredScore>>>,
}

impl MemoryStore {
    pub(super) fn len(&self) -> usize {
        self.rows.lock().expect("store mutex poisoned").len()
    }
}

impl ScoreStore for MemoryStore {
    fn upsert(&self, result: ScoreResult) -> Result<StoredScore, StoreError> {
        let mut guard = self.rows.lock().expect("store mutex poisoned");
        let stored = StoredScore {
            result,
            calculated_at: Utc::now(),
        };
        guard.insert(stored.result.application_id.clone(), stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<StoredScore>, StoreError> {
        Ok(self
            .rows
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn ranked(&self, limit: usize) -> Result<Vec<StoredScore>, StoreError> {
        let guard = self.rows.lock().expect("store mutex poisoned");
        let mut rows: Vec<StoredScore> = guard.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.result
                .total_priority_score
                .cmp(&a.result.total_priority_score)
                .then_with(|| a.result.application_id.cmp(&b.result.application_id))
        });
        rows.truncate(limit);
        Ok(rows)
    }
}

pub(super) struct UnavailableStore;

impl ScoreStore for UnavailableStore {
    fn upsert(&self, _result: ScoreResult) -> Result<StoredScore, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<StoredScore>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn ranked(&self, _limit: usize) -> Result<Vec<StoredScore>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct MalformedSource;

impl ApplicationSnapshotSource for MalformedSource {
    fn fetch_snapshot(&self, _id: &ApplicationId) -> Result<Option<ScoringInput>, SourceError> {
        Err(SourceError::Malformed("duplicate application rows".to_string()))
    }
}

pub(super) fn build_service() -> (
    PriorityScoringService<MemorySource, MemoryStore>,
    MemorySource,
    MemoryStore,
) {
    let source = MemorySource::with(vec![
        ("APP-1", destitute_household()),
        ("APP-2", comfortable_household()),
    ]);
    let store = MemoryStore::default();
    let service = PriorityScoringService::new(
        Arc::new(source.clone()),
        Arc::new(store.clone()),
        scoring_config(),
    );
    (service, source, store)
}

pub(super) fn scoring_router_with_service(
    service: PriorityScoringService<MemorySource, MemoryStore>,
) -> axum::Router {
    scoring_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
