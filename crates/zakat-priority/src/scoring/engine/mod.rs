mod config;
mod policy;
mod rules;

pub use config::{
    DebtTier, DependentTier, IncomeTier, MaritalBonus, RecommendationThresholds,
    ScoreWeights, ScoringConfig, ScoringConfigError,
};
pub use policy::{EligibilityStatus, Recommendation};

use super::domain::{ApplicationId, ScoringInput};
use policy::{decide_eligibility, recommend, weighted_total};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stateless engine that applies a scoring rubric to application snapshots.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, application_id: &ApplicationId, input: &ScoringInput) -> ScoreResult {
        compute_score(application_id, input, &self.config)
    }
}

/// Computes the priority score for one application.
///
/// Identical inputs and configuration always produce an identical result. Missing
/// figures count as zero and unknown categories earn no points, so this never fails.
pub fn compute_score(
    application_id: &ApplicationId,
    input: &ScoringInput,
    config: &ScoringConfig,
) -> ScoreResult {
    let (components, scores) = rules::score_input(input, config);
    let total_priority_score = weighted_total(scores, &config.weights);

    ScoreResult {
        application_id: application_id.clone(),
        financial_score: scores.financial,
        household_score: scores.household,
        circumstances_score: scores.circumstances,
        total_priority_score,
        eligibility_status: decide_eligibility(scores),
        system_recommendation: recommend(total_priority_score, &config.recommendation_thresholds),
        poverty_line_used: config.poverty_line_income,
        nisab_threshold_used: config.nisab_threshold,
        components,
    }
}

/// Factor that contributed points to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    IncomeRatio,
    DebtRatio,
    Dependents,
    MaritalStatus,
    AsnafCategory,
}

/// Discrete contribution to a score, kept for staff-facing audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: u32,
    pub notes: String,
}

/// Score breakdown for one application, excluding the persistence timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub application_id: ApplicationId,
    pub financial_score: u32,
    pub household_score: u32,
    pub circumstances_score: u32,
    pub total_priority_score: i64,
    pub eligibility_status: EligibilityStatus,
    pub system_recommendation: Recommendation,
    pub poverty_line_used: Decimal,
    pub nisab_threshold_used: Decimal,
    #[serde(default)]
    pub components: Vec<ScoreComponent>,
}
