use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::config::{RecommendationThresholds, ScoreWeights};
use super::rules::SubScores;

/// Triage tier suggested to reviewing staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "High Priority / Critical")]
    Critical,
    #[serde(rename = "High Priority")]
    HighPriority,
    #[serde(rename = "Standard Review")]
    StandardReview,
    #[serde(rename = "Low Priority / Further Review Needed")]
    LowPriority,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "High Priority / Critical",
            Self::HighPriority => "High Priority",
            Self::StandardReview => "Standard Review",
            Self::LowPriority => "Low Priority / Further Review Needed",
        }
    }
}

/// Eligibility verdict recorded alongside the score.
///
/// Only `Eligible` exists today; no disqualification rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EligibilityStatus {
    Eligible,
}

impl EligibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eligible => "Eligible",
        }
    }
}

/// Weighted sum of the sub-scores, rounded half away from zero.
///
/// Sums that overflow the decimal range saturate at `i64::MAX`.
pub(crate) fn weighted_total(scores: SubScores, weights: &ScoreWeights) -> i64 {
    let parts = [
        (scores.financial, weights.financial),
        (scores.household, weights.household),
        (scores.circumstances, weights.circumstances),
    ];
    let weighted = parts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, (points, weight)| {
            Decimal::from(points)
                .checked_mul(weight)
                .and_then(|part| total.checked_add(part))
        });

    weighted
        .map(|total| total.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|total| total.to_i64())
        .unwrap_or(i64::MAX)
}

/// Tiers are checked from most to least urgent, so the thresholds never overlap.
pub(crate) fn recommend(total: i64, thresholds: &RecommendationThresholds) -> Recommendation {
    if total >= thresholds.critical {
        Recommendation::Critical
    } else if total >= thresholds.high {
        Recommendation::HighPriority
    } else if total <= thresholds.low {
        Recommendation::LowPriority
    } else {
        Recommendation::StandardReview
    }
}

pub(crate) fn decide_eligibility(_scores: SubScores) -> EligibilityStatus {
    EligibilityStatus::Eligible
}
