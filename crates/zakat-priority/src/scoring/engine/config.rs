use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rubric configuration for priority scoring.
///
/// The poverty line and nisab are recorded on every result so that a stored score can
/// be traced back to the reference values it was computed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub poverty_line_income: Decimal,
    pub nisab_threshold: Decimal,
    #[serde(default = "default_income_tiers")]
    pub income_tiers: Vec<IncomeTier>,
    #[serde(default = "default_debt_tiers")]
    pub debt_tiers: Vec<DebtTier>,
    #[serde(default = "default_dependent_tiers")]
    pub dependent_tiers: Vec<DependentTier>,
    #[serde(default)]
    pub marital_bonus: MaritalBonus,
    #[serde(default = "default_asnaf_points")]
    pub asnaf_points: BTreeMap<String, u32>,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub recommendation_thresholds: RecommendationThresholds,
}

/// Income-to-poverty-line tier. The first tier whose `max_ratio` is not exceeded wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeTier {
    pub max_ratio: Decimal,
    pub points: u32,
}

/// Debt tier. Awarded when debts exceed `income_multiple` times household income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtTier {
    pub income_multiple: Decimal,
    pub points: u32,
}

/// Dependents tier. Awarded when the household has at least `min_dependents`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DependentTier {
    pub min_dependents: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaritalBonus {
    pub statuses: Vec<String>,
    pub points: u32,
}

impl Default for MaritalBonus {
    fn default() -> Self {
        Self {
            statuses: vec!["Widowed".to_string(), "Divorced".to_string()],
            points: 10,
        }
    }
}

/// Weights applied to each sub-score before rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub financial: Decimal,
    pub household: Decimal,
    pub circumstances: Decimal,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            financial: Decimal::new(5, 1),
            household: Decimal::new(3, 1),
            circumstances: Decimal::new(2, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    pub critical: i64,
    pub high: i64,
    pub low: i64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            critical: 85,
            high: 70,
            low: 40,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            poverty_line_income: Decimal::from(2208),
            nisab_threshold: Decimal::from(25000),
            income_tiers: default_income_tiers(),
            debt_tiers: default_debt_tiers(),
            dependent_tiers: default_dependent_tiers(),
            marital_bonus: MaritalBonus::default(),
            asnaf_points: default_asnaf_points(),
            weights: ScoreWeights::default(),
            recommendation_thresholds: RecommendationThresholds::default(),
        }
    }
}

impl ScoringConfig {
    /// Default rubric anchored to the supplied reference values.
    pub fn with_reference_values(poverty_line_income: Decimal, nisab_threshold: Decimal) -> Self {
        Self {
            poverty_line_income,
            nisab_threshold,
            ..Self::default()
        }
    }

    /// Checks that the tables keep the engine monotonic and the thresholds ordered.
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        if self.poverty_line_income <= Decimal::ZERO {
            return Err(ScoringConfigError::NonPositivePovertyLine(
                self.poverty_line_income,
            ));
        }

        if self.nisab_threshold < Decimal::ZERO {
            return Err(ScoringConfigError::NegativeNisab(self.nisab_threshold));
        }

        if !self
            .income_tiers
            .windows(2)
            .all(|pair| pair[0].max_ratio < pair[1].max_ratio)
        {
            return Err(ScoringConfigError::UnorderedTiers("income_tiers"));
        }

        if !self
            .debt_tiers
            .windows(2)
            .all(|pair| pair[0].income_multiple > pair[1].income_multiple)
        {
            return Err(ScoringConfigError::UnorderedTiers("debt_tiers"));
        }

        if !self
            .dependent_tiers
            .windows(2)
            .all(|pair| pair[0].min_dependents > pair[1].min_dependents)
        {
            return Err(ScoringConfigError::UnorderedTiers("dependent_tiers"));
        }

        let weights = [
            ("financial", self.weights.financial),
            ("household", self.weights.household),
            ("circumstances", self.weights.circumstances),
        ];
        if let Some((name, _)) = weights
            .iter()
            .find(|(_, weight)| *weight < Decimal::ZERO)
        {
            return Err(ScoringConfigError::NegativeWeight(*name));
        }

        let thresholds = self.recommendation_thresholds;
        if thresholds.low >= thresholds.high || thresholds.high > thresholds.critical {
            return Err(ScoringConfigError::UnorderedThresholds(thresholds));
        }

        Ok(())
    }
}

/// Reasons a scoring configuration is rejected at load time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("poverty line income must be positive, got {0}")]
    NonPositivePovertyLine(Decimal),
    #[error("nisab threshold must not be negative, got {0}")]
    NegativeNisab(Decimal),
    #[error("{0} must be strictly ordered from most to least needy")]
    UnorderedTiers(&'static str),
    #[error("{0} weight must not be negative")]
    NegativeWeight(&'static str),
    #[error("recommendation thresholds must satisfy low < high <= critical, got {0:?}")]
    UnorderedThresholds(RecommendationThresholds),
}

fn default_income_tiers() -> Vec<IncomeTier> {
    [(25, 30), (50, 20), (75, 10), (100, 5)]
        .into_iter()
        .map(|(hundredths, points)| IncomeTier {
            max_ratio: Decimal::new(hundredths, 2),
            points,
        })
        .collect()
}

fn default_debt_tiers() -> Vec<DebtTier> {
    vec![
        DebtTier {
            income_multiple: Decimal::from(3),
            points: 10,
        },
        DebtTier {
            income_multiple: Decimal::ONE,
            points: 5,
        },
    ]
}

fn default_dependent_tiers() -> Vec<DependentTier> {
    [(5, 20), (3, 15), (1, 10)]
        .into_iter()
        .map(|(min_dependents, points)| DependentTier {
            min_dependents,
            points,
        })
        .collect()
}

fn default_asnaf_points() -> BTreeMap<String, u32> {
    [
        ("Fakir", 20),
        ("Miskin", 15),
        ("Gharimin", 15),
        ("Ibnus Sabil", 10),
        ("Muallaf", 5),
    ]
    .into_iter()
    .map(|(category, points)| (category.to_string(), points))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ScoringConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.poverty_line_income, Decimal::from(2208));
        assert_eq!(config.nisab_threshold, Decimal::from(25000));
        assert_eq!(config.asnaf_points.get("Fakir"), Some(&20));
    }

    #[test]
    fn rejects_zero_poverty_line() {
        let config = ScoringConfig::with_reference_values(Decimal::ZERO, Decimal::from(25000));
        assert_eq!(
            config.validate(),
            Err(ScoringConfigError::NonPositivePovertyLine(Decimal::ZERO))
        );
    }

    #[test]
    fn rejects_out_of_order_income_tiers() {
        let mut config = ScoringConfig::default();
        config.income_tiers.swap(0, 1);
        assert_eq!(
            config.validate(),
            Err(ScoringConfigError::UnorderedTiers("income_tiers"))
        );
    }

    #[test]
    fn rejects_inverted_recommendation_thresholds() {
        let mut config = ScoringConfig::default();
        config.recommendation_thresholds.low = 75;
        assert!(matches!(
            config.validate(),
            Err(ScoringConfigError::UnorderedThresholds(_))
        ));
    }

    #[test]
    fn partial_json_fills_default_tables() {
        let config: ScoringConfig = serde_json::from_str(
            r#"{ "poverty_line_income": "2500", "nisab_threshold": 24000 }"#,
        )
        .expect("partial config parses");

        assert_eq!(config.poverty_line_income, Decimal::from(2500));
        assert_eq!(config.nisab_threshold, Decimal::from(24000));
        assert_eq!(config.income_tiers, ScoringConfig::default().income_tiers);
        assert_eq!(config.weights, ScoreWeights::default());
    }
}
