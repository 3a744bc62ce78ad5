use super::super::domain::ScoringInput;
use super::config::ScoringConfig;
use super::{ScoreComponent, ScoreFactor};

/// Unweighted sub-scores before the weighted total is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubScores {
    pub financial: u32,
    pub household: u32,
    pub circumstances: u32,
}

pub(crate) fn score_input(
    input: &ScoringInput,
    config: &ScoringConfig,
) -> (Vec<ScoreComponent>, SubScores) {
    let mut components = Vec::with_capacity(5);

    let income_points = income_ratio_points(input, config, &mut components);
    let debt_points = debt_points(input, config, &mut components);
    let dependents_points = dependents_points(input, config, &mut components);
    let marital_points = marital_points(input, config, &mut components);
    let circumstances = asnaf_points(input, config, &mut components);

    let scores = SubScores {
        financial: income_points.saturating_add(debt_points),
        household: dependents_points.saturating_add(marital_points),
        circumstances,
    };

    (components, scores)
}

fn income_ratio_points(
    input: &ScoringInput,
    config: &ScoringConfig,
    components: &mut Vec<ScoreComponent>,
) -> u32 {
    let income = input.household_income();

    // A zero poverty line leaves the ratio undefined, which never matches a tier.
    let Some(ratio) = income.checked_div(config.poverty_line_income) else {
        components.push(ScoreComponent {
            factor: ScoreFactor::IncomeRatio,
            points: 0,
            notes: format!(
                "income ratio undefined for poverty line {}",
                config.poverty_line_income
            ),
        });
        return 0;
    };

    match config
        .income_tiers
        .iter()
        .find(|tier| ratio <= tier.max_ratio)
    {
        Some(tier) => {
            components.push(ScoreComponent {
                factor: ScoreFactor::IncomeRatio,
                points: tier.points,
                notes: format!(
                    "income ratio {:.2} within tier <= {}",
                    ratio, tier.max_ratio
                ),
            });
            tier.points
        }
        None => {
            components.push(ScoreComponent {
                factor: ScoreFactor::IncomeRatio,
                points: 0,
                notes: format!("income ratio {:.2} above the poverty line", ratio),
            });
            0
        }
    }
}

fn debt_points(
    input: &ScoringInput,
    config: &ScoringConfig,
    components: &mut Vec<ScoreComponent>,
) -> u32 {
    let income = input.household_income();
    let debts = input.debts();

    let matched = config.debt_tiers.iter().find(|tier| {
        income
            .checked_mul(tier.income_multiple)
            .map(|limit| debts > limit)
            .unwrap_or(false)
    });

    let (points, notes) = match matched {
        Some(tier) => (
            tier.points,
            format!(
                "debts {} exceed {}x monthly household income {}",
                debts, tier.income_multiple, income
            ),
        ),
        None => (
            0,
            format!("debts {debts} within monthly household income {income}"),
        ),
    };

    components.push(ScoreComponent {
        factor: ScoreFactor::DebtRatio,
        points,
        notes,
    });
    points
}

fn dependents_points(
    input: &ScoringInput,
    config: &ScoringConfig,
    components: &mut Vec<ScoreComponent>,
) -> u32 {
    let dependents = input.effective_dependents();
    let points = config
        .dependent_tiers
        .iter()
        .find(|tier| dependents >= tier.min_dependents)
        .map(|tier| tier.points)
        .unwrap_or(0);

    components.push(ScoreComponent {
        factor: ScoreFactor::Dependents,
        points,
        notes: format!("{dependents} dependent(s)"),
    });
    points
}

fn marital_points(
    input: &ScoringInput,
    config: &ScoringConfig,
    components: &mut Vec<ScoreComponent>,
) -> u32 {
    let status = input.marital_status.as_deref();
    let qualifies = status
        .map(|status| {
            config
                .marital_bonus
                .statuses
                .iter()
                .any(|candidate| candidate == status)
        })
        .unwrap_or(false);

    let points = if qualifies {
        config.marital_bonus.points
    } else {
        0
    };

    components.push(ScoreComponent {
        factor: ScoreFactor::MaritalStatus,
        points,
        notes: match status {
            Some(status) => format!("marital status {status}"),
            None => "marital status not recorded".to_string(),
        },
    });
    points
}

fn asnaf_points(
    input: &ScoringInput,
    config: &ScoringConfig,
    components: &mut Vec<ScoreComponent>,
) -> u32 {
    let category = input.asnaf_category.as_deref();
    let points = category
        .and_then(|category| config.asnaf_points.get(category))
        .copied()
        .unwrap_or(0);

    components.push(ScoreComponent {
        factor: ScoreFactor::AsnafCategory,
        points,
        notes: match category {
            Some(category) if points > 0 => format!("asnaf category {category}"),
            Some(category) => format!("asnaf category {category} carries no points"),
            None => "asnaf category not recorded".to_string(),
        },
    });
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn with_income(income: i64) -> ScoringInput {
        ScoringInput {
            total_household_income: Some(Decimal::from(income)),
            ..ScoringInput::default()
        }
    }

    fn config_with_line(line: i64) -> ScoringConfig {
        ScoringConfig::with_reference_values(Decimal::from(line), Decimal::from(25000))
    }

    #[test]
    fn income_tier_upper_bounds_are_inclusive() {
        let config = config_with_line(1000);
        let cases = [(250, 30), (500, 20), (750, 10), (1000, 5), (1010, 0)];

        for (income, expected) in cases {
            let (_, scores) = score_input(&with_income(income), &config);
            assert_eq!(
                scores.financial, expected,
                "income {income} should earn {expected} financial points"
            );
        }
    }

    #[test]
    fn zero_poverty_line_awards_no_income_points() {
        let config = config_with_line(0);
        let (components, scores) = score_input(&with_income(0), &config);

        assert_eq!(scores.financial, 0);
        assert!(components[0].notes.contains("undefined"));
    }

    #[test]
    fn debt_points_compare_against_monthly_income() {
        let config = config_with_line(100);
        let mut input = with_income(1000);

        input.outstanding_debts = Some(Decimal::from(3001));
        let (_, scores) = score_input(&input, &config);
        assert_eq!(scores.financial, 10);

        input.outstanding_debts = Some(Decimal::from(3000));
        let (_, scores) = score_input(&input, &config);
        assert_eq!(scores.financial, 5);

        input.outstanding_debts = Some(Decimal::from(1000));
        let (_, scores) = score_input(&input, &config);
        assert_eq!(scores.financial, 0);
    }

    #[test]
    fn any_debt_with_no_income_earns_top_debt_tier() {
        let config = ScoringConfig::default();
        let input = ScoringInput {
            outstanding_debts: Some(Decimal::ONE),
            ..ScoringInput::default()
        };

        let (_, scores) = score_input(&input, &config);
        assert_eq!(scores.financial, 40);
    }

    #[test]
    fn dependents_tiers_and_marital_bonus() {
        let config = ScoringConfig::default();
        let cases = [(0, 0), (1, 10), (2, 10), (3, 15), (4, 15), (5, 20), (9, 20)];

        for (dependents, expected) in cases {
            let input = ScoringInput {
                number_of_dependents: Some(dependents),
                marital_status: Some("Married".to_string()),
                ..ScoringInput::default()
            };
            let (_, scores) = score_input(&input, &config);
            assert_eq!(scores.household, expected, "{dependents} dependents");
        }

        for status in ["Widowed", "Divorced"] {
            let input = ScoringInput {
                marital_status: Some(status.to_string()),
                ..ScoringInput::default()
            };
            let (_, scores) = score_input(&input, &config);
            assert_eq!(scores.household, 10, "{status} earns the bonus");
        }
    }

    #[test]
    fn marital_status_match_is_case_sensitive() {
        let input = ScoringInput {
            marital_status: Some("widowed".to_string()),
            ..ScoringInput::default()
        };
        let (_, scores) = score_input(&input, &ScoringConfig::default());
        assert_eq!(scores.household, 0);
    }

    #[test]
    fn oversized_tier_points_saturate() {
        let mut config = ScoringConfig::default();
        config.income_tiers[0].points = u32::MAX;
        config.marital_bonus.points = u32::MAX;
        assert_eq!(config.validate(), Ok(()));

        let input = ScoringInput {
            outstanding_debts: Some(Decimal::ONE),
            number_of_dependents: Some(5),
            marital_status: Some("Widowed".to_string()),
            ..ScoringInput::default()
        };
        let (_, scores) = score_input(&input, &config);

        assert_eq!(scores.financial, u32::MAX);
        assert_eq!(scores.household, u32::MAX);
    }

    #[test]
    fn asnaf_lookup_is_exact() {
        let config = ScoringConfig::default();
        let cases = [
            ("Fakir", 20),
            ("Miskin", 15),
            ("Gharimin", 15),
            ("Ibnus Sabil", 10),
            ("Muallaf", 5),
            ("Unknown", 0),
            ("fakir", 0),
        ];

        for (category, expected) in cases {
            let input = ScoringInput {
                asnaf_category: Some(category.to_string()),
                ..ScoringInput::default()
            };
            let (components, scores) = score_input(&input, &config);
            assert_eq!(scores.circumstances, expected, "{category}");
            assert_eq!(components.len(), 5);
        }
    }
}
