use crate::models::Category;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierRule {
    Multiplier { tier: u32, factor: f64 },
    Threshold { tier: u32, value: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRule {
    pub tier: u32,
    pub target: u64,
}

pub const REFERRAL_RULES: [TierRule; 4] = [
    TierRule::Multiplier { tier: 5, factor: 0.5 },
    TierRule::Multiplier { tier: 10, factor: 0.75 },
    TierRule::Multiplier { tier: 15, factor: 1.0 },
    TierRule::Multiplier { tier: 20, factor: 1.2 },
];

pub const VISITOR_RULES: [TierRule; 4] = [
    TierRule::Multiplier { tier: 5, factor: 0.10 },
    TierRule::Multiplier { tier: 10, factor: 0.25 },
    TierRule::Multiplier { tier: 15, factor: 0.50 },
    TierRule::Multiplier { tier: 20, factor: 0.75 },
];

// The 5 point factor is tiny so that any single testimonial qualifies once a
// member has at least one week.
pub const TESTIMONIAL_RULES: [TierRule; 2] = [
    TierRule::Multiplier { tier: 5, factor: 0.0000001 },
    TierRule::Multiplier { tier: 10, factor: 0.074 },
];

pub const TYFCB_RULES: [TierRule; 3] = [
    TierRule::Threshold { tier: 5, value: 500_000 },
    TierRule::Threshold { tier: 10, value: 1_000_000 },
    TierRule::Threshold { tier: 15, value: 2_000_000 },
];

pub const TRAINING_RULES: [TierRule; 3] = [
    TierRule::Threshold { tier: 5, value: 1 },
    TierRule::Threshold { tier: 10, value: 2 },
    TierRule::Threshold { tier: 15, value: 3 },
];

/// The declared table for a tiered category; empty for the formula-scored ones.
pub fn rules_for(category: Category) -> &'static [TierRule] {
    match category {
        Category::Referrals => &REFERRAL_RULES,
        Category::Visitor => &VISITOR_RULES,
        Category::Testimonial => &TESTIMONIAL_RULES,
        Category::Tyfcb => &TYFCB_RULES,
        Category::Training => &TRAINING_RULES,
        Category::Absenteeism | Category::ArrivingOnTime => &[],
    }
}

impl TierRule {
    pub fn resolve(&self, weeks: u32) -> ResolvedRule {
        match *self {
            Self::Multiplier { tier, factor } => ResolvedRule {
                tier,
                target: (weeks as f64 * factor).ceil() as u64,
            },
            Self::Threshold { tier, value } => ResolvedRule {
                tier,
                target: value,
            },
        }
    }
}

pub fn apply_multiplier_rules(weeks: u32, rules: &[TierRule]) -> Vec<ResolvedRule> {
    rules.iter().map(|rule| rule.resolve(weeks)).collect()
}

/// Highest tier whose target the raw value reaches, or 0. Rule order does not
/// matter.
pub fn score_against_threshold(raw_value: u64, rules: &[ResolvedRule]) -> u32 {
    rules
        .iter()
        .filter(|rule| raw_value >= rule.target)
        .map(|rule| rule.tier)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(resolved: &[ResolvedRule]) -> Vec<u64> {
        resolved.iter().map(|rule| rule.target).collect()
    }

    #[test]
    fn referral_table_resolves_against_full_window() {
        let resolved = apply_multiplier_rules(26, &REFERRAL_RULES);
        assert_eq!(targets(&resolved), vec![13, 20, 26, 32]);
        assert_eq!(score_against_threshold(20, &resolved), 10);
        assert_eq!(score_against_threshold(12, &resolved), 0);
        assert_eq!(score_against_threshold(40, &resolved), 20);
    }

    #[test]
    fn visitor_and_testimonial_targets_round_up() {
        assert_eq!(targets(&apply_multiplier_rules(26, &VISITOR_RULES)), vec![3, 7, 13, 20]);
        assert_eq!(targets(&apply_multiplier_rules(26, &TESTIMONIAL_RULES)), vec![1, 2]);
        assert_eq!(targets(&apply_multiplier_rules(1, &TESTIMONIAL_RULES)), vec![1, 1]);
    }

    #[test]
    fn threshold_rules_ignore_weeks() {
        assert_eq!(
            targets(&apply_multiplier_rules(0, &TYFCB_RULES)),
            vec![500_000, 1_000_000, 2_000_000]
        );
        assert_eq!(targets(&apply_multiplier_rules(26, &TRAINING_RULES)), vec![1, 2, 3]);
    }

    #[test]
    fn tyfcb_between_thresholds_scores_lower_tier() {
        let resolved = apply_multiplier_rules(0, &TYFCB_RULES);
        assert_eq!(score_against_threshold(1_500_000, &resolved), 10);
        assert_eq!(score_against_threshold(499_999, &resolved), 0);
        assert_eq!(score_against_threshold(2_000_000, &resolved), 15);
    }

    #[test]
    fn zero_weeks_makes_every_multiplier_target_zero() {
        let resolved = apply_multiplier_rules(0, &REFERRAL_RULES);
        assert_eq!(targets(&resolved), vec![0, 0, 0, 0]);
        assert_eq!(score_against_threshold(0, &resolved), 20);
    }

    #[test]
    fn rule_order_does_not_change_the_tier() {
        let resolved = apply_multiplier_rules(26, &REFERRAL_RULES);
        let mut reversed = resolved.clone();
        reversed.reverse();
        let mut rotated = resolved.clone();
        rotated.rotate_left(2);

        for raw in 0..40 {
            let expected = score_against_threshold(raw, &resolved);
            assert_eq!(score_against_threshold(raw, &reversed), expected);
            assert_eq!(score_against_threshold(raw, &rotated), expected);
        }
    }

    #[test]
    fn formula_categories_have_no_table() {
        assert!(rules_for(Category::Absenteeism).is_empty());
        assert!(rules_for(Category::ArrivingOnTime).is_empty());
        assert_eq!(rules_for(Category::Testimonial).len(), 2);
        assert_eq!(
            rules_for(Category::Referrals)[3],
            TierRule::Multiplier { tier: 20, factor: 1.2 }
        );
    }
}
