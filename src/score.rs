use crate::models::{Category, CategoryResult, ColorCode, PerformanceMetrics};
use crate::tiers::{self, ResolvedRule};

pub const ABSENTEEISM_FULL_SCORE: u32 = 15;
pub const ABSENTEEISM_DEDUCTION: u32 = 5;
pub const ON_TIME_FULL_SCORE: u32 = 5;

/// Raw counters for one period, ready to be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringBasis {
    pub metrics: PerformanceMetrics,
    pub training_count: u32,
    pub weeks: u32,
}

impl ScoringBasis {
    pub fn current_data(&self, category: Category) -> u64 {
        match category {
            Category::Absenteeism => self.metrics.absenteeism,
            Category::ArrivingOnTime => self.metrics.lateness,
            Category::Visitor => self.metrics.visitors,
            Category::Referrals => self.metrics.referrals,
            Category::Tyfcb => self.metrics.tyfcb,
            Category::Testimonial => self.metrics.testimonials,
            Category::Training => u64::from(self.training_count),
        }
    }

    pub fn resolved_rules(&self, category: Category) -> Vec<ResolvedRule> {
        tiers::apply_multiplier_rules(self.weeks, tiers::rules_for(category))
    }
}

pub fn absenteeism_score(absences: u64) -> u32 {
    let deduction = absences.saturating_mul(u64::from(ABSENTEEISM_DEDUCTION));
    u64::from(ABSENTEEISM_FULL_SCORE).saturating_sub(deduction) as u32
}

pub fn arriving_on_time_score(late_count: u64) -> u32 {
    if late_count > 0 {
        0
    } else {
        ON_TIME_FULL_SCORE
    }
}

pub fn category_score(category: Category, basis: &ScoringBasis) -> u32 {
    let raw = basis.current_data(category);
    match category {
        Category::Absenteeism => absenteeism_score(raw),
        Category::ArrivingOnTime => arriving_on_time_score(raw),
        _ => tiers::score_against_threshold(raw, &basis.resolved_rules(category)),
    }
}

/// Fixed score-to-color table per category. Scores outside the table are grey.
pub fn color_for_score(category: Category, score: u32) -> ColorCode {
    use ColorCode::{Green, Grey, Red, Yellow};

    match (category, score) {
        (Category::Absenteeism, 0) => Grey,
        (Category::Absenteeism, 5) => Red,
        (Category::Absenteeism, 10) => Yellow,
        (Category::Absenteeism, 15) => Green,

        (Category::ArrivingOnTime, 0) => Red,
        (Category::ArrivingOnTime, 5) => Green,

        (Category::Referrals, 0 | 5) => Grey,
        (Category::Referrals, 10) => Red,
        (Category::Referrals, 15) => Yellow,
        (Category::Referrals, 20) => Green,

        (Category::Visitor, 0) => Grey,
        (Category::Visitor, 5) => Red,
        (Category::Visitor, 10) => Yellow,
        (Category::Visitor, 15 | 20) => Green,

        (Category::Tyfcb | Category::Training, 0) => Grey,
        (Category::Tyfcb | Category::Training, 5) => Red,
        (Category::Tyfcb | Category::Training, 10) => Yellow,
        (Category::Tyfcb | Category::Training, 15) => Green,

        (Category::Testimonial, 0) => Red,
        (Category::Testimonial, 5) => Yellow,
        (Category::Testimonial, 10) => Green,

        _ => Grey,
    }
}

pub fn score_categories(basis: &ScoringBasis) -> Vec<CategoryResult> {
    Category::ALL
        .iter()
        .map(|&category| {
            let current_score = category_score(category, basis);
            CategoryResult {
                name: category,
                current_score,
                current_data: basis.current_data(category),
                color_code: color_for_score(category, current_score),
            }
        })
        .collect()
}

pub fn total_score(results: &[CategoryResult]) -> u32 {
    results.iter().map(|result| result.current_score).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basis(metrics: PerformanceMetrics, training_count: u32, weeks: u32) -> ScoringBasis {
        ScoringBasis {
            metrics,
            training_count,
            weeks,
        }
    }

    #[test]
    fn absenteeism_deducts_five_per_absence() {
        assert_eq!(absenteeism_score(0), 15);
        assert_eq!(absenteeism_score(1), 10);
        assert_eq!(absenteeism_score(2), 5);
        assert_eq!(absenteeism_score(3), 0);
        assert_eq!(absenteeism_score(4), 0);
        assert_eq!(absenteeism_score(u64::MAX), 0);
    }

    #[test]
    fn arriving_on_time_is_all_or_nothing() {
        assert_eq!(arriving_on_time_score(0), 5);
        assert_eq!(arriving_on_time_score(1), 0);
        assert_eq!(arriving_on_time_score(9), 0);
    }

    #[test]
    fn colors_follow_category_tables() {
        use crate::models::ColorCode::{Green, Grey, Red, Yellow};

        let table = [
            (Category::Absenteeism, 0, Grey),
            (Category::Absenteeism, 5, Red),
            (Category::Absenteeism, 10, Yellow),
            (Category::Absenteeism, 15, Green),
            (Category::Absenteeism, 20, Grey),
            (Category::ArrivingOnTime, 0, Red),
            (Category::ArrivingOnTime, 5, Green),
            (Category::ArrivingOnTime, 10, Grey),
            (Category::Referrals, 0, Grey),
            (Category::Referrals, 5, Grey),
            (Category::Referrals, 10, Red),
            (Category::Referrals, 15, Yellow),
            (Category::Referrals, 20, Green),
            (Category::Referrals, 25, Grey),
            (Category::Visitor, 0, Grey),
            (Category::Visitor, 5, Red),
            (Category::Visitor, 10, Yellow),
            (Category::Visitor, 15, Green),
            (Category::Visitor, 20, Green),
            (Category::Visitor, 25, Grey),
            (Category::Tyfcb, 0, Grey),
            (Category::Tyfcb, 5, Red),
            (Category::Tyfcb, 10, Yellow),
            (Category::Tyfcb, 15, Green),
            (Category::Tyfcb, 20, Grey),
            (Category::Testimonial, 0, Red),
            (Category::Testimonial, 5, Yellow),
            (Category::Testimonial, 10, Green),
            (Category::Testimonial, 15, Grey),
            (Category::Training, 0, Grey),
            (Category::Training, 5, Red),
            (Category::Training, 10, Yellow),
            (Category::Training, 15, Green),
            (Category::Training, 20, Grey),
        ];

        for (category, score, expected) in table {
            assert_eq!(color_for_score(category, score), expected, "{category} {score}");
        }
        assert_eq!(color_for_score(Category::Absenteeism, 7), Grey);
    }

    #[test]
    fn categories_are_scored_in_report_order() {
        let metrics = PerformanceMetrics {
            absenteeism: 0,
            lateness: 0,
            referrals: 15,
            visitors: 8,
            tyfcb: 600_000,
            testimonials: 1,
            ..PerformanceMetrics::default()
        };
        let results = score_categories(&basis(metrics, 2, 26));

        let scores: Vec<(Category, u32, ColorCode)> = results
            .iter()
            .map(|r| (r.name, r.current_score, r.color_code))
            .collect();
        assert_eq!(
            scores,
            vec![
                (Category::Absenteeism, 15, ColorCode::Green),
                (Category::ArrivingOnTime, 5, ColorCode::Green),
                (Category::Visitor, 10, ColorCode::Yellow),
                (Category::Referrals, 5, ColorCode::Grey),
                (Category::Tyfcb, 5, ColorCode::Red),
                (Category::Testimonial, 5, ColorCode::Yellow),
                (Category::Training, 10, ColorCode::Yellow),
            ]
        );
        assert_eq!(total_score(&results), 55);
    }

    #[test]
    fn training_count_is_reported_as_current_data() {
        let results = score_categories(&basis(PerformanceMetrics::default(), 3, 10));
        let training = results
            .iter()
            .find(|r| r.name == Category::Training)
            .unwrap();
        assert_eq!(training.current_data, 3);
        assert_eq!(training.current_score, 15);
    }
}
