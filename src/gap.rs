use crate::models::{Category, ColorCode, GapCell, GapEntry, GapValue};
use crate::score::ScoringBasis;
use crate::tiers::ResolvedRule;

const BACKFILL: GapCell = GapCell {
    value: GapValue::NotApplicable,
    color_code: Some(ColorCode::Grey),
};

/// Static color shown next to each need-to-do target. Independent of the gap
/// size; formula-scored categories have none.
pub fn need_to_do_color(category: Category, tier: u32) -> Option<ColorCode> {
    use ColorCode::{Green, Grey, Red, Yellow};

    let color = match (category, tier) {
        (Category::Visitor | Category::Tyfcb | Category::Training, 5) => Red,
        (Category::Visitor | Category::Tyfcb | Category::Training, 10) => Yellow,
        (Category::Visitor | Category::Tyfcb | Category::Training, 15 | 20) => Green,

        (Category::Referrals, 5) => Grey,
        (Category::Referrals, 10) => Red,
        (Category::Referrals, 15) => Yellow,
        (Category::Referrals, 20) => Green,

        (Category::Testimonial, 5) => Yellow,
        (Category::Testimonial, 10 | 15 | 20) => Green,

        _ => return None,
    };
    Some(color)
}

pub fn gap_value(target: u64, current: u64) -> GapValue {
    GapValue::Amount(target.saturating_sub(current))
}

pub fn build_gap(category: Category, current: u64, resolved: &[ResolvedRule]) -> GapEntry {
    let mut entry = GapEntry {
        name: category,
        five_points: BACKFILL,
        ten_points: BACKFILL,
        fifteen_points: BACKFILL,
        twenty_points: BACKFILL,
    };

    for rule in resolved {
        let slot = match rule.tier {
            5 => &mut entry.five_points,
            10 => &mut entry.ten_points,
            15 => &mut entry.fifteen_points,
            20 => &mut entry.twenty_points,
            other => {
                log::debug!("{category}: tier {other} has no need-to-do column");
                continue;
            }
        };
        *slot = GapCell {
            value: gap_value(rule.target, current),
            color_code: need_to_do_color(category, rule.tier),
        };
    }

    entry
}

/// One row per tiered category. Absenteeism and arriving on time are left out.
pub fn build_need_to_do(basis: &ScoringBasis) -> Vec<GapEntry> {
    Category::ALL
        .iter()
        .filter(|category| category.is_tiered())
        .map(|&category| {
            build_gap(
                category,
                basis.current_data(category),
                &basis.resolved_rules(category),
            )
        })
        .collect()
}
