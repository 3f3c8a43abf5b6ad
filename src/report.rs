use std::fmt::Write;

use chrono::{Months, NaiveDate};

use crate::gap;
use crate::metrics;
use crate::models::{
    Category, GapValue, HistoryMember, HistoryReport, MemberProfile, MonthlyCategoryScore,
    MonthlyPerformance, PerformanceReport, RawPerformanceRecord, ScoringInput, UserInfo,
};
use crate::score::{self, ScoringBasis};
use crate::window;

pub const HISTORY_MONTHS: u32 = 6;

/// A stored record paired with the training count of its own window.
#[derive(Debug, Clone)]
pub struct PeriodRecord {
    pub record: RawPerformanceRecord,
    pub training_count: u32,
}

pub fn build_report(input: &ScoringInput, today: NaiveDate) -> PerformanceReport {
    let member = &input.member;
    let Some(record) = input.record.as_ref() else {
        log::info!("no performance record for {}", member.email);
        return empty_report(member, today);
    };

    let metrics = metrics::extract(record);
    let wednesday_count = window::meeting_count(metrics.target_date, member.join_date);
    let weeks = window::compute_weeks(metrics.target_date, member.join_date);
    let basis = ScoringBasis {
        metrics,
        training_count: input.training_count,
        weeks,
    };

    let performance = score::score_categories(&basis);
    let need_to_do = gap::build_need_to_do(&basis);
    let total_score = score::total_score(&performance);

    PerformanceReport {
        status: true,
        message: "Performance report generated.".to_string(),
        performance,
        need_to_do,
        user_info: UserInfo {
            chapter: member.chapter.clone(),
            target_month: metrics.target_date.map(window::period_label),
            name: member.full_name.clone(),
            total_score,
            wednesday_count,
            weeks,
        },
    }
}

pub fn empty_report(member: &MemberProfile, today: NaiveDate) -> PerformanceReport {
    PerformanceReport {
        status: false,
        message: "No performance record found.".to_string(),
        performance: Vec::new(),
        need_to_do: Vec::new(),
        user_info: UserInfo {
            chapter: member.chapter.clone(),
            target_month: Some(window::period_label(today)),
            name: member.full_name.clone(),
            total_score: 0,
            wednesday_count: 0,
            weeks: 0,
        },
    }
}

/// The record for the requested month, or the most recent one when no period
/// is requested. Undated records are a last resort.
pub fn select_record(
    records: &[RawPerformanceRecord],
    period: Option<NaiveDate>,
) -> Option<&RawPerformanceRecord> {
    let dated = records.iter().filter_map(|record| {
        metrics::normalize_date(record.targeted_date.as_deref()).map(|date| (date, record))
    });

    match period {
        Some(period) => dated
            .filter(|(date, _)| window::same_month(*date, period))
            .max_by_key(|(date, _)| *date)
            .map(|(_, record)| record),
        None => dated
            .max_by_key(|(date, _)| *date)
            .map(|(_, record)| record)
            .or_else(|| records.first()),
    }
}

pub fn history_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(HISTORY_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

/// Dated records inside the history window, newest first.
pub fn history_candidates(
    records: &[RawPerformanceRecord],
    today: NaiveDate,
) -> Vec<(NaiveDate, &RawPerformanceRecord)> {
    let start = history_start(today);
    let mut candidates: Vec<(NaiveDate, &RawPerformanceRecord)> = records
        .iter()
        .filter_map(|record| {
            metrics::normalize_date(record.targeted_date.as_deref()).map(|date| (date, record))
        })
        .filter(|(date, _)| *date >= start && *date <= today)
        .collect();

    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates
}

/// Month-by-month scores where `weeks` is the month's own attendance tally
/// (present + absent + late + medical + substitute).
pub fn build_history(
    member: &MemberProfile,
    periods: &[PeriodRecord],
    today: NaiveDate,
) -> HistoryReport {
    let start = history_start(today);
    let mut months: Vec<(NaiveDate, MonthlyPerformance)> = periods
        .iter()
        .filter_map(|period| {
            let metrics = metrics::extract(&period.record);
            let date = metrics.target_date?;
            if date < start || date > today {
                return None;
            }

            let basis = ScoringBasis {
                metrics,
                training_count: period.training_count,
                weeks: u32::try_from(metrics.attendance_tally).unwrap_or(u32::MAX),
            };
            let performance: Vec<MonthlyCategoryScore> = Category::ALL
                .iter()
                .map(|&category| MonthlyCategoryScore {
                    name: category,
                    current_score: score::category_score(category, &basis),
                    current_data: basis.current_data(category),
                })
                .collect();
            let total_score = performance.iter().map(|entry| entry.current_score).sum();

            Some((
                date,
                MonthlyPerformance {
                    month: Some(window::period_label(date)),
                    performance,
                    total_score,
                },
            ))
        })
        .collect();
    months.sort_by(|a, b| b.0.cmp(&a.0));

    let user_info = HistoryMember {
        name: member.full_name.clone(),
        chapter: member.chapter.clone(),
    };

    if months.is_empty() {
        return HistoryReport {
            status: false,
            message: format!("No performance records found in the last {HISTORY_MONTHS} months."),
            user_info,
            reports: Vec::new(),
        };
    }

    HistoryReport {
        status: true,
        message: format!("Fetched last {HISTORY_MONTHS} months of performance."),
        user_info,
        reports: months.into_iter().map(|(_, month)| month).collect(),
    }
}

pub fn render_markdown(report: &PerformanceReport) -> String {
    let mut output = String::new();
    let info = &report.user_info;

    let _ = writeln!(output, "# Member Performance Report");
    let _ = writeln!(
        output,
        "{} ({}) for {}",
        info.name,
        info.chapter.as_deref().unwrap_or("no chapter"),
        info.target_month.as_deref().unwrap_or("unknown period")
    );
    let _ = writeln!(
        output,
        "Total score {} over {} weeks ({} meetings since joining)",
        info.total_score, info.weeks, info.wednesday_count
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance");

    if report.performance.is_empty() {
        let _ = writeln!(output, "{}", report.message);
    } else {
        for result in report.performance.iter() {
            let _ = writeln!(
                output,
                "- {}: {} points from {} ({})",
                result.name,
                result.current_score,
                result.current_data,
                result.color_code.as_str()
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Need To Do");

    if report.need_to_do.is_empty() {
        let _ = writeln!(output, "Nothing to report for this period.");
    } else {
        for entry in report.need_to_do.iter() {
            let steps: Vec<String> = entry
                .cells()
                .iter()
                .map(|(label, cell)| match cell.value {
                    GapValue::Amount(value) => format!("{label} +{value}"),
                    GapValue::NotApplicable => format!("{label} -"),
                })
                .collect();
            let _ = writeln!(output, "- {}: {}", entry.name, steps.join(", "));
        }
    }

    output
}

pub fn render_history_markdown(history: &HistoryReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Member Performance History");
    let _ = writeln!(
        output,
        "{} ({})",
        history.user_info.name,
        history.user_info.chapter.as_deref().unwrap_or("no chapter")
    );
    let _ = writeln!(output);

    if history.reports.is_empty() {
        let _ = writeln!(output, "{}", history.message);
        return output;
    }

    for month in history.reports.iter() {
        let _ = writeln!(
            output,
            "## {} (total {})",
            month.month.as_deref().unwrap_or("unknown period"),
            month.total_score
        );
        for entry in month.performance.iter() {
            let _ = writeln!(
                output,
                "- {}: {} points from {}",
                entry.name, entry.current_score, entry.current_data
            );
        }
        let _ = writeln!(output);
    }

    output
}
