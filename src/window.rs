use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// Upper bound on the `weeks` quantity fed into multiplier tiers.
pub const MAX_WEEKS: u32 = 26;

/// Months of training history counted towards the training category.
pub const TRAINING_WINDOW_MONTHS: u32 = 6;

pub const MEETING_DAY: Weekday = Weekday::Wed;

/// Meeting days in `[join_date, reference_date]`, uncapped.
pub fn meeting_count(reference_date: Option<NaiveDate>, join_date: Option<NaiveDate>) -> u32 {
    match (reference_date, join_date) {
        (Some(reference), Some(join)) => count_weekday(join, reference, MEETING_DAY),
        _ => 0,
    }
}

/// The `weeks` basis for multiplier tiers: meeting days since joining, capped.
pub fn compute_weeks(reference_date: Option<NaiveDate>, join_date: Option<NaiveDate>) -> u32 {
    let weeks = meeting_count(reference_date, join_date).min(MAX_WEEKS);
    log::debug!("attendance window {join_date:?}..={reference_date:?}: {weeks} weeks");
    weeks
}

/// Occurrences of `weekday` in the inclusive range. An inverted range has none.
pub fn count_weekday(start: NaiveDate, end: NaiveDate, weekday: Weekday) -> u32 {
    if start > end {
        return 0;
    }

    let offset = (7 + weekday.num_days_from_monday() as i64
        - start.weekday().num_days_from_monday() as i64)
        % 7;
    let first = start + Duration::days(offset);
    if first > end {
        return 0;
    }

    ((end - first).num_days() / 7 + 1) as u32
}

/// Inclusive `[reference - 6 months, reference]`. Month subtraction clamps to
/// the last day of a shorter month.
pub fn training_window(reference_date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = reference_date
        .checked_sub_months(Months::new(TRAINING_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN);
    (start, reference_date)
}

/// Abbreviated month and two-digit year, e.g. `Sep-25`.
pub fn period_label(date: NaiveDate) -> String {
    date.format("%b-%y").to_string()
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn enumerate_wednesdays(start: NaiveDate, end: NaiveDate) -> u32 {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| day.weekday() == Weekday::Wed)
            .count() as u32
    }

    #[test]
    fn missing_dates_give_zero_weeks() {
        assert_eq!(compute_weeks(None, Some(date(2025, 1, 1))), 0);
        assert_eq!(compute_weeks(Some(date(2025, 7, 2)), None), 0);
        assert_eq!(compute_weeks(None, None), 0);
    }

    #[test]
    fn inverted_range_gives_zero() {
        assert_eq!(compute_weeks(Some(date(2025, 1, 1)), Some(date(2025, 7, 2))), 0);
    }

    #[test]
    fn single_day_counts_only_when_wednesday() {
        let wednesday = date(2025, 7, 2);
        let thursday = date(2025, 7, 3);
        assert_eq!(count_weekday(wednesday, wednesday, Weekday::Wed), 1);
        assert_eq!(count_weekday(thursday, thursday, Weekday::Wed), 0);
    }

    #[test]
    fn arithmetic_count_matches_day_enumeration() {
        let start = date(2024, 12, 28);
        for span in 0..400 {
            let end = start + Duration::days(span);
            assert_eq!(
                count_weekday(start, end, Weekday::Wed),
                enumerate_wednesdays(start, end),
                "span {span}"
            );
        }
    }

    #[test]
    fn weeks_are_monotonic_and_saturate() {
        let join = date(2025, 1, 1);
        let mut previous = 0;
        for span in 0..500 {
            let weeks = compute_weeks(Some(join + Duration::days(span)), Some(join));
            assert!(weeks >= previous);
            assert!(weeks <= MAX_WEEKS);
            previous = weeks;
        }
        assert_eq!(previous, MAX_WEEKS);
    }

    #[test]
    fn raw_count_is_kept_uncapped() {
        let reference = Some(date(2025, 7, 2));
        let join = Some(date(2025, 1, 1));
        assert_eq!(meeting_count(reference, join), 27);
        assert_eq!(compute_weeks(reference, join), 26);
    }

    #[test]
    fn training_window_spans_six_months() {
        assert_eq!(
            training_window(date(2025, 7, 2)),
            (date(2025, 1, 2), date(2025, 7, 2))
        );
        assert_eq!(
            training_window(date(2025, 8, 31)),
            (date(2025, 2, 28), date(2025, 8, 31))
        );
    }

    #[test]
    fn labels_use_short_month_and_year() {
        assert_eq!(period_label(date(2025, 9, 17)), "Sep-25");
        assert_eq!(period_label(date(2026, 1, 1)), "Jan-26");
    }
}
