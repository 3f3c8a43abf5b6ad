use chrono::{NaiveDate, NaiveDateTime};

use crate::error::MetricError;
use crate::models::{PerformanceMetrics, RawPerformanceRecord};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub fn extract(record: &RawPerformanceRecord) -> PerformanceMetrics {
    let count = |field: &'static str, raw: &Option<String>| normalize_counter(field, raw.as_deref());

    let attendance_tally = [
        count("p", &record.present),
        count("a", &record.absent),
        count("l", &record.late),
        count("m", &record.medical),
        count("s", &record.substitute),
    ]
    .iter()
    .fold(0u64, |total, value| total.saturating_add(*value));

    PerformanceMetrics {
        absenteeism: count("a", &record.absent),
        lateness: count("l", &record.late),
        referrals: count("rgi", &record.referrals_given_inside)
            .saturating_add(count("rgo", &record.referrals_given_outside)),
        visitors: count("v", &record.visitors),
        tyfcb: count("tyfcb", &record.tyfcb),
        testimonials: count("t", &record.testimonials),
        attendance_tally,
        target_date: normalize_date(record.targeted_date.as_deref()),
    }
}

/// Missing cells are zero. Malformed or negative cells are logged and zeroed.
pub fn normalize_counter(field: &'static str, raw: Option<&str>) -> u64 {
    match raw.map(|value| parse_counter(field, value)) {
        None => 0,
        Some(Ok(value)) => value,
        Some(Err(err)) => {
            log::warn!("{err}; treating as 0");
            0
        }
    }
}

pub fn parse_counter(field: &'static str, raw: &str) -> Result<u64, MetricError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(0);
    }

    if let Ok(value) = cleaned.parse::<u64>() {
        return Ok(value);
    }

    match cleaned.parse::<f64>() {
        Ok(value) if !value.is_finite() => Err(MetricError::NotNumeric {
            field,
            raw: raw.to_string(),
        }),
        Ok(value) if value < 0.0 => Err(MetricError::Negative {
            field,
            raw: raw.to_string(),
        }),
        // currency cells sometimes carry cents
        Ok(value) => Ok(value.trunc() as u64),
        Err(_) => Err(MetricError::NotNumeric {
            field,
            raw: raw.to_string(),
        }),
    }
}

pub fn normalize_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    match parse_calendar_date(raw) {
        Ok(date) => Some(date),
        Err(err) => {
            log::warn!("{err}; treating as absent");
            None
        }
    }
}

pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, MetricError> {
    let raw = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|stamp| stamp.date())
        })
        .ok_or_else(|| MetricError::InvalidDate {
            raw: raw.to_string(),
        })
}
