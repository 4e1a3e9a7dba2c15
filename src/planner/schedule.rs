//! Date and time arithmetic behind the plan form.

use time::{
    Date, Duration, OffsetDateTime, Time, format_description::FormatItem,
    macros::format_description,
};

use super::ValidationError;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");
const TIME_FORMAT_UNPADDED: &[FormatItem<'static>] =
    format_description!("[hour padding:none]:[minute]");

/// Derived schedule figures for one plan request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudyWindow {
    /// Whole days between today and the exam; zero on exam day.
    pub days_remaining: i64,
    /// `days_remaining / 7`, one decimal.
    pub duration_weeks: f64,
    /// Hours between start and end, two decimals.
    pub daily_hours: f64,
}

impl StudyWindow {
    /// Compute the window for an exam date and a nightly start/end pair.
    ///
    /// An end time at or before the start time is taken to fall on the
    /// following day, so `22:00`–`06:00` yields eight hours.
    pub fn compute(
        today: Date,
        exam_date: Date,
        start: Time,
        end: Time,
    ) -> Result<Self, ValidationError> {
        let days_remaining = days_remaining(today, exam_date)?;
        Ok(Self {
            days_remaining,
            duration_weeks: duration_weeks(days_remaining),
            daily_hours: daily_hours(start, end),
        })
    }
}

pub fn days_remaining(today: Date, exam_date: Date) -> Result<i64, ValidationError> {
    let days = (exam_date - today).whole_days();
    if days < 0 {
        return Err(ValidationError::DateInPast);
    }
    Ok(days)
}

pub fn duration_weeks(days_remaining: i64) -> f64 {
    round_to(days_remaining as f64 / 7.0, 1)
}

pub fn daily_hours(start: Time, end: Time) -> f64 {
    let mut elapsed: Duration = end - start;
    if elapsed <= Duration::ZERO {
        elapsed += Duration::DAY;
    }
    round_to(elapsed.as_seconds_f64() / 3600.0, 2)
}

/// Current calendar date in the local timezone, falling back to UTC.
pub fn today_local() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

pub fn parse_date(text: &str) -> Result<Date, ValidationError> {
    let trimmed = text.trim();
    Date::parse(trimmed, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

pub fn parse_time(text: &str) -> Result<Time, ValidationError> {
    let trimmed = text.trim();
    Time::parse(trimmed, TIME_FORMAT)
        .or_else(|_| Time::parse(trimmed, TIME_FORMAT_UNPADDED))
        .map_err(|_| ValidationError::InvalidTime(trimmed.to_string()))
}

/// Format a date the way the table files store it.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| format!("{}-{:02}-{:02}", date.year(), date.month() as u8, date.day()))
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
