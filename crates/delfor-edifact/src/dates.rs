//! Date/time normalization
//!
//! DTM values are fixed-width digit strings whose layout is chosen by a
//! format qualifier (UN/EDIFACT 2379). They are rendered as the canonical
//! `DD.MM.YYYY` used throughout the delivery rows. A value that cannot be
//! read is handed back untouched as [`NormalizedDate::Fallback`]; a bad
//! date never aborts a parse.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Canonical rendering of a calendar date
pub const CANONICAL_DATE_FORMAT: &str = "%d.%m.%Y";

/// Canonical rendering of a date with time of day
pub const CANONICAL_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// DTM format qualifiers understood by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `102`: CCYYMMDD
    Date,
    /// `203`: CCYYMMDDHHMMSS; the time of day is dropped
    DateTime,
}

impl DateFormat {
    /// Look up a format qualifier
    pub fn from_qualifier(code: &str) -> Option<Self> {
        match code.trim() {
            "102" => Some(DateFormat::Date),
            "203" => Some(DateFormat::DateTime),
            _ => None,
        }
    }

    /// Exact number of digits this layout expects
    pub fn width(self) -> usize {
        match self {
            DateFormat::Date => 8,
            DateFormat::DateTime => 14,
        }
    }

    fn parse(self, raw: &str) -> Option<NaiveDate> {
        if raw.len() != self.width() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match self {
            DateFormat::Date => NaiveDate::parse_from_str(raw, "%Y%m%d").ok(),
            DateFormat::DateTime => NaiveDateTime::parse_from_str(raw, "%Y%m%d%H%M%S")
                .ok()
                .map(|dt| dt.date()),
        }
    }
}

/// Outcome of normalizing a date value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NormalizedDate {
    /// The value was read and rendered canonically
    Parsed(String),
    /// The value could not be read and is returned as given
    Fallback(String),
}

impl NormalizedDate {
    pub fn as_str(&self) -> &str {
        match self {
            NormalizedDate::Parsed(value) | NormalizedDate::Fallback(value) => value,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            NormalizedDate::Parsed(value) | NormalizedDate::Fallback(value) => value,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, NormalizedDate::Parsed(_))
    }
}

impl fmt::Display for NormalizedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a DTM value given its format qualifier
pub fn normalize_date(raw: &str, qualifier: &str) -> NormalizedDate {
    let parsed = DateFormat::from_qualifier(qualifier).and_then(|format| format.parse(raw.trim()));
    match parsed {
        Some(date) => NormalizedDate::Parsed(date.format(CANONICAL_DATE_FORMAT).to_string()),
        None => {
            debug!(value = raw, qualifier, "Keeping date value as transmitted");
            NormalizedDate::Fallback(raw.to_string())
        }
    }
}

/// Normalize the UNB preparation date/time (`YYMMDD:HHMM`, 21st century)
pub fn normalize_interchange_timestamp(raw: &str) -> NormalizedDate {
    let parsed = raw.split_once(':').and_then(|(date, time)| {
        if date.len() != 6 || time.len() != 4 {
            return None;
        }
        let date = NaiveDate::parse_from_str(&format!("20{date}"), "%Y%m%d").ok()?;
        let time = NaiveTime::parse_from_str(time, "%H%M").ok()?;
        Some(NaiveDateTime::new(date, time))
    });
    match parsed {
        Some(stamp) => NormalizedDate::Parsed(stamp.format(CANONICAL_DATETIME_FORMAT).to_string()),
        None => NormalizedDate::Fallback(raw.to_string()),
    }
}

/// Read a canonical date back into a calendar date.
///
/// Accepts `DD.MM.YYYY` (a trailing time after a space is ignored and a
/// two-digit year means 20YY) as well as an unconverted `YYYYMMDD`.
pub fn parse_canonical(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split(' ').next().unwrap_or_default();

    if date_part.contains('.') {
        let mut parts = date_part.split('.');
        let day: u32 = parts.next()?.parse().ok()?;
        let month: u32 = parts.next()?.parse().ok()?;
        let mut year: i32 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        if year < 100 {
            year += 2000;
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    DateFormat::Date.parse(date_part)
}

/// ISO-8601 week number of a delivery date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeekNumber {
    Week(u32),
    Unknown,
}

impl WeekNumber {
    pub fn value(self) -> Option<u32> {
        match self {
            WeekNumber::Week(week) => Some(week),
            WeekNumber::Unknown => None,
        }
    }
}

impl fmt::Display for WeekNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekNumber::Week(week) => write!(f, "{week}"),
            WeekNumber::Unknown => Ok(()),
        }
    }
}

/// ISO week of a canonical date string
pub fn iso_week(value: &str) -> WeekNumber {
    parse_canonical(value).map_or(WeekNumber::Unknown, |date| {
        WeekNumber::Week(date.iso_week().week())
    })
}
