// File: crates/revolution_scheduling/src/datetime.rs
//! Wall-clock normalization.
//!
//! Appointment times are handled as local wall-clock values (`NaiveDateTime`)
//! in the configured timezone and only become instants when they are sent to
//! the backend. The canonical text form is `YYYY-MM-DDTHH:MM`, the format of
//! an HTML `datetime-local` input.
//!
//! Nothing in here fails loudly: unparseable input comes back as `None` and is
//! reported later by the validator as an invalid or missing value.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Canonical wall-clock format, minute precision.
pub const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Layouts accepted for loosely formatted, localized input. Dates are day-first.
const LOOSE_FORMATS: [&str; 8] = [
    "%d/%m/%Y %I:%M %p",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
];

/// Formats a wall-clock value as `YYYY-MM-DDTHH:MM`; absent values give an empty string.
pub fn to_local_string(value: Option<NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format(LOCAL_FORMAT).to_string())
        .unwrap_or_default()
}

/// Parses `YYYY-MM-DDTHH:MM` or a full ISO-8601 string into a wall-clock value.
///
/// The date and time parts are split on `T` (or a space). A missing time part
/// means midnight. Only hour and minute are read from the time part, so seconds,
/// fractions and an offset suffix are ignored: the digits are taken as local time.
/// Returns `None` when any component is not a number or the date does not exist.
pub fn parse_local_string(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let (date_part, time_part) = match value.split_once(|c| c == 'T' || c == ' ') {
        Some((date, time)) => (date, time),
        None => (value, "00:00"),
    };

    let mut date_fields = date_part.split('-');
    let year: i32 = date_fields.next()?.parse().ok()?;
    let month: u32 = date_fields.next()?.parse().ok()?;
    let day: u32 = date_fields.next()?.parse().ok()?;
    if date_fields.next().is_some() {
        return None;
    }

    let mut time_fields = time_part.split(':');
    let hour: u32 = time_fields.next()?.parse().ok()?;
    let minute: u32 = time_fields.next()?.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

/// Rounds up so the minute of the hour is a multiple of `step_minutes`, zeroing
/// the seconds.
///
/// Values already aligned, and a step of zero, are returned unchanged. A partial
/// minute past a grid point moves to the next one. When no later multiple fits
/// in the hour, the result is the top of the next hour (minute 0 is always on
/// the grid).
pub fn round_up_to_step(value: NaiveDateTime, step_minutes: u32) -> NaiveDateTime {
    if step_minutes == 0 {
        return value;
    }
    let step = i64::from(step_minutes);
    let minute = i64::from(value.minute());
    let partial_minute = value.second() != 0 || value.nanosecond() != 0;
    if minute % step == 0 && !partial_minute {
        return value;
    }

    let hour_start = value
        .with_minute(0)
        .and_then(|dt| dt.with_second(0))
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(value);
    let next = ((minute / step + 1) * step).min(60);
    hour_start + Duration::minutes(next)
}

/// Earliest start the form offers: "now" in local time, rounded up to the slot grid.
pub fn earliest_selectable(now: DateTime<Utc>, tz: Tz, step_minutes: u32) -> NaiveDateTime {
    round_up_to_step(now.with_timezone(&tz).naive_local(), step_minutes)
}

/// Converts a local wall-clock value to epoch milliseconds.
///
/// On an autumn DST fold the earlier instant wins; in a spring gap there is no
/// such instant and `None` is returned.
pub fn local_to_epoch_millis(value: NaiveDateTime, tz: Tz) -> Option<i64> {
    tz.from_local_datetime(&value)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// Converts epoch milliseconds to the local wall clock of `tz`.
pub fn epoch_millis_to_local(millis: i64, tz: Tz) -> Option<NaiveDateTime> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.with_timezone(&tz).naive_local())
}

/// A start-time value as produced by the different call sites of the form.
///
/// Each variant has its own coercion into local wall-clock time; nothing is
/// guessed from the shape of the text.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TimeInput {
    /// `YYYY-MM-DDTHH:MM`, straight from a `datetime-local` control.
    WallClock(String),
    /// ISO-8601 / RFC 3339, possibly with seconds and an offset.
    Iso(String),
    /// Localized display text, e.g. `10/06/2025, 9:30 a. m.`.
    Raw(String),
    /// An instant, e.g. a value picked from a calendar widget.
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    Instant(DateTime<Utc>),
    /// Epoch milliseconds, as stored by the backend.
    EpochMillis(i64),
}

impl TimeInput {
    /// Coerces the input to local wall-clock time in `tz`.
    pub fn to_local(&self, tz: Tz) -> Option<NaiveDateTime> {
        match self {
            TimeInput::WallClock(text) => parse_local_string(text),
            TimeInput::Iso(text) => parse_iso(text, tz),
            TimeInput::Raw(text) => parse_loose(text),
            TimeInput::Instant(instant) => Some(instant.with_timezone(&tz).naive_local()),
            TimeInput::EpochMillis(millis) => epoch_millis_to_local(*millis, tz),
        }
    }

    /// Coerces the input to the canonical `YYYY-MM-DDTHH:MM` string (empty when invalid).
    pub fn to_local_string(&self, tz: Tz) -> String {
        to_local_string(self.to_local(tz))
    }
}

fn parse_iso(text: &str, tz: Tz) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Some(with_offset.with_timezone(&tz).naive_local());
    }
    // No offset: the digits already are wall-clock time.
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| parse_local_string(text))
}

fn parse_loose(text: &str) -> Option<NaiveDateTime> {
    // AM/PM text must go through the layouts, the strict parser would drop the marker.
    let has_marker = text.chars().any(|c| c.is_alphabetic() && c != 'T');
    if !has_marker {
        if let Some(parsed) = parse_local_string(text) {
            return Some(parsed);
        }
    }

    let mut normalized = text.trim().to_lowercase().replace(',', " ");
    for (marker, canonical) in [("a. m.", "am"), ("p. m.", "pm"), ("a.m.", "am"), ("p.m.", "pm")] {
        normalized = normalized.replace(marker, canonical);
    }
    let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

    LOOSE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%d/%m/%Y")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .and_then(|dt| dt.with_second(0))
}
