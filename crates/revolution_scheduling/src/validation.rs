// File: crates/revolution_scheduling/src/validation.rs
use crate::datetime::parse_local_string;
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use revolution_common::models::BlackoutDay;
use revolution_common::ErrorKind;
use serde::Serialize;
use tracing::debug;

/// Bookable time-of-day window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    /// First bookable time of the day (e.g. 09:00)
    pub open: NaiveTime,
    /// Last bookable time of the day (e.g. 17:00)
    pub close: NaiveTime,
}

impl BusinessHours {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }

    /// Compares on `hour*60 + minute`; seconds never push a time out of range.
    pub fn contains(&self, time: NaiveTime) -> bool {
        let minutes = minute_of_day(time);
        (minute_of_day(self.open)..=minute_of_day(self.close)).contains(&minutes)
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Outcome of checking a candidate start time.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorKind>,
}

impl Validation {
    pub fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn rejected(reason: ErrorKind) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl From<Result<NaiveDateTime, ErrorKind>> for Validation {
    fn from(result: Result<NaiveDateTime, ErrorKind>) -> Self {
        match result {
            Ok(_) => Validation::accepted(),
            Err(reason) => Validation::rejected(reason),
        }
    }
}

/// Business rules for appointment start times.
///
/// Rules run in order and the first failure wins, since the form shows a single
/// message per field:
/// 1. the value parses (`INVALID_FORMAT`)
/// 2. its calendar day is not a blackout day (`BLACKOUT_DAY`)
/// 3. its time of day is within business hours (`OUT_OF_HOURS`)
///
/// Capacity and overlap with other appointments are not checked here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusinessRules {
    pub hours: BusinessHours,
}

impl BusinessRules {
    pub fn new(hours: BusinessHours) -> Self {
        Self { hours }
    }

    pub fn validate(&self, candidate: &str, blackout_days: &[BlackoutDay]) -> Validation {
        self.check(candidate, blackout_days).into()
    }

    /// Like [`validate`](Self::validate) but hands back the parsed value on success.
    pub fn check(
        &self,
        candidate: &str,
        blackout_days: &[BlackoutDay],
    ) -> Result<NaiveDateTime, ErrorKind> {
        let parsed = parse_local_string(candidate).ok_or(ErrorKind::InvalidFormat)?;
        self.check_time(parsed, blackout_days)?;
        Ok(parsed)
    }

    /// Rules 2 and 3 on an already parsed wall-clock value.
    pub fn check_time(
        &self,
        candidate: NaiveDateTime,
        blackout_days: &[BlackoutDay],
    ) -> Result<(), ErrorKind> {
        let day = candidate.date();
        if let Some(blackout) = blackout_days.iter().find(|b| b.date == day) {
            debug!("{} rejected: blackout day {}", candidate, blackout.id);
            return Err(ErrorKind::BlackoutDay);
        }
        if !self.hours.contains(candidate.time()) {
            debug!("{} rejected: outside {:?}", candidate, self.hours);
            return Err(ErrorKind::OutOfHours);
        }
        Ok(())
    }
}

/// Validates against the default 09:00-17:00 business hours.
pub fn validate(candidate: &str, blackout_days: &[BlackoutDay]) -> Validation {
    BusinessRules::default().validate(candidate, blackout_days)
}
