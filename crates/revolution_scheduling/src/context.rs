// File: crates/revolution_scheduling/src/context.rs
use crate::validation::{BusinessHours, BusinessRules};
use chrono::NaiveTime;
use chrono_tz::Tz;
use revolution_config::SchedulingConfig;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScheduleConfigError {
    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
    #[error("Invalid time of day {0:?}, expected HH:MM")]
    InvalidTime(String),
    #[error("Business hours close ({close}) before they open ({open})")]
    InvertedHours { open: String, close: String },
    #[error("Slot step must be between 1 and 60 minutes, got {0}")]
    InvalidStep(u32),
}

/// Scheduling parameters shared by the form, the validator and the handlers.
#[derive(Debug, Clone)]
pub struct ScheduleContext {
    /// Timezone that gives wall-clock values their meaning.
    pub tz: Tz,
    pub rules: BusinessRules,
    pub step_minutes: u32,
    /// Delay between a successful submit and navigating away.
    pub success_redirect: Duration,
}

impl ScheduleContext {
    pub fn from_config(config: &SchedulingConfig) -> Result<Self, ScheduleConfigError> {
        let tz: Tz = config
            .timezone
            .parse()
            .map_err(|_| ScheduleConfigError::InvalidTimezone(config.timezone.clone()))?;
        let open = parse_time_of_day(&config.open_time)?;
        let close = parse_time_of_day(&config.close_time)?;
        if close < open {
            return Err(ScheduleConfigError::InvertedHours {
                open: config.open_time.clone(),
                close: config.close_time.clone(),
            });
        }
        if !(1..=60).contains(&config.slot_step_minutes) {
            return Err(ScheduleConfigError::InvalidStep(config.slot_step_minutes));
        }

        Ok(Self {
            tz,
            rules: BusinessRules::new(BusinessHours::new(open, close)),
            step_minutes: config.slot_step_minutes,
            success_redirect: Duration::from_millis(config.success_redirect_ms),
        })
    }
}

impl Default for ScheduleContext {
    fn default() -> Self {
        Self {
            tz: Tz::America__Mexico_City,
            rules: BusinessRules::default(),
            step_minutes: 15,
            success_redirect: Duration::from_millis(1200),
        }
    }
}

fn parse_time_of_day(raw: &str) -> Result<NaiveTime, ScheduleConfigError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ScheduleConfigError::InvalidTime(raw.to_string()))
}
