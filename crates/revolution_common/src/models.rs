// --- File: crates/revolution_common/src/models.rs ---

// Data structures shared between the scheduling core and the REST backend client.
// Wire names are camelCase; timestamps travel as epoch milliseconds.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an appointment (cita).
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    /// Read-only here: it has no lane on the admin board.
    Canceled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wash services offered, each with a fixed price.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Basic,
    Complete,
    Premium,
    Detailing,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Basic,
        ServiceType::Complete,
        ServiceType::Premium,
        ServiceType::Detailing,
    ];

    /// Price in whole pesos.
    pub fn price(&self) -> u32 {
        match self {
            ServiceType::Basic => 150,
            ServiceType::Complete => 250,
            ServiceType::Premium => 350,
            ServiceType::Detailing => 600,
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(ServiceType::Basic),
            "complete" => Ok(ServiceType::Complete),
            "premium" => Ok(ServiceType::Premium),
            "detailing" => Ok(ServiceType::Detailing),
            other => Err(format!("unknown service type: {other}")),
        }
    }
}

/// An appointment as stored by the backend. The UI only holds cached copies.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(deserialize_with = "wire_id::deserialize")]
    pub id: String,
    #[serde(with = "wire_instant")]
    #[cfg_attr(feature = "openapi", schema(value_type = i64, example = 1749567600000_i64))]
    pub start_time: DateTime<Utc>,
    pub service_type: ServiceType,
    #[serde(default)]
    pub cost: Option<u32>,
    pub vehicle_ref: String,
    pub client_ref: String,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// Body sent to create or update an appointment. `start_time` is epoch milliseconds.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub start_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    pub service_type: ServiceType,
    pub cost: u32,
    pub vehicle_ref: String,
    pub client_ref: String,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
}

/// A blackout day (día inhábil) as transmitted by the backend: the date is an instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackoutDayRecord {
    #[serde(deserialize_with = "wire_id::deserialize")]
    pub id: String,
    #[serde(with = "wire_instant")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub registered_by: Option<String>,
}

impl BlackoutDayRecord {
    /// Resolves the record to the calendar day it names in `tz`.
    pub fn into_local(self, tz: Tz) -> BlackoutDay {
        BlackoutDay {
            id: self.id,
            date: self.date.with_timezone(&tz).date_naive(),
            registered_by: self.registered_by,
        }
    }
}

/// A calendar day on which no appointment may be scheduled. Time of day is irrelevant.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackoutDay {
    pub id: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date", example = "2025-12-25"))]
    pub date: NaiveDate,
    #[serde(default)]
    pub registered_by: Option<String>,
}

/// Body sent to register a blackout day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlackoutDay {
    /// Local noon of the chosen day, epoch milliseconds. Noon keeps the day stable
    /// under any timezone shift the backend applies.
    pub date: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_by: Option<String>,
}

impl NewBlackoutDay {
    pub fn at_local_noon(date: NaiveDate, tz: Tz, registered_by: Option<String>) -> Option<Self> {
        let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0)?);
        let instant = tz.from_local_datetime(&noon).earliest()?;
        Some(Self {
            date: instant.timestamp_millis(),
            registered_by,
        })
    }
}

/// A client's vehicle (carro). Appointments reference it by id only.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(deserialize_with = "wire_id::deserialize")]
    pub id: String,
    #[serde(alias = "marca")]
    pub brand: String,
    #[serde(alias = "modelo")]
    pub model: String,
    pub year: u16,
    pub plate_suffix: String,
    pub color: String,
    pub vehicle_type: String,
    pub owner_ref: String,
}

/// Instants arrive either as epoch milliseconds or as RFC 3339 strings; they leave as milliseconds.
pub mod wire_instant {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {ms}"))),
            Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| de::Error::custom(format!("invalid instant {text:?}: {e}"))),
        }
    }
}

/// Identifiers are opaque; some backend collections use numeric keys.
pub mod wire_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        })
    }
}
