// File: crates/revolution_scheduling/src/form.rs
//! Appointment form controller.
//!
//! Owns the draft of a new or edited appointment until it is submitted. Every
//! field change goes through here so that derived values (the cost) and inline
//! errors stay consistent with the draft.

use crate::context::ScheduleContext;
use crate::datetime::{local_to_epoch_millis, parse_local_string, to_local_string, TimeInput};
use crate::session::AuthSession;
use revolution_common::models::{
    Appointment, AppointmentPayload, AppointmentStatus, BlackoutDay, ServiceType,
};
use revolution_common::services::AppointmentBackend;
use revolution_common::{BackendError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Editable fields of the form. Serialized with their wire (camelCase) names.
///
/// Status is not among them: it only changes through the admin board.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    StartTime,
    EndTime,
    ServiceType,
    VehicleRef,
    ClientRef,
    AdditionalInfo,
}

impl FormField {
    /// Fields that must be present for a submit to go out.
    pub const REQUIRED: [FormField; 4] = [
        FormField::StartTime,
        FormField::ServiceType,
        FormField::VehicleRef,
        FormField::ClientRef,
    ];

    /// Maps a field name reported by the backend onto a form field.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "startTime" | "start_time" => Some(FormField::StartTime),
            "endTime" | "end_time" => Some(FormField::EndTime),
            "serviceType" | "service_type" => Some(FormField::ServiceType),
            "vehicleRef" | "vehicle_ref" | "vehicle" => Some(FormField::VehicleRef),
            "clientRef" | "client_ref" | "client" => Some(FormField::ClientRef),
            "additionalInfo" | "additional_info" => Some(FormField::AdditionalInfo),
            _ => None,
        }
    }
}

/// Inline error shown next to a field.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }
}

/// The in-progress appointment. Text fields hold exactly what the user entered.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    /// Set when editing an existing appointment.
    pub id: Option<String>,
    /// Canonical `YYYY-MM-DDTHH:MM`, empty when unset or invalid.
    pub start_time: String,
    pub end_time: Option<String>,
    pub service_type: Option<ServiceType>,
    pub cost: Option<u32>,
    pub vehicle_ref: String,
    pub additional_info: String,
    pub status: AppointmentStatus,
    pub client_ref: String,
}

impl Default for AppointmentDraft {
    fn default() -> Self {
        Self {
            id: None,
            start_time: String::new(),
            end_time: None,
            service_type: None,
            cost: None,
            vehicle_ref: String::new(),
            additional_info: String::new(),
            status: AppointmentStatus::Scheduled,
            client_ref: String::new(),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SubmitError {
    /// Local validation failed; no request was made.
    #[error("{0} field(s) need attention")]
    Invalid(usize),
    /// The backend refused the appointment.
    #[error("Backend rejected the appointment: {0}")]
    Rejected(String),
}

pub struct AppointmentForm {
    schedule: Arc<ScheduleContext>,
    blackout_days: Vec<BlackoutDay>,
    draft: AppointmentDraft,
    errors: BTreeMap<FormField, FieldError>,
    submit_error: Option<String>,
    succeeded: bool,
}

impl AppointmentForm {
    /// Starts an empty draft for a new appointment.
    pub fn new(schedule: Arc<ScheduleContext>, blackout_days: Vec<BlackoutDay>) -> Self {
        Self {
            schedule,
            blackout_days,
            draft: AppointmentDraft::default(),
            errors: BTreeMap::new(),
            submit_error: None,
            succeeded: false,
        }
    }

    /// Starts a draft pre-filled from an existing appointment.
    pub fn edit(
        appointment: &Appointment,
        schedule: Arc<ScheduleContext>,
        blackout_days: Vec<BlackoutDay>,
    ) -> Self {
        let start = TimeInput::Instant(appointment.start_time).to_local(schedule.tz);
        let mut form = Self::new(schedule, blackout_days);
        form.draft = AppointmentDraft {
            id: Some(appointment.id.clone()),
            start_time: to_local_string(start),
            end_time: None,
            service_type: Some(appointment.service_type),
            cost: appointment
                .cost
                .or_else(|| Some(appointment.service_type.price())),
            vehicle_ref: appointment.vehicle_ref.clone(),
            additional_info: appointment.additional_info.clone().unwrap_or_default(),
            status: appointment.status,
            client_ref: appointment.client_ref.clone(),
        };
        form
    }

    pub fn draft(&self) -> &AppointmentDraft {
        &self.draft
    }

    pub fn errors(&self) -> &BTreeMap<FormField, FieldError> {
        &self.errors
    }

    pub fn error(&self, field: FormField) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    /// Generic banner error from the last submit, when it could not be tied to a field.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// How long the confirmation should stay up before navigating away; only after a success.
    pub fn redirect_after(&self) -> Option<Duration> {
        self.succeeded.then_some(self.schedule.success_redirect)
    }

    /// Selects a service; its fixed price becomes the cost.
    pub fn set_service_type(&mut self, service_type: ServiceType) {
        self.draft.service_type = Some(service_type);
        self.draft.cost = Some(service_type.price());
        self.errors.remove(&FormField::ServiceType);
    }

    /// Stores the start time in canonical form and re-validates it immediately.
    pub fn set_start_time(&mut self, input: TimeInput) {
        let local = input.to_local(self.schedule.tz);
        self.draft.start_time = to_local_string(local);

        let validation = self
            .schedule
            .rules
            .validate(&self.draft.start_time, &self.blackout_days);
        match validation.reason {
            Some(reason) => {
                debug!("start time {:?} rejected: {}", input, reason);
                self.errors
                    .insert(FormField::StartTime, FieldError::new(reason));
            }
            None => {
                self.errors.remove(&FormField::StartTime);
            }
        }
    }

    /// Stores a value verbatim and clears that field's error.
    ///
    /// Enumerated fields are parsed; an unknown value leaves them unset, which the
    /// required-field check reports at submit time.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::StartTime => self.draft.start_time = value,
            FormField::EndTime => {
                self.draft.end_time = if value.trim().is_empty() {
                    None
                } else {
                    Some(value)
                }
            }
            FormField::ServiceType => match value.parse::<ServiceType>() {
                Ok(service_type) => self.set_service_type(service_type),
                Err(err) => {
                    warn!("{}", err);
                    self.draft.service_type = None;
                    self.draft.cost = None;
                }
            },
            FormField::VehicleRef => self.draft.vehicle_ref = value,
            FormField::ClientRef => self.draft.client_ref = value,
            FormField::AdditionalInfo => self.draft.additional_info = value,
        }
        self.errors.remove(&field);
    }

    /// Runs every check on the draft, replacing the current field errors.
    /// Returns `true` when the draft can be submitted.
    pub fn validate_all(&mut self) -> bool {
        self.errors.clear();

        for field in FormField::REQUIRED {
            let missing = match field {
                FormField::StartTime => self.draft.start_time.trim().is_empty(),
                FormField::ServiceType => self.draft.service_type.is_none(),
                FormField::VehicleRef => self.draft.vehicle_ref.trim().is_empty(),
                FormField::ClientRef => self.draft.client_ref.trim().is_empty(),
                _ => false,
            };
            if missing {
                self.errors
                    .insert(field, FieldError::new(ErrorKind::MissingField));
            }
        }

        let start = if self.errors.contains_key(&FormField::StartTime) {
            None
        } else {
            match self
                .schedule
                .rules
                .check(&self.draft.start_time, &self.blackout_days)
            {
                Ok(start) => Some(start),
                Err(reason) => {
                    self.errors
                        .insert(FormField::StartTime, FieldError::new(reason));
                    None
                }
            }
        };

        if let Some(end_raw) = self.draft.end_time.as_deref() {
            match parse_local_string(end_raw) {
                None => {
                    self.errors
                        .insert(FormField::EndTime, FieldError::new(ErrorKind::InvalidFormat));
                }
                Some(end) => {
                    if matches!(start, Some(start) if end <= start) {
                        self.errors
                            .insert(FormField::EndTime, FieldError::new(ErrorKind::EndBeforeStart));
                    }
                }
            }
        }

        self.errors.is_empty()
    }

    /// Validates the draft and sends it to the backend.
    ///
    /// The client id is re-read from `session` first and only falls back to the
    /// id cached in the draft when nobody is signed in. Nothing is sent when
    /// validation fails. A backend rejection naming a known field becomes that
    /// field's error; anything else becomes the generic submit error.
    pub async fn submit(
        &mut self,
        backend: &dyn AppointmentBackend,
        session: &dyn AuthSession,
    ) -> Result<Appointment, SubmitError> {
        self.succeeded = false;
        self.submit_error = None;

        if let Some(client_id) = session.current_client_id() {
            self.draft.client_ref = client_id;
        }

        if !self.validate_all() {
            debug!("submit blocked by {} field error(s)", self.errors.len());
            return Err(SubmitError::Invalid(self.errors.len()));
        }

        let payload = self.payload()?;
        let result = match self.draft.id.as_deref() {
            Some(id) => backend.update_appointment(id, payload).await,
            None => backend.create_appointment(payload).await,
        };

        match result {
            Ok(appointment) => {
                info!("appointment {} saved for client {}", appointment.id, appointment.client_ref);
                self.succeeded = true;
                Ok(appointment)
            }
            Err(err) => Err(self.record_rejection(err)),
        }
    }

    fn payload(&mut self) -> Result<AppointmentPayload, SubmitError> {
        let tz = self.schedule.tz;
        let start_millis = parse_local_string(&self.draft.start_time)
            .and_then(|start| local_to_epoch_millis(start, tz));
        let Some(start_time) = start_millis else {
            // Wall-clock time inside a DST gap has no instant.
            self.errors
                .insert(FormField::StartTime, FieldError::new(ErrorKind::InvalidFormat));
            return Err(SubmitError::Invalid(self.errors.len()));
        };
        let end_time = self
            .draft
            .end_time
            .as_deref()
            .and_then(parse_local_string)
            .and_then(|end| local_to_epoch_millis(end, tz));

        let service_type = self
            .draft
            .service_type
            .ok_or(SubmitError::Invalid(1))?;
        let additional_info = Some(self.draft.additional_info.trim())
            .filter(|info| !info.is_empty())
            .map(str::to_string);

        Ok(AppointmentPayload {
            start_time,
            end_time,
            service_type,
            cost: self.draft.cost.unwrap_or_else(|| service_type.price()),
            vehicle_ref: self.draft.vehicle_ref.trim().to_string(),
            client_ref: self.draft.client_ref.trim().to_string(),
            status: self.draft.status,
            additional_info,
        })
    }

    fn record_rejection(&mut self, err: BackendError) -> SubmitError {
        error!("appointment submit failed: {}", err);
        match err {
            BackendError::Rejected {
                field: Some(ref name),
                ref message,
                ..
            } => match FormField::from_wire(name) {
                Some(field) => {
                    self.errors.insert(
                        field,
                        FieldError::with_message(ErrorKind::BackendRejected, message.clone()),
                    );
                    SubmitError::Rejected(message.clone())
                }
                None => self.generic_rejection(message.clone()),
            },
            BackendError::Rejected { message, .. } => self.generic_rejection(message),
            other => self.generic_rejection(other.to_string()),
        }
    }

    fn generic_rejection(&mut self, message: String) -> SubmitError {
        self.submit_error = Some(message.clone());
        SubmitError::Rejected(message)
    }
}
