// File: crates/revolution_scheduling/src/service.rs
//! REST implementation of the booking backend collaborator.
//!
//! Talks JSON (camelCase) to the booking API under `backend.base_url`:
//!
//! | operation                   | request                            |
//! |-----------------------------|------------------------------------|
//! | `fetch_all_appointments`    | `GET /appointments`                |
//! | `create_appointment`        | `POST /appointments`               |
//! | `update_appointment`        | `PUT /appointments/{id}`           |
//! | `update_appointment_status` | `PATCH /appointments/{id}/status`  |
//! | `fetch_blackout_days`       | `GET /blackout-days`               |
//! | `create_blackout_day`       | `POST /blackout-days`              |
//! | `delete_blackout_day`       | `DELETE /blackout-days/{id}`       |
//!
//! Error responses are expected as `{"message": "...", "field": "vehicleRef"}`,
//! both keys optional.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use revolution_common::models::{
    Appointment, AppointmentPayload, AppointmentStatus, BlackoutDayRecord, NewBlackoutDay,
    StatusUpdate,
};
use revolution_common::services::{AppointmentBackend, BoxFuture};
use revolution_common::{create_client, BackendError, DEFAULT_TIMEOUT_SECS};
use revolution_config::BackendConfig;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "error")]
    message: Option<String>,
    #[serde(default)]
    field: Option<String>,
}

pub struct HttpAppointmentBackend {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpAppointmentBackend {
    pub fn new(client: Client, base_url: impl Into<String>, api_token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let api_token = api_token.filter(|token| !token.trim().is_empty());
        Self {
            client,
            base_url,
            api_token,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let timeout = config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = create_client(timeout, true)?;
        Ok(Self::new(
            client,
            config.base_url.clone(),
            config.api_token.clone(),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, BackendError> {
        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Turns a non-success response into [`BackendError::Rejected`].
async fn rejection(response: Response) -> BackendError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();

    let message = body
        .message
        .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    warn!("Backend answered {}: {}", status, message);

    BackendError::Rejected {
        status: status.as_u16(),
        field: body.field,
        message,
    }
}

impl AppointmentBackend for HttpAppointmentBackend {
    fn fetch_all_appointments(&self) -> BoxFuture<'_, Vec<Appointment>, BackendError> {
        Box::pin(async move { self.send(self.request(Method::GET, "/appointments")).await })
    }

    fn update_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> BoxFuture<'_, Appointment, BackendError> {
        let path = format!("/appointments/{}/status", id);
        Box::pin(async move {
            let builder = self
                .request(Method::PATCH, &path)
                .json(&StatusUpdate { status });
            self.send(builder).await
        })
    }

    fn create_appointment(
        &self,
        payload: AppointmentPayload,
    ) -> BoxFuture<'_, Appointment, BackendError> {
        Box::pin(async move {
            let builder = self.request(Method::POST, "/appointments").json(&payload);
            self.send(builder).await
        })
    }

    fn update_appointment(
        &self,
        id: &str,
        payload: AppointmentPayload,
    ) -> BoxFuture<'_, Appointment, BackendError> {
        let path = format!("/appointments/{}", id);
        Box::pin(async move {
            let builder = self.request(Method::PUT, &path).json(&payload);
            self.send(builder).await
        })
    }

    fn fetch_blackout_days(&self) -> BoxFuture<'_, Vec<BlackoutDayRecord>, BackendError> {
        Box::pin(async move { self.send(self.request(Method::GET, "/blackout-days")).await })
    }

    fn create_blackout_day(
        &self,
        day: NewBlackoutDay,
    ) -> BoxFuture<'_, BlackoutDayRecord, BackendError> {
        Box::pin(async move {
            let builder = self.request(Method::POST, "/blackout-days").json(&day);
            self.send(builder).await
        })
    }

    fn delete_blackout_day(&self, id: &str) -> BoxFuture<'_, bool, BackendError> {
        let path = format!("/blackout-days/{}", id);
        Box::pin(async move {
            let response = self.request(Method::DELETE, &path).send().await?;
            match response.status() {
                StatusCode::NOT_FOUND => Ok(false),
                status if status.is_success() => Ok(true),
                _ => Err(rejection(response).await),
            }
        })
    }
}

/// In-memory backend for unit and route tests.
#[cfg(test)]
pub mod mock {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryBackend {
        appointments: Mutex<Vec<Appointment>>,
        blackout_days: Mutex<Vec<BlackoutDayRecord>>,
        create_rejection: Mutex<Option<BackendError>>,
        fail_status_updates: AtomicBool,
        fail_fetches: AtomicBool,
        next_id: AtomicUsize,
        pub status_updates: AtomicUsize,
        pub fetches: AtomicUsize,
        pub creates: AtomicUsize,
        pub updates: AtomicUsize,
        pub last_payload: Mutex<Option<AppointmentPayload>>,
    }

    impl InMemoryBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
            let backend = Self::new();
            *backend.appointments.lock().unwrap() = appointments;
            backend
        }

        pub fn with_blackout_days(self, days: Vec<BlackoutDayRecord>) -> Self {
            *self.blackout_days.lock().unwrap() = days;
            self
        }

        pub fn fail_status_updates(&self, fail: bool) {
            self.fail_status_updates.store(fail, Ordering::SeqCst);
        }

        pub fn fail_fetches(&self, fail: bool) {
            self.fail_fetches.store(fail, Ordering::SeqCst);
        }

        pub fn reject_creates_with(&self, error: BackendError) {
            *self.create_rejection.lock().unwrap() = Some(error);
        }

        pub fn stored(&self) -> Vec<Appointment> {
            self.appointments.lock().unwrap().clone()
        }

        pub fn stored_blackout_days(&self) -> Vec<BlackoutDayRecord> {
            self.blackout_days.lock().unwrap().clone()
        }

        pub fn network_calls(&self) -> usize {
            self.status_updates.load(Ordering::SeqCst)
                + self.fetches.load(Ordering::SeqCst)
                + self.creates.load(Ordering::SeqCst)
                + self.updates.load(Ordering::SeqCst)
        }

        fn store(&self, id: String, payload: &AppointmentPayload) -> Appointment {
            Appointment {
                id,
                start_time: Utc
                    .timestamp_millis_opt(payload.start_time)
                    .single()
                    .unwrap(),
                service_type: payload.service_type,
                cost: Some(payload.cost),
                vehicle_ref: payload.vehicle_ref.clone(),
                client_ref: payload.client_ref.clone(),
                status: payload.status,
                additional_info: payload.additional_info.clone(),
            }
        }
    }

    fn unavailable() -> BackendError {
        BackendError::Transport("connection refused".to_string())
    }

    impl AppointmentBackend for InMemoryBackend {
        fn fetch_all_appointments(&self) -> BoxFuture<'_, Vec<Appointment>, BackendError> {
            Box::pin(async move {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                if self.fail_fetches.load(Ordering::SeqCst) {
                    return Err(unavailable());
                }
                Ok(self.stored())
            })
        }

        fn update_appointment_status(
            &self,
            id: &str,
            status: AppointmentStatus,
        ) -> BoxFuture<'_, Appointment, BackendError> {
            let id = id.to_string();
            Box::pin(async move {
                self.status_updates.fetch_add(1, Ordering::SeqCst);
                if self.fail_status_updates.load(Ordering::SeqCst) {
                    return Err(unavailable());
                }
                let mut appointments = self.appointments.lock().unwrap();
                let appointment = appointments
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or_else(|| BackendError::Rejected {
                        status: 404,
                        field: None,
                        message: format!("appointment {} not found", id),
                    })?;
                appointment.status = status;
                Ok(appointment.clone())
            })
        }

        fn create_appointment(
            &self,
            payload: AppointmentPayload,
        ) -> BoxFuture<'_, Appointment, BackendError> {
            Box::pin(async move {
                self.creates.fetch_add(1, Ordering::SeqCst);
                *self.last_payload.lock().unwrap() = Some(payload.clone());
                if let Some(error) = self.create_rejection.lock().unwrap().clone() {
                    return Err(error);
                }
                let id = format!("cita-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
                let created = self.store(id, &payload);
                self.appointments.lock().unwrap().push(created.clone());
                Ok(created)
            })
        }

        fn update_appointment(
            &self,
            id: &str,
            payload: AppointmentPayload,
        ) -> BoxFuture<'_, Appointment, BackendError> {
            let id = id.to_string();
            Box::pin(async move {
                self.updates.fetch_add(1, Ordering::SeqCst);
                *self.last_payload.lock().unwrap() = Some(payload.clone());
                let updated = self.store(id.clone(), &payload);
                let mut appointments = self.appointments.lock().unwrap();
                match appointments.iter_mut().find(|a| a.id == id) {
                    Some(existing) => {
                        *existing = updated.clone();
                        Ok(updated)
                    }
                    None => Err(BackendError::Rejected {
                        status: 404,
                        field: None,
                        message: format!("appointment {} not found", id),
                    }),
                }
            })
        }

        fn fetch_blackout_days(&self) -> BoxFuture<'_, Vec<BlackoutDayRecord>, BackendError> {
            Box::pin(async move {
                if self.fail_fetches.load(Ordering::SeqCst) {
                    return Err(unavailable());
                }
                Ok(self.stored_blackout_days())
            })
        }

        fn create_blackout_day(
            &self,
            day: NewBlackoutDay,
        ) -> BoxFuture<'_, BlackoutDayRecord, BackendError> {
            Box::pin(async move {
                let record = BlackoutDayRecord {
                    id: format!("dia-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
                    date: Utc.timestamp_millis_opt(day.date).single().unwrap(),
                    registered_by: day.registered_by,
                };
                self.blackout_days.lock().unwrap().push(record.clone());
                Ok(record)
            })
        }

        fn delete_blackout_day(&self, id: &str) -> BoxFuture<'_, bool, BackendError> {
            let id = id.to_string();
            Box::pin(async move {
                let mut days = self.blackout_days.lock().unwrap();
                let before = days.len();
                days.retain(|day| day.id != id);
                Ok(days.len() != before)
            })
        }
    }
}
