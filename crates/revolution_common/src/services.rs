// --- File: crates/revolution_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! The scheduling core never talks to the booking backend directly: it is handed
//! an implementation of [`AppointmentBackend`], which keeps the controllers
//! testable and free of process-wide singletons.

use crate::error::BackendError;
use crate::models::{
    Appointment, AppointmentPayload, AppointmentStatus, BlackoutDayRecord, NewBlackoutDay,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Operations the booking REST backend offers to this client.
///
/// HTTP transport, headers and token attachment are implementation concerns.
pub trait AppointmentBackend: Send + Sync {
    /// Every appointment, regardless of status.
    fn fetch_all_appointments(&self) -> BoxFuture<'_, Vec<Appointment>, BackendError>;

    /// Changes the status of one appointment and returns the stored copy.
    fn update_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> BoxFuture<'_, Appointment, BackendError>;

    /// Creates an appointment; `payload.start_time` is epoch milliseconds.
    fn create_appointment(
        &self,
        payload: AppointmentPayload,
    ) -> BoxFuture<'_, Appointment, BackendError>;

    /// Replaces the editable fields of an existing appointment.
    fn update_appointment(
        &self,
        id: &str,
        payload: AppointmentPayload,
    ) -> BoxFuture<'_, Appointment, BackendError>;

    /// All registered blackout days, as raw instants.
    fn fetch_blackout_days(&self) -> BoxFuture<'_, Vec<BlackoutDayRecord>, BackendError>;

    /// Registers a blackout day.
    fn create_blackout_day(
        &self,
        day: NewBlackoutDay,
    ) -> BoxFuture<'_, BlackoutDayRecord, BackendError>;

    /// Removes a blackout day. Returns `false` when the id was unknown.
    fn delete_blackout_day(&self, id: &str) -> BoxFuture<'_, bool, BackendError>;
}

/// Shared handle to the backend collaborator.
pub type SharedBackend = Arc<dyn AppointmentBackend>;
