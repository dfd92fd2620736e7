// --- File: crates/revolution_scheduling/src/lib.rs ---
// Declare modules within this crate
pub mod blackout;
#[cfg(test)]
mod blackout_test;
pub mod board;
pub mod context;
pub mod datetime;
#[cfg(test)]
mod datetime_proptest;
#[cfg(test)]
mod datetime_test;
pub mod doc;
pub mod form;
pub mod handlers;
pub mod routes;
pub mod service;
pub mod session;
pub mod validation;

pub use blackout::{BlackoutCalendar, BlackoutError};
pub use board::{BoardError, BoardNotice, Lane, LaneCounts, Lanes, MoveOutcome, StatusBoard};
pub use context::{ScheduleConfigError, ScheduleContext};
pub use datetime::TimeInput;
pub use form::{AppointmentDraft, AppointmentForm, FieldError, FormField, SubmitError};
pub use handlers::SchedulingState;
pub use service::HttpAppointmentBackend;
pub use session::{AuthSession, StaticSession};
pub use validation::{BusinessHours, BusinessRules, Validation};
