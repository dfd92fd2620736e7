// File: crates/revolution_scheduling/src/board.rs
//! Admin status board.
//!
//! The board owns the in-memory appointment list and splits it into three lanes
//! by status. A cross-lane move is applied locally first, then confirmed with the
//! backend. When the backend refuses, the whole list is fetched again and replaces
//! the local one.
//!
//! The list lock is never held across a backend call, so moves of different cards
//! do not wait on each other. Two moves of the same card are not sequenced: the
//! last response to arrive decides the final state.

use revolution_common::models::{Appointment, AppointmentStatus};
use revolution_common::services::SharedBackend;
use revolution_common::{BackendError, ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// A status column on the board. `canceled` has none.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Scheduled,
    InProgress,
    Completed,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Scheduled, Lane::InProgress, Lane::Completed];

    pub fn status(self) -> AppointmentStatus {
        match self {
            Lane::Scheduled => AppointmentStatus::Scheduled,
            Lane::InProgress => AppointmentStatus::InProgress,
            Lane::Completed => AppointmentStatus::Completed,
        }
    }

    pub fn for_status(status: AppointmentStatus) -> Option<Lane> {
        match status {
            AppointmentStatus::Scheduled => Some(Lane::Scheduled),
            AppointmentStatus::InProgress => Some(Lane::InProgress),
            AppointmentStatus::Completed => Some(Lane::Completed),
            AppointmentStatus::Canceled => None,
        }
    }
}

/// The appointment list partitioned by lane, each lane ordered by start time.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lanes {
    pub scheduled: Vec<Appointment>,
    pub in_progress: Vec<Appointment>,
    pub completed: Vec<Appointment>,
}

impl Lanes {
    fn partition(appointments: &[Appointment]) -> Self {
        let mut lanes = Lanes::default();
        for appointment in appointments {
            match Lane::for_status(appointment.status) {
                Some(Lane::Scheduled) => lanes.scheduled.push(appointment.clone()),
                Some(Lane::InProgress) => lanes.in_progress.push(appointment.clone()),
                Some(Lane::Completed) => lanes.completed.push(appointment.clone()),
                None => {}
            }
        }
        for lane in [
            &mut lanes.scheduled,
            &mut lanes.in_progress,
            &mut lanes.completed,
        ] {
            lane.sort_by_key(|a| a.start_time);
        }
        lanes
    }

    pub fn lane(&self, lane: Lane) -> &[Appointment] {
        match lane {
            Lane::Scheduled => &self.scheduled,
            Lane::InProgress => &self.in_progress,
            Lane::Completed => &self.completed,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneCounts {
    pub scheduled: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl LaneCounts {
    fn count(appointments: &[Appointment]) -> Self {
        let mut counts = LaneCounts::default();
        for appointment in appointments {
            match Lane::for_status(appointment.status) {
                Some(Lane::Scheduled) => counts.scheduled += 1,
                Some(Lane::InProgress) => counts.in_progress += 1,
                Some(Lane::Completed) => counts.completed += 1,
                None => {}
            }
        }
        counts
    }
}

/// Something the admin should be told about, collected until the UI picks it up.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardNotice {
    /// A move was refused; the card snapped back after the list was reloaded.
    StatusUpdateFailed {
        appointment_id: String,
        attempted: Lane,
        kind: ErrorKind,
        message: String,
    },
    /// The list could not be reloaded after a refused move.
    ReconciliationFailed { message: String },
}

/// Result of [`StatusBoard::move_card`].
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The card already was in the target lane; nothing was sent.
    Unchanged,
    /// The backend accepted the new status.
    Confirmed,
    /// The backend refused; the list was replaced by a fresh copy.
    Reconciled,
    /// The backend refused and the fresh copy could not be fetched either; the
    /// card was put back in its previous lane.
    ReconciliationFailed,
}

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("Unknown appointment: {0}")]
    UnknownAppointment(String),
    /// Canceled appointments have no lane and cannot be moved.
    #[error("Appointment {0} is not on the board")]
    NotOnBoard(String),
    #[error("Failed to load appointments: {0}")]
    Load(#[from] BackendError),
}

#[derive(Debug, Default)]
struct BoardState {
    appointments: Vec<Appointment>,
    loaded: bool,
    notices: Vec<BoardNotice>,
}

pub struct StatusBoard {
    backend: SharedBackend,
    state: RwLock<BoardState>,
}

impl StatusBoard {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            state: RwLock::new(BoardState::default()),
        }
    }

    /// Starts from an already fetched list.
    pub fn with_appointments(backend: SharedBackend, appointments: Vec<Appointment>) -> Self {
        Self {
            backend,
            state: RwLock::new(BoardState {
                appointments,
                loaded: true,
                notices: Vec::new(),
            }),
        }
    }

    /// Replaces the local list with the backend's and returns the new lane counts.
    pub async fn refresh(&self) -> Result<LaneCounts, BoardError> {
        let appointments = self.backend.fetch_all_appointments().await?;
        info!("Board loaded {} appointments", appointments.len());
        let mut state = self.state.write().await;
        state.appointments = appointments;
        state.loaded = true;
        Ok(LaneCounts::count(&state.appointments))
    }

    /// Loads the list on first use.
    pub async fn ensure_loaded(&self) -> Result<(), BoardError> {
        if self.state.read().await.loaded {
            return Ok(());
        }
        self.refresh().await.map(|_| ())
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.state.read().await.appointments.clone()
    }

    pub async fn lanes(&self) -> Lanes {
        Lanes::partition(&self.state.read().await.appointments)
    }

    pub async fn lane_counts(&self) -> LaneCounts {
        LaneCounts::count(&self.state.read().await.appointments)
    }

    /// Puts an appointment the backend just stored on the board, replacing the
    /// card with the same id. Before the first load this is a no-op; that load
    /// brings the appointment in anyway.
    pub async fn upsert(&self, appointment: Appointment) {
        let mut state = self.state.write().await;
        if !state.loaded {
            return;
        }
        match state.appointments.iter_mut().find(|a| a.id == appointment.id) {
            Some(existing) => *existing = appointment,
            None => state.appointments.push(appointment),
        }
    }

    /// Drains the pending notices.
    pub async fn take_notices(&self) -> Vec<BoardNotice> {
        std::mem::take(&mut self.state.write().await.notices)
    }

    /// Moves a card to `lane`.
    ///
    /// The new status is visible in [`lanes`](Self::lanes) before the backend
    /// answers. A drop into the card's own lane changes nothing and sends nothing.
    pub async fn move_card(&self, id: &str, lane: Lane) -> Result<MoveOutcome, BoardError> {
        let target = lane.status();
        let previous = {
            let mut state = self.state.write().await;
            let appointment = state
                .appointments
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| BoardError::UnknownAppointment(id.to_string()))?;
            let Some(current) = Lane::for_status(appointment.status) else {
                return Err(BoardError::NotOnBoard(id.to_string()));
            };
            if current == lane {
                debug!("Appointment {} already in {:?}", id, lane);
                return Ok(MoveOutcome::Unchanged);
            }
            let previous = appointment.status;
            appointment.status = target;
            previous
        };

        match self.backend.update_appointment_status(id, target).await {
            Ok(_) => {
                info!("Appointment {} moved from {} to {}", id, previous, target);
                Ok(MoveOutcome::Confirmed)
            }
            Err(err) => {
                error!(
                    "Status update for appointment {} failed ({}): {}",
                    id,
                    ErrorKind::ReconciliationRequired,
                    err
                );
                Ok(self.reconcile(id, lane, previous, err).await)
            }
        }
    }

    async fn reconcile(
        &self,
        id: &str,
        attempted: Lane,
        previous: AppointmentStatus,
        cause: BackendError,
    ) -> MoveOutcome {
        let fetched = self.backend.fetch_all_appointments().await;

        let mut state = self.state.write().await;
        state.notices.push(BoardNotice::StatusUpdateFailed {
            appointment_id: id.to_string(),
            attempted,
            kind: ErrorKind::ReconciliationRequired,
            message: cause.to_string(),
        });

        match fetched {
            Ok(appointments) => {
                state.appointments = appointments;
                MoveOutcome::Reconciled
            }
            Err(err) => {
                warn!("Reconciliation after failed move of {} failed: {}", id, err);
                // Only undo our own optimistic change; a later move may have touched the card.
                if let Some(appointment) = state
                    .appointments
                    .iter_mut()
                    .find(|a| a.id == id && a.status == attempted.status())
                {
                    appointment.status = previous;
                }
                state.notices.push(BoardNotice::ReconciliationFailed {
                    message: err.to_string(),
                });
                MoveOutcome::ReconciliationFailed
            }
        }
    }
}
