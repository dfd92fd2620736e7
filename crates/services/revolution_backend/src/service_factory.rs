// --- File: crates/services/revolution_backend/src/service_factory.rs ---
//! Builds the collaborators the routes depend on.
//!
//! Everything is constructed once at startup from [`AppConfig`] and handed to the
//! routers explicitly; there are no process-wide singletons.
use revolution_common::services::SharedBackend;
use revolution_common::{config_error, RevolutionError};
use revolution_config::AppConfig;
use revolution_scheduling::{HttpAppointmentBackend, ScheduleContext, SchedulingState};
use std::sync::Arc;
use tracing::info;

pub struct RevolutionServiceFactory {
    schedule: ScheduleContext,
    backend: SharedBackend,
}

impl RevolutionServiceFactory {
    /// Validates the scheduling section and creates the REST backend client.
    pub fn new(config: &AppConfig) -> Result<Self, RevolutionError> {
        let schedule = ScheduleContext::from_config(&config.scheduling).map_err(config_error)?;
        let backend = HttpAppointmentBackend::from_config(&config.backend)?;
        info!(
            "Booking backend at {} (timezone {})",
            backend.base_url(),
            schedule.tz.name()
        );
        Ok(Self::with_backend(schedule, Arc::new(backend)))
    }

    /// Uses an already built backend, e.g. a test double.
    pub fn with_backend(schedule: ScheduleContext, backend: SharedBackend) -> Self {
        Self { schedule, backend }
    }

    pub fn backend(&self) -> SharedBackend {
        self.backend.clone()
    }

    pub fn scheduling_state(&self) -> Arc<SchedulingState> {
        Arc::new(SchedulingState::new(
            self.backend.clone(),
            self.schedule.clone(),
        ))
    }
}
