// File: crates/revolution_scheduling/src/blackout.rs
use chrono::NaiveDate;
use chrono_tz::Tz;
use revolution_common::models::{BlackoutDay, NewBlackoutDay};
use revolution_common::services::SharedBackend;
use revolution_common::BackendError;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Error, Debug, PartialEq)]
pub enum BlackoutError {
    #[error("{0} is already a blackout day")]
    DuplicateDay(NaiveDate),
    #[error("{0} has no local noon in the configured timezone")]
    InvalidDate(NaiveDate),
    #[error("Unknown blackout day: {0}")]
    NotFound(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Blackout days (días inhábiles), resolved to local calendar days.
///
/// The list is a snapshot of the last [`load`](Self::load); forms reload it
/// before validating so days registered elsewhere are enforced.
pub struct BlackoutCalendar {
    backend: SharedBackend,
    tz: Tz,
    days: RwLock<Vec<BlackoutDay>>,
}

impl BlackoutCalendar {
    pub fn new(backend: SharedBackend, tz: Tz) -> Self {
        Self {
            backend,
            tz,
            days: RwLock::new(Vec::new()),
        }
    }

    /// Fetches the registered days and replaces the cache.
    pub async fn load(&self) -> Result<Vec<BlackoutDay>, BlackoutError> {
        let records = self.backend.fetch_blackout_days().await?;
        let mut days: Vec<BlackoutDay> = records
            .into_iter()
            .map(|record| record.into_local(self.tz))
            .collect();
        days.sort_by_key(|day| day.date);
        info!("Loaded {} blackout days", days.len());

        *self.days.write().await = days.clone();
        Ok(days)
    }

    pub async fn days(&self) -> Vec<BlackoutDay> {
        self.days.read().await.clone()
    }

    pub async fn is_blackout(&self, date: NaiveDate) -> bool {
        self.days.read().await.iter().any(|day| day.date == date)
    }

    /// Registers `date`. The backend receives local noon of that day.
    pub async fn add(
        &self,
        date: NaiveDate,
        registered_by: Option<String>,
    ) -> Result<BlackoutDay, BlackoutError> {
        if self.is_blackout(date).await {
            return Err(BlackoutError::DuplicateDay(date));
        }
        let payload = NewBlackoutDay::at_local_noon(date, self.tz, registered_by)
            .ok_or(BlackoutError::InvalidDate(date))?;

        let created = self
            .backend
            .create_blackout_day(payload)
            .await?
            .into_local(self.tz);
        if created.date != date {
            warn!("Backend stored blackout day {} as {}", date, created.date);
        }

        let mut days = self.days.write().await;
        days.push(created.clone());
        days.sort_by_key(|day| day.date);
        Ok(created)
    }

    pub async fn remove(&self, id: &str) -> Result<(), BlackoutError> {
        let existed = self.backend.delete_blackout_day(id).await?;
        self.days.write().await.retain(|day| day.id != id);
        if existed {
            info!("Removed blackout day {}", id);
            Ok(())
        } else {
            Err(BlackoutError::NotFound(id.to_string()))
        }
    }
}
