#[cfg(test)]
mod tests {
    use crate::blackout::{BlackoutCalendar, BlackoutError};
    use crate::service::mock::InMemoryBackend;
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;
    use revolution_common::models::{BlackoutDayRecord, NewBlackoutDay};
    use revolution_common::services::AppointmentBackend;
    use std::sync::Arc;

    const MEXICO: Tz = Tz::America__Mexico_City;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, y: i32, m: u32, d: u32, h: u32) -> BlackoutDayRecord {
        BlackoutDayRecord {
            id: id.to_string(),
            date: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            registered_by: Some("admin".to_string()),
        }
    }

    #[tokio::test]
    async fn test_load_resolves_local_calendar_days() {
        let backend = Arc::new(InMemoryBackend::new().with_blackout_days(vec![
            // 23:00 on Christmas Day in Mexico City
            record("b", 2025, 12, 26, 5),
            record("a", 2025, 9, 16, 18),
        ]));
        let calendar = BlackoutCalendar::new(backend, MEXICO);

        let days = calendar.load().await.unwrap();

        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2025, 9, 16), date(2025, 12, 25)]);
        assert!(calendar.is_blackout(date(2025, 12, 25)).await);
        assert!(!calendar.is_blackout(date(2025, 12, 26)).await);
    }

    #[tokio::test]
    async fn test_add_sends_local_noon() {
        let backend = Arc::new(InMemoryBackend::new());
        let calendar = BlackoutCalendar::new(backend.clone(), MEXICO);

        let day = calendar
            .add(date(2025, 12, 25), Some("admin".to_string()))
            .await
            .unwrap();

        assert_eq!(day.date, date(2025, 12, 25));
        let stored = backend.stored_blackout_days();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].date.timestamp_millis(), 1766685600000);
        assert_eq!(calendar.days().await, vec![day]);
    }

    #[tokio::test]
    async fn test_duplicate_day_is_rejected_locally() {
        let backend = Arc::new(InMemoryBackend::new().with_blackout_days(vec![record(
            "navidad", 2025, 12, 25, 18,
        )]));
        let calendar = BlackoutCalendar::new(backend.clone(), MEXICO);
        calendar.load().await.unwrap();

        let result = calendar.add(date(2025, 12, 25), None).await;

        assert_eq!(result, Err(BlackoutError::DuplicateDay(date(2025, 12, 25))));
        assert_eq!(backend.stored_blackout_days().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_day() {
        let backend = Arc::new(InMemoryBackend::new().with_blackout_days(vec![record(
            "navidad", 2025, 12, 25, 18,
        )]));
        let calendar = BlackoutCalendar::new(backend.clone(), MEXICO);
        calendar.load().await.unwrap();

        calendar.remove("navidad").await.unwrap();

        assert!(calendar.days().await.is_empty());
        assert!(backend.stored_blackout_days().is_empty());
        assert_eq!(
            calendar.remove("navidad").await,
            Err(BlackoutError::NotFound("navidad".to_string()))
        );
    }

    #[tokio::test]
    async fn test_load_sees_days_registered_elsewhere() {
        let backend = Arc::new(InMemoryBackend::new());
        let calendar = BlackoutCalendar::new(backend.clone(), MEXICO);
        assert!(calendar.load().await.unwrap().is_empty());

        // Another admin session registers Christmas directly on the backend.
        let christmas = NewBlackoutDay::at_local_noon(date(2025, 12, 25), MEXICO, None).unwrap();
        backend.create_blackout_day(christmas).await.unwrap();
        assert!(!calendar.is_blackout(date(2025, 12, 25)).await);

        calendar.load().await.unwrap();
        assert!(calendar.is_blackout(date(2025, 12, 25)).await);
    }
}
