#[cfg(test)]
mod tests {
    use crate::datetime::{
        earliest_selectable, epoch_millis_to_local, local_to_epoch_millis, parse_local_string,
        round_up_to_step, to_local_string, TimeInput,
    };
    use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
    use chrono_tz::Tz;

    const MEXICO: Tz = Tz::America__Mexico_City;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_to_local_string_formats_minutes() {
        assert_eq!(
            to_local_string(Some(local(2025, 6, 10, 9, 5, 42))),
            "2025-06-10T09:05"
        );
        assert_eq!(to_local_string(None), "");
    }

    #[test]
    fn test_parse_local_string_accepts_canonical_form() {
        assert_eq!(
            parse_local_string("2025-06-10T09:30"),
            Some(local(2025, 6, 10, 9, 30, 0))
        );
        assert_eq!(
            parse_local_string("2025-06-10 17:00"),
            Some(local(2025, 6, 10, 17, 0, 0))
        );
    }

    #[test]
    fn test_parse_local_string_reads_digits_as_local_time() {
        // Seconds, fractions and the offset are ignored.
        assert_eq!(
            parse_local_string("2025-06-10T09:30:45.123Z"),
            Some(local(2025, 6, 10, 9, 30, 0))
        );
        assert_eq!(
            parse_local_string("2025-06-10T09:30:00-06:00"),
            Some(local(2025, 6, 10, 9, 30, 0))
        );
    }

    #[test]
    fn test_parse_local_string_date_only_is_midnight() {
        assert_eq!(
            parse_local_string("2025-12-25"),
            Some(local(2025, 12, 25, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_local_string_rejects_garbage() {
        assert_eq!(parse_local_string(""), None);
        assert_eq!(parse_local_string("   "), None);
        assert_eq!(parse_local_string("mañana a las diez"), None);
        assert_eq!(parse_local_string("2025-02-30T10:00"), None);
        assert_eq!(parse_local_string("2025-06-10T25:00"), None);
        assert_eq!(parse_local_string("2025-06-10T10"), None);
        assert_eq!(parse_local_string("2025-06-10-01T10:00"), None);
    }

    #[test]
    fn test_round_up_to_step() {
        assert_eq!(
            round_up_to_step(local(2025, 6, 10, 9, 7, 0), 15),
            local(2025, 6, 10, 9, 15, 0)
        );
        assert_eq!(
            round_up_to_step(local(2025, 6, 10, 9, 14, 30), 15),
            local(2025, 6, 10, 9, 15, 0)
        );
        assert_eq!(
            round_up_to_step(local(2025, 6, 10, 9, 15, 30), 15),
            local(2025, 6, 10, 9, 30, 0)
        );
        assert_eq!(
            round_up_to_step(local(2025, 6, 10, 23, 50, 0), 15),
            local(2025, 6, 11, 0, 0, 0)
        );
    }

    #[test]
    fn test_round_up_to_step_keeps_aligned_values() {
        let aligned = local(2025, 6, 10, 9, 45, 0);
        assert_eq!(round_up_to_step(aligned, 15), aligned);
        assert_eq!(round_up_to_step(aligned, 1), aligned);
    }

    #[test]
    fn test_round_up_to_step_uses_minute_of_hour() {
        // 45 does not divide an hour: the grid is :00 and :45 of every hour.
        let on_the_hour = local(2025, 6, 10, 10, 0, 0);
        assert_eq!(round_up_to_step(on_the_hour, 45), on_the_hour);
        assert_eq!(
            round_up_to_step(local(2025, 6, 10, 10, 10, 0), 45),
            local(2025, 6, 10, 10, 45, 0)
        );
        assert_eq!(
            round_up_to_step(local(2025, 6, 10, 10, 50, 0), 45),
            local(2025, 6, 10, 11, 0, 0)
        );
    }

    #[test]
    fn test_round_up_to_step_zero_step_is_identity() {
        let value = local(2025, 6, 10, 9, 7, 13);
        assert_eq!(round_up_to_step(value, 0), value);
    }

    #[test]
    fn test_earliest_selectable_uses_local_time() {
        // 15:07 UTC is 09:07 in Mexico City (UTC-6).
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 15, 7, 0).unwrap();
        assert_eq!(
            earliest_selectable(now, MEXICO, 15),
            local(2025, 6, 10, 9, 15, 0)
        );
    }

    #[test]
    fn test_epoch_millis_conversions() {
        let nine = local(2025, 6, 10, 9, 0, 0);
        assert_eq!(local_to_epoch_millis(nine, MEXICO), Some(1749567600000));
        assert_eq!(epoch_millis_to_local(1749567600000, MEXICO), Some(nine));
    }

    #[test]
    fn test_local_time_in_dst_gap_has_no_instant() {
        let in_gap = local(2025, 3, 9, 2, 30, 0);
        assert_eq!(local_to_epoch_millis(in_gap, Tz::America__New_York), None);
    }

    #[test]
    fn test_time_input_coercions() {
        let nine = Some(local(2025, 6, 10, 9, 0, 0));
        let inputs = [
            TimeInput::WallClock("2025-06-10T09:00".to_string()),
            TimeInput::Iso("2025-06-10T15:00:00Z".to_string()),
            TimeInput::Iso("2025-06-10T09:00:00".to_string()),
            TimeInput::Raw("10/06/2025 09:00".to_string()),
            TimeInput::Raw("10/06/2025, 9:00 a. m.".to_string()),
            TimeInput::Instant(Utc.with_ymd_and_hms(2025, 6, 10, 15, 0, 0).unwrap()),
            TimeInput::EpochMillis(1749567600000),
        ];
        for input in inputs {
            assert_eq!(input.to_local(MEXICO), nine, "coercing {:?}", input);
        }
    }

    #[test]
    fn test_raw_input_keeps_afternoon_marker() {
        let input = TimeInput::Raw("10/06/2025, 2:15 p. m.".to_string());
        assert_eq!(input.to_local_string(MEXICO), "2025-06-10T14:15");

        let input = TimeInput::Raw("10/06/2025 2:15 PM".to_string());
        assert_eq!(input.to_local_string(MEXICO), "2025-06-10T14:15");
    }

    #[test]
    fn test_raw_input_is_day_first() {
        let input = TimeInput::Raw("03/04/2025 10:00".to_string());
        assert_eq!(input.to_local_string(MEXICO), "2025-04-03T10:00");
    }

    #[test]
    fn test_unreadable_input_gives_empty_string() {
        assert_eq!(
            TimeInput::WallClock("nonsense".to_string()).to_local_string(MEXICO),
            ""
        );
        assert_eq!(
            TimeInput::Raw("la próxima semana".to_string()).to_local_string(MEXICO),
            ""
        );
    }

    #[test]
    fn test_time_input_wire_format() {
        let input: TimeInput =
            serde_json::from_str(r#"{"kind":"wall_clock","value":"2025-06-10T09:00"}"#).unwrap();
        assert_eq!(input, TimeInput::WallClock("2025-06-10T09:00".to_string()));

        let input: TimeInput =
            serde_json::from_str(r#"{"kind":"epoch_millis","value":1749567600000}"#).unwrap();
        assert_eq!(input, TimeInput::EpochMillis(1749567600000));

        let json = serde_json::to_value(TimeInput::Raw("10/06/2025".to_string())).unwrap();
        assert_eq!(json["kind"], "raw");
        assert_eq!(json["value"], "10/06/2025");
    }
}
