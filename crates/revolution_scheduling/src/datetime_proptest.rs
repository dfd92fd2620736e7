#[cfg(test)]
mod tests {
    use crate::datetime::{
        epoch_millis_to_local, local_to_epoch_millis, parse_local_string, round_up_to_step,
        to_local_string,
    };
    use chrono::{DateTime, Duration, NaiveDateTime, Timelike};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    // 1970-01-01 .. 2100-01-01
    const MAX_SECONDS: i64 = 4_102_444_800;
    // 2023-01-01, after Mexico dropped daylight saving time
    const NO_DST_SECONDS: i64 = 1_672_531_200;

    fn naive(seconds: i64) -> NaiveDateTime {
        DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
    }

    proptest! {
        // Formatting a parsed wall-clock string gives back the same minute
        #[test]
        fn test_local_string_round_trip(
            year in 1970..2100i32,
            month in 1..=12u32,
            day in 1..=28u32,
            hour in 0..24u32,
            minute in 0..60u32,
        ) {
            let text = format!("{:04}-{:02}-{:02}T{:02}:{:02}", year, month, day, hour, minute);
            prop_assert_eq!(to_local_string(parse_local_string(&text)), text);
        }

        // Rounded values are never earlier, sit on the grid and are less than a step away
        #[test]
        fn test_round_up_lands_on_grid(
            seconds in 0..MAX_SECONDS,
            step in 1..=120u32,
        ) {
            let value = naive(seconds);
            let rounded = round_up_to_step(value, step);

            prop_assert!(rounded >= value);
            prop_assert_eq!(rounded.second(), 0);
            prop_assert_eq!(rounded.minute() % step, 0);
            prop_assert!(rounded - value < Duration::minutes(i64::from(step)));
        }

        // Values already on the grid come back unchanged
        #[test]
        fn test_round_up_keeps_aligned(
            hours in 0..(MAX_SECONDS / 3600),
            minute in 0..60u32,
            step in 1..=120u32,
        ) {
            let aligned_minute = i64::from(minute - minute % step);
            let value = naive(hours * 3600 + aligned_minute * 60);
            prop_assert_eq!(round_up_to_step(value, step), value);
        }

        // Without DST every local minute maps to exactly one instant
        #[test]
        fn test_epoch_millis_round_trip(minutes in (NO_DST_SECONDS / 60)..(MAX_SECONDS / 60)) {
            let tz = Tz::America__Mexico_City;
            let millis = minutes * 60_000;
            let local = epoch_millis_to_local(millis, tz).unwrap();
            prop_assert_eq!(local_to_epoch_millis(local, tz), Some(millis));
        }
    }
}
