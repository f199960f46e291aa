// Date utility functions

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

/// Calculate the start of the week containing the given date.
///
/// # Arguments
/// * `date` - The date to find the week start for
/// * `first_day_of_week` - 0 = Sunday, 1 = Monday, etc.
pub fn get_week_start(date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let offset = (weekday - first_day_of_week as i64 + 7) % 7;
    date - Duration::days(offset)
}

/// Local wall-clock instant `minutes` after midnight of `date`.
///
/// Minutes past 24h roll into the next day, so `1440.0` is the following
/// midnight. Ambiguous local times (DST fold) resolve to the earlier instant;
/// nonexistent ones (DST gap) are pushed forward by an hour.
pub fn local_at_minutes(date: NaiveDate, minutes: f64) -> DateTime<Local> {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let naive = midnight + Duration::seconds((minutes * 60.0).round() as i64);
    resolve_local(naive)
}

/// Minutes after midnight of the local date of `instant`.
pub fn minutes_since_midnight(instant: DateTime<Local>) -> f64 {
    let naive = instant.naive_local();
    let midnight = naive.date().and_hms_opt(0, 0, 0).unwrap_or_default();
    (naive - midnight).num_seconds() as f64 / 60.0
}

fn resolve_local(naive: NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            Local
                .from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| Local.from_utc_datetime(&naive))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_get_week_start_sunday() {
        // Wednesday, Dec 4, 2024
        let date = NaiveDate::from_ymd_opt(2024, 12, 4).unwrap();
        let start = get_week_start(date, 0);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
    }

    #[test]
    fn test_get_week_start_monday() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 4).unwrap();
        let start = get_week_start(date, 1);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 2).unwrap());
    }

    #[test]
    fn test_get_week_start_monday_from_sunday_goes_back() {
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(
            get_week_start(sunday, 1),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_local_at_minutes_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        let instant = local_at_minutes(date, 9.0 * 60.0 + 30.0);
        assert_eq!(instant.hour(), 9);
        assert_eq!(instant.minute(), 30);
        assert_eq!(minutes_since_midnight(instant), 570.0);
    }

    #[test]
    fn test_local_at_minutes_rolls_into_next_day() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        let instant = local_at_minutes(date, 24.0 * 60.0);
        assert_eq!(instant.date_naive(), NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        assert_eq!(instant.hour(), 0);
    }
}
