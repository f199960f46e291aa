//! Six-day (Monday to Saturday) clinic week navigation.

use chrono::{Datelike, Duration, NaiveDate};

use super::clock::Clock;
use crate::utils::date::get_week_start;

pub const VISIBLE_DAYS: usize = 6;

const MONDAY: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekNavigator {
    anchor: NaiveDate,
}

impl WeekNavigator {
    pub fn new(anchor: NaiveDate) -> Self {
        Self { anchor }
    }

    /// Week containing today's date
    pub fn today(clock: &dyn Clock) -> Self {
        Self::new(clock.now().date_naive())
    }

    /// Monday to Saturday of the week containing `anchor`.
    ///
    /// A Sunday belongs to the week that just ended, so it rolls back six
    /// days to the preceding Monday rather than forward.
    pub fn visible_dates(anchor: NaiveDate) -> [NaiveDate; VISIBLE_DAYS] {
        let monday = get_week_start(anchor, MONDAY);
        std::array::from_fn(|offset| monday + Duration::days(offset as i64))
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn dates(&self) -> [NaiveDate; VISIBLE_DAYS] {
        Self::visible_dates(self.anchor)
    }

    pub fn week_start(&self) -> NaiveDate {
        get_week_start(self.anchor, MONDAY)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates().contains(&date)
    }

    pub fn next_week(&mut self) {
        self.anchor += Duration::days(7);
    }

    pub fn previous_week(&mut self) {
        self.anchor -= Duration::days(7);
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.anchor = date;
    }

    /// Header label such as "4 – 9 Mar 2024" or "26 Feb – 2 Mar 2024"
    pub fn range_label(&self) -> String {
        let dates = self.dates();
        let first = dates[0];
        let last = dates[VISIBLE_DAYS - 1];

        if first.year() != last.year() {
            format!("{} – {}", first.format("%-d %b %Y"), last.format("%-d %b %Y"))
        } else if first.month() != last.month() {
            format!("{} – {}", first.format("%-d %b"), last.format("%-d %b %Y"))
        } else {
            format!("{} – {}", first.format("%-d"), last.format("%-d %b %Y"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::clock::FixedClock;
    use chrono::{Local, TimeZone, Weekday};
    use test_case::test_case;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test_case(date(2024, 3, 4) ; "monday anchor")]
    #[test_case(date(2024, 3, 6) ; "wednesday anchor")]
    #[test_case(date(2024, 3, 9) ; "saturday anchor")]
    #[test_case(date(2024, 3, 10) ; "sunday anchor rolls back")]
    fn test_week_of_march_fourth(anchor: NaiveDate) {
        let dates = WeekNavigator::visible_dates(anchor);
        assert_eq!(dates[0], date(2024, 3, 4));
        assert_eq!(dates[5], date(2024, 3, 9));
    }

    #[test]
    fn test_dates_run_monday_to_saturday() {
        let dates = WeekNavigator::visible_dates(date(2024, 3, 7));
        let weekdays: Vec<Weekday> = dates.iter().map(|d| d.weekday()).collect();
        assert_eq!(
            weekdays,
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat
            ]
        );
    }

    #[test]
    fn test_month_rollover() {
        let dates = WeekNavigator::visible_dates(date(2024, 2, 29));
        assert_eq!(dates[0], date(2024, 2, 26));
        assert_eq!(dates[5], date(2024, 3, 2));
    }

    #[test]
    fn test_year_rollover_from_sunday() {
        // Sunday 5 Jan 2025 belongs to the week starting Monday 30 Dec 2024
        let dates = WeekNavigator::visible_dates(date(2025, 1, 5));
        assert_eq!(dates[0], date(2024, 12, 30));
        assert_eq!(dates[5], date(2025, 1, 4));
    }

    #[test]
    fn test_navigation_steps_whole_weeks() {
        let mut nav = WeekNavigator::new(date(2024, 3, 10));
        nav.next_week();
        assert_eq!(nav.week_start(), date(2024, 3, 11));
        nav.previous_week();
        nav.previous_week();
        assert_eq!(nav.week_start(), date(2024, 2, 26));
        assert!(nav.contains(date(2024, 3, 2)));
        assert!(!nav.contains(date(2024, 3, 3)));
    }

    #[test]
    fn test_today_uses_clock() {
        let clock = FixedClock::new(Local.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap());
        let nav = WeekNavigator::today(&clock);
        assert_eq!(nav.week_start(), date(2024, 3, 4));
    }

    #[test_case(date(2024, 3, 6), "4 – 9 Mar 2024" ; "same month")]
    #[test_case(date(2024, 2, 29), "26 Feb – 2 Mar 2024" ; "across months")]
    #[test_case(date(2025, 1, 1), "30 Dec 2024 – 4 Jan 2025" ; "across years")]
    fn test_range_label(anchor: NaiveDate, expected: &str) {
        assert_eq!(WeekNavigator::new(anchor).range_label(), expected);
    }
}
