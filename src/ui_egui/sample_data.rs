// Demo appointments for the week containing a given date

use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::grid::week::WeekNavigator;
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::utils::date::local_at_minutes;

struct Row {
    day: usize,
    start: (u32, u32),
    minutes: i64,
    status: &'static str,
    patient: &'static str,
    provider: &'static str,
    kind: &'static str,
}

const ROWS: &[Row] = &[
    Row { day: 0, start: (9, 0), minutes: 60, status: "confirmed", patient: "Ana Souza", provider: "Dr. Lima", kind: "Physio" },
    Row { day: 0, start: (9, 30), minutes: 60, status: "scheduled", patient: "Ben Carter", provider: "Dr. Reyes", kind: "Consult" },
    Row { day: 0, start: (10, 0), minutes: 30, status: "pending", patient: "Chen Wei", provider: "Dr. Lima", kind: "Follow-up" },
    Row { day: 0, start: (14, 0), minutes: 10, status: "confirmed", patient: "Dana Okafor", provider: "Dr. Reyes", kind: "Check" },
    Row { day: 1, start: (8, 0), minutes: 90, status: "evaluation", patient: "Eli Novak", provider: "Dr. Lima", kind: "Assessment" },
    Row { day: 1, start: (11, 15), minutes: 45, status: "cancelled", patient: "Fay Adams", provider: "Dr. Reyes", kind: "Physio" },
    Row { day: 2, start: (6, 30), minutes: 60, status: "completed", patient: "Gus Moreau", provider: "Dr. Lima", kind: "Early session" },
    Row { day: 2, start: (13, 0), minutes: 60, status: "no_show", patient: "Hana Ito", provider: "Dr. Reyes", kind: "Consult" },
    Row { day: 2, start: (13, 0), minutes: 30, status: "confirmed", patient: "Ivan Petrov", provider: "Dr. Lima", kind: "Check" },
    Row { day: 2, start: (13, 20), minutes: 40, status: "scheduled", patient: "Jo Kim", provider: "Dr. Lima", kind: "Physio" },
    Row { day: 3, start: (16, 0), minutes: 45, status: "waitlisted", patient: "Kai Berg", provider: "Dr. Reyes", kind: "Consult" },
    Row { day: 4, start: (20, 30), minutes: 60, status: "scheduled", patient: "Lia Costa", provider: "Dr. Lima", kind: "Late session" },
    Row { day: 4, start: (22, 0), minutes: 30, status: "scheduled", patient: "Max Hart", provider: "Dr. Reyes", kind: "Telehealth" },
    Row { day: 5, start: (10, 0), minutes: 0, status: "scheduled", patient: "Nia Brooks", provider: "Dr. Lima", kind: "Walk-in" },
];

/// Appointments covering overlaps, every status, an unknown status, a
/// zero-length row and rows outside default clinic hours.
pub fn sample_week(anchor: NaiveDate) -> Vec<Appointment> {
    let dates = WeekNavigator::visible_dates(anchor);

    ROWS.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let date = dates.get(row.day)?;
            let start: DateTime<Local> =
                local_at_minutes(*date, (row.start.0 * 60 + row.start.1) as f64);
            Appointment::builder()
                .id(format!("{}-{}", date.format("%Y%m%d"), index))
                .start(start)
                .end(start + Duration::minutes(row.minutes))
                .status(AppointmentStatus::parse(row.status))
                .patient(row.patient)
                .provider(row.provider)
                .kind(row.kind)
                .build_unchecked()
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_week_lands_in_requested_week() {
        let anchor = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        let appointments = sample_week(anchor);
        let nav = WeekNavigator::new(anchor);

        assert_eq!(appointments.len(), ROWS.len());
        assert!(appointments.iter().all(|a| nav.contains(a.start.date_naive())));
        assert!(appointments.iter().any(|a| !a.is_well_formed()));
        assert!(appointments.iter().any(|a| !a.status.is_recognized()));
    }
}
