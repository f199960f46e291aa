// Test fixtures - reusable test data
// Provides consistent appointments and grid settings across test files
#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use clinic_scheduler::models::appointment::{Appointment, AppointmentStatus};
use clinic_scheduler::models::settings::GridSettings;

/// Grid width giving a 50px time gutter and six 100px day columns
pub const GRID_WIDTH: f32 = 650.0;

/// Monday 4 March 2024
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

/// Local time on a day of March 2024
pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
}

/// 08:00 to 18:00 at one pixel per minute, no column spacing
pub fn clinic_settings() -> GridSettings {
    GridSettings {
        start_hour: 8,
        end_hour: 18,
        pixels_per_hour: 60.0,
        time_label_width: 50.0,
        column_spacing: 0.0,
        min_block_height: 18.0,
        min_duration_minutes: 15,
        snap_minutes: 5,
        drag_threshold: 4.0,
        ..GridSettings::default()
    }
}

/// Appointment without interval validation, for malformed rows too
pub fn appointment(id: &str, start: DateTime<Local>, end: DateTime<Local>) -> Appointment {
    Appointment::builder()
        .id(id)
        .patient(format!("Patient {}", id))
        .provider("Dr. Lima")
        .kind("Consult")
        .start(start)
        .end(end)
        .build_unchecked()
        .unwrap()
}

pub fn with_status(mut appointment: Appointment, status: &str) -> Appointment {
    appointment.status = AppointmentStatus::parse(status);
    appointment
}

/// A 09:00-10:00, B 09:30-10:30, C 10:00-11:00 on Wednesday 6 March
pub fn abc_overlap() -> Vec<Appointment> {
    vec![
        appointment("A", at(6, 9, 0), at(6, 10, 0)),
        appointment("B", at(6, 9, 30), at(6, 10, 30)),
        appointment("C", at(6, 10, 0), at(6, 11, 0)),
    ]
}
