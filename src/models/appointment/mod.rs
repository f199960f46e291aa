// Appointment module
// Clinic appointment snapshot as handed to the time grid by its host

use std::fmt;

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

/// Opaque appointment identifier owned by the host's storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(String);

impl AppointmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppointmentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Appointment status. Drives color/opacity only; the grid never enforces
/// transitions between statuses.
///
/// Unrecognized strings coming from the host are kept in `Other` so that
/// rendering can fall back to a default style instead of failing.
///
/// Recognized statuses are normalized: case and spelling variants such as
/// `"Canceled"` or `"no-show"` serialize back as the canonical snake_case
/// name (`"cancelled"`, `"no_show"`). Only `Other` keeps the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Pending,
    Completed,
    Cancelled,
    NoShow,
    Evaluation,
    Other(String),
}

impl AppointmentStatus {
    /// All recognized statuses, in display order.
    pub const KNOWN: [AppointmentStatus; 7] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Pending,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
        AppointmentStatus::Evaluation,
    ];

    /// Case-insensitive; accepts `canceled` and `no-show`/`noshow` as aliases.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Self::Scheduled,
            "confirmed" => Self::Confirmed,
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            "no_show" | "no-show" | "noshow" => Self::NoShow,
            "evaluation" => Self::Evaluation,
            _ => Self::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
            Self::Evaluation => "evaluation",
            Self::Other(raw) => raw,
        }
    }

    /// Human readable label for tooltips and legends
    pub fn label(&self) -> &str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Confirmed => "Confirmed",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::NoShow => "No-show",
            Self::Evaluation => "Evaluation",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Scheduled
    }
}

impl From<String> for AppointmentStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<AppointmentStatus> for String {
    fn from(value: AppointmentStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinic appointment as seen by the scheduler grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    /// Kept consistent with `end - start` by every mutation in this crate
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
    pub patient_label: String,
    pub provider_label: String,
    pub type_label: String,
}

impl Appointment {
    /// Create a new appointment with required fields
    ///
    /// # Examples
    /// ```
    /// use clinic_scheduler::models::appointment::Appointment;
    /// use chrono::{Duration, Local};
    ///
    /// let start = Local::now();
    /// let appt = Appointment::new("a-1", "Jane Doe", start, start + Duration::minutes(45)).unwrap();
    /// assert_eq!(appt.duration_minutes, 45);
    /// ```
    pub fn new(
        id: impl Into<String>,
        patient_label: impl Into<String>,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Self, String> {
        Self::builder()
            .id(id)
            .patient(patient_label)
            .start(start)
            .end(end)
            .build()
    }

    /// Create a builder for constructing appointments with optional fields
    pub fn builder() -> AppointmentBuilder {
        AppointmentBuilder::new()
    }

    /// Validate the appointment
    pub fn validate(&self) -> Result<(), String> {
        if self.id.as_str().trim().is_empty() {
            return Err("Appointment id cannot be empty".to_string());
        }

        if self.end <= self.start {
            return Err("Appointment end time must be after start time".to_string());
        }

        if self.duration_minutes != (self.end - self.start).num_minutes() {
            return Err(format!(
                "Duration {} min does not match start/end span of {} min",
                self.duration_minutes,
                (self.end - self.start).num_minutes()
            ));
        }

        Ok(())
    }

    /// Span between start and end
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Returns true when the interval is well formed (`end > start`)
    pub fn is_well_formed(&self) -> bool {
        self.end > self.start
    }

    /// Move the appointment, recomputing the derived duration
    pub fn reschedule(&mut self, start: DateTime<Local>, end: DateTime<Local>) {
        self.start = start;
        self.end = end;
        self.duration_minutes = (end - start).num_minutes();
    }

    /// Change the end time only, recomputing the derived duration
    pub fn resize_to(&mut self, end: DateTime<Local>) {
        self.reschedule(self.start, end);
    }
}

/// Builder for creating appointments with optional fields
#[derive(Default)]
pub struct AppointmentBuilder {
    id: Option<String>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    status: AppointmentStatus,
    patient_label: Option<String>,
    provider_label: String,
    type_label: String,
}

impl AppointmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn start(mut self, start: DateTime<Local>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Local>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn patient(mut self, label: impl Into<String>) -> Self {
        self.patient_label = Some(label.into());
        self
    }

    pub fn provider(mut self, label: impl Into<String>) -> Self {
        self.provider_label = label.into();
        self
    }

    pub fn kind(mut self, label: impl Into<String>) -> Self {
        self.type_label = label.into();
        self
    }

    /// Build the appointment, validating the interval
    pub fn build(self) -> Result<Appointment, String> {
        let appointment = self.build_unchecked()?;
        appointment.validate()?;
        Ok(appointment)
    }

    /// Build without interval validation.
    ///
    /// Hosts occasionally hand the grid malformed rows (zero-length slots,
    /// inverted times); this lets them through so the renderer can clamp them.
    pub fn build_unchecked(self) -> Result<Appointment, String> {
        let id = self.id.ok_or("Appointment id is required")?;
        let start = self.start.ok_or("Appointment start time is required")?;
        let end = self.end.ok_or("Appointment end time is required")?;

        Ok(Appointment {
            id: AppointmentId(id),
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
            status: self.status,
            patient_label: self.patient_label.unwrap_or_default(),
            provider_label: self.provider_label,
            type_label: self.type_label,
        })
    }
}
