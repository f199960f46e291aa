// Host-side appointment store with optimistic updates.
//
// Grid intents are applied immediately and recorded as pending changes. The
// persistence layer later confirms a change (optionally with the stored
// value) or reverts it, restoring the exact pre-intent appointment.

use crate::grid::intent::GridIntent;
use crate::models::appointment::{Appointment, AppointmentId};
use anyhow::{anyhow, bail, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChangeToken(u64);

/// An optimistic edit awaiting confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    pub token: ChangeToken,
    pub id: AppointmentId,
    pub before: Appointment,
    pub after: Appointment,
}

#[derive(Debug, Default)]
pub struct AppointmentBook {
    /// Insertion order is kept; the grid uses it as a tie-break
    appointments: Vec<Appointment>,
    pending: Vec<PendingChange>,
    next_token: u64,
}

impl AppointmentBook {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments,
            pending: Vec::new(),
            next_token: 1,
        }
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn get(&self, id: &AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|appt| &appt.id == id)
    }

    pub fn pending(&self) -> &[PendingChange] {
        &self.pending
    }

    pub fn is_pending(&self, id: &AppointmentId) -> bool {
        self.pending.iter().any(|change| &change.id == id)
    }

    /// Add a new appointment. Ids must be unique.
    pub fn insert(&mut self, appointment: Appointment) -> Result<()> {
        appointment
            .validate()
            .map_err(|e| anyhow!("Invalid appointment: {}", e))?;
        if self.get(&appointment.id).is_some() {
            bail!("Appointment {} already exists", appointment.id);
        }
        log::debug!("Inserted appointment {}", appointment.id);
        self.appointments.push(appointment);
        Ok(())
    }

    /// Apply a move or resize intent optimistically.
    ///
    /// Create and open intents do not change stored data and return
    /// `Ok(None)`; the host handles them with its own dialogs.
    pub fn apply(&mut self, intent: &GridIntent) -> Result<Option<PendingChange>> {
        let (id, start, end) = match intent {
            GridIntent::Create { .. } | GridIntent::Open { .. } => return Ok(None),
            GridIntent::Move {
                id,
                new_start,
                new_end,
            } => (id, *new_start, *new_end),
            GridIntent::Resize { id, new_end } => {
                let current = self
                    .get(id)
                    .ok_or_else(|| anyhow!("Appointment {} not found", id))?;
                (id, current.start, *new_end)
            }
        };

        if end <= start {
            bail!("Rejected change to {}: end must be after start", id);
        }

        let index = self
            .index_of(id)
            .ok_or_else(|| anyhow!("Appointment {} not found", id))?;

        let before = self.appointments[index].clone();
        let mut after = before.clone();
        after.reschedule(start, end);
        self.appointments[index] = after.clone();

        let token = ChangeToken(self.next_token);
        self.next_token += 1;

        let change = PendingChange {
            token,
            id: id.clone(),
            before,
            after,
        };
        log::info!(
            "Applied {} to {} optimistically ({:?})",
            intent_name(intent),
            id,
            token
        );
        self.pending.push(change.clone());
        Ok(Some(change))
    }

    /// Mark a change as persisted. When the store returned its own version
    /// of the appointment it replaces the optimistic one.
    pub fn confirm(&mut self, token: ChangeToken, authoritative: Option<Appointment>) -> bool {
        let Some(position) = self.pending.iter().position(|change| change.token == token) else {
            log::debug!("Confirm for unknown change {:?}", token);
            return false;
        };
        let change = self.pending.remove(position);

        if let Some(stored) = authoritative {
            if let Some(index) = self.index_of(&change.id) {
                self.appointments[index] = stored;
            }
        }
        log::debug!("Confirmed change {:?} to {}", token, change.id);
        true
    }

    /// Undo a change that failed to persist. Later pending changes to the
    /// same appointment were built on top of it and are discarded as well.
    pub fn revert(&mut self, token: ChangeToken) -> Result<()> {
        let position = self
            .pending
            .iter()
            .position(|change| change.token == token)
            .ok_or_else(|| anyhow!("No pending change {:?}", token))?;
        let change = self.pending.remove(position);

        self.pending
            .retain(|later| later.id != change.id || later.token < change.token);

        match self.index_of(&change.id) {
            Some(index) => self.appointments[index] = change.before,
            None => self.appointments.push(change.before),
        }
        log::info!("Reverted change {:?} to {}", token, change.id);
        Ok(())
    }

    /// Replace the whole snapshot, e.g. after a reload from the store.
    /// Outstanding changes are dropped.
    pub fn replace_snapshot(&mut self, appointments: Vec<Appointment>) {
        if !self.pending.is_empty() {
            log::info!(
                "Snapshot replaced with {} pending change(s) outstanding",
                self.pending.len()
            );
        }
        self.appointments = appointments;
        self.pending.clear();
    }

    /// Replace the snapshot from a JSON array of appointments
    pub fn replace_snapshot_json(&mut self, json: &str) -> Result<()> {
        let appointments: Vec<Appointment> =
            serde_json::from_str(json).context("Failed to parse appointment snapshot")?;
        self.replace_snapshot(appointments);
        Ok(())
    }

    /// Current snapshot as a JSON array, pending changes included
    pub fn snapshot_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.appointments).context("Failed to serialize appointments")
    }

    fn index_of(&self, id: &AppointmentId) -> Option<usize> {
        self.appointments.iter().position(|appt| &appt.id == id)
    }
}

fn intent_name(intent: &GridIntent) -> &'static str {
    match intent {
        GridIntent::Create { .. } => "create",
        GridIntent::Open { .. } => "open",
        GridIntent::Move { .. } => "move",
        GridIntent::Resize { .. } => "resize",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, NaiveTime, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, hour, minute, 0).unwrap()
    }

    fn book() -> AppointmentBook {
        AppointmentBook::new(vec![
            Appointment::new("a", "Ana", at(9, 0), at(10, 0)).unwrap(),
            Appointment::new("b", "Ben", at(11, 0), at(11, 30)).unwrap(),
        ])
    }

    fn move_a(hour: u32) -> GridIntent {
        GridIntent::Move {
            id: "a".into(),
            new_start: at(hour, 0),
            new_end: at(hour + 1, 0),
        }
    }

    #[test]
    fn test_apply_move_is_visible_immediately() {
        let mut book = book();
        let change = book.apply(&move_a(13)).unwrap().unwrap();

        let moved = book.get(&"a".into()).unwrap();
        assert_eq!(moved.start, at(13, 0));
        assert_eq!(moved.duration_minutes, 60);
        assert_eq!(change.before.start, at(9, 0));
        assert!(book.is_pending(&"a".into()));
    }

    #[test]
    fn test_apply_resize_keeps_start() {
        let mut book = book();
        book.apply(&GridIntent::Resize {
            id: "b".into(),
            new_end: at(12, 15),
        })
        .unwrap();

        let resized = book.get(&"b".into()).unwrap();
        assert_eq!(resized.start, at(11, 0));
        assert_eq!(resized.duration_minutes, 75);
    }

    #[test]
    fn test_create_and_open_change_nothing() {
        let mut book = book();
        let create = GridIntent::Create {
            date: at(9, 0).date_naive(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        };
        assert!(book.apply(&create).unwrap().is_none());
        assert!(book.apply(&GridIntent::Open { id: "a".into() }).unwrap().is_none());
        assert!(book.pending().is_empty());
    }

    #[test]
    fn test_unknown_appointment_is_error() {
        let mut book = book();
        let intent = GridIntent::Move {
            id: "zzz".into(),
            new_start: at(9, 0),
            new_end: at(10, 0),
        };
        assert!(book.apply(&intent).is_err());
    }

    #[test]
    fn test_revert_restores_exact_snapshot() {
        let mut book = book();
        let original = book.appointments().to_vec();
        let change = book.apply(&move_a(14)).unwrap().unwrap();

        book.revert(change.token).unwrap();
        assert_eq!(book.appointments(), original.as_slice());
        assert!(book.pending().is_empty());
        assert!(book.revert(change.token).is_err());
    }

    #[test]
    fn test_revert_discards_later_changes_to_same_appointment() {
        let mut book = book();
        let first = book.apply(&move_a(12)).unwrap().unwrap();
        let _second = book.apply(&move_a(15)).unwrap().unwrap();
        let other = book
            .apply(&GridIntent::Resize {
                id: "b".into(),
                new_end: at(12, 0),
            })
            .unwrap()
            .unwrap();

        book.revert(first.token).unwrap();
        assert_eq!(book.get(&"a".into()).unwrap().start, at(9, 0));
        assert_eq!(book.pending().len(), 1);
        assert_eq!(book.pending()[0].token, other.token);
    }

    #[test]
    fn test_confirm_with_authoritative_value() {
        let mut book = book();
        let change = book.apply(&move_a(13)).unwrap().unwrap();

        let mut stored = change.after.clone();
        stored.provider_label = "Dr. Who".to_string();
        assert!(book.confirm(change.token, Some(stored.clone())));
        assert_eq!(book.get(&"a".into()), Some(&stored));
        assert!(!book.confirm(change.token, None));
    }

    #[test]
    fn test_replace_snapshot_clears_pending() {
        let mut book = book();
        book.apply(&move_a(13)).unwrap();
        book.replace_snapshot(vec![Appointment::new("c", "Cy", at(8, 0), at(8, 30)).unwrap()]);
        assert!(book.pending().is_empty());
        assert_eq!(book.appointments().len(), 1);
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let mut book = book();
        let json = book.snapshot_json().unwrap();
        book.apply(&move_a(13)).unwrap();

        book.replace_snapshot_json(&json).unwrap();
        assert_eq!(book.get(&"a".into()).unwrap().start, at(9, 0));
        assert!(book.pending().is_empty());
        assert!(book.replace_snapshot_json("{not json").is_err());
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut book = book();
        let dup = Appointment::new("a", "Ann", at(15, 0), at(16, 0)).unwrap();
        assert!(book.insert(dup).is_err());
        let fresh = Appointment::new("d", "Dee", at(15, 0), at(16, 0)).unwrap();
        book.insert(fresh).unwrap();
        assert_eq!(book.appointments().len(), 3);
    }
}
