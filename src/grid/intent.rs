//! Intents emitted by the grid for the host to execute.
//!
//! The grid never writes anything itself. The host applies an intent
//! optimistically, issues its own persistence call, and either keeps the
//! result or replaces the snapshot when the write fails.

use chrono::{DateTime, Local, NaiveDate, NaiveTime};

use crate::models::appointment::AppointmentId;

#[derive(Debug, Clone, PartialEq)]
pub enum GridIntent {
    /// Click on empty grid space
    Create { date: NaiveDate, time: NaiveTime },
    /// Click on an existing block without dragging
    Open { id: AppointmentId },
    /// Block dragged to a new slot; duration is preserved
    Move {
        id: AppointmentId,
        new_start: DateTime<Local>,
        new_end: DateTime<Local>,
    },
    /// Bottom edge dragged; start is unchanged
    Resize {
        id: AppointmentId,
        new_end: DateTime<Local>,
    },
}

impl GridIntent {
    pub fn appointment_id(&self) -> Option<&AppointmentId> {
        match self {
            GridIntent::Create { .. } => None,
            GridIntent::Open { id } | GridIntent::Move { id, .. } | GridIntent::Resize { id, .. } => {
                Some(id)
            }
        }
    }

    /// Route this intent to the matching callback
    pub fn dispatch(&self, sink: &mut dyn IntentSink) {
        match self {
            GridIntent::Create { date, time } => sink.on_create_intent(*date, *time),
            GridIntent::Open { id } => sink.on_open_intent(id),
            GridIntent::Move {
                id,
                new_start,
                new_end,
            } => sink.on_move_intent(id, *new_start, *new_end),
            GridIntent::Resize { id, new_end } => sink.on_resize_intent(id, *new_end),
        }
    }
}

/// Host callbacks for grid intents
#[cfg_attr(test, mockall::automock)]
pub trait IntentSink {
    fn on_create_intent(&mut self, date: NaiveDate, time: NaiveTime);
    fn on_open_intent(&mut self, id: &AppointmentId);
    fn on_move_intent(
        &mut self,
        id: &AppointmentId,
        new_start: DateTime<Local>,
        new_end: DateTime<Local>,
    );
    fn on_resize_intent(&mut self, id: &AppointmentId, new_end: DateTime<Local>);
}

/// Collects intents in emission order
impl IntentSink for Vec<GridIntent> {
    fn on_create_intent(&mut self, date: NaiveDate, time: NaiveTime) {
        self.push(GridIntent::Create { date, time });
    }

    fn on_open_intent(&mut self, id: &AppointmentId) {
        self.push(GridIntent::Open { id: id.clone() });
    }

    fn on_move_intent(
        &mut self,
        id: &AppointmentId,
        new_start: DateTime<Local>,
        new_end: DateTime<Local>,
    ) {
        self.push(GridIntent::Move {
            id: id.clone(),
            new_start,
            new_end,
        });
    }

    fn on_resize_intent(&mut self, id: &AppointmentId, new_end: DateTime<Local>) {
        self.push(GridIntent::Resize {
            id: id.clone(),
            new_end,
        });
    }
}
