//! Packing of one day's overlapping appointments into side-by-side columns.
//!
//! Greedy interval-graph colouring: appointments are visited in start order
//! (ties keep input order) and each goes into the left-most column whose
//! last appointment has already ended. Visiting in start order makes the
//! first-fit choice optimal, so the column count equals the largest set of
//! mutually overlapping appointments.
//!
//! All columns of a day share one width (`1 / column_count`) so blocks do not
//! jump sideways when an unrelated appointment elsewhere in the day changes.

use chrono::{DateTime, Duration, Local};

use crate::models::appointment::{Appointment, AppointmentId};
use crate::models::settings::GridSettings;

/// Column placement of a single appointment within its day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnAssignment {
    pub column_index: usize,
    pub column_count: usize,
}

impl ColumnAssignment {
    /// Horizontal offset as a fraction of the day column width
    pub fn left_fraction(&self) -> f32 {
        self.column_index as f32 / self.column_count.max(1) as f32
    }

    /// Width as a fraction of the day column width
    pub fn width_fraction(&self) -> f32 {
        1.0 / self.column_count.max(1) as f32
    }
}

/// One placed appointment, in placement (paint) order.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedSlot {
    pub id: AppointmentId,
    /// Position of the appointment in the slice handed to the packer
    pub input_index: usize,
    pub column_index: usize,
    pub start: DateTime<Local>,
    /// End after clamping malformed intervals to the minimum duration
    pub end: DateTime<Local>,
    /// True when the input interval had `end <= start`
    pub clamped: bool,
}

/// Result of packing one day. Recomputed whenever the day's appointment set
/// changes; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayPacking {
    slots: Vec<PackedSlot>,
    column_count: usize,
}

impl DayPacking {
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots sorted by start time (stable); later slots paint on top.
    pub fn slots(&self) -> &[PackedSlot] {
        &self.slots
    }

    pub fn assignment(&self, id: &AppointmentId) -> Option<ColumnAssignment> {
        self.slots
            .iter()
            .find(|slot| &slot.id == id)
            .map(|slot| self.assignment_for(slot))
    }

    pub fn assignments(&self) -> impl Iterator<Item = (&AppointmentId, ColumnAssignment)> + '_ {
        self.slots
            .iter()
            .map(move |slot| (&slot.id, self.assignment_for(slot)))
    }

    fn assignment_for(&self, slot: &PackedSlot) -> ColumnAssignment {
        ColumnAssignment {
            column_index: slot.column_index,
            column_count: self.column_count,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntervalPacker {
    min_duration: Duration,
}

impl Default for IntervalPacker {
    fn default() -> Self {
        Self::new(Duration::minutes(GridSettings::default().min_duration_minutes))
    }
}

impl IntervalPacker {
    pub fn new(min_duration: Duration) -> Self {
        Self {
            min_duration: min_duration.max(Duration::seconds(1)),
        }
    }

    pub fn from_settings(settings: &GridSettings) -> Self {
        Self::new(Duration::minutes(settings.min_duration_minutes))
    }

    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    /// Interval the packer actually uses for an appointment. Well-formed
    /// appointments are untouched; `end <= start` becomes `start + min`.
    pub fn effective_interval(
        &self,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> (DateTime<Local>, DateTime<Local>) {
        if end > start {
            (start, end)
        } else {
            (start, start + self.min_duration)
        }
    }

    /// Pack the appointments of one calendar day. Total: never fails.
    pub fn pack(&self, appointments: &[&Appointment]) -> DayPacking {
        if appointments.is_empty() {
            return DayPacking::default();
        }

        let intervals: Vec<_> = appointments
            .iter()
            .map(|appt| self.effective_interval(appt.start, appt.end))
            .collect();

        let placement = assign_columns(&intervals);

        let slots = placement
            .order
            .iter()
            .map(|&index| {
                let appointment = appointments[index];
                let (start, end) = intervals[index];
                PackedSlot {
                    id: appointment.id.clone(),
                    input_index: index,
                    column_index: placement.columns[index],
                    start,
                    end,
                    clamped: !appointment.is_well_formed(),
                }
            })
            .collect();

        DayPacking {
            slots,
            column_count: placement.column_count,
        }
    }
}

/// Column placement of raw intervals, indexed like the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Column of each input interval
    pub columns: Vec<usize>,
    /// Input indices in the order they were placed
    pub order: Vec<usize>,
    pub column_count: usize,
}

/// First-fit column assignment over half-open `[start, end)` intervals.
///
/// Generic so it can be exercised with plain integers.
pub fn assign_columns<T: Ord + Copy>(intervals: &[(T, T)]) -> Placement {
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    // `sort_by_key` is stable, which gives the input-order tie-break.
    order.sort_by_key(|&index| intervals[index].0);

    let mut column_ends: Vec<T> = Vec::new();
    let mut columns = vec![0; intervals.len()];

    for &index in &order {
        let (start, end) = intervals[index];
        match column_ends.iter().position(|&last_end| last_end <= start) {
            Some(column) => {
                column_ends[column] = end;
                columns[index] = column;
            }
            None => {
                columns[index] = column_ends.len();
                column_ends.push(end);
            }
        }
    }

    Placement {
        columns,
        order,
        column_count: column_ends.len(),
    }
}
