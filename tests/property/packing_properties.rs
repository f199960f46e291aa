// Property-based tests for interval packing
// Checks correctness and minimality of column assignment on random days

use chrono::{DateTime, Duration, Local, TimeZone};
use clinic_scheduler::grid::packing::{assign_columns, IntervalPacker};
use clinic_scheduler::models::appointment::{Appointment, AppointmentId};
use proptest::prelude::*;

fn day_start() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 6, 8, 0, 0).unwrap()
}

/// Largest number of half-open intervals sharing one instant
fn max_overlap(intervals: &[(u32, u32)]) -> usize {
    intervals
        .iter()
        .map(|&(point, _)| {
            intervals
                .iter()
                .filter(|&&(start, end)| start <= point && point < end)
                .count()
        })
        .max()
        .unwrap_or(0)
}

fn overlaps(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Well-formed intervals within a ten hour day
fn intervals() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((0u32..600, 1u32..180), 0..40).prop_map(|rows| {
        rows.into_iter()
            .map(|(start, length)| (start, start + length))
            .collect()
    })
}

fn appointments(rows: &[(u32, i64)]) -> Vec<Appointment> {
    rows.iter()
        .enumerate()
        .map(|(index, &(start, length))| {
            let start = day_start() + Duration::minutes(start as i64);
            Appointment::builder()
                .id(format!("appt-{}", index))
                .patient("p")
                .start(start)
                .end(start + Duration::minutes(length))
                .build_unchecked()
                .unwrap()
        })
        .collect()
}

proptest! {
    /// Property: intervals that overlap never share a column
    #[test]
    fn prop_overlapping_intervals_never_share_a_column(intervals in intervals()) {
        let placement = assign_columns(&intervals);
        for i in 0..intervals.len() {
            for j in (i + 1)..intervals.len() {
                if overlaps(intervals[i], intervals[j]) {
                    prop_assert_ne!(placement.columns[i], placement.columns[j]);
                }
            }
        }
    }

    /// Property: the column count equals the maximum number of simultaneous
    /// intervals, so no layout could use fewer columns
    #[test]
    fn prop_column_count_is_minimal(intervals in intervals()) {
        let placement = assign_columns(&intervals);
        prop_assert_eq!(placement.column_count, max_overlap(&intervals));
        prop_assert!(placement.columns.iter().all(|&column| column < placement.column_count.max(1)));
    }

    /// Property: packing is a pure function of its input
    #[test]
    fn prop_packing_is_deterministic(intervals in intervals()) {
        prop_assert_eq!(assign_columns(&intervals), assign_columns(&intervals));
    }

    /// Property: placement order visits every input once, sorted by start
    #[test]
    fn prop_order_is_a_stable_sort_by_start(intervals in intervals()) {
        let placement = assign_columns(&intervals);
        let mut expected: Vec<usize> = (0..intervals.len()).collect();
        expected.sort_by_key(|&index| intervals[index].0);
        prop_assert_eq!(placement.order, expected);
    }

    /// Property: every appointment, malformed or not, is placed exactly once
    /// and can be found again by id
    #[test]
    fn prop_packer_places_every_appointment(
        rows in prop::collection::vec((0u32..600, -30i64..180), 0..40)
    ) {
        let appointments = appointments(&rows);
        let refs: Vec<&Appointment> = appointments.iter().collect();
        let packing = IntervalPacker::new(Duration::minutes(15)).pack(&refs);

        prop_assert_eq!(packing.len(), appointments.len());
        for (index, appointment) in appointments.iter().enumerate() {
            let assignment = packing.assignment(&appointment.id);
            prop_assert!(assignment.is_some());
            let slot = packing
                .slots()
                .iter()
                .find(|slot| slot.id == appointment.id)
                .unwrap();
            prop_assert_eq!(slot.input_index, index);
            prop_assert!(slot.end > slot.start);
            prop_assert_eq!(slot.clamped, rows[index].1 <= 0);
        }
    }

    /// Property: effective intervals in the same column never overlap
    #[test]
    fn prop_packed_slots_in_a_column_are_disjoint(
        rows in prop::collection::vec((0u32..600, -30i64..180), 0..40)
    ) {
        let appointments = appointments(&rows);
        let refs: Vec<&Appointment> = appointments.iter().collect();
        let packing = IntervalPacker::new(Duration::minutes(15)).pack(&refs);

        let slots = packing.slots();
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                if a.column_index == b.column_index {
                    prop_assert!(a.end <= b.start || b.end <= a.start);
                }
            }
        }
    }
}

#[test]
fn test_unknown_id_has_no_assignment() {
    let appointments = appointments(&[(0, 60)]);
    let refs: Vec<&Appointment> = appointments.iter().collect();
    let packing = IntervalPacker::default().pack(&refs);
    assert!(packing.assignment(&AppointmentId::new("missing")).is_none());
}
