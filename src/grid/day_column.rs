//! Block geometry for a single day column.
//!
//! Combines a day's [`DayPacking`] with the [`TimeAxis`] into positioned,
//! styled blocks. Geometry here is column-local: `top`/`height` in pixels
//! from the top of the visible range, horizontal placement as fractions of
//! the column width. [`BlockLayout::rect_in`] turns it into a screen rect.

use chrono::{DateTime, Duration, Local, NaiveDate};
use egui::{Pos2, Rect, Vec2};

use super::packing::{ColumnAssignment, DayPacking};
use super::style::{BlockStyle, StatusPalette};
use super::time_axis::TimeAxis;
use crate::models::appointment::{Appointment, AppointmentId, AppointmentStatus};
use crate::models::settings::GridSettings;
use crate::utils::date::minutes_since_midnight;

/// Horizontal inset inside a sub-column so neighbouring blocks stay apart
const BLOCK_GUTTER: f32 = 2.0;

/// Something the renderer had to absorb to finish the frame
#[derive(Debug, Clone, PartialEq)]
pub enum RenderDiagnostic {
    /// `end <= start`; drawn with the minimum duration instead
    MalformedInterval { id: AppointmentId },
    /// Status outside the known set; drawn with the fallback style
    UnknownStatus { id: AppointmentId, status: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub id: AppointmentId,
    pub start: DateTime<Local>,
    /// Effective end (malformed intervals clamped)
    pub end: DateTime<Local>,
    pub top: f32,
    pub height: f32,
    pub assignment: ColumnAssignment,
    /// Name only, no type/time line
    pub compact: bool,
    pub style: BlockStyle,
    pub title: String,
    pub detail: Option<String>,
    pub tooltip: String,
    /// Starts before the visible range
    pub clipped_top: bool,
    /// Ends after the visible range
    pub clipped_bottom: bool,
}

impl BlockLayout {
    /// Screen rect of the block inside a day column rect whose top is the
    /// first visible minute.
    pub fn rect_in(&self, column: Rect) -> Rect {
        let width = column.width() * self.assignment.width_fraction();
        let left = column.left() + column.width() * self.assignment.left_fraction();
        let inset = BLOCK_GUTTER.min(width / 4.0);
        Rect::from_min_size(
            Pos2::new(left + inset / 2.0, column.top() + self.top),
            Vec2::new((width - inset).max(1.0), self.height),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumnLayout {
    pub date: NaiveDate,
    pub is_today: bool,
    pub column_count: usize,
    /// In paint order; later blocks are on top
    pub blocks: Vec<BlockLayout>,
    /// Appointments of this day lying wholly outside the visible hours
    pub hidden: Vec<AppointmentId>,
    pub diagnostics: Vec<RenderDiagnostic>,
}

impl DayColumnLayout {
    pub fn block(&self, id: &AppointmentId) -> Option<&BlockLayout> {
        self.blocks.iter().find(|block| &block.id == id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DayColumnRenderer {
    axis: TimeAxis,
    min_block_height: f32,
    compact_threshold: Duration,
    palette: StatusPalette,
}

impl DayColumnRenderer {
    pub fn new(axis: TimeAxis, settings: &GridSettings, palette: StatusPalette) -> Self {
        Self {
            axis,
            min_block_height: settings.min_block_height,
            compact_threshold: Duration::minutes(settings.compact_threshold_minutes),
            palette,
        }
    }

    pub fn axis(&self) -> &TimeAxis {
        &self.axis
    }

    /// Compact rendering depends on duration only, never on pixel height.
    pub fn is_compact(&self, duration: Duration) -> bool {
        duration < self.compact_threshold
    }

    /// Lay out one day. `appointments` must be the slice `packing` was
    /// computed from.
    pub fn layout_day(
        &self,
        date: NaiveDate,
        appointments: &[&Appointment],
        packing: &DayPacking,
        now: DateTime<Local>,
    ) -> DayColumnLayout {
        let mut blocks = Vec::with_capacity(packing.len());
        let mut hidden = Vec::new();
        let mut diagnostics = Vec::new();

        for slot in packing.slots() {
            let Some(appointment) = appointments.get(slot.input_index) else {
                continue;
            };

            if slot.clamped {
                log::warn!(
                    "Appointment {} has end <= start; drawing with minimum duration",
                    slot.id
                );
                diagnostics.push(RenderDiagnostic::MalformedInterval {
                    id: slot.id.clone(),
                });
            }
            if let AppointmentStatus::Other(raw) = &appointment.status {
                log::warn!("Appointment {} has unknown status '{}'", slot.id, raw);
                diagnostics.push(RenderDiagnostic::UnknownStatus {
                    id: slot.id.clone(),
                    status: raw.clone(),
                });
            }

            let start_minutes = minutes_since_midnight(slot.start);
            let duration = slot.end - slot.start;
            let end_minutes = start_minutes + duration.num_seconds() as f64 / 60.0;

            if end_minutes <= self.axis.start_minutes() || start_minutes >= self.axis.end_minutes() {
                hidden.push(slot.id.clone());
                continue;
            }

            let (top, height) = self.vertical_extent(start_minutes, end_minutes);
            let compact = self.is_compact(duration);
            let style = self.palette.style_for(&appointment.status, slot.end < now);

            blocks.push(BlockLayout {
                id: slot.id.clone(),
                start: slot.start,
                end: slot.end,
                top,
                height,
                assignment: ColumnAssignment {
                    column_index: slot.column_index,
                    column_count: packing.column_count(),
                },
                compact,
                style,
                title: appointment.patient_label.clone(),
                detail: (!compact).then(|| detail_line(appointment, slot.start, slot.end)),
                tooltip: tooltip_text(appointment, slot.start, slot.end),
                clipped_top: start_minutes < self.axis.start_minutes(),
                clipped_bottom: end_minutes > self.axis.end_minutes(),
            });
        }

        DayColumnLayout {
            date,
            is_today: date == now.date_naive(),
            column_count: packing.column_count(),
            blocks,
            hidden,
            diagnostics,
        }
    }

    /// Top and height of the visible part, with the height floor applied and
    /// the block kept inside the column.
    fn vertical_extent(&self, start_minutes: f64, end_minutes: f64) -> (f32, f32) {
        let top = self.axis.clamped_offset_for_minutes(start_minutes);
        let bottom = self.axis.clamped_offset_for_minutes(end_minutes);
        let column_height = self.axis.height();

        let height = (bottom - top).max(self.min_block_height).min(column_height);
        let top = top.min(column_height - height).max(0.0);
        (top, height)
    }
}

fn detail_line(appointment: &Appointment, start: DateTime<Local>, end: DateTime<Local>) -> String {
    let times = format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"));
    if appointment.type_label.trim().is_empty() {
        times
    } else {
        format!("{} · {}", appointment.type_label, times)
    }
}

/// Multi-line hover text for a block
pub fn tooltip_text(appointment: &Appointment, start: DateTime<Local>, end: DateTime<Local>) -> String {
    let mut lines = vec![appointment.patient_label.clone()];

    lines.push(format!(
        "{} - {} ({})",
        start.format("%H:%M"),
        end.format("%H:%M"),
        start.format("%A, %B %d")
    ));

    if !appointment.type_label.is_empty() {
        lines.push(format!("Type: {}", appointment.type_label));
    }
    if !appointment.provider_label.is_empty() {
        lines.push(format!("Provider: {}", appointment.provider_label));
    }
    lines.push(format!("Status: {}", appointment.status.label()));

    lines.join("\n")
}
