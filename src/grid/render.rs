//! Week rendering: combines week navigation, packing, the time axis and
//! day-column layout into a single [`VisualModel`].
//!
//! All coordinates are grid content coordinates: `(0, 0)` is the top-left
//! of the scrollable area, `y = 0` is the first visible minute. Hosts add
//! their own screen origin and scroll offset.

use chrono::{DateTime, Local, NaiveDate};
use egui::{Pos2, Rect, Vec2};

use super::day_column::{BlockLayout, DayColumnLayout, DayColumnRenderer, RenderDiagnostic};
use super::handles::{resize_handle_rect, HitTarget};
use super::now_indicator::project_now;
use super::packing::IntervalPacker;
use super::style::{GridTheme, StatusPalette};
use super::time_axis::{AxisError, TimeAxis};
use super::week::{WeekNavigator, VISIBLE_DAYS};
use crate::models::appointment::{Appointment, AppointmentId};
use crate::models::settings::GridSettings;

/// Narrowest a day column is allowed to get
pub const MIN_COLUMN_WIDTH: f32 = 40.0;

/// Horizontal layout of the grid: time gutter then equal day columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub time_label_width: f32,
    pub column_spacing: f32,
    pub column_width: f32,
    pub height: f32,
    pub day_count: usize,
}

impl GridGeometry {
    pub fn new(settings: &GridSettings, axis: &TimeAxis, total_width: f32, day_count: usize) -> Self {
        let day_count = day_count.max(1);
        let spacing = settings.column_spacing.max(0.0);
        let available = total_width - settings.time_label_width - spacing * day_count as f32;
        Self {
            time_label_width: settings.time_label_width,
            column_spacing: spacing,
            column_width: (available / day_count as f32).max(MIN_COLUMN_WIDTH),
            height: axis.height(),
            day_count,
        }
    }

    pub fn column_left(&self, day_index: usize) -> f32 {
        self.time_label_width
            + self.column_spacing
            + day_index as f32 * (self.column_width + self.column_spacing)
    }

    pub fn column_rect(&self, day_index: usize) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.column_left(day_index), 0.0),
            Vec2::new(self.column_width, self.height),
        )
    }

    /// Area covered by day columns (excludes the time gutter)
    pub fn grid_rect(&self) -> Rect {
        Rect::from_min_max(
            Pos2::new(self.column_left(0), 0.0),
            Pos2::new(self.column_rect(self.day_count - 1).right(), self.height),
        )
    }

    pub fn total_width(&self) -> f32 {
        self.grid_rect().right()
    }

    /// Day column under `x`. The spacing right of a column belongs to it.
    pub fn day_index_at(&self, x: f32) -> Option<usize> {
        let relative = x - self.column_left(0);
        if relative < 0.0 {
            return None;
        }
        let index = (relative / (self.column_width + self.column_spacing)) as usize;
        (index < self.day_count).then_some(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowMarker {
    pub day_index: usize,
    pub offset: f32,
}

/// Everything needed to paint and hit-test one week
#[derive(Debug, Clone, PartialEq)]
pub struct VisualModel {
    pub dates: [NaiveDate; VISIBLE_DAYS],
    pub axis: TimeAxis,
    pub geometry: GridGeometry,
    pub columns: Vec<DayColumnLayout>,
    pub now_marker: Option<NowMarker>,
    pub theme: GridTheme,
}

impl VisualModel {
    pub fn contains(&self, pos: Pos2) -> bool {
        self.geometry.grid_rect().contains(pos)
    }

    pub fn block_rect(&self, day_index: usize, block: &BlockLayout) -> Rect {
        block.rect_in(self.geometry.column_rect(day_index))
    }

    pub fn find_block(&self, id: &AppointmentId) -> Option<(usize, &BlockLayout)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(day_index, column)| column.block(id).map(|block| (day_index, block)))
    }

    /// Block at `index` in the paint order of a day column
    pub fn block_at(&self, day_index: usize, index: usize) -> Option<&BlockLayout> {
        self.columns.get(day_index)?.blocks.get(index)
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &RenderDiagnostic> {
        self.columns.iter().flat_map(|column| column.diagnostics.iter())
    }

    pub fn hidden_count(&self) -> usize {
        self.columns.iter().map(|column| column.hidden.len()).sum()
    }

    /// Resolve what lies under `pos`: resize handle, then block body, then
    /// empty slot. Top-most (last painted) block wins within each tier.
    pub fn hit_test(&self, pos: Pos2) -> HitTarget {
        if !self.contains(pos) {
            return HitTarget::Outside;
        }
        let Some(day_index) = self.geometry.day_index_at(pos.x) else {
            return HitTarget::Outside;
        };
        let Some(column) = self.columns.get(day_index) else {
            return HitTarget::Outside;
        };

        let rects: Vec<(usize, &BlockLayout, Rect)> = column
            .blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (index, block, self.block_rect(day_index, block)))
            .collect();

        if let Some((index, block, _)) = rects
            .iter()
            .rev()
            .find(|(_, _, rect)| resize_handle_rect(*rect).contains(pos))
        {
            return HitTarget::ResizeHandle {
                day_index,
                index: *index,
                id: block.id.clone(),
            };
        }

        if let Some((index, block, _)) = rects.iter().rev().find(|(_, _, rect)| rect.contains(pos)) {
            return HitTarget::Block {
                day_index,
                index: *index,
                id: block.id.clone(),
            };
        }

        HitTarget::EmptySlot {
            day_index,
            date: column.date,
            minutes: self.axis.minutes_at_offset(pos.y),
        }
    }
}

/// Builds [`VisualModel`]s from appointment snapshots. Pure: the same
/// inputs always give the same model.
#[derive(Debug, Clone)]
pub struct WeekRenderer {
    settings: GridSettings,
    axis: TimeAxis,
    packer: IntervalPacker,
    columns: DayColumnRenderer,
    theme: GridTheme,
}

impl WeekRenderer {
    pub fn new(settings: GridSettings, theme: GridTheme) -> Result<Self, AxisError> {
        let axis = TimeAxis::from_settings(&settings)?;
        let palette = StatusPalette::from_theme(&theme);
        Ok(Self {
            packer: IntervalPacker::from_settings(&settings),
            columns: DayColumnRenderer::new(axis, &settings, palette),
            axis,
            settings,
            theme,
        })
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn axis(&self) -> &TimeAxis {
        &self.axis
    }

    pub fn theme(&self) -> &GridTheme {
        &self.theme
    }

    /// Lay out the Monday–Saturday week containing `anchor`.
    ///
    /// Appointments are assigned to the day of their local start time; input
    /// order is the tie-break for equal start times.
    pub fn render_week(
        &self,
        anchor: NaiveDate,
        appointments: &[Appointment],
        grid_width: f32,
        now: DateTime<Local>,
    ) -> VisualModel {
        let dates = WeekNavigator::visible_dates(anchor);
        let geometry = GridGeometry::new(&self.settings, &self.axis, grid_width, VISIBLE_DAYS);

        let columns: Vec<DayColumnLayout> = dates
            .iter()
            .map(|&date| {
                let day: Vec<&Appointment> = appointments
                    .iter()
                    .filter(|appt| appt.start.date_naive() == date)
                    .collect();
                let packing = self.packer.pack(&day);
                self.columns.layout_day(date, &day, &packing, now)
            })
            .collect();

        let now_marker = dates.iter().enumerate().find_map(|(day_index, &date)| {
            project_now(now, date, &self.axis).map(|offset| NowMarker { day_index, offset })
        });

        VisualModel {
            dates,
            axis: self.axis,
            geometry,
            columns,
            now_marker,
            theme: self.theme,
        }
    }
}
