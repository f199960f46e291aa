// Resize handle geometry and hit-test targets
//
// Priority when regions overlap: resize handle > block body > empty slot.
// Among blocks, the one painted last (top-most) wins.

use chrono::NaiveDate;
use egui::{Pos2, Rect, Vec2};

use crate::models::appointment::AppointmentId;

/// Height of the bottom-edge resize hit area
pub const HANDLE_SIZE: f32 = 8.0;
/// Visual size of the handle bar
pub const HANDLE_VISUAL_SIZE: f32 = 3.0;

/// Bottom-edge resize zone for a block rect. Short blocks give at most half
/// their height to the handle so the body stays clickable.
pub fn resize_handle_rect(block_rect: Rect) -> Rect {
    let zone_height = HANDLE_SIZE.min(block_rect.height() / 2.0);
    Rect::from_min_size(
        Pos2::new(block_rect.left(), block_rect.bottom() - zone_height),
        Vec2::new(block_rect.width(), zone_height),
    )
}

/// What lies under a pointer position
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    ResizeHandle {
        day_index: usize,
        /// Position in the column's paint order
        index: usize,
        id: AppointmentId,
    },
    Block {
        day_index: usize,
        index: usize,
        id: AppointmentId,
    },
    EmptySlot {
        day_index: usize,
        date: NaiveDate,
        /// Minute-of-day under the pointer
        minutes: f64,
    },
    Outside,
}

impl HitTarget {
    pub fn appointment_id(&self) -> Option<&AppointmentId> {
        match self {
            HitTarget::ResizeHandle { id, .. } | HitTarget::Block { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn cursor_icon(&self) -> egui::CursorIcon {
        match self {
            HitTarget::ResizeHandle { .. } => egui::CursorIcon::ResizeVertical,
            HitTarget::Block { .. } => egui::CursorIcon::Grab,
            HitTarget::EmptySlot { .. } => egui::CursorIcon::Cell,
            HitTarget::Outside => egui::CursorIcon::Default,
        }
    }
}
