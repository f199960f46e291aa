//! egui painting and input routing for a rendered week.
//!
//! The [`VisualModel`] is in grid content coordinates; everything here adds
//! the allocated rect's origin when painting and subtracts it when feeding
//! pointer positions to the controller.

use chrono::Datelike;
use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};

use crate::grid::day_column::BlockLayout;
use crate::grid::handles::{HitTarget, HANDLE_VISUAL_SIZE};
use crate::grid::intent::GridIntent;
use crate::grid::interaction::{GesturePreview, GridInteractionController};
use crate::grid::render::VisualModel;
use crate::grid::style::GridTheme;
use crate::utils::date::minutes_since_midnight;

const HEADER_HEIGHT: f32 = 36.0;
const BLOCK_ROUNDING: f32 = 3.0;
const ACCENT_WIDTH: f32 = 3.0;

/// Day name row above the scrollable grid
pub fn show_day_headers(ui: &mut egui::Ui, model: &VisualModel) {
    let size = Vec2::new(model.geometry.total_width(), HEADER_HEIGHT);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let theme = &model.theme;

    for (day_index, column) in model.columns.iter().enumerate() {
        let column_rect = model.geometry.column_rect(day_index);
        let header = Rect::from_min_max(
            Pos2::new(rect.left() + column_rect.left(), rect.top()),
            Pos2::new(rect.left() + column_rect.right(), rect.bottom()),
        );

        if column.is_today {
            painter.rect_filled(header, 2.0, theme.today_background);
        }

        painter.text(
            Pos2::new(header.center().x, header.top() + 11.0),
            Align2::CENTER_CENTER,
            column.date.format("%a %-d").to_string(),
            FontId::proportional(14.0),
            theme.header_text,
        );

        if !column.hidden.is_empty() {
            painter.text(
                Pos2::new(header.center().x, header.bottom() - 8.0),
                Align2::CENTER_CENTER,
                format!("+{} outside hours", column.hidden.len()),
                FontId::proportional(10.0),
                theme.label_text,
            );
        }
    }

    painter.hline(rect.x_range(), rect.bottom() - 0.5, Stroke::new(1.0, theme.hour_line));
}

/// Paint the grid and route this frame's pointer input to `controller`.
/// Returns the intent of a gesture that completed this frame.
pub fn show_week_grid(
    ui: &mut egui::Ui,
    model: &VisualModel,
    controller: &mut GridInteractionController,
) -> Option<GridIntent> {
    let size = Vec2::new(model.geometry.total_width(), model.geometry.height);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
    let origin = rect.min.to_vec2();
    let painter = ui.painter_at(rect);

    paint_background(&painter, model, origin);

    let preview = controller.preview();
    let dragged_id = preview.as_ref().and_then(|p| p.id.clone());
    for (day_index, column) in model.columns.iter().enumerate() {
        for block in &column.blocks {
            let block_rect = model.block_rect(day_index, block).translate(origin);
            let ghosted = dragged_id.as_ref() == Some(&block.id);
            paint_block(&painter, block_rect, block, ghosted);
        }
    }

    if let Some(preview) = &preview {
        paint_preview(&painter, model, preview, origin);
    }

    if let Some(marker) = model.now_marker {
        let column = model.geometry.column_rect(marker.day_index).translate(origin);
        let y = column.top() + marker.offset;
        painter.circle_filled(Pos2::new(column.left() + 3.0, y), 3.0, model.theme.now_line);
        painter.hline(column.x_range(), y, Stroke::new(2.0, model.theme.now_line));
    }

    let intent = route_pointer(ui, &response, model, controller, origin);

    if !controller.is_active() {
        if let Some(hover) = response.hover_pos() {
            let target = model.hit_test(hover - origin);
            ui.output_mut(|out| out.cursor_icon = target.cursor_icon());
            if let HitTarget::Block { day_index, index, .. } = target {
                if let Some(block) = model.block_at(day_index, index) {
                    let _ = response.clone().on_hover_text_at_pointer(&block.tooltip);
                }
            }
        }
    } else {
        ui.output_mut(|out| out.cursor_icon = CursorIcon::Grabbing);
    }

    intent
}

fn route_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    model: &VisualModel,
    controller: &mut GridInteractionController,
    origin: Vec2,
) -> Option<GridIntent> {
    let (pressed, released, pointer, escape, focused) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.interact_pos().or(i.pointer.hover_pos()),
            i.key_pressed(egui::Key::Escape),
            i.focused,
        )
    });

    // Escape and losing window focus both end the session without an intent
    if controller.is_active() && (escape || !focused) {
        controller.pointer_cancel();
        return None;
    }

    let pos = pointer? - origin;

    if pressed && response.contains_pointer() {
        controller.pointer_down(model, pos);
    }

    if controller.is_active() {
        controller.pointer_move(model, pos);
        ui.ctx().request_repaint();
    }

    if released {
        return controller.pointer_up(model, pos);
    }
    None
}

fn paint_background(painter: &egui::Painter, model: &VisualModel, origin: Vec2) {
    let theme = &model.theme;
    let axis = &model.axis;

    for (day_index, column) in model.columns.iter().enumerate() {
        let rect = model.geometry.column_rect(day_index).translate(origin);
        let fill = if column.is_today {
            theme.today_background
        } else if column.date.weekday().number_from_monday() == 6 {
            theme.weekend_background
        } else {
            theme.day_background
        };
        painter.rect_filled(rect, 0.0, fill);
    }

    let left = origin.x;
    let right = origin.x + model.geometry.total_width();
    let half_hour = axis.pixels_per_hour() / 2.0;

    for (hour, offset) in axis.hour_lines() {
        let y = origin.y + offset;
        painter.hline(
            (left + model.geometry.time_label_width)..=right,
            y,
            Stroke::new(1.0, theme.hour_line),
        );
        if offset + half_hour < axis.height() {
            painter.hline(
                (left + model.geometry.time_label_width)..=right,
                y + half_hour,
                Stroke::new(1.0, theme.half_hour_line),
            );
        }
        if hour < axis.end_hour() {
            painter.text(
                Pos2::new(left + model.geometry.time_label_width - 6.0, y + 2.0),
                Align2::RIGHT_TOP,
                format!("{:02}:00", hour),
                FontId::proportional(11.0),
                theme.label_text,
            );
        }
    }
}

fn paint_block(painter: &egui::Painter, rect: Rect, block: &BlockLayout, ghosted: bool) {
    let style = &block.style;
    let alpha = if ghosted { 0.4 } else { 1.0 };
    let fill = style.painted_fill().linear_multiply(alpha);
    let accent = style.painted_accent().linear_multiply(alpha);
    let text_color = style.text.linear_multiply(style.opacity.max(0.5) * alpha);

    painter.rect_filled(rect, BLOCK_ROUNDING, fill);
    painter.rect_filled(
        Rect::from_min_size(rect.min, Vec2::new(ACCENT_WIDTH.min(rect.width()), rect.height())),
        BLOCK_ROUNDING,
        accent,
    );

    if style.dashed_border {
        let points = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
        painter.extend(Shape::dashed_line(&points, Stroke::new(1.0, accent), 4.0, 3.0));
    } else {
        painter.rect_stroke(rect, BLOCK_ROUNDING, Stroke::new(1.0, accent));
    }

    let text_painter = painter.with_clip_rect(rect.shrink(1.0).intersect(painter.clip_rect()));
    let title_rect = text_painter.text(
        rect.left_top() + Vec2::new(ACCENT_WIDTH + 4.0, 2.0),
        Align2::LEFT_TOP,
        &block.title,
        FontId::proportional(12.0),
        text_color,
    );
    if style.strikethrough {
        text_painter.hline(
            title_rect.x_range(),
            title_rect.center().y,
            Stroke::new(1.0, text_color),
        );
    }
    if let Some(detail) = &block.detail {
        text_painter.text(
            Pos2::new(title_rect.left(), title_rect.bottom() + 1.0),
            Align2::LEFT_TOP,
            detail,
            FontId::proportional(10.5),
            text_color,
        );
    }

    if block.clipped_top {
        text_painter.text(rect.right_top() + Vec2::new(-4.0, 1.0), Align2::RIGHT_TOP, "▲", FontId::proportional(8.0), text_color);
    }
    if block.clipped_bottom {
        text_painter.text(rect.right_bottom() + Vec2::new(-4.0, -1.0), Align2::RIGHT_BOTTOM, "▼", FontId::proportional(8.0), text_color);
    }

    if rect.height() > HANDLE_VISUAL_SIZE * 4.0 {
        let bar = Rect::from_center_size(
            Pos2::new(rect.center().x, rect.bottom() - HANDLE_VISUAL_SIZE),
            Vec2::new((rect.width() / 3.0).min(24.0), HANDLE_VISUAL_SIZE),
        );
        painter.rect_filled(bar, 1.0, accent.gamma_multiply(0.6));
    }
}

fn paint_preview(painter: &egui::Painter, model: &VisualModel, preview: &GesturePreview, origin: Vec2) {
    let column = model.geometry.column_rect(preview.day_index).translate(origin);
    let start = minutes_since_midnight(preview.start);
    let end = start + (preview.end - preview.start).num_seconds() as f64 / 60.0;
    let top = column.top() + model.axis.clamped_offset_for_minutes(start);
    let bottom = column.top() + model.axis.clamped_offset_for_minutes(end);

    let rect = Rect::from_min_max(
        Pos2::new(column.left() + 1.0, top),
        Pos2::new(column.right() - 1.0, bottom.max(top + 4.0)),
    );
    let outline = model.theme.preview_outline;
    painter.rect_filled(rect, BLOCK_ROUNDING, ghost_fill(outline, &model.theme));
    painter.rect_stroke(rect, BLOCK_ROUNDING, Stroke::new(1.5, outline));
    painter.text(
        rect.left_top() + Vec2::new(4.0, 2.0),
        Align2::LEFT_TOP,
        format!("{} - {}", preview.start.format("%H:%M"), preview.end.format("%H:%M")),
        FontId::proportional(11.0),
        outline,
    );
}

fn ghost_fill(outline: Color32, theme: &GridTheme) -> Color32 {
    let alpha = if theme.is_dark { 60 } else { 40 };
    Color32::from_rgba_unmultiplied(outline.r(), outline.g(), outline.b(), alpha)
}
