//! Theme and per-status visual policy for appointment blocks.
//!
//! The theme is a plain value handed to the renderer; nothing in the grid
//! reads or mutates global UI state.

use egui::Color32;

use crate::models::appointment::AppointmentStatus;

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// Colors of the grid chrome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTheme {
    pub is_dark: bool,
    pub background: Color32,
    pub day_background: Color32,
    pub weekend_background: Color32,
    pub today_background: Color32,
    pub hour_line: Color32,
    pub half_hour_line: Color32,
    pub label_text: Color32,
    pub header_text: Color32,
    pub now_line: Color32,
    pub preview_outline: Color32,
}

impl GridTheme {
    pub fn light() -> Self {
        let day_border = Color32::from_rgb(220, 220, 220);
        Self {
            is_dark: false,
            background: Color32::from_rgb(245, 245, 245),
            day_background: Color32::from_rgb(255, 255, 255),
            weekend_background: Color32::from_rgb(250, 250, 252),
            today_background: Color32::from_rgb(230, 240, 255),
            hour_line: day_border,
            half_hour_line: with_alpha(day_border, 110),
            label_text: Color32::from_rgb(100, 100, 100),
            header_text: Color32::from_rgb(40, 40, 40),
            now_line: Color32::from_rgb(255, 100, 100),
            preview_outline: Color32::from_rgb(100, 150, 255),
        }
    }

    pub fn dark() -> Self {
        let day_border = Color32::from_rgb(60, 60, 60);
        Self {
            is_dark: true,
            background: Color32::from_rgb(30, 30, 30),
            day_background: Color32::from_rgb(40, 40, 40),
            weekend_background: Color32::from_rgb(35, 35, 38),
            today_background: Color32::from_rgb(50, 60, 80),
            hour_line: day_border,
            half_hour_line: with_alpha(day_border, 110),
            label_text: Color32::from_rgb(170, 170, 170),
            header_text: Color32::from_rgb(240, 240, 240),
            now_line: Color32::from_rgb(255, 100, 100),
            preview_outline: Color32::from_rgb(100, 150, 255),
        }
    }
}

impl Default for GridTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Resolved look of one appointment block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    pub fill: Color32,
    /// Left accent bar and border
    pub accent: Color32,
    pub text: Color32,
    /// 0.0..=1.0, applied on top of `fill`
    pub opacity: f32,
    pub strikethrough: bool,
    pub dashed_border: bool,
}

impl BlockStyle {
    /// Fill with opacity applied, ready to paint
    pub fn painted_fill(&self) -> Color32 {
        self.fill.linear_multiply(self.opacity)
    }

    pub fn painted_accent(&self) -> Color32 {
        self.accent.linear_multiply(self.opacity)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StatusPalette {
    is_dark: bool,
    fallback_base: Color32,
}

impl StatusPalette {
    pub fn from_theme(theme: &GridTheme) -> Self {
        Self {
            is_dark: theme.is_dark,
            fallback_base: if theme.is_dark {
                Color32::from_rgb(110, 110, 120)
            } else {
                Color32::from_rgb(140, 140, 150)
            },
        }
    }

    /// Base color of each recognized status
    pub fn base_color(&self, status: &AppointmentStatus) -> Color32 {
        match status {
            AppointmentStatus::Scheduled => Color32::from_rgb(100, 150, 200),
            AppointmentStatus::Confirmed => Color32::from_rgb(56, 161, 105),
            AppointmentStatus::Pending => Color32::from_rgb(221, 160, 40),
            AppointmentStatus::Completed => Color32::from_rgb(96, 125, 139),
            AppointmentStatus::Cancelled => Color32::from_rgb(211, 72, 72),
            AppointmentStatus::NoShow => Color32::from_rgb(160, 80, 40),
            AppointmentStatus::Evaluation => Color32::from_rgb(137, 94, 196),
            AppointmentStatus::Other(_) => self.fallback_base,
        }
    }

    /// Style for a status. Total over every status value, including
    /// unrecognized ones, which get a neutral dashed block.
    pub fn style_for(&self, status: &AppointmentStatus, is_past: bool) -> BlockStyle {
        let base = self.base_color(status);
        let mut style = BlockStyle {
            fill: base,
            accent: blend(base, Color32::BLACK, 0.3),
            text: Color32::WHITE,
            opacity: 1.0,
            strikethrough: false,
            dashed_border: false,
        };

        match status {
            AppointmentStatus::Cancelled => {
                style.opacity = 0.55;
                style.strikethrough = true;
            }
            AppointmentStatus::NoShow => {
                style.opacity = 0.7;
            }
            AppointmentStatus::Completed => {
                style.opacity = 0.85;
            }
            AppointmentStatus::Pending => {
                style.dashed_border = true;
                style.text = if self.is_dark {
                    Color32::WHITE
                } else {
                    Color32::from_rgb(40, 30, 10)
                };
            }
            AppointmentStatus::Other(_) => {
                style.dashed_border = true;
            }
            _ => {}
        }

        if is_past {
            style.opacity *= 0.6;
            style.text = with_alpha(style.text, 180);
        }

        style
    }
}
