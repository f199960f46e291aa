// Settings module
// Tunables for the time grid; every magic constant of the scheduler lives here

use serde::{Deserialize, Serialize};

/// Which theme the grid is painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Resolved once at startup from the OS setting
    System,
}

impl Default for ThemePreference {
    fn default() -> Self {
        Self::System
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub start_hour: u32,
    pub end_hour: u32,
    pub pixels_per_hour: f32,
    pub time_label_width: f32,
    pub column_spacing: f32,
    /// Pixel floor so very short appointments stay clickable
    pub min_block_height: f32,
    /// Appointments shorter than this render name-only
    pub compact_threshold_minutes: i64,
    /// Resize floor; also the duration the packer clamps malformed rows to
    pub min_duration_minutes: i64,
    /// Gesture snapping in minutes, 0 for continuous
    pub snap_minutes: i64,
    /// Pointer travel (px) before a press turns into a drag
    pub drag_threshold: f32,
    pub now_refresh_seconds: u64,
    pub theme: ThemePreference,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            start_hour: 7,
            end_hour: 21,
            pixels_per_hour: 60.0,
            time_label_width: 50.0,
            column_spacing: 1.0,
            min_block_height: 18.0,
            compact_threshold_minutes: 30,
            min_duration_minutes: 15,
            snap_minutes: 5,
            drag_threshold: 4.0,
            now_refresh_seconds: 60,
            theme: ThemePreference::System,
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.start_hour >= self.end_hour {
            return Err(format!(
                "start_hour ({}) must be before end_hour ({})",
                self.start_hour, self.end_hour
            ));
        }

        if self.end_hour > 24 {
            return Err(format!("end_hour ({}) cannot exceed 24", self.end_hour));
        }

        if !(self.pixels_per_hour.is_finite() && self.pixels_per_hour > 0.0) {
            return Err("pixels_per_hour must be a positive number".to_string());
        }

        if self.min_duration_minutes < 1 {
            return Err("min_duration_minutes must be at least 1".to_string());
        }

        if self.snap_minutes < 0 || self.snap_minutes > 60 {
            return Err("snap_minutes must be between 0 and 60".to_string());
        }

        if self.compact_threshold_minutes < 0 {
            return Err("compact_threshold_minutes cannot be negative".to_string());
        }

        if self.min_block_height < 0.0 || self.drag_threshold < 0.0 {
            return Err("pixel sizes cannot be negative".to_string());
        }

        if self.now_refresh_seconds == 0 {
            return Err("now_refresh_seconds must be at least 1".to_string());
        }

        Ok(())
    }
}
