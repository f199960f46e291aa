//! Linear mapping between time-of-day and vertical pixel offset.
//!
//! Offsets are measured from the top of the visible range (`start_hour`),
//! so `0.0` is the first visible minute and [`TimeAxis::height`] is the
//! bottom edge. The mapping is continuous: rows are one hour tall and
//! minutes are not discretized into slots.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

use crate::models::settings::GridSettings;

const MINUTES_PER_HOUR: f64 = 60.0;
const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AxisError {
    #[error("start hour {start} must be before end hour {end}")]
    InvertedRange { start: u32, end: u32 },
    #[error("end hour {0} is past midnight")]
    EndPastMidnight(u32),
    #[error("pixels per hour must be positive and finite, got {0}")]
    InvalidScale(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    start_hour: u32,
    end_hour: u32,
    pixels_per_hour: f32,
}

impl TimeAxis {
    pub fn new(start_hour: u32, end_hour: u32, pixels_per_hour: f32) -> Result<Self, AxisError> {
        if end_hour > 24 {
            return Err(AxisError::EndPastMidnight(end_hour));
        }
        if start_hour >= end_hour {
            return Err(AxisError::InvertedRange {
                start: start_hour,
                end: end_hour,
            });
        }
        if !(pixels_per_hour.is_finite() && pixels_per_hour > 0.0) {
            return Err(AxisError::InvalidScale(pixels_per_hour));
        }

        Ok(Self {
            start_hour,
            end_hour,
            pixels_per_hour,
        })
    }

    pub fn from_settings(settings: &GridSettings) -> Result<Self, AxisError> {
        Self::new(settings.start_hour, settings.end_hour, settings.pixels_per_hour)
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn pixels_per_hour(&self) -> f32 {
        self.pixels_per_hour
    }

    pub fn start_minutes(&self) -> f64 {
        self.start_hour as f64 * MINUTES_PER_HOUR
    }

    pub fn end_minutes(&self) -> f64 {
        self.end_hour as f64 * MINUTES_PER_HOUR
    }

    /// Total pixel height of the visible range
    pub fn height(&self) -> f32 {
        (self.end_hour - self.start_hour) as f32 * self.pixels_per_hour
    }

    pub fn contains_minutes(&self, minutes: f64) -> bool {
        minutes >= self.start_minutes() && minutes <= self.end_minutes()
    }

    /// Offset for a minute-of-day, or `None` outside `[start_hour, end_hour]`.
    pub fn offset_for_minutes(&self, minutes: f64) -> Option<f32> {
        self.contains_minutes(minutes)
            .then(|| self.unclamped_offset(minutes))
    }

    pub fn offset_for_time(&self, time: NaiveTime) -> Option<f32> {
        self.offset_for_minutes(time_to_minutes(time))
    }

    /// Like [`Self::offset_for_minutes`] but pinned to the visible edges.
    pub fn clamped_offset_for_minutes(&self, minutes: f64) -> f32 {
        let minutes = minutes.clamp(self.start_minutes(), self.end_minutes());
        self.unclamped_offset(minutes)
    }

    /// Minute-of-day under a pixel offset, clamped to the visible range.
    pub fn minutes_at_offset(&self, offset: f32) -> f64 {
        let minutes =
            self.start_minutes() + offset as f64 / self.pixels_per_hour as f64 * MINUTES_PER_HOUR;
        minutes.clamp(self.start_minutes(), self.end_minutes())
    }

    /// Time-of-day under a pixel offset, rounded to the nearest second.
    ///
    /// An `end_hour` of 24 cannot be expressed as a `NaiveTime`; the bottom
    /// edge of such an axis saturates to 23:59:59. Use
    /// [`Self::minutes_at_offset`] where the exact end boundary matters.
    pub fn time_at_offset(&self, offset: f32) -> NaiveTime {
        let seconds = (self.minutes_at_offset(offset) * 60.0).round() as u32;
        let seconds = seconds.min(SECONDS_PER_DAY - 1);
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Pixel height of a span of minutes at this scale.
    pub fn height_for_minutes(&self, minutes: f64) -> f32 {
        (minutes / MINUTES_PER_HOUR) as f32 * self.pixels_per_hour
    }

    /// Whole hours drawn as grid lines with their offsets, including the bottom edge
    pub fn hour_lines(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        (self.start_hour..=self.end_hour)
            .map(move |hour| (hour, (hour - self.start_hour) as f32 * self.pixels_per_hour))
    }

    fn unclamped_offset(&self, minutes: f64) -> f32 {
        ((minutes - self.start_minutes()) / MINUTES_PER_HOUR * self.pixels_per_hour as f64) as f32
    }
}

pub fn time_to_minutes(time: NaiveTime) -> f64 {
    time.num_seconds_from_midnight() as f64 / 60.0 + time.nanosecond() as f64 / 60e9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis() -> TimeAxis {
        TimeAxis::new(8, 18, 60.0).unwrap()
    }

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert_eq!(
            TimeAxis::new(10, 10, 60.0),
            Err(AxisError::InvertedRange { start: 10, end: 10 })
        );
    }

    #[test]
    fn test_rejects_end_past_midnight() {
        assert_eq!(TimeAxis::new(0, 25, 60.0), Err(AxisError::EndPastMidnight(25)));
    }

    #[test]
    fn test_rejects_bad_scale() {
        assert!(matches!(TimeAxis::new(8, 18, 0.0), Err(AxisError::InvalidScale(_))));
        assert!(matches!(
            TimeAxis::new(8, 18, f32::NAN),
            Err(AxisError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_offset_is_linear() {
        let axis = axis();
        assert_eq!(axis.offset_for_time(hm(8, 0)), Some(0.0));
        assert_eq!(axis.offset_for_time(hm(9, 30)), Some(90.0));
        assert_eq!(axis.offset_for_time(hm(18, 0)), Some(600.0));
        assert_eq!(axis.height(), 600.0);
    }

    #[test]
    fn test_offset_outside_range_is_none() {
        let axis = axis();
        assert_eq!(axis.offset_for_time(hm(7, 59)), None);
        assert_eq!(axis.offset_for_time(hm(18, 1)), None);
    }

    #[test]
    fn test_inverse_clamps_to_range() {
        let axis = axis();
        assert_eq!(axis.time_at_offset(-50.0), hm(8, 0));
        assert_eq!(axis.time_at_offset(10_000.0), hm(18, 0));
        assert_eq!(axis.minutes_at_offset(45.0), 8.0 * 60.0 + 45.0);
    }

    #[test]
    fn test_round_trip_every_minute() {
        let axis = TimeAxis::new(6, 22, 73.5).unwrap();
        for minute in (6 * 60)..=(22 * 60) {
            let time = NaiveTime::from_num_seconds_from_midnight_opt(minute * 60, 0).unwrap();
            let offset = axis.offset_for_time(time).unwrap();
            assert_eq!(axis.time_at_offset(offset), time);
        }
    }

    #[test]
    fn test_full_day_axis_bottom_saturates() {
        let axis = TimeAxis::new(0, 24, 40.0).unwrap();
        assert_eq!(axis.minutes_at_offset(axis.height()), 1440.0);
        assert_eq!(axis.time_at_offset(axis.height()), hm(23, 59) + chrono::Duration::seconds(59));
    }

    #[test]
    fn test_hour_lines_cover_range() {
        let lines: Vec<_> = axis().hour_lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], (8, 0.0));
        assert_eq!(lines[10], (18, 600.0));
    }
}
