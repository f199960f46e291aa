//! Pointer gesture state machine for the time grid.
//!
//! `idle → {creating, moving, resizing} → idle`. A press on empty space
//! starts a create gesture, a press on a block body starts a move and a
//! press on a block's bottom handle starts a resize. Only one session exists
//! at a time; presses while a session is active are ignored.
//!
//! The controller never touches appointment data. It reads the current
//! [`VisualModel`] for hit-testing and pixel/time conversion and returns a
//! [`GridIntent`] when a gesture completes.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime};
use egui::Pos2;

use super::handles::HitTarget;
use super::intent::GridIntent;
use super::render::VisualModel;
use crate::models::appointment::AppointmentId;
use crate::models::settings::GridSettings;
use crate::utils::date::{local_at_minutes, minutes_since_midnight};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    Create,
    Move,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Creating,
    Moving,
    Resizing,
}

/// Candidate placement while a gesture is in flight
#[derive(Debug, Clone, PartialEq)]
pub struct GesturePreview {
    pub mode: GestureMode,
    pub id: Option<AppointmentId>,
    pub day_index: usize,
    pub date: NaiveDate,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

/// State of one gesture, from pointer-down to pointer-up or cancel
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSession {
    pub mode: GestureMode,
    pub anchor_id: Option<AppointmentId>,
    pub origin_pixel: Pos2,
    pub origin_day_index: usize,
    pub origin_date: NaiveDate,
    /// Minute-of-day under the pointer at press time
    pub origin_minutes: f64,
    original: Option<(DateTime<Local>, DateTime<Local>)>,
    dragged: bool,
    candidate: Option<GesturePreview>,
}

/// Snapping, floors and thresholds applied to gestures
#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureRules {
    snap_minutes: i64,
    min_duration: Duration,
    drag_threshold: f32,
}

impl GestureRules {
    fn snap_round(&self, minutes: f64) -> f64 {
        if self.snap_minutes <= 0 {
            return minutes;
        }
        let step = self.snap_minutes as f64;
        (minutes / step).round() * step
    }

    fn snap_floor(&self, minutes: f64) -> f64 {
        if self.snap_minutes <= 0 {
            return minutes;
        }
        let step = self.snap_minutes as f64;
        ((minutes + 1e-6) / step).floor() * step
    }

    fn min_minutes(&self) -> f64 {
        self.min_duration.num_seconds() as f64 / 60.0
    }

    /// Start time for a click on empty space: the slot under the pointer,
    /// kept early enough that a minimum-length appointment fits.
    fn create_time(&self, model: &VisualModel, minutes: f64) -> NaiveTime {
        let latest = (model.axis.end_minutes() - self.min_minutes()).max(model.axis.start_minutes());
        let minutes = self
            .snap_floor(minutes)
            .clamp(model.axis.start_minutes(), latest);
        let seconds = ((minutes * 60.0).round() as u32).min(24 * 60 * 60 - 1);
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or(NaiveTime::MIN)
    }

    fn move_candidate(
        &self,
        session: &PointerSession,
        model: &VisualModel,
        pos: Pos2,
    ) -> Option<GesturePreview> {
        let (start, end) = session.original?;
        let duration = end - start;
        let day_index = model
            .geometry
            .day_index_at(pos.x)
            .unwrap_or(session.origin_day_index);
        let date = *model.dates.get(day_index)?;

        let pointer_minutes = model.axis.minutes_at_offset(pos.y);
        let raw = minutes_since_midnight(start) + (pointer_minutes - session.origin_minutes);
        let snapped = self.snap_round(raw);

        let earliest = model.axis.start_minutes();
        let latest = model.axis.end_minutes() - duration.num_seconds() as f64 / 60.0;
        let start_minutes = if latest >= earliest {
            snapped.clamp(earliest, latest)
        } else {
            earliest
        };

        let new_start = local_at_minutes(date, start_minutes);
        Some(GesturePreview {
            mode: GestureMode::Move,
            id: session.anchor_id.clone(),
            day_index,
            date,
            start: new_start,
            end: new_start + duration,
        })
    }

    fn resize_candidate(
        &self,
        session: &PointerSession,
        model: &VisualModel,
        pos: Pos2,
    ) -> Option<GesturePreview> {
        let (start, end) = session.original?;
        let start_minutes = minutes_since_midnight(start);
        let original_end = start_minutes + (end - start).num_seconds() as f64 / 60.0;

        // The handle can sit below the real end on blocks drawn at the
        // minimum height, so follow the pointer's travel since the grab
        let travel = model.axis.minutes_at_offset(pos.y) - session.origin_minutes;
        let pointer = self
            .snap_round(original_end + travel)
            .min(model.axis.end_minutes());
        let end_minutes = pointer.max(start_minutes + self.min_minutes());
        let span = if end_minutes - start_minutes <= self.min_minutes() {
            self.min_duration
        } else {
            Duration::seconds(((end_minutes - start_minutes) * 60.0).round() as i64)
        };

        Some(GesturePreview {
            mode: GestureMode::Resize,
            id: session.anchor_id.clone(),
            day_index: session.origin_day_index,
            date: session.origin_date,
            start,
            end: start + span,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GridInteractionController {
    session: Option<PointerSession>,
    rules: GestureRules,
}

impl Default for GridInteractionController {
    fn default() -> Self {
        Self::new(&GridSettings::default())
    }
}

impl GridInteractionController {
    pub fn new(settings: &GridSettings) -> Self {
        Self {
            session: None,
            rules: GestureRules {
                snap_minutes: settings.snap_minutes.max(0),
                min_duration: Duration::minutes(settings.min_duration_minutes.max(1)),
                drag_threshold: settings.drag_threshold.max(0.0),
            },
        }
    }

    pub fn state(&self) -> InteractionState {
        match self.session.as_ref().map(|session| session.mode) {
            None => InteractionState::Idle,
            Some(GestureMode::Create) => InteractionState::Creating,
            Some(GestureMode::Move) => InteractionState::Moving,
            Some(GestureMode::Resize) => InteractionState::Resizing,
        }
    }

    pub fn session(&self) -> Option<&PointerSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn min_duration(&self) -> Duration {
        self.rules.min_duration
    }

    /// Start a gesture. Returns false when the press was ignored (outside the
    /// grid, or another session is still active).
    pub fn pointer_down(&mut self, model: &VisualModel, pos: Pos2) -> bool {
        if let Some(active) = &self.session {
            log::debug!("Ignoring pointer-down while {:?} gesture is active", active.mode);
            return false;
        }

        let (mode, day_index, date, anchor_id, original) = match model.hit_test(pos) {
            HitTarget::Outside => return false,
            HitTarget::EmptySlot { day_index, date, .. } => {
                (GestureMode::Create, day_index, date, None, None)
            }
            HitTarget::Block { day_index, index, id } => {
                let Some(block) = model.block_at(day_index, index) else {
                    return false;
                };
                let original = Some((block.start, block.end));
                (GestureMode::Move, day_index, model.dates[day_index], Some(id), original)
            }
            HitTarget::ResizeHandle { day_index, index, id } => {
                let Some(block) = model.block_at(day_index, index) else {
                    return false;
                };
                let original = Some((block.start, block.end));
                (GestureMode::Resize, day_index, model.dates[day_index], Some(id), original)
            }
        };

        log::debug!("Begin {:?} gesture on {} at {:?}", mode, date, pos);
        self.session = Some(PointerSession {
            mode,
            anchor_id,
            origin_pixel: pos,
            origin_day_index: day_index,
            origin_date: date,
            origin_minutes: model.axis.minutes_at_offset(pos.y),
            original,
            dragged: false,
            candidate: None,
        });
        true
    }

    /// Track the pointer. Leaving the grid counts as losing capture and
    /// cancels the session.
    pub fn pointer_move(&mut self, model: &VisualModel, pos: Pos2) {
        if self.session.is_none() {
            return;
        }
        if !model.contains(pos) {
            self.discard("pointer left the grid");
            return;
        }

        let rules = self.rules;
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if !session.dragged && session.origin_pixel.distance(pos) > rules.drag_threshold {
            session.dragged = true;
        }
        if !session.dragged {
            return;
        }

        session.candidate = match session.mode {
            GestureMode::Create => None,
            GestureMode::Move => rules.move_candidate(session, model, pos),
            GestureMode::Resize => rules.resize_candidate(session, model, pos),
        };
    }

    /// Finish the gesture, returning the intent it produced if any.
    pub fn pointer_up(&mut self, model: &VisualModel, pos: Pos2) -> Option<GridIntent> {
        let session = self.session.take()?;

        if !model.contains(pos) {
            log::debug!("Released outside the grid; {:?} gesture discarded", session.mode);
            return None;
        }

        let dragged =
            session.dragged || session.origin_pixel.distance(pos) > self.rules.drag_threshold;

        let intent = match session.mode {
            GestureMode::Create if dragged => None,
            GestureMode::Create => Some(GridIntent::Create {
                date: session.origin_date,
                time: self.rules.create_time(model, session.origin_minutes),
            }),
            GestureMode::Move | GestureMode::Resize if !dragged => {
                session.anchor_id.clone().map(|id| GridIntent::Open { id })
            }
            GestureMode::Move => self.finish_move(&session, model, pos),
            GestureMode::Resize => self.finish_resize(&session, model, pos),
        };

        log::debug!("Finished {:?} gesture: {:?}", session.mode, intent);
        intent
    }

    /// Pointer-cancel signal from the platform. Returns whether a session
    /// was discarded; calling it while idle is a no-op.
    pub fn pointer_cancel(&mut self) -> bool {
        self.discard("pointer cancelled")
    }

    /// Host-initiated abort, e.g. when the grid is torn down.
    pub fn abort(&mut self) -> bool {
        self.discard("interaction aborted by host")
    }

    /// Ghost placement for the in-flight gesture
    pub fn preview(&self) -> Option<GesturePreview> {
        self.session.as_ref()?.candidate.clone()
    }

    fn finish_move(
        &self,
        session: &PointerSession,
        model: &VisualModel,
        pos: Pos2,
    ) -> Option<GridIntent> {
        let candidate = self.rules.move_candidate(session, model, pos)?;
        let (original_start, _) = session.original?;
        if candidate.start == original_start {
            return None;
        }
        Some(GridIntent::Move {
            id: candidate.id?,
            new_start: candidate.start,
            new_end: candidate.end,
        })
    }

    fn finish_resize(
        &self,
        session: &PointerSession,
        model: &VisualModel,
        pos: Pos2,
    ) -> Option<GridIntent> {
        let candidate = self.rules.resize_candidate(session, model, pos)?;
        let (_, original_end) = session.original?;
        if candidate.end == original_end {
            return None;
        }
        Some(GridIntent::Resize {
            id: candidate.id?,
            new_end: candidate.end,
        })
    }

    fn discard(&mut self, reason: &str) -> bool {
        match self.session.take() {
            Some(session) => {
                log::debug!("{:?} gesture cancelled: {}", session.mode, reason);
                true
            }
            None => false,
        }
    }
}
