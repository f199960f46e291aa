//! "Now" marker for the time grid.
//!
//! The projected time is re-sampled on a fixed interval instead of every
//! frame; sub-minute precision is not visible on an hour-scaled grid.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Local, NaiveDate};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::clock::Clock;
use super::time_axis::TimeAxis;
use crate::models::settings::GridSettings;
use crate::utils::date::minutes_since_midnight;

/// Offset of `now` in the column for `date`, or `None` when the column is
/// not today or `now` is outside the visible hours.
pub fn project_now(now: DateTime<Local>, date: NaiveDate, axis: &TimeAxis) -> Option<f32> {
    if now.date_naive() != date {
        return None;
    }
    axis.offset_for_minutes(minutes_since_midnight(now))
}

pub struct LiveTimeIndicator {
    clock: Arc<dyn Clock>,
    refresh: Duration,
    sampled: DateTime<Local>,
    /// Next scheduled sample. Advances in whole intervals so repaints
    /// between samples never shift the schedule.
    due: DateTime<Local>,
}

impl LiveTimeIndicator {
    pub fn new(clock: Arc<dyn Clock>, refresh: Duration) -> Self {
        let sampled = clock.now();
        let refresh = refresh.max(Duration::seconds(1));
        Self {
            clock,
            refresh,
            sampled,
            due: sampled + refresh,
        }
    }

    pub fn from_settings(clock: Arc<dyn Clock>, settings: &GridSettings) -> Self {
        Self::new(clock, Duration::seconds(settings.now_refresh_seconds as i64))
    }

    /// Last sampled "now"
    pub fn now(&self) -> DateTime<Local> {
        self.sampled
    }

    /// Re-sample the clock if the next scheduled sample is due (or the clock
    /// went backwards). Returns true when the sample changed.
    pub fn refresh(&mut self) -> bool {
        let current = self.clock.now();
        if current < self.sampled {
            self.sampled = current;
            self.due = current + self.refresh;
            return true;
        }
        if current < self.due {
            return false;
        }

        self.sampled = current;
        let missed = (current - self.due).num_milliseconds() / self.refresh.num_milliseconds();
        self.due = self.due + self.refresh * (missed as i32 + 1);
        true
    }

    /// Time until the next sample is due
    pub fn next_refresh_in(&self) -> StdDuration {
        (self.due - self.clock.now())
            .to_std()
            .unwrap_or(StdDuration::ZERO)
    }
}

/// Periodic wake-up on a tokio runtime, used to repaint the grid when the
/// "now" marker should move. Stopping is idempotent and happens on drop.
pub struct NowTicker {
    handle: Option<JoinHandle<()>>,
    stopped: Arc<AtomicBool>,
}

impl NowTicker {
    pub fn spawn<F>(runtime: &Handle, period: StdDuration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stopped);
        let period = period.max(StdDuration::from_millis(1));

        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if flag.load(Ordering::Acquire) {
                    break;
                }
                on_tick();
            }
        });

        log::debug!("Started now ticker with period {:?}", period);
        Self {
            handle: Some(handle),
            stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    pub fn stop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.abort();
            log::debug!("Stopped now ticker");
        }
    }
}

impl Drop for NowTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::clock::FixedClock;
    use chrono::TimeZone;
    use std::sync::atomic::AtomicUsize;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
    }

    fn axis() -> TimeAxis {
        TimeAxis::new(8, 18, 60.0).unwrap()
    }

    #[test]
    fn test_project_now_inside_today() {
        let now = at(5, 10, 30);
        assert_eq!(project_now(now, now.date_naive(), &axis()), Some(150.0));
    }

    #[test]
    fn test_project_now_other_day_is_none() {
        let now = at(5, 10, 30);
        assert_eq!(project_now(now, at(6, 0, 0).date_naive(), &axis()), None);
    }

    #[test]
    fn test_project_now_outside_hours_is_none() {
        let now = at(5, 19, 0);
        assert_eq!(project_now(now, now.date_naive(), &axis()), None);
        let early = at(5, 7, 59);
        assert_eq!(project_now(early, early.date_naive(), &axis()), None);
    }

    #[test]
    fn test_refresh_only_after_interval() {
        let clock = Arc::new(FixedClock::new(at(5, 9, 0)));
        let mut indicator = LiveTimeIndicator::new(clock.clone(), Duration::minutes(1));

        clock.advance(Duration::seconds(30));
        assert!(!indicator.refresh());
        assert_eq!(indicator.now(), at(5, 9, 0));
        assert_eq!(indicator.next_refresh_in(), StdDuration::from_secs(30));

        clock.advance(Duration::seconds(30));
        assert!(indicator.refresh());
        assert_eq!(indicator.now(), at(5, 9, 1));
        assert_eq!(indicator.next_refresh_in(), StdDuration::from_secs(60));
    }

    #[test]
    fn test_off_schedule_repaint_keeps_refresh_interval() {
        let t0 = at(5, 9, 0);
        let clock = Arc::new(FixedClock::new(t0));
        let mut indicator = LiveTimeIndicator::new(clock.clone(), Duration::minutes(1));

        // A repaint one second late takes the due sample
        clock.set(t0 + Duration::seconds(61));
        assert!(indicator.refresh());
        assert_eq!(indicator.next_refresh_in(), StdDuration::from_secs(59));

        // The next wake on the original schedule still re-samples
        clock.set(t0 + Duration::seconds(120));
        assert!(indicator.refresh());
        assert_eq!(indicator.now(), t0 + Duration::seconds(120));

        clock.set(t0 + Duration::seconds(179));
        assert!(!indicator.refresh());
        assert!(clock.now() - indicator.now() < Duration::minutes(1));
    }

    #[test]
    fn test_long_pause_skips_missed_samples() {
        let t0 = at(5, 9, 0);
        let clock = Arc::new(FixedClock::new(t0));
        let mut indicator = LiveTimeIndicator::new(clock.clone(), Duration::minutes(1));

        clock.set(t0 + Duration::seconds(330));
        assert!(indicator.refresh());
        assert!(!indicator.refresh());
        assert_eq!(indicator.next_refresh_in(), StdDuration::from_secs(30));
    }

    #[test]
    fn test_refresh_follows_clock_backwards() {
        let clock = Arc::new(FixedClock::new(at(5, 9, 0)));
        let mut indicator = LiveTimeIndicator::new(clock.clone(), Duration::minutes(1));
        clock.set(at(5, 8, 0));
        assert!(indicator.refresh());
        assert_eq!(indicator.now(), at(5, 8, 0));
    }

    #[tokio::test]
    async fn test_ticker_ticks_and_stops_cleanly() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let mut ticker = NowTicker::spawn(&Handle::current(), StdDuration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(StdDuration::from_millis(80)).await;
        assert!(ticker.is_running());
        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());

        tokio::time::sleep(StdDuration::from_millis(30)).await;
        let after_stop = ticks.load(Ordering::SeqCst);
        assert!(after_stop >= 1);

        tokio::time::sleep(StdDuration::from_millis(60)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn test_dropping_ticker_stops_it() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let ticker = NowTicker::spawn(&Handle::current(), StdDuration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(ticker);

        tokio::time::sleep(StdDuration::from_millis(50)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }
}
