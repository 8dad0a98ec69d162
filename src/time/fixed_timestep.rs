//! Accumulator-based fixed-tick clock, generalizing what used to be a
//! per-player accumulator buried in the physics handler into a
//! standalone, engine-owned timer.

use std::time::{Duration, Instant};

pub struct FixedTimeStep {
    tick_interval: Duration,
    accumulator: Duration,
    tick_count: u64,
    last_instant: Option<Instant>,
}

impl FixedTimeStep {
    pub fn new(tick_rate: f32) -> Self {
        Self {
            tick_interval: Duration::from_secs_f32(1.0 / tick_rate),
            accumulator: Duration::ZERO,
            tick_count: 0,
            last_instant: None,
        }
    }

    /// Measures wall-clock delta since the previous call, clamps it to
    /// `max_dt`, and folds it into the accumulator. The very first call has
    /// no reference point and reports zero.
    pub fn advance(&mut self, max_dt: Duration) -> Duration {
        let now = Instant::now();
        let frame_dt = match self.last_instant {
            Some(prev) => (now - prev).min(max_dt),
            None => Duration::ZERO,
        };
        self.last_instant = Some(now);
        self.accumulator += frame_dt;
        frame_dt
    }

    /// Drains one tick's worth of accumulated time if available.
    pub fn try_advance_tick(&mut self) -> bool {
        if self.accumulator >= self.tick_interval {
            self.accumulator -= self.tick_interval;
            self.tick_count += 1;
            true
        } else {
            false
        }
    }

    /// Always in `[0, 1)` since `try_advance_tick` is drained before this
    /// is read.
    pub fn tick_fraction(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.tick_interval.as_secs_f32()
    }

    pub fn elapsed_time(&self) -> Duration {
        self.tick_interval * self.tick_count as u32 + self.accumulator
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_advance_reports_zero() {
        let mut clock = FixedTimeStep::new(20.0);
        let dt = clock.advance(Duration::from_millis(250));
        assert_eq!(dt, Duration::ZERO);
    }

    #[test]
    fn tick_drains_accumulator_one_at_a_time() {
        let mut clock = FixedTimeStep::new(20.0);
        clock.advance(Duration::from_secs_f32(0.25));
        clock.accumulator = Duration::from_secs_f32(0.11);
        let mut ticks = 0;
        while clock.try_advance_tick() {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
        assert!(clock.tick_fraction() < 1.0);
    }

    #[test]
    fn tick_fraction_stays_in_unit_range() {
        let mut clock = FixedTimeStep::new(20.0);
        clock.accumulator = Duration::from_secs_f32(0.2);
        while clock.try_advance_tick() {}
        let frac = clock.tick_fraction();
        assert!((0.0..1.0).contains(&frac));
    }

    #[test]
    fn elapsed_time_accounts_for_ticks_and_remainder() {
        let mut clock = FixedTimeStep::new(20.0);
        clock.accumulator = Duration::from_secs_f32(0.08);
        clock.try_advance_tick();
        let elapsed = clock.elapsed_time();
        assert_eq!(elapsed, Duration::from_secs_f32(0.08));
    }
}
