//! Multi-tap counting
//!
//! A tap continues a sequence when it lands close enough to the previous one
//! and soon enough after it. Sequences wrap after a triple tap.

use std::time::{Duration, Instant};

use crate::geometry::Point;

/// How many taps a tap sequence has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapCount {
    Single,
    Double,
    Triple,
}

impl TapCount {
    fn from_count(count: u32) -> Self {
        match count {
            2 => TapCount::Double,
            3 => TapCount::Triple,
            _ => TapCount::Single,
        }
    }
}

/// Tap tracking state for double/triple tap detection
#[derive(Debug, Clone)]
pub struct TapTracker {
    timeout: Duration,
    slop: f64,
    last_tap: Option<(Instant, Point)>,
    tap_count: u32,
}

impl TapTracker {
    pub fn new(timeout: Duration, slop: f64) -> Self {
        Self {
            timeout,
            slop,
            last_tap: None,
            tap_count: 0,
        }
    }

    /// Record a tap and return where it falls in the current sequence
    pub fn track_tap(&mut self, position: Point, now: Instant) -> TapCount {
        let continues_sequence = self.last_tap.is_some_and(|(time, last)| {
            now.saturating_duration_since(time) < self.timeout
                && last.distance_to(position) <= self.slop
        });

        if continues_sequence {
            self.tap_count += 1;
            if self.tap_count > 3 {
                self.tap_count = 1;
            }
        } else {
            self.tap_count = 1;
        }

        self.last_tap = Some((now, position));
        TapCount::from_count(self.tap_count)
    }

    /// Forget the current sequence (e.g., after a drag or long-press)
    pub fn reset(&mut self) {
        self.tap_count = 0;
        self.last_tap = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> TapTracker {
        TapTracker::new(Duration::from_millis(300), 100.0)
    }

    #[test]
    fn test_rapid_taps_count_up_and_wrap() {
        let t0 = Instant::now();
        let p = Point::new(10.0, 10.0);
        let mut taps = tracker();
        let ms = Duration::from_millis;

        assert_eq!(taps.track_tap(p, t0), TapCount::Single);
        assert_eq!(taps.track_tap(p, t0 + ms(100)), TapCount::Double);
        assert_eq!(taps.track_tap(p, t0 + ms(200)), TapCount::Triple);
        assert_eq!(taps.track_tap(p, t0 + ms(300)), TapCount::Single);
    }

    #[test]
    fn test_slow_tap_starts_new_sequence() {
        let t0 = Instant::now();
        let p = Point::new(10.0, 10.0);
        let mut taps = tracker();

        taps.track_tap(p, t0);
        assert_eq!(
            taps.track_tap(p, t0 + Duration::from_millis(400)),
            TapCount::Single
        );
    }

    #[test]
    fn test_distant_tap_starts_new_sequence() {
        let t0 = Instant::now();
        let mut taps = tracker();

        taps.track_tap(Point::new(0.0, 0.0), t0);
        assert_eq!(
            taps.track_tap(Point::new(150.0, 0.0), t0 + Duration::from_millis(50)),
            TapCount::Single
        );
    }

    #[test]
    fn test_reset() {
        let t0 = Instant::now();
        let p = Point::new(0.0, 0.0);
        let mut taps = tracker();
        taps.track_tap(p, t0);
        taps.reset();
        assert_eq!(
            taps.track_tap(p, t0 + Duration::from_millis(10)),
            TapCount::Single
        );
    }
}
