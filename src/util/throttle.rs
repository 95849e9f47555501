//! Pointer broadcast throttling.

use web_time::{Duration, Instant};

/// Leading-edge throttle for pointer broadcasts.
///
/// A call to [`Throttle::try_fire`] succeeds at most once per interval.
/// Callers that get `false` are expected to coalesce their input and retry
/// on the next frame.
#[derive(Debug, Clone)]
pub struct Throttle {
    /// Minimum spacing between two accepted calls.
    interval: Duration,
    /// Timestamp of the last accepted call.
    last_fire: Option<Instant>,
}

impl Throttle {
    /// Create a throttle with the given interval (zero = unthrottled).
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
        }
    }

    /// Throttle interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a call at `now` would be accepted.
    #[must_use]
    pub fn ready(&self, now: Instant) -> bool {
        self.last_fire
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Accept the call if the interval has elapsed, recording `now`.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if !self.ready(now) {
            return false;
        }
        self.last_fire = Some(now);
        true
    }

    /// Forget the last accepted call.
    pub fn reset(&mut self) {
        self.last_fire = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_always_fires() {
        let mut throttle = Throttle::new(Duration::from_millis(16));
        assert!(throttle.try_fire(Instant::now()));
    }

    #[test]
    fn calls_inside_interval_are_rejected() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::from_millis(16));
        assert!(throttle.try_fire(start));
        assert!(!throttle.try_fire(start + Duration::from_millis(5)));
        assert!(!throttle.try_fire(start + Duration::from_millis(15)));
        assert!(throttle.try_fire(start + Duration::from_millis(16)));
    }

    #[test]
    fn zero_interval_never_throttles() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::ZERO);
        assert!(throttle.try_fire(start));
        assert!(throttle.try_fire(start));
    }

    #[test]
    fn reset_reopens_the_gate() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::from_millis(16));
        assert!(throttle.try_fire(start));
        throttle.reset();
        assert!(throttle.try_fire(start + Duration::from_millis(1)));
    }
}
