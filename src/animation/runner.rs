//! Relaxation runner: one eased return-to-center run.

use glam::Vec2;
use web_time::{Duration, Instant};

use crate::util::easing::EasingFunction;

/// One frame's worth of relaxation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxationSample {
    /// Raw progress in [0, 1].
    pub progress: f32,
    /// Virtual pointer offset to feed the transform model.
    pub offset: Vec2,
    /// Engagement intensity to feed the transform model.
    pub intensity: f32,
}

impl RelaxationSample {
    /// Whether this is the terminal sample.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Executes a single relaxation from the last pointer offset back to the
/// entity's center.
///
/// The runner only interpolates the *virtual pointer*; the engine re-runs
/// the transform model on it every frame. The target center is supplied
/// per sample because layout can move or resize the entity mid-run.
#[derive(Debug, Clone)]
pub struct Relaxation {
    /// When the relaxation started.
    start_time: Instant,
    /// Total duration.
    duration: Duration,
    /// Progress curve.
    easing: EasingFunction,
    /// Offset the virtual pointer starts from.
    from: Vec2,
    /// Intensity at the start (fades to zero).
    start_intensity: f32,
}

impl Relaxation {
    /// Start a relaxation now.
    #[must_use]
    pub fn new(
        from: Vec2,
        start_intensity: f32,
        duration: Duration,
        easing: EasingFunction,
        now: Instant,
    ) -> Self {
        Self {
            start_time: now,
            duration,
            easing,
            from,
            start_intensity,
        }
    }

    /// Total duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Offset the virtual pointer started from.
    #[must_use]
    pub fn from(&self) -> Vec2 {
        self.from
    }

    /// Calculate normalized progress (0.0 to 1.0).
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start_time);

        if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    /// Whether the relaxation has reached completion.
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Sample the run at `now`, easing toward `center`.
    #[must_use]
    pub fn sample(&self, now: Instant, center: Vec2) -> RelaxationSample {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return RelaxationSample {
                progress: 1.0,
                offset: center,
                intensity: 0.0,
            };
        }
        let eased = self.easing.evaluate(progress);
        RelaxationSample {
            progress,
            offset: self.from.lerp(center, eased),
            intensity: self.start_intensity * (1.0 - eased),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(start: Instant) -> Relaxation {
        Relaxation::new(
            Vec2::ZERO,
            1.0,
            Duration::from_millis(600),
            EasingFunction::CubicInOut,
            start,
        )
    }

    #[test]
    fn starts_at_last_offset() {
        let start = Instant::now();
        let sample = run(start).sample(start, Vec2::new(100.0, 50.0));
        assert_eq!(sample.progress, 0.0);
        assert_eq!(sample.offset, Vec2::ZERO);
        assert_eq!(sample.intensity, 1.0);
    }

    #[test]
    fn halfway_is_halfway_for_symmetric_easing() {
        let start = Instant::now();
        let sample = run(start).sample(start + Duration::from_millis(300), Vec2::new(100.0, 50.0));
        assert!((sample.progress - 0.5).abs() < 1e-4);
        assert!((sample.offset - Vec2::new(50.0, 25.0)).length() < 0.05);
        assert!((sample.intensity - 0.5).abs() < 1e-3);
    }

    #[test]
    fn completes_exactly_on_center() {
        let start = Instant::now();
        let relax = run(start);
        let end = start + Duration::from_millis(600);
        assert!(relax.is_complete(end));
        let sample = relax.sample(end + Duration::from_millis(40), Vec2::new(100.0, 50.0));
        assert!(sample.is_complete());
        assert_eq!(sample.offset, Vec2::new(100.0, 50.0));
        assert_eq!(sample.intensity, 0.0);
    }

    #[test]
    fn never_overshoots_the_center() {
        let start = Instant::now();
        let relax = run(start);
        let center = Vec2::new(100.0, 50.0);
        for ms in (0..=700).step_by(16) {
            let s = relax.sample(start + Duration::from_millis(ms), center);
            assert!(s.offset.x <= center.x + 1e-4 && s.offset.y <= center.y + 1e-4);
            assert!((0.0..=1.0).contains(&s.intensity));
        }
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let start = Instant::now();
        let relax = Relaxation::new(
            Vec2::ZERO,
            1.0,
            Duration::ZERO,
            EasingFunction::Linear,
            start,
        );
        assert!(relax.sample(start, Vec2::ONE).is_complete());
    }
}
