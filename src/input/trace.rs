use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::EffectError;
use crate::scene::PointerSample;

/// One recorded pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSample {
    /// Milliseconds since the start of the recording.
    pub t_ms: u64,
    /// Horizontal screen position.
    pub x: f32,
    /// Vertical screen position.
    pub y: f32,
}

impl TraceSample {
    /// Offset from the start of the recording.
    #[must_use]
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.t_ms)
    }

    /// The position as a pointer sample.
    #[must_use]
    pub fn sample(&self) -> PointerSample {
        PointerSample::new(self.x, self.y)
    }
}

/// A pointer recording, sorted by time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerTrace {
    samples: Vec<TraceSample>,
}

impl PointerTrace {
    /// Build a trace, sorting samples by time (stable for equal stamps).
    #[must_use]
    pub fn new(mut samples: Vec<TraceSample>) -> Self {
        samples.sort_by_key(|s| s.t_ms);
        Self { samples }
    }

    /// Parse a JSON array of `{ "t_ms", "x", "y" }` objects.
    pub fn from_json(json: &str) -> Result<Self, EffectError> {
        let samples: Vec<TraceSample> = serde_json::from_str(json)
            .map_err(|e| EffectError::SceneParse(e.to_string()))?;
        Ok(Self::new(samples))
    }

    /// Samples in time order.
    #[must_use]
    pub fn samples(&self) -> &[TraceSample] {
        &self.samples
    }

    /// Time of the last sample.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.samples.last().map_or(Duration::ZERO, TraceSample::at)
    }

    /// Samples with `from <= t < to`.
    #[must_use]
    pub fn window(&self, from: Duration, to: Duration) -> &[TraceSample] {
        let start = self.samples.partition_point(|s| s.at() < from);
        let end = self.samples.partition_point(|s| s.at() < to);
        &self.samples[start..end.max(start)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"[
        { "t_ms": 32, "x": 5, "y": 6 },
        { "t_ms": 0, "x": 1, "y": 2 },
        { "t_ms": 16, "x": 3, "y": 4 }
    ]"#;

    #[test]
    fn parses_and_sorts() {
        let trace = PointerTrace::from_json(JSON).unwrap();
        let times: Vec<u64> = trace.samples().iter().map(|s| s.t_ms).collect();
        assert_eq!(times, vec![0, 16, 32]);
        assert_eq!(trace.duration(), Duration::from_millis(32));
        assert_eq!(trace.samples()[1].sample(), PointerSample::new(3.0, 4.0));
    }

    #[test]
    fn window_is_half_open() {
        let trace = PointerTrace::from_json(JSON).unwrap();
        let w = trace.window(Duration::from_millis(0), Duration::from_millis(16));
        assert_eq!(w.len(), 1);
        let w = trace.window(Duration::from_millis(16), Duration::from_millis(100));
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            PointerTrace::from_json("{"),
            Err(EffectError::SceneParse(_))
        ));
    }
}
