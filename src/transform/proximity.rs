//! Proximity calculator: is an entity engaged, and how strongly?
//!
//! Distance is measured from the pointer to the edge of an effective
//! circle centered on the rectangle with radius half its larger side.

use glam::Vec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::Rect;
use crate::util::interpolate::clamp;

/// Inner threshold of the graded policy, as a fraction of the radius.
pub const GRADED_INNER: f32 = 0.5;
/// Outer threshold of the graded policy, as a fraction of the radius.
pub const GRADED_OUTER: f32 = 0.75;

/// Engagement policy for an effect family.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProximityPolicy {
    /// Engaged within the radius, full intensity; tilt families pair this
    /// with a relaxation animation.
    #[default]
    Binary,
    /// Full intensity within half the radius, fading linearly to zero at
    /// three quarters of it; glow families recompute it every tick.
    Graded,
}

/// Outcome of a proximity check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Engagement {
    /// Whether the entity is influenced at all.
    pub engaged: bool,
    /// Influence strength in [0, 1].
    pub intensity: f32,
}

impl Engagement {
    /// Not engaged.
    pub const NONE: Self = Self {
        engaged: false,
        intensity: 0.0,
    };

    /// Fully engaged.
    pub const FULL: Self = Self {
        engaged: true,
        intensity: 1.0,
    };
}

/// Distance from `pointer` to the rectangle's center.
#[must_use]
pub fn center_distance(pointer: Vec2, rect: &Rect) -> f32 {
    pointer.distance(rect.center())
}

/// Distance from `pointer` to the edge of the rectangle's effective circle,
/// zero inside it.
#[must_use]
pub fn effective_distance(pointer: Vec2, rect: &Rect) -> f32 {
    (center_distance(pointer, rect) - rect.effective_radius()).max(0.0)
}

/// Graded intensity at an effective distance.
#[must_use]
pub fn graded_intensity(distance: f32, radius: f32) -> f32 {
    let inner = radius * GRADED_INNER;
    let outer = radius * GRADED_OUTER;
    if distance <= inner {
        1.0
    } else if distance <= outer {
        clamp((outer - distance) / (outer - inner), 0.0, 1.0)
    } else {
        0.0
    }
}

/// Evaluate `policy` for a pointer against a rectangle with influence
/// radius `radius`.
#[must_use]
pub fn evaluate(
    policy: ProximityPolicy,
    pointer: Vec2,
    rect: &Rect,
    radius: f32,
) -> Engagement {
    let distance = effective_distance(pointer, rect);
    if !distance.is_finite() {
        return Engagement::NONE;
    }
    match policy {
        ProximityPolicy::Binary => {
            if distance <= radius {
                Engagement::FULL
            } else {
                Engagement::NONE
            }
        }
        ProximityPolicy::Graded => {
            let intensity = graded_intensity(distance, radius);
            Engagement {
                engaged: intensity > 0.0,
                intensity,
            }
        }
    }
}
