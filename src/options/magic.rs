use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::transform::TransformModel;
use crate::util::easing::EasingFunction;

/// Default panel selectors shared by the magic-card and spotlight
/// families.
pub(crate) fn default_card_selectors() -> Vec<String> {
    [
        ".recent-post-item",
        ".card-widget",
        ".card-author",
        ".card-announcement",
        ".card-recent-post",
        ".card-categories",
        ".card-tags",
        ".card-archives",
        ".card-webinfo",
        ".card-post-series",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Particles", inline)]
#[serde(default)]
/// Hover particles.
pub struct ParticleOptions {
    /// Spawn particles on hover.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Particles per card.
    #[schemars(title = "Count", range(min = 0, max = 64))]
    pub count: u32,
    /// Particle diameter in pixels.
    #[schemars(title = "Size", range(min = 1.0, max = 16.0))]
    pub size: f32,
    /// Delay between consecutive particle spawns.
    #[schemars(title = "Stagger", range(min = 0, max = 1000))]
    pub stagger_ms: u32,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 12,
            size: 4.0,
            stagger_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Ripple", inline)]
#[serde(default)]
/// Click ripples.
pub struct RippleOptions {
    /// Spawn a ripple on click.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Ripple lifetime.
    #[schemars(title = "Duration", range(min = 0, max = 5000))]
    pub duration_ms: u32,
}

impl Default for RippleOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Magic Card", inline)]
#[serde(default)]
/// Hover-tracked tilt, magnetism, border glow, particles and ripples.
pub struct MagicCardOptions {
    /// Whether the family is active.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Card selectors.
    #[schemars(skip)]
    pub selectors: Vec<String>,
    /// Apply tilt.
    #[schemars(title = "Tilt")]
    pub enable_tilt: bool,
    /// Maximum tilt angle in degrees.
    #[schemars(title = "Tilt Strength", range(min = 0.0, max = 45.0))]
    pub tilt_strength: f32,
    /// Apply magnetic pull.
    #[schemars(title = "Magnetism")]
    pub enable_magnetism: bool,
    /// Fraction of the center offset applied as pull.
    #[schemars(title = "Magnetism Strength", range(min = 0.0, max = 0.5))]
    pub magnetism_strength: f32,
    /// Per-move smoothing factor toward the pointer (1 = no smoothing).
    #[schemars(title = "Smoothing", range(min = 0.01, max = 1.0))]
    pub smoothing: f32,
    /// Lift applied while hovered, in pixels.
    #[schemars(title = "Lift", range(min = 0.0, max = 16.0))]
    pub lift_px: f32,
    /// Write the border glow at the pointer while hovered.
    #[schemars(title = "Border Glow")]
    pub border_glow: bool,
    /// Relaxation duration in milliseconds.
    #[schemars(title = "Relax Duration", range(min = 0, max = 5000))]
    pub relax_duration_ms: u64,
    /// Relaxation progress curve.
    #[schemars(skip)]
    pub relax_easing: EasingFunction,
    /// Hover particles.
    pub particles: ParticleOptions,
    /// Click ripples.
    pub ripple: RippleOptions,
}

impl Default for MagicCardOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            selectors: default_card_selectors(),
            enable_tilt: true,
            tilt_strength: 10.0,
            enable_magnetism: true,
            magnetism_strength: 0.05,
            smoothing: 0.1,
            lift_px: 2.0,
            border_glow: true,
            relax_duration_ms: 300,
            relax_easing: EasingFunction::QuadraticOut,
            particles: ParticleOptions::default(),
            ripple: RippleOptions::default(),
        }
    }
}

impl MagicCardOptions {
    /// Transform model honoring the tilt/magnetism toggles.
    #[must_use]
    pub fn model(&self) -> TransformModel {
        let tilt = if self.enable_tilt { self.tilt_strength } else { 0.0 };
        let pull = if self.enable_magnetism {
            self.magnetism_strength
        } else {
            0.0
        };
        TransformModel::magnetic(tilt, pull)
    }

    /// Relaxation duration.
    #[must_use]
    pub fn relax_duration(&self) -> Duration {
        Duration::from_millis(self.relax_duration_ms)
    }
}
