use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::entity::EntityKind;
use crate::transform::{ProximityPolicy, TiltDivisors, TransformModel};
use crate::util::easing::EasingFunction;

/// A selector paired with the tuning kind of the panels it matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct SelectorRule {
    /// Selector text.
    pub selector: String,
    /// Tilt kind for matches.
    #[serde(default)]
    pub kind: EntityKind,
}

impl SelectorRule {
    /// Rule for `selector` with `kind`.
    #[must_use]
    pub fn new(selector: &str, kind: EntityKind) -> Self {
        Self {
            selector: selector.to_owned(),
            kind,
        }
    }
}

/// Tilt divisors for each entity kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct KindDivisors {
    /// Standard panels.
    pub standard: TiltDivisors,
    /// Reduced-tilt panels.
    pub reduced: TiltDivisors,
}

impl Default for KindDivisors {
    fn default() -> Self {
        Self {
            standard: TiltDivisors::STANDARD,
            reduced: TiltDivisors::REDUCED,
        }
    }
}

impl KindDivisors {
    /// Divisors for `kind`.
    #[must_use]
    pub fn for_kind(&self, kind: EntityKind) -> TiltDivisors {
        match kind {
            EntityKind::Standard => self.standard,
            EntityKind::Reduced => self.reduced,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Holographic", inline)]
#[serde(default)]
/// Whole-card holographic tilt.
pub struct HolographicOptions {
    /// Whether the family is active.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Track enter/move/leave and touch events on each card.
    #[schemars(title = "Track Hover")]
    pub track_local: bool,
    /// Track the scene-wide pointer by proximity.
    #[schemars(title = "Track Proximity")]
    pub track_proximity: bool,
    /// Selectors with their tilt kinds.
    #[schemars(skip)]
    pub selectors: Vec<SelectorRule>,
    /// Extra distance beyond the card's effective circle that still
    /// engages it.
    #[schemars(title = "Influence Radius", range(min = 0.0, max = 600.0))]
    pub influence_radius: f32,
    /// Engagement policy.
    #[schemars(title = "Proximity Policy")]
    pub proximity_policy: ProximityPolicy,
    /// Relaxation duration in milliseconds.
    #[schemars(title = "Relax Duration", range(min = 0, max = 5000))]
    pub relax_duration_ms: u64,
    /// Relaxation progress curve.
    #[schemars(skip)]
    pub relax_easing: EasingFunction,
    /// Percent band the glare focal point is remapped into.
    #[schemars(skip)]
    pub glow_band: [f32; 2],
    /// Tilt divisors per kind.
    #[schemars(skip)]
    pub tilt: KindDivisors,
}

impl Default for HolographicOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            track_local: true,
            track_proximity: true,
            selectors: vec![
                SelectorRule::new(".recent-post-item", EntityKind::Standard),
                SelectorRule::new(".article-sort-item", EntityKind::Reduced),
                SelectorRule::new(".category-list-item", EntityKind::Standard),
                SelectorRule::new(".tag-list-item", EntityKind::Standard),
                SelectorRule::new("#aside-content .card-widget", EntityKind::Standard),
            ],
            influence_radius: 150.0,
            proximity_policy: ProximityPolicy::Binary,
            relax_duration_ms: 600,
            relax_easing: EasingFunction::CubicInOut,
            glow_band: [35.0, 65.0],
            tilt: KindDivisors::default(),
        }
    }
}

impl HolographicOptions {
    /// Transform model for `kind`.
    #[must_use]
    pub fn model(&self, kind: EntityKind) -> TransformModel {
        TransformModel::holographic(self.tilt.for_kind(kind), self.glow_band)
    }

    /// Relaxation duration.
    #[must_use]
    pub fn relax_duration(&self) -> Duration {
        Duration::from_millis(self.relax_duration_ms)
    }
}
