use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::magic::default_card_selectors;
use crate::transform::{DockScale, ProximityPolicy};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Spotlight", inline)]
#[serde(default)]
/// Scene-wide spotlight and the proximity glow it casts on cards.
pub struct SpotlightOptions {
    /// Whether the family is active.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Card selectors.
    #[schemars(skip)]
    pub selectors: Vec<String>,
    /// Influence radius in pixels.
    #[schemars(title = "Radius", range(min = 10.0, max = 1000.0))]
    pub influence_radius: f32,
    /// Engagement policy.
    #[schemars(title = "Proximity Policy")]
    pub proximity_policy: ProximityPolicy,
    /// Diameter of the spotlight decoration.
    #[schemars(title = "Diameter", range(min = 0.0, max = 2000.0))]
    pub diameter: f32,
    /// Glow color (RGB).
    #[schemars(skip)]
    pub glow_color: [u8; 3],
}

impl Default for SpotlightOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            selectors: default_card_selectors(),
            influence_radius: 300.0,
            proximity_policy: ProximityPolicy::Graded,
            diameter: 800.0,
            glow_color: [255, 0, 255],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Dock", inline)]
#[serde(default)]
/// Dock-style magnification of share buttons.
pub struct DockOptions {
    /// Whether the family is active.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Button selectors.
    #[schemars(skip)]
    pub selectors: Vec<String>,
    /// Distance at which magnification fades out.
    #[schemars(title = "Proximity", range(min = 1.0, max = 500.0))]
    pub proximity: f32,
    /// Resting scale.
    #[schemars(title = "Base Scale", range(min = 0.5, max = 2.0))]
    pub base_scale: f32,
    /// Scale with the pointer on the center.
    #[schemars(title = "Max Scale", range(min = 1.0, max = 3.0))]
    pub max_scale: f32,
}

impl Default for DockOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            selectors: vec![
                ".social-share .social-share-icon".to_owned(),
                "a.social-share-icon".to_owned(),
                ".social-share-icon".to_owned(),
            ],
            proximity: 100.0,
            base_scale: 1.0,
            max_scale: 1.5,
        }
    }
}

impl DockOptions {
    /// Scale falloff.
    #[must_use]
    pub fn scale(&self) -> DockScale {
        DockScale {
            base: self.base_scale,
            max: self.max_scale,
            proximity: self.proximity,
        }
    }
}
