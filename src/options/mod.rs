//! Per-family effect options with TOML preset support.
//!
//! Every tweakable constant (selectors, radii, durations, tilt tuning,
//! particle and ripple settings) lives here. Options serialize to/from TOML
//! so a site can ship presets next to its stylesheet.

mod ambient;
mod general;
mod holographic;
mod magic;

use std::path::Path;

pub use ambient::{DockOptions, SpotlightOptions};
pub use general::GeneralOptions;
pub use holographic::{HolographicOptions, KindDivisors, SelectorRule};
pub use magic::{MagicCardOptions, ParticleOptions, RippleOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entity::{EffectFamily, EntityKind};
use crate::error::EffectError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[dock]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Engine-wide switches.
    pub general: GeneralOptions,
    /// Holographic tilt.
    pub holographic: HolographicOptions,
    /// Magic-card tilt, magnetism, particles and ripples.
    pub magic_card: MagicCardOptions,
    /// Spotlight glow.
    pub spotlight: SpotlightOptions,
    /// Dock magnification.
    pub dock: DockOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, EffectError> {
        toml::from_str(content)
            .map_err(|e| EffectError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, EffectError> {
        let content = std::fs::read_to_string(path).map_err(EffectError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), EffectError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EffectError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(EffectError::Io)?;
        }
        std::fs::write(path, content).map_err(EffectError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Whether `family` is switched on.
    #[must_use]
    pub fn family_enabled(&self, family: EffectFamily) -> bool {
        match family {
            EffectFamily::Holographic => self.holographic.enabled,
            EffectFamily::MagicCard => self.magic_card.enabled,
            EffectFamily::Spotlight => self.spotlight.enabled,
            EffectFamily::Dock => self.dock.enabled,
        }
    }

    /// Selector rules configured for `family`. Only holographic rules
    /// carry a non-standard kind.
    #[must_use]
    pub fn selector_rules(&self, family: EffectFamily) -> Vec<SelectorRule> {
        let plain = |selectors: &[String]| -> Vec<SelectorRule> {
            selectors
                .iter()
                .map(|s| SelectorRule::new(s, EntityKind::Standard))
                .collect()
        };
        match family {
            EffectFamily::Holographic => self.holographic.selectors.clone(),
            EffectFamily::MagicCard => plain(&self.magic_card.selectors),
            EffectFamily::Spotlight => plain(&self.spotlight.selectors),
            EffectFamily::Dock => plain(&self.dock.selectors),
        }
    }
}
