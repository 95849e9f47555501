//! Per-entity records kept in the engine's side table.

use glam::Vec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::animation::{FrameHandle, Relaxation};
use crate::scene::{DecorationId, ElementHandle, ListenerKind, Rect};
use crate::transform::VisualParameters;

/// The effect family an entity belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EffectFamily {
    /// Whole-card holographic tilt with glare.
    Holographic,
    /// Hover-tracked tilt and magnetic pull with particles and ripples.
    MagicCard,
    /// Ambient glow driven by the scene-wide spotlight.
    Spotlight,
    /// Dock-style magnification of small buttons.
    Dock,
}

impl EffectFamily {
    /// All families, in processing order.
    pub const ALL: [Self; 4] = [Self::Holographic, Self::MagicCard, Self::Spotlight, Self::Dock];

    /// Short name used in log lines.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Holographic => "holo",
            Self::MagicCard => "magic",
            Self::Spotlight => "spotlight",
            Self::Dock => "dock",
        }
    }
}

/// Tuning variant selecting tilt constants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Standard tilt.
    #[default]
    Standard,
    /// Gentler tilt for dense list rows.
    Reduced,
}

/// Interaction state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityState {
    /// At rest.
    #[default]
    Idle,
    /// Tracking the pointer directly.
    Engaged,
    /// Easing back to rest.
    Relaxing,
}

/// Side-table key: one entity per element and family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    /// Backing host element.
    pub element: ElementHandle,
    /// Effect family.
    pub family: EffectFamily,
}

impl EntityKey {
    /// Key for `element` in `family`.
    #[must_use]
    pub const fn new(element: ElementHandle, family: EffectFamily) -> Self {
        Self { element, family }
    }
}

/// A registered interactive panel.
#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) key: EntityKey,
    pub(crate) kind: EntityKind,
    pub(crate) rect: Option<Rect>,
    pub(crate) state: EntityState,
    pub(crate) last_params: VisualParameters,
    /// Whether any parameter has been written for this entity yet.
    pub(crate) written: bool,
    /// Last pointer offset fed to the transform model (real, smoothed or
    /// virtual); the start point of the next relaxation.
    pub(crate) last_offset: Vec2,
    /// The single outstanding frame callback, if any.
    pub(crate) frame: Option<FrameHandle>,
    pub(crate) relaxation: Option<Relaxation>,
    pub(crate) listeners: Vec<ListenerKind>,
    pub(crate) glare: Option<DecorationId>,
    pub(crate) particles: Vec<DecorationId>,
    pub(crate) ripples: Vec<(DecorationId, Instant)>,
}

impl Entity {
    pub(crate) fn new(
        key: EntityKey,
        kind: EntityKind,
        rect: Option<Rect>,
        listeners: Vec<ListenerKind>,
    ) -> Self {
        Self {
            key,
            kind,
            rect,
            state: EntityState::Idle,
            last_params: VisualParameters::REST,
            written: false,
            last_offset: rect.map_or(Vec2::ZERO, |r| r.local_center()),
            frame: None,
            relaxation: None,
            listeners,
            glare: None,
            particles: Vec::new(),
            ripples: Vec::new(),
        }
    }

    /// Side-table key.
    #[must_use]
    pub fn key(&self) -> EntityKey {
        self.key
    }

    /// Backing host element.
    #[must_use]
    pub fn element(&self) -> ElementHandle {
        self.key.element
    }

    /// Effect family.
    #[must_use]
    pub fn family(&self) -> EffectFamily {
        self.key.family
    }

    /// Tuning kind.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Current interaction state.
    #[must_use]
    pub fn state(&self) -> EntityState {
        self.state
    }

    /// Last emitted parameter set.
    #[must_use]
    pub fn last_params(&self) -> &VisualParameters {
        &self.last_params
    }

    /// Geometry seen at the last interaction.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Outstanding frame callback.
    #[must_use]
    pub fn frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    /// Listener groups wired for this entity.
    #[must_use]
    pub fn listeners(&self) -> &[ListenerKind] {
        &self.listeners
    }

    /// Number of live injected decorations.
    #[must_use]
    pub fn decoration_count(&self) -> usize {
        usize::from(self.glare.is_some()) + self.particles.len() + self.ripples.len()
    }

    /// Take every injected decoration id, leaving none tracked.
    pub(crate) fn drain_decorations(&mut self) -> Vec<DecorationId> {
        let mut ids: Vec<DecorationId> = self.glare.take().into_iter().collect();
        ids.append(&mut self.particles);
        ids.extend(self.ripples.drain(..).map(|(id, _)| id));
        ids
    }
}
