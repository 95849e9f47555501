//! Read-only query methods and host access for [`Engine`].

use super::Engine;
use crate::entity::{EffectFamily, Entity, EntityKey};
use crate::options::Options;
use crate::scene::{DecorationId, ElementHandle, PointerSample};

// ── Host access ──

impl<H, S> Engine<H, S> {
    /// The scene host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable scene host, for host-side changes such as layout moves.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable frame scheduler.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Consume the engine, returning its host and scheduler.
    #[must_use]
    pub fn into_parts(self) -> (H, S) {
        (self.host, self.scheduler)
    }
}

// ── State queries ──

impl<H, S> Engine<H, S> {
    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Whether listeners are wired and writes happen.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a scene watch is installed.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Latest scene-wide pointer sample.
    #[must_use]
    pub fn pointer(&self) -> PointerSample {
        self.pointer
    }

    /// The injected spotlight decoration, if any.
    #[must_use]
    pub fn spotlight(&self) -> Option<DecorationId> {
        self.spotlight
    }

    /// The entity for `element` in `family`.
    #[must_use]
    pub fn entity(&self, element: ElementHandle, family: EffectFamily) -> Option<&Entity> {
        self.entities.get(&EntityKey::new(element, family))
    }

    /// Number of registered entities across all families.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of registered entities in `family`.
    #[must_use]
    pub fn family_count(&self, family: EffectFamily) -> usize {
        self.entities.keys().filter(|k| k.family == family).count()
    }

    /// All registered entities, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Number of frame callbacks the engine is waiting on.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }
}
