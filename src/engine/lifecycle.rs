//! Entity lifecycle: registration, discovery, scene-change handling and
//! teardown.

use super::{params, Engine};
use crate::animation::FrameScheduler;
use crate::entity::{EffectFamily, Entity, EntityKey, EntityKind};
use crate::options::Options;
use crate::scene::{
    ElementHandle, ListenerKind, SceneChange, SceneHost, Selector,
};

/// Outcome of a registration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new entity was created.
    Registered,
    /// The element already has an entity in that family; nothing changed.
    AlreadyRegistered,
    /// Not registered: the engine is inactive, the family is disabled, the
    /// element is detached, or it is nested inside another magic card.
    Skipped,
}

/// A parsed selector bound to its family and tilt kind.
#[derive(Debug, Clone)]
pub(super) struct CompiledRule {
    pub(super) family: EffectFamily,
    pub(super) selector: Selector,
    pub(super) kind: EntityKind,
}

/// Parse every enabled family's selectors. Invalid patterns are logged
/// and skipped; the rest proceed.
pub(super) fn compile_rules(options: &Options) -> Vec<CompiledRule> {
    let mut rules = Vec::new();
    for family in EffectFamily::ALL {
        if !options.family_enabled(family) {
            continue;
        }
        for rule in options.selector_rules(family) {
            match Selector::parse(&rule.selector) {
                Ok(selector) => rules.push(CompiledRule {
                    family,
                    selector,
                    kind: rule.kind,
                }),
                Err(e) => log::warn!("{} selector skipped: {e}", family.name()),
            }
        }
    }
    rules
}

impl<H: SceneHost, S: FrameScheduler> Engine<H, S> {
    /// Register `element` in `family` with standard tuning.
    pub fn register(
        &mut self,
        element: ElementHandle,
        family: EffectFamily,
    ) -> Registration {
        self.register_with_kind(element, family, EntityKind::Standard)
    }

    /// Register `element` in `family`. Idempotent: a second call for the
    /// same pair reports [`Registration::AlreadyRegistered`] and wires
    /// nothing new.
    pub fn register_with_kind(
        &mut self,
        element: ElementHandle,
        family: EffectFamily,
        kind: EntityKind,
    ) -> Registration {
        let key = EntityKey::new(element, family);
        if self.entities.contains_key(&key) {
            return Registration::AlreadyRegistered;
        }
        if !self.active
            || !self.options.family_enabled(family)
            || !self.host.contains(element)
        {
            return Registration::Skipped;
        }
        if family == EffectFamily::MagicCard && self.inside_magic_card(element) {
            log::debug!("magic: element {} nested in a card, skipped", element.0);
            return Registration::Skipped;
        }

        let listeners = self.listeners_for(family);
        if !listeners.is_empty() {
            self.host.listen(element, &listeners);
        }
        let rect = self.host.rect(element);
        let _ = self
            .entities
            .insert(key, Entity::new(key, kind, rect, listeners));
        log::debug!("{}: registered element {} ({kind:?})", family.name(), element.0);

        if family == EffectFamily::Dock {
            // first update: the base scale for wherever the pointer is
            self.ambient_scale(key, self.pointer.position());
        }
        Registration::Registered
    }

    /// Tear down the entity for `element` in `family`. Returns whether one
    /// existed; calling it again is harmless.
    pub fn unregister(&mut self, element: ElementHandle, family: EffectFamily) -> bool {
        self.unregister_key(EntityKey::new(element, family))
    }

    /// Tear down every family's entity for `element`. Returns how many
    /// were removed.
    pub fn unregister_element(&mut self, element: ElementHandle) -> usize {
        EffectFamily::ALL
            .into_iter()
            .filter(|family| self.unregister(element, *family))
            .count()
    }

    /// Register every element in the subtree at `scope` (inclusive) that
    /// matches a configured selector. Tracked elements are never
    /// re-registered. Returns the number of new entities.
    pub fn discover(&mut self, scope: ElementHandle) -> usize {
        if !self.active {
            return 0;
        }
        let mut matches = Vec::new();
        for rule in &self.rules {
            for element in self.host.query_matching(scope, &rule.selector) {
                matches.push((element, rule.family, rule.kind));
            }
        }
        // magic cards: outer before inner so nesting is detected
        matches.sort_by_key(|(element, family, _)| (*family, *element));

        let mut registered = 0;
        for (element, family, kind) in matches {
            if self.register_with_kind(element, family, kind) == Registration::Registered {
                registered += 1;
            }
        }
        if registered > 0 {
            log::debug!("discovered {registered} entities under element {}", scope.0);
        }
        registered
    }

    /// Apply a scene mutation report: forget entities whose elements left
    /// the scene, then discover inside every added subtree.
    pub fn scene_changed(&mut self, change: &SceneChange) {
        if !self.active || change.is_empty() {
            return;
        }
        if !change.removed.is_empty() {
            let _ = self.prune_detached();
        }
        for root in &change.added {
            if self.host.contains(*root) {
                let _ = self.discover(*root);
            }
        }
    }

    /// Unregister every entity whose element is no longer in the scene.
    /// Returns how many were removed.
    pub fn prune_detached(&mut self) -> usize {
        let gone: Vec<EntityKey> = self
            .sorted_keys()
            .into_iter()
            .filter(|key| !self.host.contains(key.element))
            .collect();
        for key in &gone {
            let _ = self.unregister_key(*key);
        }
        gone.len()
    }

    /// Cancel the entity's frame, detach its listeners, remove its
    /// decorations and clear its parameters.
    pub(super) fn unregister_key(&mut self, key: EntityKey) -> bool {
        let Some(mut entity) = self.entities.remove(&key) else {
            return false;
        };
        if let Some(handle) = entity.frame.take() {
            self.cancel_frame(handle);
        }
        if !entity.listeners.is_empty() {
            self.host.unlisten(key.element, &entity.listeners);
        }
        for id in entity.drain_decorations() {
            self.host.remove_decoration(id);
        }
        let remaining: Vec<EffectFamily> = EffectFamily::ALL
            .into_iter()
            .filter(|&f| self.entities.contains_key(&EntityKey::new(key.element, f)))
            .collect();
        params::clear_family(&mut self.host, key.element, key.family, &remaining);
        log::debug!("{}: unregistered element {}", key.family.name(), key.element.0);
        true
    }

    fn listeners_for(&self, family: EffectFamily) -> Vec<ListenerKind> {
        match family {
            EffectFamily::Holographic if self.options.holographic.track_local => {
                vec![ListenerKind::Hover, ListenerKind::Touch]
            }
            EffectFamily::MagicCard => vec![ListenerKind::Hover, ListenerKind::Click],
            _ => Vec::new(),
        }
    }

    fn inside_magic_card(&self, element: ElementHandle) -> bool {
        let mut cursor = self.host.parent(element);
        while let Some(ancestor) = cursor {
            let key = EntityKey::new(ancestor, EffectFamily::MagicCard);
            if self.entities.contains_key(&key) {
                return true;
            }
            cursor = self.host.parent(ancestor);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::QueuedScheduler;
    use crate::scene::memory::ElementSpec;
    use crate::scene::{MemoryScene, Rect, SceneQuery};

    fn engine_with(options: Options) -> (Engine<MemoryScene, QueuedScheduler>, ElementHandle) {
        let mut scene = MemoryScene::new(Rect::new(0.0, 0.0, 1280.0, 800.0));
        let post = scene.append(
            scene.root(),
            &ElementSpec::new("div")
                .class("recent-post-item")
                .rect(0.0, 0.0, 200.0, 100.0),
        );
        let mut engine = Engine::new(scene, QueuedScheduler::new(), options);
        engine.start();
        (engine, post)
    }

    #[test]
    fn invalid_selectors_are_skipped_not_fatal() {
        let mut options = Options::default();
        options.dock.selectors = vec!["a[href".to_owned(), ".dock-item".to_owned()];
        let rules = compile_rules(&options);
        let dock: Vec<_> = rules
            .iter()
            .filter(|r| r.family == EffectFamily::Dock)
            .collect();
        assert_eq!(dock.len(), 1);
        assert_eq!(dock[0].selector.as_str(), ".dock-item");
    }

    #[test]
    fn disabled_family_compiles_no_rules() {
        let mut options = Options::default();
        options.magic_card.enabled = false;
        let rules = compile_rules(&options);
        assert!(rules.iter().all(|r| r.family != EffectFamily::MagicCard));
    }

    #[test]
    fn register_twice_is_idempotent() {
        let (mut engine, post) = engine_with(Options::default());
        // discovery already registered it
        assert_eq!(
            engine.register(post, EffectFamily::Holographic),
            Registration::AlreadyRegistered
        );
        let hover = engine
            .host()
            .listeners(post)
            .iter()
            .filter(|k| **k == ListenerKind::Hover)
            .count();
        // one from holographic, one from magic card
        assert_eq!(hover, 2);
    }

    #[test]
    fn unregister_is_safe_twice() {
        let (mut engine, post) = engine_with(Options::default());
        assert!(engine.unregister(post, EffectFamily::Holographic));
        assert!(!engine.unregister(post, EffectFamily::Holographic));
        assert!(engine.entity(post, EffectFamily::Holographic).is_none());
    }

    #[test]
    fn inactive_engine_registers_nothing() {
        let mut options = Options::default();
        options.general.reduced_motion = true;
        let (mut engine, post) = engine_with(options);
        assert_eq!(
            engine.register(post, EffectFamily::Dock),
            Registration::Skipped
        );
        assert_eq!(engine.entity_count(), 0);
    }
}
