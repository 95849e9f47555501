//! Direct tracking and relaxation of tilt entities, plus the magic-card
//! particles and ripples.

use glam::Vec2;
use rand::Rng;
use web_time::{Duration, Instant};

use super::params::{self, GlowStyle};
use super::{Engine, FrameTarget};
use crate::animation::{FrameHandle, FrameScheduler, Relaxation};
use crate::entity::{EffectFamily, EntityKey, EntityKind, EntityState};
use crate::input::LocalEvent;
use crate::scene::{Decoration, ElementHandle, Rect, SceneHost};
use crate::transform::{TransformModel, VisualParameters};

impl<H: SceneHost, S: FrameScheduler> Engine<H, S> {
    /// Deliver an element-local event. Only entities that asked for the
    /// event's listener group react.
    pub fn handle_local(&mut self, element: ElementHandle, event: LocalEvent, now: Instant) {
        if !self.active {
            return;
        }
        let group = event.listener_kind();
        for family in [EffectFamily::Holographic, EffectFamily::MagicCard] {
            let key = EntityKey::new(element, family);
            let listening = self
                .entities
                .get(&key)
                .is_some_and(|e| e.listeners.contains(&group));
            if !listening {
                continue;
            }
            match family {
                EffectFamily::Holographic => self.holographic_local(key, event, now),
                _ => self.magic_local(key, event, now),
            }
        }
    }

    fn holographic_local(&mut self, key: EntityKey, event: LocalEvent, now: Instant) {
        match event {
            LocalEvent::PointerEnter { x, y }
            | LocalEvent::PointerMove { x, y }
            | LocalEvent::TouchStart { x, y }
            | LocalEvent::TouchMove { x, y } => {
                let Some(rect) = self.refresh_rect(key) else {
                    return;
                };
                self.track_holographic(key, rect, rect.relative(Vec2::new(x, y)), 1.0);
            }
            LocalEvent::PointerLeave { x, y } => {
                let leave = self.host.rect(key.element).map(|r| r.relative(Vec2::new(x, y)));
                if let Some(entity) = self.entities.get_mut(&key) {
                    if entity.state == EntityState::Engaged {
                        if let Some(offset) = leave {
                            entity.last_offset = offset;
                        }
                    }
                }
                self.begin_relax(key, now);
            }
            LocalEvent::TouchEnd => self.begin_relax(key, now),
            LocalEvent::Click { .. } => {}
        }
    }

    /// Engage (if needed) and write holographic parameters for a local
    /// `offset`. Parameters come purely from the new offset: any in-flight
    /// relaxation is dropped first.
    pub(super) fn track_holographic(
        &mut self,
        key: EntityKey,
        rect: Rect,
        offset: Vec2,
        intensity: f32,
    ) {
        let Some(previous) = self.interrupt(key) else {
            return;
        };
        if previous != EntityState::Engaged {
            self.engage_holographic(key);
        }
        let Some(model) = self.model_for(key) else {
            return;
        };
        let visual = model.compute(offset, rect.size(), intensity);
        params::write_holographic(&mut self.host, key.element, &visual);
        if let Some(entity) = self.entities.get_mut(&key) {
            entity.last_params = visual;
            entity.last_offset = offset;
            entity.written = true;
        }
    }

    fn engage_holographic(&mut self, key: EntityKey) {
        let needs_glare = self
            .entities
            .get(&key)
            .is_some_and(|e| e.glare.is_none());
        let glare = if needs_glare {
            self.host.inject(key.element, &Decoration::Glare)
        } else {
            None
        };
        if let Some(entity) = self.entities.get_mut(&key) {
            entity.state = EntityState::Engaged;
            if glare.is_some() {
                entity.glare = glare;
            }
        }
        params::write_holo_active(&mut self.host, key.element, true);
        log::trace!("holo: element {} engaged", key.element.0);
    }

    fn magic_local(&mut self, key: EntityKey, event: LocalEvent, now: Instant) {
        match event {
            LocalEvent::PointerEnter { .. } => self.magic_enter(key),
            LocalEvent::PointerMove { x, y } => self.magic_move(key, Vec2::new(x, y)),
            LocalEvent::PointerLeave { .. } => self.magic_leave(key, now),
            LocalEvent::Click { x, y } => self.spawn_ripple(key, Vec2::new(x, y), now),
            LocalEvent::TouchStart { .. }
            | LocalEvent::TouchMove { .. }
            | LocalEvent::TouchEnd => {}
        }
    }

    fn magic_enter(&mut self, key: EntityKey) {
        let Some(rect) = self.refresh_rect(key) else {
            return;
        };
        let Some(previous) = self.interrupt(key) else {
            return;
        };
        if previous == EntityState::Engaged {
            return;
        }
        if let Some(entity) = self.entities.get_mut(&key) {
            entity.state = EntityState::Engaged;
            // smoothing restarts from the center on every engagement
            entity.last_offset = rect.local_center();
            entity.written = true;
        }
        let lift = -self.options.magic_card.lift_px;
        params::write_magic_hover(&mut self.host, key.element, true, lift);
        self.spawn_particles(key, rect);
    }

    fn magic_move(&mut self, key: EntityKey, pointer: Vec2) {
        if self.entities.get(&key).map(|e| e.state) != Some(EntityState::Engaged) {
            self.magic_enter(key);
        }
        let Some(rect) = self.refresh_rect(key) else {
            return;
        };
        let Some(model) = self.model_for(key) else {
            return;
        };
        let magic = &self.options.magic_card;
        let lift = -magic.lift_px;
        let smoothing = magic.smoothing;
        let border_glow = magic.border_glow;
        let style = GlowStyle {
            color: self.options.spotlight.glow_color,
            radius: self.options.spotlight.influence_radius,
        };

        let Some(entity) = self.entities.get_mut(&key) else {
            return;
        };
        let raw = rect.relative(pointer);
        let smoothed = entity.last_offset.lerp(raw, smoothing);
        let visual = model.compute(smoothed, rect.size(), 1.0);
        entity.last_offset = smoothed;
        entity.last_params = visual;

        params::write_magic_tilt(&mut self.host, key.element, &visual, lift);
        if border_glow {
            let focus = params::glow_focus(raw, rect.size());
            params::write_glow(&mut self.host, key.element, focus, 1.0, style);
        }
    }

    fn magic_leave(&mut self, key: EntityKey, now: Instant) {
        if self.entities.get(&key).map(|e| e.state) != Some(EntityState::Engaged) {
            return;
        }
        self.clear_particles(key);
        params::write_magic_hover(&mut self.host, key.element, false, 0.0);
        self.begin_relax(key, now);
    }

    /// Cancel any in-flight relaxation and its frame. Returns the state the
    /// entity was in, or `None` when it is not registered.
    fn interrupt(&mut self, key: EntityKey) -> Option<EntityState> {
        let entity = self.entities.get_mut(&key)?;
        let previous = entity.state;
        entity.relaxation = None;
        let stale = entity.frame.take();
        if previous == EntityState::Relaxing {
            entity.state = EntityState::Idle;
        }
        if let Some(handle) = stale {
            self.cancel_frame(handle);
        }
        Some(previous)
    }

    /// `Engaged → Relaxing`: capture the last offset and start the
    /// per-frame loop back to the center.
    pub(super) fn begin_relax(&mut self, key: EntityKey, now: Instant) {
        let (duration, easing) = match key.family {
            EffectFamily::Holographic => (
                self.options.holographic.relax_duration(),
                self.options.holographic.relax_easing,
            ),
            EffectFamily::MagicCard => (
                self.options.magic_card.relax_duration(),
                self.options.magic_card.relax_easing,
            ),
            EffectFamily::Spotlight | EffectFamily::Dock => return,
        };
        let Some(entity) = self.entities.get_mut(&key) else {
            return;
        };
        if entity.state != EntityState::Engaged {
            return;
        }
        entity.relaxation = Some(Relaxation::new(
            entity.last_offset,
            entity.last_params.glow_intensity,
            duration,
            easing,
            now,
        ));
        entity.state = EntityState::Relaxing;
        let stale = entity.frame.take();
        if let Some(handle) = stale {
            self.cancel_frame(handle);
        }
        let handle = self.schedule_frame(FrameTarget::Entity(key));
        if let Some(entity) = self.entities.get_mut(&key) {
            entity.frame = Some(handle);
        }
        log::trace!("{}: element {} relaxing", key.family.name(), key.element.0);
    }

    /// One relaxation step: re-run the transform on the interpolated
    /// virtual offset, or finish at the center.
    pub(super) fn relax_frame(&mut self, key: EntityKey, handle: FrameHandle, now: Instant) {
        let Some(entity) = self.entities.get(&key) else {
            return;
        };
        if entity.frame != Some(handle) || entity.state != EntityState::Relaxing {
            return;
        }
        let cached = entity.rect;
        let Some(rect) = self.host.rect(key.element).or(cached) else {
            self.finish_relax(key);
            return;
        };
        let Some(model) = self.model_for(key) else {
            return;
        };
        let Some(entity) = self.entities.get_mut(&key) else {
            return;
        };
        entity.frame = None;
        entity.rect = Some(rect);
        let Some(sample) = entity
            .relaxation
            .as_ref()
            .map(|r| r.sample(now, rect.local_center()))
        else {
            self.finish_relax(key);
            return;
        };
        if sample.is_complete() {
            self.finish_relax(key);
            return;
        }

        let visual = model.compute(sample.offset, rect.size(), sample.intensity);
        entity.last_params = visual;
        entity.last_offset = sample.offset;
        self.write_tilt(key, &visual);
        let next = self.schedule_frame(FrameTarget::Entity(key));
        if let Some(entity) = self.entities.get_mut(&key) {
            entity.frame = Some(next);
        }
    }

    /// `Relaxing → Idle`: write the rest set, drop the glare.
    fn finish_relax(&mut self, key: EntityKey) {
        let Some(entity) = self.entities.get_mut(&key) else {
            return;
        };
        entity.state = EntityState::Idle;
        entity.relaxation = None;
        entity.frame = None;
        entity.last_params = VisualParameters::REST;
        if let Some(rect) = entity.rect {
            entity.last_offset = rect.local_center();
        }
        let glare = entity.glare.take();

        self.write_tilt(key, &VisualParameters::REST);
        if key.family == EffectFamily::Holographic {
            params::write_holo_active(&mut self.host, key.element, false);
        }
        if let Some(id) = glare {
            self.host.remove_decoration(id);
        }
        log::trace!("{}: element {} at rest", key.family.name(), key.element.0);
    }

    fn write_tilt(&mut self, key: EntityKey, visual: &VisualParameters) {
        match key.family {
            EffectFamily::Holographic => {
                params::write_holographic(&mut self.host, key.element, visual);
            }
            EffectFamily::MagicCard => {
                params::write_magic_tilt(&mut self.host, key.element, visual, 0.0);
            }
            EffectFamily::Spotlight | EffectFamily::Dock => {}
        }
    }

    fn model_for(&self, key: EntityKey) -> Option<TransformModel> {
        let kind = self.entities.get(&key).map_or(EntityKind::Standard, |e| e.kind);
        match key.family {
            EffectFamily::Holographic => Some(self.options.holographic.model(kind)),
            EffectFamily::MagicCard => Some(self.options.magic_card.model()),
            EffectFamily::Spotlight | EffectFamily::Dock => None,
        }
    }

    fn spawn_particles(&mut self, key: EntityKey, rect: Rect) {
        let particles = self.options.magic_card.particles.clone();
        if !particles.enabled {
            return;
        }
        self.clear_particles(key);
        let mut ids = Vec::with_capacity(particles.count as usize);
        for i in 0..particles.count {
            let decoration = Decoration::Particle {
                x: self.rng.random::<f32>() * rect.width.max(0.0),
                y: self.rng.random::<f32>() * rect.height.max(0.0),
                size: particles.size,
                delay_ms: i * particles.stagger_ms,
            };
            if let Some(id) = self.host.inject(key.element, &decoration) {
                ids.push(id);
            }
        }
        if let Some(entity) = self.entities.get_mut(&key) {
            entity.particles = ids;
        }
    }

    fn clear_particles(&mut self, key: EntityKey) {
        let ids = self
            .entities
            .get_mut(&key)
            .map(|e| std::mem::take(&mut e.particles))
            .unwrap_or_default();
        for id in ids {
            self.host.remove_decoration(id);
        }
    }

    fn spawn_ripple(&mut self, key: EntityKey, pointer: Vec2, now: Instant) {
        let ripple = self.options.magic_card.ripple.clone();
        if !ripple.enabled {
            return;
        }
        let Some(rect) = self.refresh_rect(key) else {
            return;
        };
        let local = rect.relative(pointer);
        let decoration = Decoration::Ripple {
            x: local.x,
            y: local.y,
            radius: rect.farthest_corner_distance(local),
            duration_ms: ripple.duration_ms,
        };
        let Some(id) = self.host.inject(key.element, &decoration) else {
            log::warn!("magic: ripple injection failed on element {}", key.element.0);
            return;
        };
        let expires = now + Duration::from_millis(u64::from(ripple.duration_ms));
        if let Some(entity) = self.entities.get_mut(&key) {
            entity.ripples.push((id, expires));
        }
        self.ensure_sweep();
    }

    /// Remove ripples whose lifetime has ended and keep a sweep frame
    /// pending while any remain.
    pub(super) fn sweep_ripples(&mut self, now: Instant) {
        let mut expired = Vec::new();
        for entity in self.entities.values_mut() {
            entity.ripples.retain(|&(id, expires)| {
                if expires <= now {
                    expired.push(id);
                    false
                } else {
                    true
                }
            });
        }
        for id in expired {
            self.host.remove_decoration(id);
        }
        self.ensure_sweep();
    }

    fn ensure_sweep(&mut self) {
        if self.sweep_frame.is_some() {
            return;
        }
        if self.entities.values().any(|e| !e.ripples.is_empty()) {
            let handle = self.schedule_frame(FrameTarget::Sweep);
            self.sweep_frame = Some(handle);
        }
    }
}
