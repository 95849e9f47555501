//! Global input broadcaster: one throttled pointer source fanned out to
//! every ambient entity.

use glam::Vec2;
use web_time::Instant;

use super::params::{self, GlowStyle};
use super::{Engine, FrameTarget};
use crate::animation::FrameScheduler;
use crate::entity::{EffectFamily, EntityKey, EntityState};
use crate::error::EffectError;
use crate::scene::{PointerSample, Rect, SceneHost};
use crate::transform::{proximity, VisualParameters};

impl<H: SceneHost, S: FrameScheduler> Engine<H, S> {
    /// Feed a scene-wide pointer sample.
    ///
    /// The first sample in a throttle window is broadcast immediately.
    /// Later ones in the same window are coalesced: only the newest is kept
    /// and it is delivered on the next frame, so the final position is
    /// never lost.
    pub fn pointer_moved(&mut self, sample: PointerSample, now: Instant) {
        if !self.active {
            return;
        }
        self.pointer = sample;
        if self.throttle.try_fire(now) {
            if let Some(handle) = self.broadcast_frame.take() {
                self.cancel_frame(handle);
            }
            self.tick(now);
        } else if self.broadcast_frame.is_none() {
            let handle = self.schedule_frame(FrameTarget::Broadcast);
            self.broadcast_frame = Some(handle);
        }
    }

    /// The pointer left the scene: every ambient entity disengages on an
    /// immediate, unthrottled tick.
    pub fn pointer_left(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        self.pointer = PointerSample::FAR_AWAY;
        if let Some(handle) = self.broadcast_frame.take() {
            self.cancel_frame(handle);
        }
        self.tick(now);
    }

    pub(super) fn trailing_broadcast(&mut self, now: Instant) {
        self.broadcast_frame = None;
        if !self.active {
            return;
        }
        self.throttle.reset();
        let _ = self.throttle.try_fire(now);
        self.tick(now);
    }

    /// One broadcast tick: every ambient entity re-reads its geometry and
    /// reacts to the current pointer sample.
    fn tick(&mut self, now: Instant) {
        let pointer = self.pointer.position();
        self.sweep_ripples(now);

        let holo_ambient =
            self.options.holographic.enabled && self.options.holographic.track_proximity;
        let mut spotlight_opacity: f32 = 0.0;
        for key in self.sorted_keys() {
            match key.family {
                EffectFamily::Holographic if holo_ambient => {
                    self.ambient_tilt(key, pointer, now);
                }
                EffectFamily::Spotlight => {
                    spotlight_opacity = spotlight_opacity.max(self.ambient_glow(key, pointer));
                }
                EffectFamily::Dock => self.ambient_scale(key, pointer),
                _ => {}
            }
        }

        if self.spotlight.is_some() {
            let root = self.host.root();
            let position = pointer.is_finite().then_some(pointer);
            params::write_spotlight(&mut self.host, root, position, spotlight_opacity);
        }
    }

    /// Fresh geometry for an entity, cached on the record. Missing geometry
    /// skips the entity for this tick.
    pub(super) fn refresh_rect(&mut self, key: EntityKey) -> Option<Rect> {
        let Some(rect) = self.host.rect(key.element) else {
            log::warn!(
                "{}: {}",
                key.family.name(),
                EffectError::GeometryUnavailable(key.element)
            );
            return None;
        };
        if let Some(entity) = self.entities.get_mut(&key) {
            entity.rect = Some(rect);
        }
        Some(rect)
    }

    /// Proximity-driven holographic tilt: track the pointer projected onto
    /// the card while in range, relax once it leaves.
    fn ambient_tilt(&mut self, key: EntityKey, pointer: Vec2, now: Instant) {
        let Some(rect) = self.refresh_rect(key) else {
            return;
        };
        let holo = &self.options.holographic;
        let engagement =
            proximity::evaluate(holo.proximity_policy, pointer, &rect, holo.influence_radius);
        let state = self.entities.get(&key).map(|e| e.state);
        if engagement.engaged {
            self.track_holographic(key, rect, rect.project(pointer), engagement.intensity);
        } else if state == Some(EntityState::Engaged) {
            self.begin_relax(key, now);
        }
    }

    /// Graded spotlight glow. Returns the intensity so the tick can fade
    /// the spotlight itself.
    fn ambient_glow(&mut self, key: EntityKey, pointer: Vec2) -> f32 {
        let Some(rect) = self.refresh_rect(key) else {
            return 0.0;
        };
        let spot = &self.options.spotlight;
        let engagement =
            proximity::evaluate(spot.proximity_policy, pointer, &rect, spot.influence_radius);
        let style = GlowStyle {
            color: spot.glow_color,
            radius: spot.influence_radius,
        };
        let Some(entity) = self.entities.get_mut(&key) else {
            return 0.0;
        };
        if !engagement.engaged && entity.last_params.glow_intensity == 0.0 {
            // already dark
            return 0.0;
        }

        let focus = params::glow_focus(rect.relative(pointer), rect.size());
        entity.last_params = VisualParameters {
            pointer_percent_x: focus.x,
            pointer_percent_y: focus.y,
            glow_x: focus.x,
            glow_y: focus.y,
            glow_intensity: engagement.intensity,
            ..VisualParameters::REST
        };
        entity.state = if engagement.engaged {
            EntityState::Engaged
        } else {
            EntityState::Idle
        };
        params::write_glow(&mut self.host, key.element, focus, engagement.intensity, style);
        engagement.intensity
    }

    /// Dock magnification by distance to the button center.
    pub(super) fn ambient_scale(&mut self, key: EntityKey, pointer: Vec2) {
        let Some(rect) = self.refresh_rect(key) else {
            return;
        };
        let dock = self.options.dock.scale();
        let scale = dock.scale_at(proximity::center_distance(pointer, &rect));
        let Some(entity) = self.entities.get_mut(&key) else {
            return;
        };
        if entity.written && entity.last_params.scale == scale {
            return;
        }
        entity.last_params = VisualParameters::scaled(scale);
        entity.written = true;
        entity.state = if scale == dock.base {
            EntityState::Idle
        } else {
            EntityState::Engaged
        };
        params::write_dock(&mut self.host, key.element, scale);
    }
}
