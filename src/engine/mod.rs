//! The engine: entity side table, global input broadcaster and
//! relaxation runs, split across submodules by concern.

mod accessors;
mod broadcast;
mod lifecycle;
pub mod params;
mod tracking;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use web_time::Instant;

pub use self::lifecycle::Registration;
use self::lifecycle::{compile_rules, CompiledRule};
use crate::animation::{FrameHandle, FrameScheduler, QueuedScheduler};
use crate::entity::{Entity, EntityKey};
use crate::options::Options;
use crate::scene::{
    Decoration, DecorationId, ListenerKind, PointerSample, SceneHost,
};
use crate::util::throttle::Throttle;

/// What a scheduled frame callback is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameTarget {
    /// One relaxation step of an entity.
    Entity(EntityKey),
    /// Trailing delivery of a coalesced pointer sample.
    Broadcast,
    /// Removal of expired ripples.
    Sweep,
}

/// The pointer-reactive transform engine.
///
/// Owns the entity side table, the global input broadcaster and every
/// in-flight relaxation. All interaction with the outside world goes
/// through the host `H` (geometry, queries, parameter writes) and the
/// frame scheduler `S`. The engine is driven entirely by `&mut self`
/// callbacks:
///
/// - [`pointer_moved`](Self::pointer_moved) for scene-wide pointer samples
/// - [`handle_local`](Self::handle_local) for element-local events
/// - [`on_frame`](Self::on_frame) when a scheduled frame fires
/// - [`scene_changed`](Self::scene_changed) for subtree additions/removals
///
/// Nothing here panics or returns errors into the host; faults are logged
/// and the affected entity or selector is skipped.
pub struct Engine<H, S> {
    pub(crate) host: H,
    pub(crate) scheduler: S,
    pub(crate) options: Options,
    rules: Vec<CompiledRule>,
    pub(crate) entities: FxHashMap<EntityKey, Entity>,
    frames: FxHashMap<FrameHandle, FrameTarget>,
    /// Latest scene-wide pointer sample.
    pointer: PointerSample,
    throttle: Throttle,
    broadcast_frame: Option<FrameHandle>,
    sweep_frame: Option<FrameHandle>,
    spotlight: Option<DecorationId>,
    rng: SmallRng,
    /// `start` was called and `shutdown` was not.
    started: bool,
    /// Listeners are wired and writes happen.
    active: bool,
    pointer_listening: bool,
    observe_requested: bool,
    observing: bool,
}

impl<H: SceneHost, S: FrameScheduler> Engine<H, S> {
    /// Create an idle engine. Nothing is wired until [`start`](Self::start).
    ///
    /// Invalid selectors are logged and skipped here, once.
    pub fn new(host: H, scheduler: S, options: Options) -> Self {
        let rules = compile_rules(&options);
        let throttle = Throttle::new(options.general.throttle());
        let rng = seeded_rng(options.general.particle_seed);
        Self {
            host,
            scheduler,
            options,
            rules,
            entities: FxHashMap::default(),
            frames: FxHashMap::default(),
            pointer: PointerSample::FAR_AWAY,
            throttle,
            broadcast_frame: None,
            sweep_frame: None,
            spotlight: None,
            rng,
            started: false,
            active: false,
            pointer_listening: false,
            observe_requested: false,
            observing: false,
        }
    }

    /// Wire the scene-wide pointer listener, inject the spotlight and
    /// register every matching element. A no-op under reduced motion.
    pub fn start(&mut self) {
        self.started = true;
        if !self.active {
            self.bring_up();
        }
    }

    /// Tear everything down: cancel every frame, detach every listener,
    /// remove every decoration and clear every parameter written.
    pub fn shutdown(&mut self) {
        self.started = false;
        self.observe_requested = false;
        if self.active {
            self.tear_down();
        }
    }

    /// Ask the host to report scene mutations to
    /// [`scene_changed`](Self::scene_changed). Remembered across
    /// reduced-motion toggles until [`shutdown`](Self::shutdown).
    pub fn observe(&mut self) {
        self.observe_requested = true;
        if self.active && !self.observing {
            let root = self.host.root();
            self.host.watch(root);
            self.observing = true;
        }
    }

    /// Switch reduced motion on or off at runtime. Turning it on tears the
    /// engine down; turning it off brings a started engine back up.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        if self.options.general.reduced_motion == reduced {
            return;
        }
        self.options.general.reduced_motion = reduced;
        if reduced {
            if self.active {
                self.tear_down();
            }
            log::info!("reduced motion on: effects disabled");
        } else if self.started {
            self.bring_up();
        }
    }

    /// Replace the options. A running engine is torn down and brought back
    /// up so selectors, families and listeners all follow the new values.
    pub fn set_options(&mut self, options: Options) {
        if self.active {
            self.tear_down();
        }
        self.rules = compile_rules(&options);
        self.throttle = Throttle::new(options.general.throttle());
        if options.general.particle_seed != self.options.general.particle_seed {
            self.rng = seeded_rng(options.general.particle_seed);
        }
        self.options = options;
        if self.started {
            self.bring_up();
        }
    }

    /// Deliver a fired frame callback. Stale or cancelled handles are
    /// ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, now: Instant) {
        let Some(target) = self.frames.remove(&handle) else {
            log::trace!("ignoring stale frame {}", handle.0);
            return;
        };
        match target {
            FrameTarget::Entity(key) => self.relax_frame(key, handle, now),
            FrameTarget::Broadcast => self.trailing_broadcast(now),
            FrameTarget::Sweep => {
                self.sweep_frame = None;
                self.sweep_ripples(now);
            }
        }
    }

    fn bring_up(&mut self) {
        if self.options.general.reduced_motion {
            log::info!("reduced motion: effects disabled");
            return;
        }
        self.active = true;
        let root = self.host.root();
        if self.wants_pointer() {
            self.host.listen(root, &[ListenerKind::Pointer]);
            self.pointer_listening = true;
        }
        if self.options.spotlight.enabled {
            let diameter = self.options.spotlight.diameter;
            self.spotlight = self
                .host
                .inject(root, &Decoration::Spotlight { diameter });
            params::write_spotlight(&mut self.host, root, None, 0.0);
        }
        let registered = self.discover(root);
        if self.observe_requested {
            self.host.watch(root);
            self.observing = true;
        }
        log::info!(
            "effects started: {registered} entities from {} selectors",
            self.rules.len()
        );
    }

    fn tear_down(&mut self) {
        let keys = self.sorted_keys();
        let count = keys.len();
        for key in keys {
            let _ = self.unregister_key(key);
        }

        let root = self.host.root();
        if self.pointer_listening {
            self.host.unlisten(root, &[ListenerKind::Pointer]);
            self.pointer_listening = false;
        }
        if let Some(id) = self.spotlight.take() {
            self.host.remove_decoration(id);
            params::clear_spotlight(&mut self.host, root);
        }
        if self.observing {
            self.host.unwatch();
            self.observing = false;
        }
        for handle in [self.broadcast_frame.take(), self.sweep_frame.take()]
            .into_iter()
            .flatten()
        {
            self.cancel_frame(handle);
        }
        self.pointer = PointerSample::FAR_AWAY;
        self.throttle.reset();
        self.active = false;
        log::info!("effects stopped: {count} entities torn down");
    }

    /// Whether any family listens to the scene-wide pointer.
    fn wants_pointer(&self) -> bool {
        let o = &self.options;
        (o.holographic.enabled && o.holographic.track_proximity)
            || o.spotlight.enabled
            || o.dock.enabled
    }

    fn schedule_frame(&mut self, target: FrameTarget) -> FrameHandle {
        let handle = self.scheduler.schedule();
        let _ = self.frames.insert(handle, target);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.scheduler.cancel(handle);
        let _ = self.frames.remove(&handle);
    }

    /// Snapshot of registered keys, in element then family order.
    fn sorted_keys(&self) -> Vec<EntityKey> {
        let mut keys: Vec<EntityKey> = self.entities.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl<H: SceneHost> Engine<H, QueuedScheduler> {
    /// Fire every frame queued so far at `now`. Frames scheduled while
    /// pumping wait for the next pump. Returns how many were delivered.
    pub fn pump_frame(&mut self, now: Instant) -> usize {
        let pending = self.scheduler.take_pending();
        let count = pending.len();
        for handle in pending {
            self.on_frame(handle, now);
        }
        count
    }
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}
