//! Shared fixture: a small blog page in a `MemoryScene`.

#![allow(dead_code)]

use holotilt::animation::QueuedScheduler;
use holotilt::entity::{EffectFamily, EntityState};
use holotilt::scene::memory::ElementSpec;
use holotilt::scene::{ElementHandle, MemoryScene, Rect, SceneQuery};
use holotilt::{Engine, Options};
use web_time::{Duration, Instant};

pub type TestEngine = Engine<MemoryScene, QueuedScheduler>;

/// Handles of the fixture's interesting elements.
pub struct Page {
    pub root: ElementHandle,
    /// `.recent-post-item` at (100, 100), 200×100.
    pub post: ElementHandle,
    /// `.article-sort-item` at (600, 100), 200×100.
    pub archive: ElementHandle,
    /// `a.social-share-icon` at (100, 600), 40×40.
    pub share: ElementHandle,
}

pub fn page_scene() -> (MemoryScene, Page) {
    let mut scene = MemoryScene::new(Rect::new(0.0, 0.0, 1280.0, 800.0));
    let root = scene.root();
    let post = scene.append(
        root,
        &ElementSpec::new("div")
            .class("recent-post-item")
            .rect(100.0, 100.0, 200.0, 100.0),
    );
    let archive = scene.append(
        root,
        &ElementSpec::new("div")
            .class("article-sort-item")
            .rect(600.0, 100.0, 200.0, 100.0),
    );
    let bar = scene.append(
        root,
        &ElementSpec::new("div")
            .class("social-share")
            .rect(100.0, 600.0, 200.0, 40.0),
    );
    let share = scene.append(
        bar,
        &ElementSpec::new("a")
            .class("social-share-icon")
            .rect(100.0, 600.0, 40.0, 40.0),
    );
    (
        scene,
        Page {
            root,
            post,
            archive,
            share,
        },
    )
}

/// Deterministic options.
pub fn options() -> Options {
    let mut options = Options::default();
    options.general.particle_seed = Some(7);
    options
}

/// Options with only the holographic family on.
pub fn holographic_only() -> Options {
    let mut options = options();
    options.magic_card.enabled = false;
    options.spotlight.enabled = false;
    options.dock.enabled = false;
    options
}

pub fn started(options: Options) -> (TestEngine, Page) {
    let (scene, page) = page_scene();
    let mut engine = Engine::new(scene, QueuedScheduler::new(), options);
    engine.start();
    (engine, page)
}

/// Fixed time origin plus a millisecond offset.
pub struct Clock(Instant);

impl Clock {
    pub fn new() -> Self {
        Self(Instant::now())
    }

    pub fn at(&self, ms: u64) -> Instant {
        self.0 + Duration::from_millis(ms)
    }
}

pub fn state(engine: &TestEngine, element: ElementHandle, family: EffectFamily) -> Option<EntityState> {
    engine.entity(element, family).map(|e| e.state())
}

pub fn number(engine: &TestEngine, element: ElementHandle, name: &str) -> f32 {
    engine
        .host()
        .number(element, name)
        .unwrap_or_else(|| panic!("parameter {name} not set"))
}

/// Pump 16 ms frames from `start_ms` until `family`'s entity on `element`
/// stops relaxing. Returns the time of the frame that finished it.
pub fn pump_until_rest(
    engine: &mut TestEngine,
    clock: &Clock,
    element: ElementHandle,
    family: EffectFamily,
    start_ms: u64,
    mut each: impl FnMut(&TestEngine),
) -> u64 {
    let mut t = start_ms;
    while state(engine, element, family) == Some(EntityState::Relaxing) {
        t += 16;
        assert!(t < start_ms + 5_000, "relaxation never finished");
        let _ = engine.pump_frame(clock.at(t));
        each(engine);
    }
    t
}
