//! Headless simulation: replays a pointer trace over a JSON scene and logs
//! what the engine wrote.
//!
//! ```text
//! holotilt <scene.json> <trace.json> [options.toml]
//! ```

use std::path::Path;

use glam::Vec2;
use holotilt::animation::QueuedScheduler;
use holotilt::input::{LocalEvent, PointerTrace};
use holotilt::scene::{ElementHandle, MemoryScene, PointerSample, SceneQuery};
use holotilt::{EffectError, Engine, Options};
use web_time::{Duration, Instant};

type SimEngine = Engine<MemoryScene, QueuedScheduler>;

/// One simulated display frame.
const FRAME: Duration = Duration::from_millis(16);
/// How long to keep pumping frames after the pointer leaves.
const SETTLE: Duration = Duration::from_millis(1000);

fn read(path: &str) -> Result<String, EffectError> {
    std::fs::read_to_string(path).map_err(EffectError::Io)
}

/// The hit element and its ancestors, root excluded; what a browser would
/// consider hovered.
fn hover_chain(scene: &MemoryScene, point: Vec2) -> Vec<ElementHandle> {
    let mut chain = Vec::new();
    let mut cursor = scene.hit_test(point);
    while let Some(element) = cursor {
        if element == scene.root() {
            break;
        }
        chain.push(element);
        cursor = scene.parent(element);
    }
    chain
}

/// Feed one sample: the broadcaster always, then enter/move/leave for the
/// elements the pointer crossed.
fn deliver(engine: &mut SimEngine, hovered: &mut Vec<ElementHandle>, point: Vec2, now: Instant) {
    engine.pointer_moved(PointerSample::from(point), now);

    let chain = hover_chain(engine.host(), point);
    let (x, y) = (point.x, point.y);
    for &element in hovered.iter().filter(|e| !chain.contains(e)) {
        engine.handle_local(element, LocalEvent::PointerLeave { x, y }, now);
    }
    for &element in chain.iter().rev() {
        if !hovered.contains(&element) {
            engine.handle_local(element, LocalEvent::PointerEnter { x, y }, now);
        }
        engine.handle_local(element, LocalEvent::PointerMove { x, y }, now);
    }
    *hovered = chain;
}

fn leave(engine: &mut SimEngine, hovered: &mut Vec<ElementHandle>, now: Instant) {
    for element in hovered.drain(..) {
        engine.handle_local(
            element,
            LocalEvent::PointerLeave {
                x: f32::INFINITY,
                y: f32::INFINITY,
            },
            now,
        );
    }
    engine.pointer_left(now);
}

fn report(engine: &SimEngine) {
    let mut entities: Vec<_> = engine.entities().collect();
    entities.sort_by_key(|e| e.key());
    for entity in entities {
        log::info!(
            "element {} {}: {:?}",
            entity.element().0,
            entity.family().name(),
            entity.state()
        );
    }
    let root = engine.host().root();
    let mut elements: Vec<ElementHandle> = engine.entities().map(|e| e.element()).collect();
    elements.push(root);
    elements.sort_unstable();
    elements.dedup();
    for element in elements {
        for (name, value) in engine.host().parameters(element) {
            log::info!("  element {} {name} = {value}", element.0);
        }
    }
}

fn run(scene_path: &str, trace_path: &str, options_path: Option<&str>) -> Result<(), EffectError> {
    let scene = MemoryScene::from_json(&read(scene_path)?)?;
    let trace = PointerTrace::from_json(&read(trace_path)?)?;
    let options = match options_path {
        Some(path) => Options::load(Path::new(path))?,
        None => Options::default(),
    };

    let mut engine = Engine::new(scene, QueuedScheduler::new(), options);
    engine.start();

    let origin = Instant::now();
    let mut hovered = Vec::new();
    let mut frame_start = Duration::ZERO;
    let mut frames = 0;

    while frame_start <= trace.duration() {
        let frame_end = frame_start + FRAME;
        for sample in trace.window(frame_start, frame_end) {
            let point = sample.sample().position();
            deliver(&mut engine, &mut hovered, point, origin + sample.at());
        }
        frames += engine.pump_frame(origin + frame_end);
        frame_start = frame_end;
    }

    leave(&mut engine, &mut hovered, origin + frame_start);
    let settle_end = frame_start + SETTLE;
    while frame_start < settle_end {
        frame_start += FRAME;
        frames += engine.pump_frame(origin + frame_start);
    }

    log::info!(
        "replayed {} samples over {} ms: {frames} frame callbacks, {} writes",
        trace.samples().len(),
        trace.duration().as_millis(),
        engine.host().write_count()
    );
    report(&engine);
    engine.shutdown();
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (Some(scene), Some(trace)) = (args.first(), args.get(1)) else {
        log::error!("Usage: holotilt <scene.json> <trace.json> [options.toml]");
        std::process::exit(1);
    };
    if let Err(e) = run(scene, trace, args.get(2).map(String::as_str)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
