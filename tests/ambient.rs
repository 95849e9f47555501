//! Integration tests for the global pointer broadcaster: throttling,
//! the spotlight and dock magnification.

mod common;

use common::{number, options, started, state, Clock};
use holotilt::engine::params::{
    DOCK_SCALE, MAGIC_GLOW_COLOR_1, MAGIC_GLOW_RADIUS, SPOTLIGHT_OPACITY, SPOTLIGHT_X, SPOTLIGHT_Y,
};
use holotilt::entity::{EffectFamily, EntityState};
use holotilt::scene::{Decoration, ListenerKind, PointerSample};
use holotilt::Options;

fn dock_only() -> Options {
    let mut options = options();
    options.holographic.enabled = false;
    options.magic_card.enabled = false;
    options.spotlight.enabled = false;
    options
}

#[test]
fn one_scene_wide_listener() {
    let (engine, page) = started(options());
    assert_eq!(engine.host().listeners(page.root), &[ListenerKind::Pointer]);
    assert!(engine.host().listeners(page.share).is_empty());
}

#[test]
fn dock_scales_by_distance_to_center() {
    let (mut engine, page) = started(options());
    let clock = Clock::new();
    assert_eq!(number(&engine, page.share, DOCK_SCALE), 1.0);

    engine.pointer_moved(PointerSample::new(120.0, 620.0), clock.at(0));
    assert_eq!(number(&engine, page.share, DOCK_SCALE), 1.5);
    assert_eq!(
        state(&engine, page.share, EffectFamily::Dock),
        Some(EntityState::Engaged)
    );

    engine.pointer_moved(PointerSample::new(170.0, 620.0), clock.at(20));
    assert_eq!(number(&engine, page.share, DOCK_SCALE), 1.25);

    engine.pointer_moved(PointerSample::new(1000.0, 100.0), clock.at(40));
    assert_eq!(number(&engine, page.share, DOCK_SCALE), 1.0);
    assert_eq!(
        state(&engine, page.share, EffectFamily::Dock),
        Some(EntityState::Idle)
    );
}

#[test]
fn samples_inside_a_window_are_coalesced() {
    let (mut engine, page) = started(dock_only());
    let clock = Clock::new();
    engine.pointer_moved(PointerSample::new(120.0, 620.0), clock.at(0));
    assert_eq!(number(&engine, page.share, DOCK_SCALE), 1.5);

    engine.pointer_moved(PointerSample::new(170.0, 620.0), clock.at(5));
    engine.pointer_moved(PointerSample::new(145.0, 620.0), clock.at(10));
    // nothing delivered yet, one trailing frame queued
    assert_eq!(number(&engine, page.share, DOCK_SCALE), 1.5);
    assert_eq!(engine.pending_frames(), 1);

    assert_eq!(engine.pump_frame(clock.at(16)), 1);
    assert_eq!(number(&engine, page.share, DOCK_SCALE), 1.375);
    assert_eq!(engine.pending_frames(), 0);
}

#[test]
fn unchanged_dock_scale_is_not_rewritten() {
    let (mut engine, _page) = started(dock_only());
    let clock = Clock::new();
    engine.pointer_moved(PointerSample::new(120.0, 620.0), clock.at(0));
    let writes = engine.host().write_count();
    engine.pointer_moved(PointerSample::new(120.0, 620.0), clock.at(20));
    engine.pointer_moved(PointerSample::new(120.0, 620.0), clock.at(40));
    assert_eq!(engine.host().write_count(), writes);
}

#[test]
fn spotlight_follows_pointer_and_lights_nearby_cards() {
    let (mut engine, page) = started(options());
    let clock = Clock::new();
    assert!(engine
        .host()
        .decorations(page.root)
        .contains(&&Decoration::Spotlight { diameter: 800.0 }));
    assert_eq!(number(&engine, page.root, SPOTLIGHT_OPACITY), 0.0);

    engine.pointer_moved(PointerSample::new(200.0, 150.0), clock.at(0));
    assert_eq!(number(&engine, page.root, SPOTLIGHT_X), 200.0);
    assert_eq!(number(&engine, page.root, SPOTLIGHT_Y), 150.0);
    assert_eq!(number(&engine, page.root, SPOTLIGHT_OPACITY), 1.0);
    assert!((number(&engine, page.post, MAGIC_GLOW_COLOR_1) - 0.8).abs() < 1e-6);
    assert_eq!(number(&engine, page.post, MAGIC_GLOW_RADIUS), 300.0);

    engine.pointer_moved(PointerSample::new(1200.0, 700.0), clock.at(20));
    assert_eq!(number(&engine, page.root, SPOTLIGHT_OPACITY), 0.0);
    assert_eq!(number(&engine, page.post, MAGIC_GLOW_COLOR_1), 0.0);
    assert_eq!(
        state(&engine, page.post, EffectFamily::Spotlight),
        Some(EntityState::Idle)
    );
}

#[test]
fn pointer_leaving_the_scene_disengages_everything() {
    let (mut engine, page) = started(options());
    let clock = Clock::new();
    engine.pointer_moved(PointerSample::new(120.0, 600.0), clock.at(0));
    assert!(number(&engine, page.share, DOCK_SCALE) > 1.0);

    // inside the throttle window, still delivered at once
    engine.pointer_left(clock.at(4));
    assert_eq!(number(&engine, page.share, DOCK_SCALE), 1.0);
    assert_eq!(number(&engine, page.root, SPOTLIGHT_OPACITY), 0.0);
    assert_eq!(engine.pending_frames(), 0);
}

#[test]
fn disabled_ambient_families_skip_the_listener() {
    let mut options = options();
    options.holographic.track_proximity = false;
    options.spotlight.enabled = false;
    options.dock.enabled = false;
    let (engine, page) = started(options);
    assert!(engine.host().listeners(page.root).is_empty());
    assert!(engine.spotlight().is_none());
}
