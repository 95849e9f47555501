//! Integration tests for magic cards: smoothed tilt and pull, lift,
//! border glow, particles and click ripples.

mod common;

use common::{number, options, pump_until_rest, started, state, Clock, TestEngine};
use holotilt::engine::params::{
    MAGIC_GLOW_COLOR_1, MAGIC_GLOW_X, MAGIC_HOVER, MAGIC_LIFT, MAGIC_OFFSET_X, MAGIC_ROTATE_X,
    MAGIC_ROTATE_Y,
};
use holotilt::entity::{EffectFamily, EntityState};
use holotilt::input::LocalEvent;
use holotilt::scene::{Decoration, ElementHandle};

const MAGIC: EffectFamily = EffectFamily::MagicCard;

fn particles(engine: &TestEngine, element: ElementHandle) -> Vec<Decoration> {
    engine
        .host()
        .decorations(element)
        .into_iter()
        .filter(|d| matches!(d, Decoration::Particle { .. }))
        .cloned()
        .collect()
}

fn ripples(engine: &TestEngine, element: ElementHandle) -> Vec<Decoration> {
    engine
        .host()
        .decorations(element)
        .into_iter()
        .filter(|d| matches!(d, Decoration::Ripple { .. }))
        .cloned()
        .collect()
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn enter_lifts_and_spawns_staggered_particles() {
    let (mut engine, page) = started(options());
    let clock = Clock::new();
    engine.handle_local(
        page.post,
        LocalEvent::PointerEnter { x: 200.0, y: 150.0 },
        clock.at(0),
    );

    assert_eq!(state(&engine, page.post, MAGIC), Some(EntityState::Engaged));
    assert_eq!(number(&engine, page.post, MAGIC_HOVER), 1.0);
    assert_eq!(number(&engine, page.post, MAGIC_LIFT), -2.0);

    let spawned = particles(&engine, page.post);
    assert_eq!(spawned.len(), 12);
    let mut delays: Vec<u32> = spawned
        .iter()
        .filter_map(|d| match d {
            Decoration::Particle {
                x,
                y,
                size,
                delay_ms,
            } => {
                assert!((0.0..=200.0).contains(x));
                assert!((0.0..=100.0).contains(y));
                assert_eq!(*size, 4.0);
                Some(*delay_ms)
            }
            _ => None,
        })
        .collect();
    delays.sort_unstable();
    assert_eq!(delays, (0..12).map(|i| i * 100).collect::<Vec<_>>());
}

#[test]
fn moves_are_smoothed_toward_the_pointer() {
    let (mut engine, page) = started(options());
    let clock = Clock::new();
    engine.handle_local(
        page.post,
        LocalEvent::PointerEnter { x: 200.0, y: 150.0 },
        clock.at(0),
    );
    // right edge, vertically centered
    engine.handle_local(
        page.post,
        LocalEvent::PointerMove { x: 300.0, y: 150.0 },
        clock.at(16),
    );

    assert_close(number(&engine, page.post, MAGIC_ROTATE_X), -1.0);
    assert_close(number(&engine, page.post, MAGIC_ROTATE_Y), 0.0);
    assert_close(number(&engine, page.post, MAGIC_OFFSET_X), 0.5);
    assert_eq!(number(&engine, page.post, MAGIC_LIFT), -2.0);
    // border glow follows the raw pointer
    assert_eq!(number(&engine, page.post, MAGIC_GLOW_X), 100.0);
    assert_close(number(&engine, page.post, MAGIC_GLOW_COLOR_1), 0.8);

    let mut previous = -1.0;
    for t in [32, 48, 64, 80] {
        engine.handle_local(
            page.post,
            LocalEvent::PointerMove { x: 300.0, y: 150.0 },
            clock.at(t),
        );
        let rx = number(&engine, page.post, MAGIC_ROTATE_X);
        assert!(rx < previous && rx >= -10.0);
        previous = rx;
    }
}

#[test]
fn toggles_switch_off_tilt_and_pull() {
    let mut options = options();
    options.magic_card.enable_tilt = false;
    options.magic_card.enable_magnetism = false;
    options.magic_card.border_glow = false;
    let (mut engine, page) = started(options);
    let clock = Clock::new();
    engine.handle_local(
        page.post,
        LocalEvent::PointerMove { x: 300.0, y: 200.0 },
        clock.at(0),
    );

    assert_eq!(number(&engine, page.post, MAGIC_ROTATE_X), 0.0);
    assert_eq!(number(&engine, page.post, MAGIC_OFFSET_X), 0.0);
    assert_eq!(number(&engine, page.post, MAGIC_HOVER), 1.0);
    assert!(engine.host().parameter(page.post, MAGIC_GLOW_X).is_none());
}

#[test]
fn leave_clears_particles_and_relaxes() {
    let (mut engine, page) = started(options());
    let clock = Clock::new();
    engine.handle_local(
        page.post,
        LocalEvent::PointerEnter { x: 300.0, y: 200.0 },
        clock.at(0),
    );
    engine.handle_local(
        page.post,
        LocalEvent::PointerMove { x: 300.0, y: 200.0 },
        clock.at(16),
    );
    engine.handle_local(
        page.post,
        LocalEvent::PointerLeave { x: 301.0, y: 200.0 },
        clock.at(32),
    );

    assert!(particles(&engine, page.post).is_empty());
    assert_eq!(number(&engine, page.post, MAGIC_HOVER), 0.0);
    assert_eq!(number(&engine, page.post, MAGIC_LIFT), 0.0);
    assert_eq!(state(&engine, page.post, MAGIC), Some(EntityState::Relaxing));

    let end = pump_until_rest(&mut engine, &clock, page.post, MAGIC, 32, |engine| {
        assert_eq!(number(engine, page.post, MAGIC_LIFT), 0.0);
    });
    assert!(end <= 32 + 316);
    assert_eq!(number(&engine, page.post, MAGIC_ROTATE_X), 0.0);
    assert_eq!(number(&engine, page.post, MAGIC_OFFSET_X), 0.0);
}

#[test]
fn click_ripple_reaches_farthest_corner_and_expires() {
    let (mut engine, page) = started(options());
    let clock = Clock::new();
    engine.handle_local(
        page.post,
        LocalEvent::Click { x: 100.0, y: 100.0 },
        clock.at(0),
    );

    let spawned = ripples(&engine, page.post);
    assert_eq!(spawned.len(), 1);
    let Decoration::Ripple {
        x,
        y,
        radius,
        duration_ms,
    } = spawned[0]
    else {
        unreachable!();
    };
    assert_eq!((x, y), (0.0, 0.0));
    assert!((radius - 223.607).abs() < 1e-3);
    assert_eq!(duration_ms, 800);

    let mut t = 0;
    while t < 784 {
        t += 16;
        let _ = engine.pump_frame(clock.at(t));
    }
    assert_eq!(ripples(&engine, page.post).len(), 1);
    let _ = engine.pump_frame(clock.at(800));
    assert!(ripples(&engine, page.post).is_empty());
    assert_eq!(engine.pending_frames(), 0);
}

#[test]
fn disabled_decorations_spawn_nothing() {
    let mut options = options();
    options.magic_card.particles.enabled = false;
    options.magic_card.ripple.enabled = false;
    let (mut engine, page) = started(options);
    let clock = Clock::new();
    engine.handle_local(
        page.post,
        LocalEvent::PointerEnter { x: 200.0, y: 150.0 },
        clock.at(0),
    );
    engine.handle_local(
        page.post,
        LocalEvent::Click { x: 200.0, y: 150.0 },
        clock.at(10),
    );

    assert!(particles(&engine, page.post).is_empty());
    assert!(ripples(&engine, page.post).is_empty());
}

#[test]
fn particle_layout_follows_the_seed() {
    let clock = Clock::new();
    let spawn = || {
        let (mut engine, page) = started(options());
        engine.handle_local(
            page.post,
            LocalEvent::PointerEnter { x: 200.0, y: 150.0 },
            clock.at(0),
        );
        let mut layout = particles(&engine, page.post);
        layout.sort_by_key(|d| match d {
            Decoration::Particle { delay_ms, .. } => *delay_ms,
            _ => 0,
        });
        layout
    };
    assert_eq!(spawn(), spawn());
}
