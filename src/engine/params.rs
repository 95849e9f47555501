//! Named visual parameters and the per-family writers.
//!
//! A stylesheet consumes these names; the engine never renders anything
//! itself. Each family owns a disjoint prefix except the glow parameters,
//! which the magic-card border glow and the spotlight share.

use glam::Vec2;

use crate::entity::EffectFamily;
use crate::scene::{ElementHandle, ParamValue, StyleSink};
use crate::transform::VisualParameters;
use crate::util::interpolate::{percent_of, round3};

/// Pointer position, horizontal percent.
pub const HOLO_POINTER_X: &str = "--holo-pointer-x";
/// Pointer position, vertical percent.
pub const HOLO_POINTER_Y: &str = "--holo-pointer-y";
/// Glare focal point, horizontal percent.
pub const HOLO_BACKGROUND_X: &str = "--holo-background-x";
/// Glare focal point, vertical percent.
pub const HOLO_BACKGROUND_Y: &str = "--holo-background-y";
/// Normalized distance from the center.
pub const HOLO_POINTER_FROM_CENTER: &str = "--holo-pointer-from-center";
/// Vertical position as a fraction.
pub const HOLO_POINTER_FROM_TOP: &str = "--holo-pointer-from-top";
/// Horizontal position as a fraction.
pub const HOLO_POINTER_FROM_LEFT: &str = "--holo-pointer-from-left";
/// Consumed by the stylesheet as a vertical-axis rotation.
pub const HOLO_ROTATE_X: &str = "--holo-rotate-x";
/// Consumed by the stylesheet as a horizontal-axis rotation.
pub const HOLO_ROTATE_Y: &str = "--holo-rotate-y";
/// Glare opacity.
pub const HOLO_CARD_OPACITY: &str = "--holo-card-opacity";
/// 1 while engaged or relaxing.
pub const HOLO_ACTIVE: &str = "--holo-active";

/// Rotation around the horizontal axis.
pub const MAGIC_ROTATE_X: &str = "--magic-rotate-x";
/// Rotation around the vertical axis.
pub const MAGIC_ROTATE_Y: &str = "--magic-rotate-y";
/// Magnetic pull, horizontal.
pub const MAGIC_OFFSET_X: &str = "--magic-offset-x";
/// Magnetic pull, vertical.
pub const MAGIC_OFFSET_Y: &str = "--magic-offset-y";
/// Vertical lift.
pub const MAGIC_LIFT: &str = "--magic-lift";
/// 1 while hovered.
pub const MAGIC_HOVER: &str = "--magic-hover";

/// Glow focal point, horizontal percent.
pub const MAGIC_GLOW_X: &str = "--magic-glow-x";
/// Glow focal point, vertical percent.
pub const MAGIC_GLOW_Y: &str = "--magic-glow-y";
/// Inner glow color.
pub const MAGIC_GLOW_COLOR_1: &str = "--magic-glow-color-1";
/// Outer glow color.
pub const MAGIC_GLOW_COLOR_2: &str = "--magic-glow-color-2";
/// Glow radius.
pub const MAGIC_GLOW_RADIUS: &str = "--magic-glow-radius";

/// Spotlight center, horizontal pixels (written on the root).
pub const SPOTLIGHT_X: &str = "--magic-spotlight-x";
/// Spotlight center, vertical pixels (written on the root).
pub const SPOTLIGHT_Y: &str = "--magic-spotlight-y";
/// Spotlight opacity (written on the root).
pub const SPOTLIGHT_OPACITY: &str = "--magic-spotlight-opacity";

/// Dock magnification.
pub const DOCK_SCALE: &str = "--dock-scale";

const HOLO_PARAMS: &[&str] = &[
    HOLO_POINTER_X,
    HOLO_POINTER_Y,
    HOLO_BACKGROUND_X,
    HOLO_BACKGROUND_Y,
    HOLO_POINTER_FROM_CENTER,
    HOLO_POINTER_FROM_TOP,
    HOLO_POINTER_FROM_LEFT,
    HOLO_ROTATE_X,
    HOLO_ROTATE_Y,
    HOLO_CARD_OPACITY,
    HOLO_ACTIVE,
];

const MAGIC_PARAMS: &[&str] = &[
    MAGIC_ROTATE_X,
    MAGIC_ROTATE_Y,
    MAGIC_OFFSET_X,
    MAGIC_OFFSET_Y,
    MAGIC_LIFT,
    MAGIC_HOVER,
    MAGIC_GLOW_X,
    MAGIC_GLOW_Y,
    MAGIC_GLOW_COLOR_1,
    MAGIC_GLOW_COLOR_2,
    MAGIC_GLOW_RADIUS,
];

const GLOW_PARAMS: &[&str] = &[
    MAGIC_GLOW_X,
    MAGIC_GLOW_Y,
    MAGIC_GLOW_COLOR_1,
    MAGIC_GLOW_COLOR_2,
    MAGIC_GLOW_RADIUS,
];

const SPOTLIGHT_PARAMS: &[&str] = &[SPOTLIGHT_X, SPOTLIGHT_Y, SPOTLIGHT_OPACITY];

/// Every parameter name a family may write on its entities.
#[must_use]
pub fn family_params(family: EffectFamily) -> &'static [&'static str] {
    match family {
        EffectFamily::Holographic => HOLO_PARAMS,
        EffectFamily::MagicCard => MAGIC_PARAMS,
        EffectFamily::Spotlight => GLOW_PARAMS,
        EffectFamily::Dock => &[DOCK_SCALE],
    }
}

/// Holographic parameter set. Rotations are written crosswise: the
/// stylesheet feeds `--holo-rotate-x` into a vertical-axis rotation.
pub(crate) fn write_holographic<S: StyleSink + ?Sized>(
    sink: &mut S,
    element: ElementHandle,
    params: &VisualParameters,
) {
    let px = params.pointer_percent_x;
    let py = params.pointer_percent_y;
    sink.set_parameter(element, HOLO_POINTER_X, ParamValue::Percent(px));
    sink.set_parameter(element, HOLO_POINTER_Y, ParamValue::Percent(py));
    sink.set_parameter(element, HOLO_BACKGROUND_X, ParamValue::Percent(params.glow_x));
    sink.set_parameter(element, HOLO_BACKGROUND_Y, ParamValue::Percent(params.glow_y));
    sink.set_parameter(
        element,
        HOLO_POINTER_FROM_CENTER,
        ParamValue::Number(params.pointer_from_center),
    );
    sink.set_parameter(element, HOLO_POINTER_FROM_TOP, ParamValue::Number(py / 100.0));
    sink.set_parameter(element, HOLO_POINTER_FROM_LEFT, ParamValue::Number(px / 100.0));
    sink.set_parameter(element, HOLO_ROTATE_X, ParamValue::Degrees(params.rotate_y_deg));
    sink.set_parameter(element, HOLO_ROTATE_Y, ParamValue::Degrees(params.rotate_x_deg));
    sink.set_parameter(
        element,
        HOLO_CARD_OPACITY,
        ParamValue::Number(params.glow_intensity),
    );
}

pub(crate) fn write_holo_active<S: StyleSink + ?Sized>(
    sink: &mut S,
    element: ElementHandle,
    active: bool,
) {
    let flag = if active { 1.0 } else { 0.0 };
    sink.set_parameter(element, HOLO_ACTIVE, ParamValue::Number(flag));
    sink.set_parameter(element, HOLO_CARD_OPACITY, ParamValue::Number(flag));
}

/// Magic-card tilt and pull. `lift` is the signed vertical lift in pixels.
pub(crate) fn write_magic_tilt<S: StyleSink + ?Sized>(
    sink: &mut S,
    element: ElementHandle,
    params: &VisualParameters,
    lift: f32,
) {
    sink.set_parameter(element, MAGIC_ROTATE_X, ParamValue::Degrees(params.rotate_x_deg));
    sink.set_parameter(element, MAGIC_ROTATE_Y, ParamValue::Degrees(params.rotate_y_deg));
    sink.set_parameter(element, MAGIC_OFFSET_X, ParamValue::Pixels(params.magnet_offset_x));
    sink.set_parameter(element, MAGIC_OFFSET_Y, ParamValue::Pixels(params.magnet_offset_y));
    sink.set_parameter(element, MAGIC_LIFT, ParamValue::Pixels(lift));
}

pub(crate) fn write_magic_hover<S: StyleSink + ?Sized>(
    sink: &mut S,
    element: ElementHandle,
    hovered: bool,
    lift: f32,
) {
    let flag = if hovered { 1.0 } else { 0.0 };
    sink.set_parameter(element, MAGIC_HOVER, ParamValue::Number(flag));
    sink.set_parameter(element, MAGIC_LIFT, ParamValue::Pixels(lift));
}

/// Glow look shared by the spotlight and the magic-card border glow.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GlowStyle {
    pub(crate) color: [u8; 3],
    pub(crate) radius: f32,
}

/// Glow focal point as clamped percentages of a box of `size`.
pub(crate) fn glow_focus(offset: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(percent_of(offset.x, size.x), percent_of(offset.y, size.y))
}

pub(crate) fn write_glow<S: StyleSink + ?Sized>(
    sink: &mut S,
    element: ElementHandle,
    focus: Vec2,
    intensity: f32,
    style: GlowStyle,
) {
    sink.set_parameter(element, MAGIC_GLOW_X, ParamValue::Percent(focus.x));
    sink.set_parameter(element, MAGIC_GLOW_Y, ParamValue::Percent(focus.y));
    sink.set_parameter(
        element,
        MAGIC_GLOW_COLOR_1,
        ParamValue::Rgba {
            rgb: style.color,
            alpha: intensity * 0.8,
        },
    );
    sink.set_parameter(
        element,
        MAGIC_GLOW_COLOR_2,
        ParamValue::Rgba {
            rgb: style.color,
            alpha: intensity * 0.4,
        },
    );
    sink.set_parameter(element, MAGIC_GLOW_RADIUS, ParamValue::Pixels(style.radius));
}

pub(crate) fn write_dock<S: StyleSink + ?Sized>(
    sink: &mut S,
    element: ElementHandle,
    scale: f32,
) {
    sink.set_parameter(element, DOCK_SCALE, ParamValue::Number(round3(scale)));
}

pub(crate) fn write_spotlight<S: StyleSink + ?Sized>(
    sink: &mut S,
    root: ElementHandle,
    position: Option<Vec2>,
    opacity: f32,
) {
    if let Some(p) = position {
        sink.set_parameter(root, SPOTLIGHT_X, ParamValue::Pixels(p.x));
        sink.set_parameter(root, SPOTLIGHT_Y, ParamValue::Pixels(p.y));
    }
    sink.set_parameter(root, SPOTLIGHT_OPACITY, ParamValue::Number(opacity));
}

pub(crate) fn clear_spotlight<S: StyleSink + ?Sized>(sink: &mut S, root: ElementHandle) {
    for &name in SPOTLIGHT_PARAMS {
        sink.clear_parameter(root, name);
    }
}

/// Clear `family`'s parameters on `element`, except names that one of
/// `remaining` (families still registered there) also writes.
pub(crate) fn clear_family<S: StyleSink + ?Sized>(
    sink: &mut S,
    element: ElementHandle,
    family: EffectFamily,
    remaining: &[EffectFamily],
) {
    let shared = |name: &str| {
        remaining
            .iter()
            .any(|&other| other != family && family_params(other).iter().any(|n| *n == name))
    };
    for &name in family_params(family) {
        if !shared(name) {
            sink.clear_parameter(element, name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MemoryScene, Rect, SceneQuery};
    use crate::transform::{TiltDivisors, TransformModel};

    fn scene() -> MemoryScene {
        MemoryScene::new(Rect::new(0.0, 0.0, 800.0, 600.0))
    }

    #[test]
    fn holographic_rotations_are_written_crosswise() {
        let mut scene = scene();
        let root = scene.root();
        let model = TransformModel::holographic(TiltDivisors::STANDARD, [35.0, 65.0]);
        let params = model.compute(Vec2::ZERO, Vec2::new(200.0, 100.0), 1.0);
        write_holographic(&mut scene, root, &params);
        assert_eq!(scene.number(root, HOLO_ROTATE_X), Some(-6.25));
        assert_eq!(scene.number(root, HOLO_ROTATE_Y), Some(-8.333));
        assert_eq!(scene.number(root, HOLO_POINTER_FROM_LEFT), Some(0.0));
        assert_eq!(scene.number(root, HOLO_BACKGROUND_X), Some(35.0));
    }

    #[test]
    fn glow_alphas_scale_with_intensity() {
        let mut scene = scene();
        let root = scene.root();
        let style = GlowStyle {
            color: [255, 0, 255],
            radius: 300.0,
        };
        write_glow(&mut scene, root, Vec2::new(25.0, 75.0), 0.5, style);
        assert_eq!(scene.number(root, MAGIC_GLOW_COLOR_1), Some(0.4));
        assert_eq!(scene.number(root, MAGIC_GLOW_COLOR_2), Some(0.2));
        assert_eq!(
            scene.parameter(root, MAGIC_GLOW_RADIUS).map(|v| v.to_string()),
            Some("300px".to_owned())
        );
    }

    #[test]
    fn dock_scale_is_rounded() {
        let mut scene = scene();
        let root = scene.root();
        write_dock(&mut scene, root, 1.234_567);
        assert_eq!(scene.number(root, DOCK_SCALE), Some(1.235));
    }

    #[test]
    fn clear_family_removes_only_that_family() {
        let mut scene = scene();
        let root = scene.root();
        write_dock(&mut scene, root, 1.2);
        write_holo_active(&mut scene, root, true);
        clear_family(&mut scene, root, EffectFamily::Holographic, &[]);
        assert!(scene.parameter(root, HOLO_ACTIVE).is_none());
        assert!(scene.parameter(root, DOCK_SCALE).is_some());
    }

    #[test]
    fn clear_family_keeps_names_a_remaining_family_writes() {
        let mut scene = scene();
        let root = scene.root();
        scene.set_parameter(root, MAGIC_GLOW_X, ParamValue::Percent(40.0));
        scene.set_parameter(root, MAGIC_LIFT, ParamValue::Pixels(-2.0));
        clear_family(&mut scene, root, EffectFamily::Spotlight, &[EffectFamily::MagicCard]);
        assert!(scene.parameter(root, MAGIC_GLOW_X).is_some());

        clear_family(&mut scene, root, EffectFamily::MagicCard, &[EffectFamily::Spotlight]);
        assert!(scene.parameter(root, MAGIC_GLOW_X).is_some());
        assert!(scene.parameter(root, MAGIC_LIFT).is_none());
    }

    #[test]
    fn glow_focus_clamps() {
        let f = glow_focus(Vec2::new(-20.0, 150.0), Vec2::new(100.0, 100.0));
        assert_eq!(f, Vec2::new(0.0, 100.0));
    }
}
