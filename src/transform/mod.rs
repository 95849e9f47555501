//! The transform model: relative pointer offset → visual parameters.
//!
//! Everything here is pure and deterministic. The engine re-runs the model
//! on every pointer sample while an entity is engaged and on every frame of
//! a relaxation, feeding it an interpolated virtual offset, so rotation,
//! glow and magnetic offset always stay consistent with one another.

pub mod dock;
pub mod proximity;

use glam::Vec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use dock::DockScale;
pub use proximity::{Engagement, ProximityPolicy};

use crate::util::interpolate::{clamp, percent_of, remap, round3};

/// Tilt divisors: how many percent of center offset make one degree.
///
/// `x` divides the vertical offset into the rotation around the horizontal
/// axis; `y` divides the horizontal offset into the rotation around the
/// vertical axis. Larger divisors mean gentler tilt.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
pub struct TiltDivisors {
    /// Divisor for the horizontal-axis rotation.
    pub x: f32,
    /// Divisor for the vertical-axis rotation.
    pub y: f32,
}

impl TiltDivisors {
    /// Standard panels.
    pub const STANDARD: Self = Self { x: 6.0, y: 8.0 };
    /// Reduced-tilt panels (archive list rows).
    pub const REDUCED: Self = Self { x: 10.0, y: 12.0 };
}

/// How center offsets turn into rotation angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TiltTuning {
    /// Holographic cards: `round3(center / divisor)`, with the vertical
    /// offset driving the horizontal-axis rotation and vice versa.
    Divisors(TiltDivisors),
    /// Magic cards: the offset as a fraction of the half-extent, scaled to
    /// `max_deg`. The horizontal offset tilts around the horizontal axis
    /// with inverted sign.
    Strength {
        /// Angle at the extreme edge.
        max_deg: f32,
    },
}

impl TiltTuning {
    /// Largest rotation magnitude this tuning can produce.
    #[must_use]
    pub fn max_rotation(&self) -> f32 {
        match *self {
            Self::Divisors(d) => 50.0 / d.x.abs().min(d.y.abs()).max(f32::EPSILON),
            Self::Strength { max_deg } => max_deg.abs(),
        }
    }

    fn rotations(&self, center: Vec2) -> (f32, f32) {
        match *self {
            Self::Divisors(d) => (
                round3(guarded_div(center.y, d.x)),
                round3(guarded_div(center.x, d.y)),
            ),
            Self::Strength { max_deg } => (
                -(center.x / 50.0) * max_deg,
                (center.y / 50.0) * max_deg,
            ),
        }
    }
}

fn guarded_div(num: f32, den: f32) -> f32 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Derived visual parameters for one entity at one instant.
///
/// Fields are always produced together by [`TransformModel::compute`] (or
/// one of the family-specific constructors) and never mutated
/// independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualParameters {
    /// Pointer position as a percentage of width, in [0, 100].
    pub pointer_percent_x: f32,
    /// Pointer position as a percentage of height, in [0, 100].
    pub pointer_percent_y: f32,
    /// Normalized distance from the center, in [0, 1].
    pub pointer_from_center: f32,
    /// Rotation around the horizontal axis, in degrees.
    pub rotate_x_deg: f32,
    /// Rotation around the vertical axis, in degrees.
    pub rotate_y_deg: f32,
    /// Glow focal point, horizontal percent.
    pub glow_x: f32,
    /// Glow focal point, vertical percent.
    pub glow_y: f32,
    /// Glow intensity in [0, 1].
    pub glow_intensity: f32,
    /// Magnetic pull, horizontal pixels.
    pub magnet_offset_x: f32,
    /// Magnetic pull, vertical pixels.
    pub magnet_offset_y: f32,
    /// Uniform scale factor.
    pub scale: f32,
}

impl VisualParameters {
    /// The rest parameter set: centered, flat, dark, unscaled.
    pub const REST: Self = Self {
        pointer_percent_x: 50.0,
        pointer_percent_y: 50.0,
        pointer_from_center: 0.0,
        rotate_x_deg: 0.0,
        rotate_y_deg: 0.0,
        glow_x: 50.0,
        glow_y: 50.0,
        glow_intensity: 0.0,
        magnet_offset_x: 0.0,
        magnet_offset_y: 0.0,
        scale: 1.0,
    };

    /// Rest parameters with only the scale changed (dock buttons).
    #[must_use]
    pub fn scaled(scale: f32) -> Self {
        Self {
            scale,
            ..Self::REST
        }
    }

    /// Whether rotations, intensity and offsets are all at rest.
    #[must_use]
    pub fn is_rest(&self) -> bool {
        self.rotate_x_deg == 0.0
            && self.rotate_y_deg == 0.0
            && self.glow_intensity == 0.0
            && self.magnet_offset_x == 0.0
            && self.magnet_offset_y == 0.0
    }
}

impl Default for VisualParameters {
    fn default() -> Self {
        Self::REST
    }
}

/// Tuning for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformModel {
    /// Rotation tuning.
    pub tilt: TiltTuning,
    /// Band the glow focal point is remapped into, in percent.
    pub glow_band: [f32; 2],
    /// Fraction of the center offset applied as magnetic pull.
    pub magnet_strength: f32,
}

impl TransformModel {
    /// Holographic tuning with the given divisors.
    #[must_use]
    pub fn holographic(divisors: TiltDivisors, glow_band: [f32; 2]) -> Self {
        Self {
            tilt: TiltTuning::Divisors(divisors),
            glow_band,
            magnet_strength: 0.0,
        }
    }

    /// Magic-card tuning.
    #[must_use]
    pub fn magnetic(max_deg: f32, magnet_strength: f32) -> Self {
        Self {
            tilt: TiltTuning::Strength { max_deg },
            glow_band: [0.0, 100.0],
            magnet_strength,
        }
    }

    /// Compute parameters for a pointer `offset` relative to the top-left
    /// of a box of `size`.
    ///
    /// The offset need not lie inside the box; percentages are clamped.
    /// A zero dimension reports the midpoint on that axis.
    #[must_use]
    pub fn compute(&self, offset: Vec2, size: Vec2, intensity: f32) -> VisualParameters {
        let percent = Vec2::new(percent_of(offset.x, size.x), percent_of(offset.y, size.y));
        let center = percent - Vec2::splat(50.0);

        let [band_lo, band_hi] = self.glow_band;
        let glow = Vec2::new(
            round3(remap(percent.x, 0.0, 100.0, band_lo, band_hi)),
            round3(remap(percent.y, 0.0, 100.0, band_lo, band_hi)),
        );

        let (rotate_x_deg, rotate_y_deg) = self.tilt.rotations(center);
        let magnet = center / 100.0 * size.max(Vec2::ZERO) * self.magnet_strength;

        VisualParameters {
            pointer_percent_x: percent.x,
            pointer_percent_y: percent.y,
            pointer_from_center: clamp(center.length() / 50.0, 0.0, 1.0),
            rotate_x_deg,
            rotate_y_deg,
            glow_x: glow.x,
            glow_y: glow.y,
            glow_intensity: clamp(intensity, 0.0, 1.0),
            magnet_offset_x: magnet.x,
            magnet_offset_y: magnet.y,
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(200.0, 100.0);

    fn standard() -> TransformModel {
        TransformModel::holographic(TiltDivisors::STANDARD, [35.0, 65.0])
    }

    #[test]
    fn center_is_flat() {
        let p = standard().compute(Vec2::new(100.0, 50.0), SIZE, 1.0);
        assert_eq!(p.pointer_percent_x, 50.0);
        assert_eq!(p.pointer_percent_y, 50.0);
        assert_eq!(p.rotate_x_deg, 0.0);
        assert_eq!(p.rotate_y_deg, 0.0);
        assert_eq!(p.glow_x, 50.0);
        assert_eq!(p.pointer_from_center, 0.0);
    }

    #[test]
    fn top_left_corner_standard_divisors() {
        let p = standard().compute(Vec2::ZERO, SIZE, 1.0);
        assert_eq!(p.rotate_y_deg, -6.25);
        assert_eq!(p.rotate_x_deg, -8.333);
        assert_eq!(p.glow_x, 35.0);
        assert_eq!(p.glow_y, 35.0);
        assert_eq!(p.pointer_from_center, 1.0);
    }

    #[test]
    fn corner_symmetry_flips_both_signs() {
        let model = standard();
        let tl = model.compute(Vec2::ZERO, SIZE, 1.0);
        let br = model.compute(SIZE, SIZE, 1.0);
        assert!(tl.rotate_x_deg < 0.0 && br.rotate_x_deg > 0.0);
        assert!(tl.rotate_y_deg < 0.0 && br.rotate_y_deg > 0.0);
        assert_eq!(tl.rotate_x_deg, -br.rotate_x_deg);
        assert_eq!(tl.rotate_y_deg, -br.rotate_y_deg);
    }

    #[test]
    fn horizontal_offset_drives_vertical_axis() {
        // pointer at the right edge, vertically centered
        let p = standard().compute(Vec2::new(200.0, 50.0), SIZE, 1.0);
        assert_eq!(p.rotate_x_deg, 0.0);
        assert_eq!(p.rotate_y_deg, 6.25);
    }

    #[test]
    fn reduced_kind_tilts_less() {
        let reduced = TransformModel::holographic(TiltDivisors::REDUCED, [35.0, 65.0]);
        let a = standard().compute(Vec2::ZERO, SIZE, 1.0);
        let b = reduced.compute(Vec2::ZERO, SIZE, 1.0);
        assert!(b.rotate_x_deg.abs() < a.rotate_x_deg.abs());
        assert!(b.rotate_y_deg.abs() < a.rotate_y_deg.abs());
        assert_eq!(b.rotate_x_deg, -5.0);
        assert_eq!(b.rotate_y_deg, -4.167);
    }

    #[test]
    fn zero_size_reports_midpoint() {
        let p = standard().compute(Vec2::new(30.0, 30.0), Vec2::ZERO, 1.0);
        assert_eq!(p.pointer_percent_x, 50.0);
        assert_eq!(p.pointer_percent_y, 50.0);
        assert_eq!(p.rotate_x_deg, 0.0);
        assert!(p.magnet_offset_x.is_finite());
    }

    #[test]
    fn outputs_stay_in_domain_for_inside_offsets() {
        let model = standard();
        let max = model.tilt.max_rotation();
        for ix in 0..=20 {
            for iy in 0..=10 {
                let offset = Vec2::new(ix as f32 * 10.0, iy as f32 * 10.0);
                let p = model.compute(offset, SIZE, 1.0);
                assert!((0.0..=100.0).contains(&p.pointer_percent_x));
                assert!((0.0..=100.0).contains(&p.pointer_percent_y));
                assert!((0.0..=1.0).contains(&p.pointer_from_center));
                assert!(p.rotate_x_deg.abs() <= max + 1e-3);
                assert!(p.rotate_y_deg.abs() <= max + 1e-3);
            }
        }
    }

    #[test]
    fn outside_offsets_are_clamped() {
        let p = standard().compute(Vec2::new(-500.0, 900.0), SIZE, 3.0);
        assert_eq!(p.pointer_percent_x, 0.0);
        assert_eq!(p.pointer_percent_y, 100.0);
        assert_eq!(p.glow_intensity, 1.0);
    }

    #[test]
    fn magnetic_tuning_pulls_toward_pointer() {
        let model = TransformModel::magnetic(10.0, 0.05);
        let p = model.compute(Vec2::new(200.0, 0.0), SIZE, 1.0);
        // right edge: x-axis tilt inverted, full strength
        assert_eq!(p.rotate_x_deg, -10.0);
        assert_eq!(p.rotate_y_deg, -10.0);
        assert!((p.magnet_offset_x - 5.0).abs() < 1e-5);
        assert!((p.magnet_offset_y + 2.5).abs() < 1e-5);
        assert_eq!(model.tilt.max_rotation(), 10.0);
    }

    #[test]
    fn rest_is_rest() {
        assert!(VisualParameters::REST.is_rest());
        assert_eq!(VisualParameters::scaled(1.2).scale, 1.2);
        assert!(VisualParameters::scaled(1.2).is_rest());
    }
}
