//! Scalar interpolation helpers shared by the transform model and the
//! relaxation runner.

/// Clamp `v` into `[lo, hi]`.
///
/// NaN inputs collapse to `lo` so a bad measurement can never leak out of
/// a declared parameter domain.
#[inline]
#[must_use]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        return lo;
    }
    v.max(lo).min(hi)
}

/// Linear interpolation from `a` to `b`. `t` is clamped to [0, 1].
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = clamp(t, 0.0, 1.0);
    a + (b - a) * t
}

/// Map `v` from `[from_lo, from_hi]` onto `[to_lo, to_hi]`.
///
/// The source span must be non-zero; callers guarantee it.
#[inline]
#[must_use]
pub fn remap(v: f32, from_lo: f32, from_hi: f32, to_lo: f32, to_hi: f32) -> f32 {
    debug_assert!(from_hi != from_lo, "remap with an empty source range");
    to_lo + (to_hi - to_lo) * (v - from_lo) / (from_hi - from_lo)
}

/// Round to a fixed number of decimal places.
#[inline]
#[must_use]
pub fn round_to(v: f32, places: i32) -> f32 {
    let factor = 10f32.powi(places);
    (v * factor).round() / factor
}

/// Three-decimal rounding used for emitted angles and glow coordinates.
#[inline]
#[must_use]
pub fn round3(v: f32) -> f32 {
    round_to(v, 3)
}

/// `100 * offset / extent`, clamped to [0, 100]. A zero (or negative)
/// extent reports the midpoint instead of dividing by zero.
#[inline]
#[must_use]
pub fn percent_of(offset: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 50.0;
    }
    clamp(100.0 * offset / extent, 0.0, 100.0)
}
