//! Dock-style magnification for small buttons.

use crate::util::interpolate::clamp;

/// Linear magnification falloff by distance to the button center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockScale {
    /// Scale at and beyond `proximity`.
    pub base: f32,
    /// Scale with the pointer on the center.
    pub max: f32,
    /// Distance at which magnification reaches `base`.
    pub proximity: f32,
}

impl Default for DockScale {
    fn default() -> Self {
        Self {
            base: 1.0,
            max: 1.5,
            proximity: 100.0,
        }
    }
}

impl DockScale {
    /// Scale for a pointer `distance` away from the center, always within
    /// `[base, max]`.
    #[must_use]
    pub fn scale_at(&self, distance: f32) -> f32 {
        let (lo, hi) = if self.base <= self.max {
            (self.base, self.max)
        } else {
            (self.max, self.base)
        };
        if !distance.is_finite() || distance >= self.proximity {
            return self.base;
        }
        if distance <= 0.0 {
            return self.max;
        }
        let normalized = distance / self.proximity;
        clamp(self.max - (self.max - self.base) * normalized, lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_falls_off_linearly() {
        let dock = DockScale::default();
        assert_eq!(dock.scale_at(0.0), 1.5);
        assert_eq!(dock.scale_at(50.0), 1.25);
        assert_eq!(dock.scale_at(100.0), 1.0);
        assert_eq!(dock.scale_at(250.0), 1.0);
    }

    #[test]
    fn far_pointer_gets_base_scale() {
        assert_eq!(DockScale::default().scale_at(f32::INFINITY), 1.0);
        assert_eq!(DockScale::default().scale_at(f32::NAN), 1.0);
    }

    #[test]
    fn scale_never_leaves_range() {
        let dock = DockScale {
            base: 1.0,
            max: 2.0,
            proximity: 40.0,
        };
        for d in 0..100 {
            let s = dock.scale_at(d as f32 * 0.5);
            assert!((1.0..=2.0).contains(&s));
        }
    }
}
