//! Shared utilities for the effect engine.
//!
//! Helpers for easing curves, scalar interpolation and pointer
//! throttling.

pub mod easing;
pub mod interpolate;
pub mod throttle;
