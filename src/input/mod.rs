//! Input handling: element-local event types and recorded pointer traces.

/// Element-local pointer, touch and click events.
pub mod event;
/// Recorded pointer traces for headless replay.
pub mod trace;

pub use event::LocalEvent;
pub use trace::{PointerTrace, TraceSample};
