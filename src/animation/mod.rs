//! Animation system: relaxation runs and the frame scheduling seam.

mod runner;
mod scheduler;

pub use runner::{Relaxation, RelaxationSample};
pub use scheduler::{FrameHandle, FrameScheduler, QueuedScheduler};
