//! Frame scheduling seam between the engine and the host's frame loop.

/// Identity of one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// The host's per-frame callback primitive, reduced to schedule/cancel.
///
/// When a scheduled handle fires, the host calls
/// [`Engine::on_frame`](crate::Engine::on_frame) with it. Handles fire at
/// most once. After [`cancel`](Self::cancel) the host must not deliver the
/// handle; the engine also ignores any handle it no longer tracks, so a
/// late delivery is harmless.
pub trait FrameScheduler {
    /// Request one callback on the next frame.
    fn schedule(&mut self) -> FrameHandle;

    /// Withdraw a pending callback. Unknown handles are ignored.
    fn cancel(&mut self, handle: FrameHandle);
}

/// Headless scheduler that queues handles until the caller drains them.
///
/// Used by tests and the simulation binary together with
/// [`Engine::pump_frame`](crate::Engine::pump_frame).
#[derive(Debug, Clone, Default)]
pub struct QueuedScheduler {
    next: u64,
    pending: Vec<FrameHandle>,
}

impl QueuedScheduler {
    /// Empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending handle, in scheduling order.
    pub fn take_pending(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    /// Number of pending handles.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether `handle` is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }
}

impl FrameScheduler for QueuedScheduler {
    fn schedule(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending.push(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}
