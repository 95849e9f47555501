//! Frame scheduling over `requestAnimationFrame`.

use std::rc::Weak;

use rustc_hash::FxHashMap;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::{HostEvent, Runtime};
use crate::animation::{FrameHandle, FrameScheduler};

/// [`FrameScheduler`] backed by the browser's animation frames.
pub struct RafScheduler {
    window: Window,
    runtime: Weak<Runtime>,
    next: u64,
    /// Browser request id and callback per outstanding frame.
    pending: FxHashMap<FrameHandle, (i32, Closure<dyn FnMut(f64)>)>,
}

impl RafScheduler {
    pub(super) fn new(window: Window, runtime: Weak<Runtime>) -> Self {
        Self {
            window,
            runtime,
            next: 0,
            pending: FxHashMap::default(),
        }
    }

    /// Release a frame's callback once it has fired.
    pub(super) fn fired(&mut self, handle: FrameHandle) {
        let _ = self.pending.remove(&handle);
    }
}

impl FrameScheduler for RafScheduler {
    fn schedule(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        let runtime = self.runtime.clone();
        let callback = Closure::<dyn FnMut(f64)>::new(move |_ts: f64| {
            if let Some(runtime) = runtime.upgrade() {
                runtime.deliver(HostEvent::Frame(handle));
            }
        });
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => {
                let _ = self.pending.insert(handle, (id, callback));
            }
            Err(_) => log::warn!("animation frame {} could not be requested", handle.0),
        }
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if let Some((id, _)) = self.pending.remove(&handle) {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}
