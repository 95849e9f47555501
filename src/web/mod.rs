//! Browser backend: the engine driven by live DOM events.
//!
//! [`DomHost`] implements the scene traits over `web_sys` and
//! [`RafScheduler`] maps frames onto `requestAnimationFrame`. Every browser
//! callback becomes a [`HostEvent`] delivered through [`Runtime`], which
//! queues events that arrive while the engine is busy and drains them in
//! order once it is free.

mod frame;
mod host;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::MediaQueryList;
use web_time::Instant;

pub use frame::RafScheduler;
pub use host::{DomHost, RawMutations};

use crate::animation::FrameHandle;
use crate::input::LocalEvent;
use crate::scene::{ElementHandle, PointerSample};
use crate::{EffectError, Engine, Options};

/// The engine as wired into a page.
pub type WebEngine = Engine<DomHost, RafScheduler>;

/// A browser callback, translated for the engine.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// Scene-wide pointer movement.
    Pointer(PointerSample),
    /// The pointer left the page.
    PointerLeft,
    /// An element-local event.
    Local(ElementHandle, LocalEvent),
    /// A requested animation frame fired.
    Frame(FrameHandle),
    /// Subtrees were added to or removed from the document.
    Mutations(RawMutations),
    /// The `prefers-reduced-motion` preference changed.
    ReducedMotion(bool),
}

struct ReducedMotionWatch {
    query: MediaQueryList,
    callback: Closure<dyn FnMut()>,
}

impl Drop for ReducedMotionWatch {
    fn drop(&mut self) {
        let _ = self
            .query
            .remove_event_listener_with_callback("change", self.callback.as_ref().unchecked_ref());
    }
}

/// Owns the engine and serializes browser callbacks into it.
pub struct Runtime {
    engine: RefCell<WebEngine>,
    inbox: RefCell<VecDeque<HostEvent>>,
    _reduced_motion: Option<ReducedMotionWatch>,
}

impl Runtime {
    /// Build an engine over the current document. The OS reduced-motion
    /// preference overrides `options` when it asks for less motion.
    pub fn new(mut options: Options) -> Result<Rc<Self>, EffectError> {
        let window = web_sys::window().ok_or_else(|| EffectError::Host("no window".to_owned()))?;
        let document = window
            .document()
            .ok_or_else(|| EffectError::Host("no document".to_owned()))?;
        let body = document
            .body()
            .ok_or_else(|| EffectError::Host("no body".to_owned()))?;
        let query = window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten();
        if query.as_ref().is_some_and(MediaQueryList::matches) {
            options.general.reduced_motion = true;
        }

        Ok(Rc::new_cyclic(|runtime: &Weak<Self>| {
            let host = DomHost::new(document, &body, runtime.clone());
            let scheduler = RafScheduler::new(window, runtime.clone());
            Self {
                engine: RefCell::new(Engine::new(host, scheduler, options)),
                inbox: RefCell::default(),
                _reduced_motion: query.map(|q| watch_reduced_motion(q, runtime.clone())),
            }
        }))
    }

    /// Queue `event` and, unless the engine is already busy, drain the
    /// queue into it.
    pub fn deliver(&self, event: HostEvent) {
        self.inbox.borrow_mut().push_back(event);
        let _ = self.with_engine(|_| ());
    }

    /// Run `f` on the engine, then drain queued events. `None` when the
    /// engine is busy; the current borrower drains the queue instead.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut WebEngine) -> R) -> Option<R> {
        let mut engine = self.engine.try_borrow_mut().ok()?;
        let result = f(&mut engine);
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            apply(&mut engine, event);
        }
        Some(result)
    }
}

fn apply(engine: &mut WebEngine, event: HostEvent) {
    let now = Instant::now();
    match event {
        HostEvent::Pointer(sample) => engine.pointer_moved(sample, now),
        HostEvent::PointerLeft => engine.pointer_left(now),
        HostEvent::Local(element, local) => engine.handle_local(element, local, now),
        HostEvent::Frame(handle) => {
            engine.scheduler_mut().fired(handle);
            engine.on_frame(handle, now);
        }
        HostEvent::Mutations(raw) => {
            let change = engine.host_mut().translate(&raw);
            engine.scene_changed(&change);
            engine.host_mut().forget_detached();
        }
        HostEvent::ReducedMotion(reduced) => engine.set_reduced_motion(reduced),
    }
}

fn watch_reduced_motion(query: MediaQueryList, runtime: Weak<Runtime>) -> ReducedMotionWatch {
    let watched = query.clone();
    let callback = Closure::<dyn FnMut()>::new(move || {
        if let Some(runtime) = runtime.upgrade() {
            runtime.deliver(HostEvent::ReducedMotion(watched.matches()));
        }
    });
    if query
        .add_event_listener_with_callback("change", callback.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("reduced-motion changes will not be followed");
    }
    ReducedMotionWatch { query, callback }
}

thread_local! {
    static RUNTIME: RefCell<Option<Rc<Runtime>>> = const { RefCell::new(None) };
}

fn to_js(e: EffectError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Start the effects on the current page, replacing any running instance.
/// `options_toml` overrides the defaults.
#[wasm_bindgen(js_name = startEffects)]
pub fn start_effects(options_toml: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let options = match options_toml.as_deref() {
        Some(toml) => Options::from_toml(toml).map_err(to_js)?,
        None => Options::default(),
    };
    stop_effects();
    let runtime = Runtime::new(options).map_err(to_js)?;
    let _ = runtime.with_engine(|engine| {
        engine.start();
        engine.observe();
    });
    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
    Ok(())
}

/// Tear the effects down, restoring every element it touched.
#[wasm_bindgen(js_name = stopEffects)]
pub fn stop_effects() {
    let runtime = RUNTIME.with(|slot| slot.borrow_mut().take());
    if let Some(runtime) = runtime {
        let _ = runtime.with_engine(|engine| {
            engine.shutdown();
            engine.host_mut().release();
        });
    }
}
