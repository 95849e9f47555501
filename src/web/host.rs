//! [`SceneHost`] over the live DOM.

use std::cell::RefCell;
use std::rc::Weak;

use rustc_hash::FxHashMap;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CssStyleDeclaration, Document, Element, Event, HtmlElement,
    MouseEvent, MutationObserver, MutationObserverInit, MutationRecord, NodeList, TouchEvent,
};

use super::{HostEvent, Runtime};
use crate::input::LocalEvent;
use crate::scene::{
    Adoption, Decoration, DecorationId, ElementHandle, GeometryProvider, HandleTable,
    ListenerKind, ParamValue, PointerSample, Rect, SceneChange, SceneHost, SceneQuery, Selector,
    StyleSink,
};

/// Attribute carrying an element's handle.
const HANDLE_ATTR: &str = "data-holotilt";
/// Marks injected decorations so scene watching ignores them.
const DECORATION_ATTR: &str = "data-holotilt-decoration";

/// Elements reported by a mutation observer, not yet given handles.
#[derive(Debug, Clone, Default)]
pub struct RawMutations {
    /// Roots of attached subtrees.
    pub added: Vec<Element>,
    /// Roots of detached subtrees.
    pub removed: Vec<Element>,
}

impl RawMutations {
    /// Whether nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

struct Listener {
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Browser listeners for one element and group, shared by every family
/// that asked for them.
struct Wired {
    count: usize,
    listeners: Vec<Listener>,
}

struct Watch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

/// DOM-backed scene host. Parameters become inline custom properties,
/// decorations become `<span>` children.
pub struct DomHost {
    document: Document,
    root: ElementHandle,
    /// Handles are assigned lazily, on first sight of an element, so
    /// queries through `&self` still need to write.
    registry: RefCell<HandleTable<Element>>,
    wired: FxHashMap<(ElementHandle, ListenerKind), Wired>,
    decorations: FxHashMap<DecorationId, Element>,
    next_decoration: u64,
    watch: Option<Watch>,
    runtime: Weak<Runtime>,
}

impl DomHost {
    pub(super) fn new(document: Document, body: &Element, runtime: Weak<Runtime>) -> Self {
        let mut host = Self {
            document,
            root: ElementHandle(0),
            registry: RefCell::default(),
            wired: FxHashMap::default(),
            decorations: FxHashMap::default(),
            next_decoration: 1,
            watch: None,
            runtime,
        };
        host.root = host.adopt(body);
        host
    }

    /// The handle for `element`, assigning one on first sight.
    fn adopt(&self, element: &Element) -> ElementHandle {
        let stamp = element
            .get_attribute(HANDLE_ATTR)
            .and_then(|v| v.parse::<u64>().ok());
        let adoption = self
            .registry
            .borrow_mut()
            .adopt(element, stamp, |held, seen| held.is_same_node(Some(seen.as_ref())));
        if let Adoption::Fresh(handle) = adoption {
            let _ = element.set_attribute(HANDLE_ATTR, &handle.0.to_string());
        }
        adoption.handle()
    }

    /// Forget every element and strip their handle stamps, so a later
    /// host starts from a clean document.
    pub(super) fn release(&mut self) {
        for (_, element) in self.registry.get_mut().drain() {
            let _ = element.remove_attribute(HANDLE_ATTR);
        }
    }

    fn element(&self, handle: ElementHandle) -> Option<Element> {
        self.registry.borrow().get(handle).cloned()
    }

    fn style(&self, handle: ElementHandle) -> Option<CssStyleDeclaration> {
        let element = self.element(handle)?;
        element.dyn_into::<HtmlElement>().ok().map(|e| e.style())
    }

    /// Give handles to a mutation report.
    pub(super) fn translate(&self, raw: &RawMutations) -> SceneChange {
        SceneChange {
            added: raw
                .added
                .iter()
                .filter(|e| e.is_connected())
                .map(|e| self.adopt(e))
                .collect(),
            removed: raw
                .removed
                .iter()
                .filter_map(|e| e.get_attribute(HANDLE_ATTR)?.parse().ok())
                .map(ElementHandle)
                .collect(),
        }
    }

    /// Drop references to elements no longer in the document.
    pub(super) fn forget_detached(&mut self) {
        let root = self.root;
        let wired = &self.wired;
        self.registry.get_mut().retain(|handle, element| {
            handle == root || element.is_connected() || wired.keys().any(|(h, _)| *h == handle)
        });
    }
}

impl GeometryProvider for DomHost {
    fn rect(&self, element: ElementHandle) -> Option<Rect> {
        let element = self.element(element).filter(|e| e.is_connected())?;
        let r = element.get_bounding_client_rect();
        Some(Rect::new(
            r.left() as f32,
            r.top() as f32,
            r.width() as f32,
            r.height() as f32,
        ))
    }
}

impl SceneQuery for DomHost {
    fn root(&self) -> ElementHandle {
        self.root
    }

    fn parent(&self, element: ElementHandle) -> Option<ElementHandle> {
        if element == self.root {
            return None;
        }
        let parent = self.element(element)?.parent_element()?;
        Some(self.adopt(&parent))
    }

    fn query_matching(&self, scope: ElementHandle, selector: &Selector) -> Vec<ElementHandle> {
        let Some(scope) = self.element(scope) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        if scope.matches(selector.as_str()).unwrap_or(false) {
            found.push(self.adopt(&scope));
        }
        match scope.query_selector_all(selector.as_str()) {
            Ok(list) => found.extend(elements_of(&list).iter().map(|e| self.adopt(e))),
            Err(_) => log::warn!("browser rejected selector '{}'", selector.as_str()),
        }
        found
    }

    fn contains(&self, element: ElementHandle) -> bool {
        self.element(element).is_some_and(|e| e.is_connected())
    }

    fn listen(&mut self, element: ElementHandle, kinds: &[ListenerKind]) {
        let Some(target) = self.element(element) else {
            return;
        };
        for &kind in kinds {
            let wired = self.wired.entry((element, kind)).or_insert_with(|| Wired {
                count: 0,
                listeners: Vec::new(),
            });
            wired.count += 1;
            if wired.count == 1 {
                wired.listeners = wire(&target, element, kind, &self.runtime);
            }
        }
    }

    fn unlisten(&mut self, element: ElementHandle, kinds: &[ListenerKind]) {
        let target = self.element(element);
        for &kind in kinds {
            let Some(wired) = self.wired.get_mut(&(element, kind)) else {
                continue;
            };
            wired.count = wired.count.saturating_sub(1);
            if wired.count > 0 {
                continue;
            }
            let Some(wired) = self.wired.remove(&(element, kind)) else {
                continue;
            };
            if let Some(target) = &target {
                for listener in &wired.listeners {
                    let _ = target.remove_event_listener_with_callback(
                        listener.event,
                        listener.callback.as_ref().unchecked_ref(),
                    );
                }
            }
        }
    }

    fn watch(&mut self, root: ElementHandle) {
        let Some(target) = self.element(root) else {
            return;
        };
        let runtime = self.runtime.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |records: js_sys::Array, _: MutationObserver| {
                let mut raw = RawMutations::default();
                for record in records.iter() {
                    let Ok(record) = record.dyn_into::<MutationRecord>() else {
                        continue;
                    };
                    raw.added.extend(elements_of(&record.added_nodes()));
                    raw.removed.extend(elements_of(&record.removed_nodes()));
                }
                if raw.is_empty() {
                    return;
                }
                if let Some(runtime) = runtime.upgrade() {
                    runtime.deliver(HostEvent::Mutations(raw));
                }
            },
        );
        let Ok(observer) = MutationObserver::new(callback.as_ref().unchecked_ref()) else {
            log::warn!("mutation observer unavailable; added panels will not be picked up");
            return;
        };
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        if observer.observe_with_options(&target, &init).is_err() {
            log::warn!("mutation observer refused element {}", root.0);
            return;
        }
        self.watch = Some(Watch {
            observer,
            _callback: callback,
        });
    }

    fn unwatch(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.observer.disconnect();
        }
    }
}

impl StyleSink for DomHost {
    fn set_parameter(&mut self, element: ElementHandle, name: &'static str, value: ParamValue) {
        if let Some(style) = self.style(element) {
            let _ = style.set_property(name, &value.to_string());
        }
    }

    fn clear_parameter(&mut self, element: ElementHandle, name: &'static str) {
        if let Some(style) = self.style(element) {
            let _ = style.remove_property(name);
        }
    }

    fn inject(&mut self, parent: ElementHandle, decoration: &Decoration) -> Option<DecorationId> {
        let parent = self.element(parent)?;
        let node = self.document.create_element("span").ok()?;
        node.set_class_name(decoration.class_name());
        let _ = node.set_attribute(DECORATION_ATTR, "");
        if let Some(html) = node.dyn_ref::<HtmlElement>() {
            style_decoration(&html.style(), decoration);
        }
        let _ = parent.append_child(&node).ok()?;

        let id = DecorationId(self.next_decoration);
        self.next_decoration += 1;
        let _ = self.decorations.insert(id, node);
        Some(id)
    }

    fn remove_decoration(&mut self, id: DecorationId) {
        if let Some(node) = self.decorations.remove(&id) {
            node.remove();
        }
    }
}

impl SceneHost for DomHost {}

fn style_decoration(style: &CssStyleDeclaration, decoration: &Decoration) {
    let set = |name: &str, value: String| {
        let _ = style.set_property(name, &value);
    };
    match *decoration {
        Decoration::Glare => {}
        Decoration::Particle {
            x,
            y,
            size,
            delay_ms,
        } => {
            set("left", format!("{x}px"));
            set("top", format!("{y}px"));
            set("width", format!("{size}px"));
            set("height", format!("{size}px"));
            set("animation-delay", format!("{delay_ms}ms"));
        }
        Decoration::Ripple {
            x,
            y,
            radius,
            duration_ms,
        } => {
            set("left", format!("{}px", x - radius));
            set("top", format!("{}px", y - radius));
            set("width", format!("{}px", radius * 2.0));
            set("height", format!("{}px", radius * 2.0));
            set("animation-duration", format!("{duration_ms}ms"));
        }
        Decoration::Spotlight { diameter } => {
            set("width", format!("{diameter}px"));
            set("height", format!("{diameter}px"));
        }
    }
}

/// Element nodes of a list, skipping our own decorations.
fn elements_of(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i)?.dyn_into::<Element>().ok())
        .filter(|e| !e.has_attribute(DECORATION_ATTR))
        .collect()
}

/// Browser events behind a listener group.
fn event_names(kind: ListenerKind) -> &'static [&'static str] {
    match kind {
        ListenerKind::Pointer => &["mousemove", "mouseleave"],
        ListenerKind::Hover => &["mouseenter", "mousemove", "mouseleave"],
        ListenerKind::Touch => &["touchstart", "touchmove", "touchend"],
        ListenerKind::Click => &["click"],
    }
}

fn wire(
    target: &Element,
    element: ElementHandle,
    kind: ListenerKind,
    runtime: &Weak<Runtime>,
) -> Vec<Listener> {
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    event_names(kind)
        .iter()
        .filter_map(|&name| {
            let runtime = runtime.clone();
            let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                let Some(translated) = translate_event(kind, element, name, &event) else {
                    return;
                };
                if let Some(runtime) = runtime.upgrade() {
                    runtime.deliver(translated);
                }
            });
            target
                .add_event_listener_with_callback_and_add_event_listener_options(
                    name,
                    callback.as_ref().unchecked_ref(),
                    &options,
                )
                .ok()?;
            Some(Listener {
                event: name,
                callback,
            })
        })
        .collect()
}

fn translate_event(
    kind: ListenerKind,
    element: ElementHandle,
    name: &str,
    event: &Event,
) -> Option<HostEvent> {
    if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        if name == "touchend" {
            return Some(HostEvent::Local(element, LocalEvent::TouchEnd));
        }
        let touch = touch_event.touches().get(0)?;
        let (x, y) = (touch.client_x() as f32, touch.client_y() as f32);
        let local = if name == "touchstart" {
            LocalEvent::TouchStart { x, y }
        } else {
            LocalEvent::TouchMove { x, y }
        };
        return Some(HostEvent::Local(element, local));
    }

    let mouse = event.dyn_ref::<MouseEvent>()?;
    let (x, y) = (mouse.client_x() as f32, mouse.client_y() as f32);
    let local = match (kind, name) {
        (ListenerKind::Pointer, "mousemove") => {
            return Some(HostEvent::Pointer(PointerSample::new(x, y)));
        }
        (ListenerKind::Pointer, _) => return Some(HostEvent::PointerLeft),
        (_, "mouseenter") => LocalEvent::PointerEnter { x, y },
        (_, "mousemove") => LocalEvent::PointerMove { x, y },
        (_, "mouseleave") => LocalEvent::PointerLeave { x, y },
        _ => LocalEvent::Click { x, y },
    };
    Some(HostEvent::Local(element, local))
}
