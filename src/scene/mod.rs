//! The host-facing side of the engine.
//!
//! The engine never touches a real scene graph. Everything it needs from
//! the host (geometry, selector queries, listener wiring, parameter writes,
//! injected decorations) goes through the traits in this module, which a
//! host implements over whatever it renders with. [`MemoryScene`] is a
//! complete in-memory implementation.

mod geometry;
pub mod handles;
pub mod memory;
pub mod selector;

use std::fmt;

pub use geometry::{PointerSample, Rect};
pub use handles::{Adoption, HandleTable};
pub use memory::MemoryScene;
use serde::{Deserialize, Serialize};
pub use selector::Selector;

/// Opaque identity of a host element.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ElementHandle(pub u64);

/// Opaque identity of an injected decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecorationId(pub u64);

/// Listener groups the engine asks a host to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Scene-wide pointer movement (the broadcaster's single listener).
    Pointer,
    /// Element-local enter/move/leave.
    Hover,
    /// Element-local touch start/move/end.
    Touch,
    /// Element-local click.
    Click,
}

/// A transient child element the engine injects into a panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    /// Glare overlay of a holographic card, alive while it is engaged or
    /// relaxing.
    Glare,
    /// Floating particle spawned on hover.
    Particle {
        /// Local horizontal position.
        x: f32,
        /// Local vertical position.
        y: f32,
        /// Diameter in pixels.
        size: f32,
        /// Delay before the particle fades in.
        delay_ms: u32,
    },
    /// Click ripple.
    Ripple {
        /// Local horizontal center.
        x: f32,
        /// Local vertical center.
        y: f32,
        /// Final radius (reaches the farthest corner).
        radius: f32,
        /// Lifetime before the engine removes it.
        duration_ms: u32,
    },
    /// The scene-wide spotlight that follows the pointer.
    Spotlight {
        /// Diameter in pixels.
        diameter: f32,
    },
}

impl Decoration {
    /// Class name a DOM host gives the injected element.
    #[must_use]
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Glare => "holo-glare",
            Self::Particle { .. } => "magic-particle",
            Self::Ripple { .. } => "magic-ripple",
            Self::Spotlight { .. } => "magic-spotlight",
        }
    }
}

/// A value written to a named visual parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Percentage, rendered `50%`.
    Percent(f32),
    /// Angle, rendered `-6.25deg`.
    Degrees(f32),
    /// Length, rendered `3px`.
    Pixels(f32),
    /// Plain number, rendered `0.5`.
    Number(f32),
    /// Color with alpha, rendered `rgba(255, 0, 255, 0.8)`.
    Rgba {
        /// Red, green and blue channels.
        rgb: [u8; 3],
        /// Alpha in [0, 1].
        alpha: f32,
    },
}

impl ParamValue {
    /// The numeric payload (alpha for colors).
    #[must_use]
    pub fn number(&self) -> f32 {
        match *self {
            Self::Percent(v)
            | Self::Degrees(v)
            | Self::Pixels(v)
            | Self::Number(v)
            | Self::Rgba { alpha: v, .. } => v,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(v) => write!(f, "{v}%"),
            Self::Degrees(v) => write!(f, "{v}deg"),
            Self::Pixels(v) => write!(f, "{v}px"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Rgba { rgb: [r, g, b], alpha } => {
                write!(f, "rgba({r}, {g}, {b}, {alpha})")
            }
        }
    }
}

/// Elements added to or removed from the scene since the last report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneChange {
    /// Roots of newly attached subtrees.
    pub added: Vec<ElementHandle>,
    /// Roots of detached subtrees.
    pub removed: Vec<ElementHandle>,
}

impl SceneChange {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Reports an element's current screen rectangle.
pub trait GeometryProvider {
    /// Fresh rectangle, or `None` when the element is detached or has no
    /// layout box.
    fn rect(&self, element: ElementHandle) -> Option<Rect>;
}

/// Scene queries and listener wiring.
pub trait SceneQuery: GeometryProvider {
    /// The scene root (document body or equivalent).
    fn root(&self) -> ElementHandle;

    /// Parent element, if attached and not the root's parent.
    fn parent(&self, element: ElementHandle) -> Option<ElementHandle>;

    /// Every element in the subtree rooted at `scope` (including `scope`
    /// itself) matching `selector`, in document order.
    fn query_matching(
        &self,
        scope: ElementHandle,
        selector: &Selector,
    ) -> Vec<ElementHandle>;

    /// Whether the element is still attached to the scene.
    fn contains(&self, element: ElementHandle) -> bool;

    /// Start routing the given listener groups for `element` to the
    /// engine.
    fn listen(&mut self, element: ElementHandle, kinds: &[ListenerKind]);

    /// Stop routing the given listener groups.
    fn unlisten(&mut self, element: ElementHandle, kinds: &[ListenerKind]);

    /// Start reporting subtree additions/removals under `root` to
    /// [`crate::Engine::scene_changed`].
    fn watch(&mut self, root: ElementHandle);

    /// Stop reporting scene changes.
    fn unwatch(&mut self);
}

/// Receives computed visual parameters and decorations.
pub trait StyleSink {
    /// Write a named parameter on an element.
    fn set_parameter(
        &mut self,
        element: ElementHandle,
        name: &'static str,
        value: ParamValue,
    );

    /// Remove a named parameter from an element.
    fn clear_parameter(&mut self, element: ElementHandle, name: &'static str);

    /// Inject a decoration as a child of `parent`.
    fn inject(
        &mut self,
        parent: ElementHandle,
        decoration: &Decoration,
    ) -> Option<DecorationId>;

    /// Remove a previously injected decoration. Unknown ids are ignored.
    fn remove_decoration(&mut self, id: DecorationId);
}

/// Everything the engine needs from a host.
pub trait SceneHost: SceneQuery + StyleSink {}

impl<T: SceneQuery + StyleSink> SceneHost for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_values_render_css_text() {
        assert_eq!(ParamValue::Percent(50.0).to_string(), "50%");
        assert_eq!(ParamValue::Degrees(-6.25).to_string(), "-6.25deg");
        assert_eq!(ParamValue::Pixels(3.0).to_string(), "3px");
        assert_eq!(ParamValue::Number(0.5).to_string(), "0.5");
        assert_eq!(
            ParamValue::Rgba {
                rgb: [255, 0, 255],
                alpha: 0.8
            }
            .to_string(),
            "rgba(255, 0, 255, 0.8)"
        );
    }

    #[test]
    fn decoration_class_names() {
        assert_eq!(Decoration::Glare.class_name(), "holo-glare");
        assert_eq!(
            Decoration::Spotlight { diameter: 800.0 }.class_name(),
            "magic-spotlight"
        );
    }
}
