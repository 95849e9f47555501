use glam::Vec2;

use crate::scene::ListenerKind;

/// Platform-agnostic element-local events.
///
/// A host routes these to [`Engine::handle_local`](crate::Engine::handle_local)
/// for every element it was asked to [`listen`](crate::scene::SceneQuery::listen)
/// on. Positions are screen coordinates, the same space as
/// [`Rect`](crate::scene::Rect).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalEvent {
    /// Pointer entered the element.
    PointerEnter {
        /// Horizontal screen position.
        x: f32,
        /// Vertical screen position.
        y: f32,
    },
    /// Pointer moved over the element.
    PointerMove {
        /// Horizontal screen position.
        x: f32,
        /// Vertical screen position.
        y: f32,
    },
    /// Pointer left the element.
    PointerLeave {
        /// Horizontal screen position.
        x: f32,
        /// Vertical screen position.
        y: f32,
    },
    /// First touch point went down on the element.
    TouchStart {
        /// Horizontal screen position.
        x: f32,
        /// Vertical screen position.
        y: f32,
    },
    /// First touch point moved.
    TouchMove {
        /// Horizontal screen position.
        x: f32,
        /// Vertical screen position.
        y: f32,
    },
    /// Touch lifted or was cancelled.
    TouchEnd,
    /// Primary click.
    Click {
        /// Horizontal screen position.
        x: f32,
        /// Vertical screen position.
        y: f32,
    },
}

impl LocalEvent {
    /// Screen position carried by the event, if any.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            Self::PointerEnter { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerLeave { x, y }
            | Self::TouchStart { x, y }
            | Self::TouchMove { x, y }
            | Self::Click { x, y } => Some(Vec2::new(x, y)),
            Self::TouchEnd => None,
        }
    }

    /// The listener group that delivers this event.
    #[must_use]
    pub fn listener_kind(&self) -> ListenerKind {
        match self {
            Self::PointerEnter { .. }
            | Self::PointerMove { .. }
            | Self::PointerLeave { .. } => ListenerKind::Hover,
            Self::TouchStart { .. } | Self::TouchMove { .. } | Self::TouchEnd => {
                ListenerKind::Touch
            }
            Self::Click { .. } => ListenerKind::Click,
        }
    }

    /// Whether the event ends an interaction.
    #[must_use]
    pub fn is_release(&self) -> bool {
        matches!(self, Self::PointerLeave { .. } | Self::TouchEnd)
    }
}
