//! Handle allocation for hosts whose elements carry their handle as a
//! stamp (an attribute, a tag) that can outlive the table or be copied.

use rustc_hash::FxHashMap;

use super::ElementHandle;

/// Outcome of [`HandleTable::adopt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adoption {
    /// The element's stamp was accepted as its handle.
    Known(ElementHandle),
    /// The element got a new handle and must be (re)stamped with it.
    Fresh(ElementHandle),
}

impl Adoption {
    /// The handle, however it was obtained.
    #[must_use]
    pub fn handle(self) -> ElementHandle {
        match self {
            Self::Known(h) | Self::Fresh(h) => h,
        }
    }
}

/// Maps handles to host elements and hands out new ones.
///
/// A stamp is trusted only while no other element holds it; allocation
/// always moves past every accepted stamp.
#[derive(Debug)]
pub struct HandleTable<E> {
    elements: FxHashMap<ElementHandle, E>,
    next: u64,
}

impl<E> Default for HandleTable<E> {
    fn default() -> Self {
        Self {
            elements: FxHashMap::default(),
            next: 0,
        }
    }
}

impl<E: Clone> HandleTable<E> {
    /// Resolve `element`, which carries `stamp` if it was seen before.
    /// `same` decides element identity.
    pub fn adopt(
        &mut self,
        element: &E,
        stamp: Option<u64>,
        same: impl Fn(&E, &E) -> bool,
    ) -> Adoption {
        if let Some(id) = stamp {
            let handle = ElementHandle(id);
            match self.elements.get(&handle) {
                Some(held) if same(held, element) => return Adoption::Known(handle),
                Some(_) => {}
                None => {
                    let _ = self.elements.insert(handle, element.clone());
                    self.next = self.next.max(id.saturating_add(1));
                    return Adoption::Known(handle);
                }
            }
        }
        let handle = ElementHandle(self.next);
        self.next += 1;
        let _ = self.elements.insert(handle, element.clone());
        Adoption::Fresh(handle)
    }

    /// The element behind `handle`.
    #[must_use]
    pub fn get(&self, handle: ElementHandle) -> Option<&E> {
        self.elements.get(&handle)
    }

    /// Keep only the entries `keep` accepts.
    pub fn retain(&mut self, mut keep: impl FnMut(ElementHandle, &E) -> bool) {
        self.elements.retain(|handle, element| keep(*handle, element));
    }

    /// Empty the table, yielding every element it held.
    pub fn drain(&mut self) -> impl Iterator<Item = (ElementHandle, E)> + '_ {
        self.elements.drain()
    }

    /// Number of elements held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the table holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
