use slotmap::SlotMap;

use super::{HandleKind, HandleRef, MarkerManager};
use crate::math::GeoCoord;

/// State of one marker held by a [`MarkerStore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerState {
    pub kind: HandleKind,
    pub position: GeoCoord,
    pub visible: bool,
}

/// In-memory [`MarkerManager`] for headless hosts.
///
/// Keeps the last pushed state of every registered marker so a host (or a
/// test) can read back exactly what would be drawn.
#[derive(Debug, Default)]
pub struct MarkerStore {
    markers: SlotMap<HandleRef, MarkerState>,
}

impl MarkerStore {
    /// Creates a new, empty marker store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of a marker, or `None` if it is not registered.
    #[must_use]
    pub fn get(&self, handle: HandleRef) -> Option<&MarkerState> {
        self.markers.get(handle)
    }

    /// Number of registered markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns `true` if no markers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Iterates the registered markers of one kind.
    pub fn iter_kind(&self, kind: HandleKind) -> impl Iterator<Item = (HandleRef, &MarkerState)> {
        self.markers.iter().filter(move |(_, m)| m.kind == kind)
    }

    /// Number of registered markers of one kind.
    #[must_use]
    pub fn count_kind(&self, kind: HandleKind) -> usize {
        self.iter_kind(kind).count()
    }
}

impl MarkerManager for MarkerStore {
    fn register_handle(&mut self, position: GeoCoord, kind: HandleKind) -> HandleRef {
        self.markers.insert(MarkerState {
            kind,
            position,
            visible: true,
        })
    }

    fn unregister_handle(&mut self, handle: HandleRef) {
        self.markers.remove(handle);
    }

    fn set_handle_position(&mut self, handle: HandleRef, position: GeoCoord) {
        if let Some(marker) = self.markers.get_mut(handle) {
            marker.position = position;
        }
    }

    fn set_handle_visible(&mut self, handle: HandleRef, visible: bool) {
        if let Some(marker) = self.markers.get_mut(handle) {
            marker.visible = visible;
        }
    }
}
