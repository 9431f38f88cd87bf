mod drag;
mod midpoint;
mod status;
mod store;

pub use drag::DragHandle;
pub use midpoint::{MidpointHandle, MidpointKey};
pub use status::StatusIndicator;
pub use store::{MarkerState, MarkerStore};

use crate::math::GeoCoord;

slotmap::new_key_type! {
    /// Opaque reference to a marker registered with a [`MarkerManager`].
    pub struct HandleRef;
}

/// The role a registered marker plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Drag handle bound to one vertex.
    Vertex,
    /// Insertion handle at the midpoint of an edge.
    Midpoint,
    /// Aggregate indicator at the polygon centroid.
    Status,
}

/// Rendering and hit-testing collaborator.
///
/// The core never renders or hit-tests anything itself. Calls are
/// fire-and-forget; the only value the core keeps is the returned
/// [`HandleRef`], and every position or visibility change is pushed
/// synchronously.
pub trait MarkerManager {
    /// Registers a new, visible marker.
    fn register_handle(&mut self, position: GeoCoord, kind: HandleKind) -> HandleRef;

    /// Removes a marker. Unknown references are ignored.
    fn unregister_handle(&mut self, handle: HandleRef);

    /// Moves a marker.
    fn set_handle_position(&mut self, handle: HandleRef, position: GeoCoord);

    /// Shows or hides a marker.
    fn set_handle_visible(&mut self, handle: HandleRef, visible: bool);
}

/// Capability shared by every kind of handle.
pub trait Marker {
    /// The collaborator-side reference backing this handle.
    fn handle(&self) -> HandleRef;

    /// Pushes a new position to the collaborator.
    fn set_position<M: MarkerManager>(&self, markers: &mut M, position: GeoCoord) {
        markers.set_handle_position(self.handle(), position);
    }

    /// Pushes a visibility change to the collaborator.
    fn set_visible<M: MarkerManager>(&self, markers: &mut M, visible: bool) {
        markers.set_handle_visible(self.handle(), visible);
    }

    /// Unregisters the handle, consuming it.
    fn release<M: MarkerManager>(self, markers: &mut M)
    where
        Self: Sized,
    {
        markers.unregister_handle(self.handle());
    }
}
