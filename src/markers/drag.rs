use super::{HandleKind, HandleRef, Marker, MarkerManager};
use crate::math::GeoCoord;
use crate::topology::VertexId;

/// Drag handle bound to exactly one vertex.
///
/// Knows only its own vertex id; drag and remove gestures on its marker are
/// routed back to the editor as moves and removals of that id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragHandle {
    vertex: VertexId,
    handle: HandleRef,
}

impl DragHandle {
    /// Registers a vertex marker at `position`.
    pub fn register<M: MarkerManager>(markers: &mut M, vertex: VertexId, position: GeoCoord) -> Self {
        let handle = markers.register_handle(position, HandleKind::Vertex);
        Self { vertex, handle }
    }

    /// The vertex this handle is bound to.
    #[must_use]
    pub fn vertex(&self) -> VertexId {
        self.vertex
    }
}

impl Marker for DragHandle {
    fn handle(&self) -> HandleRef {
        self.handle
    }
}
