use super::{HandleKind, HandleRef, Marker, MarkerManager};
use crate::math::GeoCoord;
use crate::topology::VertexId;

slotmap::new_key_type! {
    /// Identifier for a midpoint handle inside the handle registry.
    pub struct MidpointKey;
}

/// Insertion handle sitting on the midpoint of one edge.
///
/// The edge is directed in sequence order: `start` precedes `end`. A lone
/// vertex owns the self-loop edge `(v, v)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidpointHandle {
    handle: HandleRef,
    start: VertexId,
    end: VertexId,
}

impl MidpointHandle {
    /// Registers a midpoint marker for the edge `start -> end`.
    pub fn register<M: MarkerManager>(
        markers: &mut M,
        start: VertexId,
        end: VertexId,
        position: GeoCoord,
    ) -> Self {
        let handle = markers.register_handle(position, HandleKind::Midpoint);
        Self { handle, start, end }
    }

    /// Endpoints of the edge this handle currently splits.
    #[must_use]
    pub fn edge(&self) -> (VertexId, VertexId) {
        (self.start, self.end)
    }

    /// Reassigns the handle to another edge. The marker itself is kept.
    pub fn rebind(&mut self, start: VertexId, end: VertexId) {
        self.start = start;
        self.end = end;
    }
}

impl Marker for MidpointHandle {
    fn handle(&self) -> HandleRef {
        self.handle
    }
}
