use super::{HandleKind, HandleRef, Marker, MarkerManager};
use crate::math::GeoCoord;
use crate::topology::VertexStore;

/// Single marker reflecting the polygon's centroid and validity.
///
/// Holds no state of its own beyond the last values pushed to the marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusIndicator {
    handle: HandleRef,
    position: GeoCoord,
    visible: bool,
}

impl StatusIndicator {
    /// Registers the indicator hidden at the origin.
    pub fn register<M: MarkerManager>(markers: &mut M) -> Self {
        let position = GeoCoord::default();
        let handle = markers.register_handle(position, HandleKind::Status);
        markers.set_handle_visible(handle, false);
        Self {
            handle,
            position,
            visible: false,
        }
    }

    /// Recomputes centroid and validity from `store` and pushes both.
    ///
    /// An empty store keeps the previous position and hides the marker.
    pub fn refresh<M: MarkerManager>(&mut self, markers: &mut M, store: &VertexStore) {
        if let Some(centroid) = store.centroid() {
            self.position = centroid;
            self.set_position(markers, centroid);
        }
        self.visible = store.is_valid();
        self.set_visible(markers, self.visible);
    }

    /// Last pushed position.
    #[must_use]
    pub fn position(&self) -> GeoCoord {
        self.position
    }

    /// Last pushed visibility.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Marker for StatusIndicator {
    fn handle(&self) -> HandleRef {
        self.handle
    }
}
