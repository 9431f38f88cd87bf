use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::error::{HandleError, PolyEditError, Result, TopologyError};
use crate::gesture::{
    Gesture, GestureClassifier, PointerEvent, PointerEventKind, PointerSource, Projection,
    SubscriptionId,
};
use crate::markers::{HandleRef, Marker, MarkerManager, StatusIndicator};
use crate::math::GeoCoord;
use crate::registry::{HandleRegistry, HandleTarget};
use crate::topology::{Neighbors, VertexId, VertexStore};

/// Interaction reported by the host for a marker it hit-tested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleEvent {
    /// A marker was dragged to a new position. Only vertex handles react,
    /// by moving their vertex.
    Dragged { handle: HandleRef, to: GeoCoord },
    /// The remove gesture was performed on a marker. Only vertex handles react.
    RemoveRequested { handle: HandleRef },
    /// A midpoint marker was grabbed: inserts one vertex into its edge at
    /// `at`. The host continues the drag on the new vertex's handle.
    MidpointActivated { handle: HandleRef, at: GeoCoord },
}

/// An interactive polygon editing session.
///
/// Sole owner of mutation authority over the polygon. Every mutation updates
/// the vertex store, brings the handle registry in line with the new topology
/// and then refreshes the status indicator, in that order.
#[derive(Debug)]
pub struct EditablePolygon<M, S>
where
    M: MarkerManager,
    S: PointerSource,
{
    store: VertexStore,
    registry: HandleRegistry,
    status: StatusIndicator,
    gestures: GestureClassifier,
    markers: M,
    pointer: S,
    pointer_down: SubscriptionId,
}

impl<M, S> EditablePolygon<M, S>
where
    M: MarkerManager,
    S: PointerSource,
{
    /// Starts a session: registers the (hidden) status indicator and
    /// subscribes to pointer-down on the surface.
    pub fn begin(mut markers: M, mut pointer: S, config: EditorConfig) -> Self {
        let status = StatusIndicator::register(&mut markers);
        let pointer_down = pointer.subscribe(PointerEventKind::Down);
        debug!(?config, "editing session started");
        Self {
            store: VertexStore::new(),
            registry: HandleRegistry::new(config.midpoint_handles),
            status,
            gestures: GestureClassifier::new(config.click_tolerance_px, config.click_to_add),
            markers,
            pointer,
            pointer_down,
        }
    }

    /// Appends a vertex at the end of the sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if handle bookkeeping is inconsistent.
    pub fn add_vertex(&mut self, lat: f64, lng: f64) -> Result<VertexId> {
        self.insert(None, GeoCoord::new(lat, lng))
    }

    /// Inserts a vertex immediately after `after` in sequence order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidReference` if `after` is not in the polygon.
    pub fn insert_vertex_after(&mut self, after: VertexId, lat: f64, lng: f64) -> Result<VertexId> {
        self.insert(Some(after), GeoCoord::new(lat, lng))
    }

    /// Moves a vertex and its handles.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnknownVertex` if `id` is not in the polygon.
    pub fn move_vertex(&mut self, id: VertexId, lat: f64, lng: f64) -> Result<()> {
        self.store.move_to(id, GeoCoord::new(lat, lng))?;
        self.registry
            .on_vertex_moved(&mut self.markers, &self.store, id)?;
        self.status.refresh(&mut self.markers, &self.store);
        debug!(vertex = %id, lat, lng, "moved vertex");
        Ok(())
    }

    /// Removes a vertex and its handles.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnknownVertex` if `id` is not in the polygon,
    /// or a `HandleError` if its handle bookkeeping is inconsistent. The
    /// polygon is left untouched on error.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<()> {
        if !self.store.contains(id) {
            return Err(TopologyError::UnknownVertex(id).into());
        }
        let plan = self.registry.plan_removal(&self.store, id)?;
        self.store.remove(id)?;
        self.registry
            .apply_removal(&mut self.markers, self.store.len(), plan);
        self.status.refresh(&mut self.markers, &self.store);
        debug!(vertex = %id, count = self.store.len(), "removed vertex");
        Ok(())
    }

    /// Inserts a vertex at `at` into the edge owned by a midpoint marker.
    ///
    /// # Errors
    ///
    /// Returns `HandleError::UnknownHandle` if `midpoint` is not a live
    /// midpoint marker of this polygon.
    pub fn split_edge(&mut self, midpoint: HandleRef, at: GeoCoord) -> Result<VertexId> {
        let Some(HandleTarget::Midpoint(key)) = self.registry.target(midpoint) else {
            return Err(HandleError::UnknownHandle.into());
        };
        let (start, _) = self
            .registry
            .midpoint(key)
            .ok_or(HandleError::UnknownHandle)?
            .edge();
        self.insert(Some(start), at)
    }

    /// Routes a marker interaction to the vertex or edge it is bound to.
    ///
    /// Returns the affected vertex, or `None` when the event has no effect.
    ///
    /// # Errors
    ///
    /// Returns `HandleError::UnknownHandle` for markers this polygon doesn't
    /// own, or any error from the resulting mutation.
    pub fn handle_event(&mut self, event: HandleEvent) -> Result<Option<VertexId>> {
        let result = self.dispatch(event);
        if let Err(err) = &result {
            warn!(%err, ?event, "handle event rejected");
        }
        result
    }

    /// Feeds a pointer-down on the surface to the gesture classifier.
    pub fn pointer_down(&mut self, event: &PointerEvent) {
        self.gestures.pointer_down(&mut self.pointer, event);
    }

    /// Feeds a pointer-up on the surface. A click adds a vertex where the
    /// scene resolves the release point.
    ///
    /// Returns the new vertex, or `None` if no vertex was added. A click off
    /// the mapped surface is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if adding the vertex breaks handle bookkeeping.
    pub fn pointer_up<P>(&mut self, scene: &P, event: &PointerEvent) -> Result<Option<VertexId>>
    where
        P: Projection + ?Sized,
    {
        let Gesture::Click(point) = self.gestures.pointer_up(&mut self.pointer, event) else {
            return Ok(None);
        };
        let coord = match GestureClassifier::resolve(scene, point) {
            Ok(coord) => coord,
            Err(PolyEditError::Projection(err)) => {
                debug!(%err, "click ignored");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        self.add_vertex(coord.lat, coord.lng).map(Some)
    }

    /// Suspends or resumes click-to-add.
    pub fn set_click_to_add(&mut self, enabled: bool) {
        self.gestures.set_click_to_add(enabled);
    }

    /// Whether clicks on the surface currently add vertices.
    #[must_use]
    pub fn click_to_add(&self) -> bool {
        self.gestures.click_to_add()
    }

    /// Vertex positions in sequence order.
    #[must_use]
    pub fn outline(&self) -> Vec<GeoCoord> {
        self.store.iter().map(|v| v.position).collect()
    }

    /// Vertex ids in sequence order.
    #[must_use]
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.store.ids()
    }

    /// Cyclic neighbors of a vertex.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnknownVertex` if `id` is not in the polygon.
    pub fn neighbors(&self, id: VertexId) -> Result<Neighbors> {
        Ok(self.store.neighbors(id)?)
    }

    /// Mean of the vertex positions, or `None` for an empty polygon.
    #[must_use]
    pub fn centroid(&self) -> Option<GeoCoord> {
        self.store.centroid()
    }

    /// Returns `true` if the polygon has at least three vertices.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.store.is_valid()
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the polygon has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The vertex sequence.
    #[must_use]
    pub fn vertices(&self) -> &VertexStore {
        &self.store
    }

    /// The status indicator.
    #[must_use]
    pub fn status(&self) -> &StatusIndicator {
        &self.status
    }

    /// The handle registry.
    #[must_use]
    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// The marker collaborator.
    #[must_use]
    pub fn markers(&self) -> &M {
        &self.markers
    }

    /// Ends the session: unregisters every handle and listener and hands the
    /// collaborators back.
    pub fn finish(mut self) -> (M, S) {
        self.gestures.disarm(&mut self.pointer);
        self.pointer.unsubscribe(self.pointer_down);
        self.registry.release_all(&mut self.markers);
        self.status.release(&mut self.markers);
        debug!(count = self.store.len(), "editing session finished");
        (self.markers, self.pointer)
    }

    fn insert(&mut self, after: Option<VertexId>, position: GeoCoord) -> Result<VertexId> {
        let id = self.store.insert_after(after, position)?;
        let neighbors = self.store.neighbors(id)?;
        self.registry
            .on_vertex_inserted(&mut self.markers, &self.store, id, neighbors)?;
        self.status.refresh(&mut self.markers, &self.store);
        debug!(
            vertex = %id,
            lat = position.lat,
            lng = position.lng,
            count = self.store.len(),
            "inserted vertex"
        );
        Ok(id)
    }

    fn dispatch(&mut self, event: HandleEvent) -> Result<Option<VertexId>> {
        match event {
            HandleEvent::Dragged { handle, to } => match self.target(handle)? {
                Some(HandleTarget::Vertex(id)) => {
                    self.move_vertex(id, to.lat, to.lng)?;
                    Ok(Some(id))
                }
                Some(HandleTarget::Midpoint(_)) | None => Ok(None),
            },
            HandleEvent::RemoveRequested { handle } => match self.target(handle)? {
                Some(HandleTarget::Vertex(id)) => {
                    self.remove_vertex(id)?;
                    Ok(Some(id))
                }
                Some(HandleTarget::Midpoint(_)) | None => Ok(None),
            },
            HandleEvent::MidpointActivated { handle, at } => self.split_edge(handle, at).map(Some),
        }
    }

    /// Resolves a marker; `None` for the status indicator.
    fn target(&self, handle: HandleRef) -> Result<Option<HandleTarget>> {
        if handle == self.status.handle() {
            return Ok(None);
        }
        self.registry
            .target(handle)
            .map(Some)
            .ok_or_else(|| HandleError::UnknownHandle.into())
    }
}
