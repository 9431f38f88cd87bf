use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::trace;

use crate::error::{HandleError, Result, TopologyError};
use crate::markers::{DragHandle, HandleRef, Marker, MarkerManager, MidpointHandle, MidpointKey};
use crate::math::GeoCoord;
use crate::topology::{Neighbors, VertexId, VertexStore};

/// Minimum vertex count at which midpoint handles are shown.
const MIN_VISIBLE_MIDPOINT_VERTICES: usize = 2;

/// What a registered marker is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleTarget {
    /// Drag handle of a vertex.
    Vertex(VertexId),
    /// Midpoint handle of an edge.
    Midpoint(MidpointKey),
}

/// Midpoint handles of the two edges incident to a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncidentMidpoints {
    /// Handle of the edge `(prev, v)`.
    pub prev: MidpointKey,
    /// Handle of the edge `(v, next)`.
    pub next: MidpointKey,
}

/// How the midpoint handles of a vertex go away on removal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeMerge {
    /// The vertex was alone; its self-loop handle is unregistered.
    SelfLoop(MidpointKey),
    /// The edges `(prev, v)` and `(v, next)` join into `(prev, next)`.
    Join {
        survivor: MidpointKey,
        discarded: MidpointKey,
        prev: VertexId,
        next: VertexId,
        position: GeoCoord,
    },
}

/// Checked removal of one vertex's handles, produced by
/// [`HandleRegistry::plan_removal`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemovalPlan {
    drag: DragHandle,
    merge: Option<EdgeMerge>,
}

/// Owns the mapping from vertex identity to its handles.
///
/// Each live vertex owns one [`DragHandle`]. Each live edge owns one
/// [`MidpointHandle`]; a closed polygon has as many edges as vertices, so the
/// two counts always match. A lone vertex owns the self-loop edge `(v, v)`.
///
/// Inserting a vertex between `prev` and `next` splits the edge
/// `(prev, next)`: its handle is rebound to `(prev, new)` and a fresh handle
/// is registered for `(new, next)`. Removing a vertex merges its two incident
/// edges: the prev-side handle survives, rebound to `(prev, next)`, and the
/// next-side handle is unregistered.
#[derive(Debug)]
pub struct HandleRegistry {
    drag: HashMap<VertexId, DragHandle>,
    midpoints: SlotMap<MidpointKey, MidpointHandle>,
    incident: HashMap<VertexId, IncidentMidpoints>,
    owners: HashMap<HandleRef, HandleTarget>,
    midpoints_enabled: bool,
    midpoints_visible: bool,
}

impl HandleRegistry {
    /// Creates an empty registry. With `midpoints_enabled` off, only drag
    /// handles are maintained.
    #[must_use]
    pub fn new(midpoints_enabled: bool) -> Self {
        Self {
            drag: HashMap::new(),
            midpoints: SlotMap::with_key(),
            incident: HashMap::new(),
            owners: HashMap::new(),
            midpoints_enabled,
            midpoints_visible: false,
        }
    }

    /// Registers handles for a vertex that `store` already contains.
    ///
    /// `neighbors` are the vertex's cyclic neighbors after insertion.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnknownVertex` if `id` or a neighbor is not in
    /// `store`, or `HandleError::MissingMidpoint` if a neighbor has no
    /// midpoint bookkeeping.
    pub fn on_vertex_inserted<M: MarkerManager>(
        &mut self,
        markers: &mut M,
        store: &VertexStore,
        id: VertexId,
        neighbors: Neighbors,
    ) -> Result<()> {
        let position = store
            .position(id)
            .ok_or(TopologyError::UnknownVertex(id))?;

        if self.midpoints_enabled {
            self.split_edge(markers, store, id, neighbors)?;
        }

        let drag = DragHandle::register(markers, id, position);
        self.owners.insert(drag.handle(), HandleTarget::Vertex(id));
        self.drag.insert(id, drag);

        self.sync_midpoint_visibility(markers, store.len());
        Ok(())
    }

    /// Releases the handles of a removed vertex.
    ///
    /// Equivalent to [`plan_removal`](Self::plan_removal) followed by
    /// [`apply_removal`](Self::apply_removal); `store` may or may not still
    /// contain `id`.
    ///
    /// # Errors
    ///
    /// See [`plan_removal`](Self::plan_removal). Nothing is released on error.
    pub fn on_vertex_removed<M: MarkerManager>(
        &mut self,
        markers: &mut M,
        store: &VertexStore,
        id: VertexId,
    ) -> Result<()> {
        let plan = self.plan_removal(store, id)?;
        let remaining = if store.contains(id) {
            store.len() - 1
        } else {
            store.len()
        };
        self.apply_removal(markers, remaining, plan);
        Ok(())
    }

    /// Checks the bookkeeping around `id` and works out how its handles go
    /// away, without touching anything.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnknownVertex` if `id` has no drag handle or a
    /// neighbor is missing from `store`, `HandleError::MissingMidpoint` if
    /// midpoint bookkeeping around `id` is incomplete, or
    /// `HandleError::UnknownHandle` if an incident midpoint is gone.
    pub fn plan_removal(&self, store: &VertexStore, id: VertexId) -> Result<RemovalPlan> {
        let drag = *self.drag.get(&id).ok_or(TopologyError::UnknownVertex(id))?;
        let Some(incident) = self.incident.get(&id).copied() else {
            if self.midpoints_enabled {
                return Err(HandleError::MissingMidpoint(id).into());
            }
            return Ok(RemovalPlan { drag, merge: None });
        };

        if incident.prev == incident.next {
            if !self.midpoints.contains_key(incident.prev) {
                return Err(HandleError::UnknownHandle.into());
            }
            return Ok(RemovalPlan {
                drag,
                merge: Some(EdgeMerge::SelfLoop(incident.prev)),
            });
        }

        let (prev, _) = self
            .midpoints
            .get(incident.prev)
            .ok_or(HandleError::UnknownHandle)?
            .edge();
        let (_, next) = self
            .midpoints
            .get(incident.next)
            .ok_or(HandleError::UnknownHandle)?
            .edge();
        if !self.incident.contains_key(&next) {
            return Err(HandleError::MissingMidpoint(next).into());
        }
        let position = edge_midpoint(store, prev, next)?;

        Ok(RemovalPlan {
            drag,
            merge: Some(EdgeMerge::Join {
                survivor: incident.prev,
                discarded: incident.next,
                prev,
                next,
                position,
            }),
        })
    }

    /// Releases handles as worked out by [`plan_removal`](Self::plan_removal).
    ///
    /// `remaining` is the vertex count once the vertex is gone.
    pub fn apply_removal<M: MarkerManager>(
        &mut self,
        markers: &mut M,
        remaining: usize,
        plan: RemovalPlan,
    ) {
        let id = plan.drag.vertex();
        self.drag.remove(&id);
        self.incident.remove(&id);
        self.owners.remove(&plan.drag.handle());
        plan.drag.release(markers);

        match plan.merge {
            Some(EdgeMerge::SelfLoop(key)) => self.discard_midpoint(markers, key),
            Some(EdgeMerge::Join {
                survivor,
                discarded,
                prev,
                next,
                position,
            }) => {
                self.discard_midpoint(markers, discarded);
                if let Some(midpoint) = self.midpoints.get_mut(survivor) {
                    midpoint.rebind(prev, next);
                    midpoint.set_position(markers, position);
                }
                if let Some(incident) = self.incident.get_mut(&next) {
                    incident.prev = survivor;
                }
                trace!(%prev, %next, "merged edge midpoints");
            }
            None => {}
        }

        self.sync_midpoint_visibility(markers, remaining);
    }

    /// Repositions the drag handle of `id` and the midpoints of its two edges.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnknownVertex` if `id` has no drag handle or is
    /// not in `store`.
    pub fn on_vertex_moved<M: MarkerManager>(
        &mut self,
        markers: &mut M,
        store: &VertexStore,
        id: VertexId,
    ) -> Result<()> {
        let drag = self.drag.get(&id).ok_or(TopologyError::UnknownVertex(id))?;
        let position = store
            .position(id)
            .ok_or(TopologyError::UnknownVertex(id))?;
        drag.set_position(markers, position);

        if let Some(incident) = self.incident.get(&id).copied() {
            self.reposition_midpoint(markers, store, incident.prev)?;
            if incident.next != incident.prev {
                self.reposition_midpoint(markers, store, incident.next)?;
            }
        }
        Ok(())
    }

    /// Unregisters every handle. The registry is empty afterwards.
    pub fn release_all<M: MarkerManager>(&mut self, markers: &mut M) {
        for (_, drag) in self.drag.drain() {
            drag.release(markers);
        }
        for (_, midpoint) in self.midpoints.drain() {
            midpoint.release(markers);
        }
        self.incident.clear();
        self.owners.clear();
        self.midpoints_visible = false;
    }

    /// Resolves a marker reference to what it is bound to.
    #[must_use]
    pub fn target(&self, handle: HandleRef) -> Option<HandleTarget> {
        self.owners.get(&handle).copied()
    }

    /// Drag handle of a vertex.
    #[must_use]
    pub fn drag_handle(&self, id: VertexId) -> Option<&DragHandle> {
        self.drag.get(&id)
    }

    /// Midpoint handle by key.
    #[must_use]
    pub fn midpoint(&self, key: MidpointKey) -> Option<&MidpointHandle> {
        self.midpoints.get(key)
    }

    /// Midpoint handles of the two edges incident to `id`.
    #[must_use]
    pub fn incident_midpoints(&self, id: VertexId) -> Option<IncidentMidpoints> {
        self.incident.get(&id).copied()
    }

    /// Number of live drag handles.
    #[must_use]
    pub fn drag_count(&self) -> usize {
        self.drag.len()
    }

    /// Number of live midpoint handles.
    #[must_use]
    pub fn midpoint_count(&self) -> usize {
        self.midpoints.len()
    }

    /// Iterates live midpoint handles.
    pub fn midpoints(&self) -> impl Iterator<Item = (MidpointKey, &MidpointHandle)> {
        self.midpoints.iter()
    }

    fn split_edge<M: MarkerManager>(
        &mut self,
        markers: &mut M,
        store: &VertexStore,
        id: VertexId,
        neighbors: Neighbors,
    ) -> Result<()> {
        let (Some(prev), Some(next)) = (neighbors.prev, neighbors.next) else {
            let key = self.register_midpoint(markers, store, id, id)?;
            self.incident.insert(id, IncidentMidpoints { prev: key, next: key });
            trace!(vertex = %id, "registered self-loop midpoint");
            return Ok(());
        };

        let split = self
            .incident
            .get(&prev)
            .ok_or(HandleError::MissingMidpoint(prev))?
            .next;
        if !self.incident.contains_key(&next) {
            return Err(HandleError::MissingMidpoint(next).into());
        }

        let fresh = self.register_midpoint(markers, store, id, next)?;
        if let Some(midpoint) = self.midpoints.get_mut(split) {
            midpoint.rebind(prev, id);
        }
        self.reposition_midpoint(markers, store, split)?;

        if let Some(incident) = self.incident.get_mut(&next) {
            incident.prev = fresh;
        }
        self.incident.insert(id, IncidentMidpoints { prev: split, next: fresh });
        trace!(vertex = %id, %prev, %next, "split edge midpoint");
        Ok(())
    }

    fn discard_midpoint<M: MarkerManager>(&mut self, markers: &mut M, key: MidpointKey) {
        if let Some(midpoint) = self.midpoints.remove(key) {
            self.owners.remove(&midpoint.handle());
            midpoint.release(markers);
        }
    }

    fn register_midpoint<M: MarkerManager>(
        &mut self,
        markers: &mut M,
        store: &VertexStore,
        start: VertexId,
        end: VertexId,
    ) -> Result<MidpointKey> {
        let position = edge_midpoint(store, start, end)?;
        let midpoint = MidpointHandle::register(markers, start, end, position);
        midpoint.set_visible(markers, self.midpoints_visible);
        let handle = midpoint.handle();
        let key = self.midpoints.insert(midpoint);
        self.owners.insert(handle, HandleTarget::Midpoint(key));
        Ok(key)
    }

    fn reposition_midpoint<M: MarkerManager>(
        &self,
        markers: &mut M,
        store: &VertexStore,
        key: MidpointKey,
    ) -> Result<()> {
        let midpoint = self.midpoints.get(key).ok_or(HandleError::UnknownHandle)?;
        let (start, end) = midpoint.edge();
        midpoint.set_position(markers, edge_midpoint(store, start, end)?);
        Ok(())
    }

    fn sync_midpoint_visibility<M: MarkerManager>(&mut self, markers: &mut M, vertex_count: usize) {
        let visible = vertex_count >= MIN_VISIBLE_MIDPOINT_VERTICES;
        if visible == self.midpoints_visible {
            return;
        }
        self.midpoints_visible = visible;
        for midpoint in self.midpoints.values() {
            midpoint.set_visible(markers, visible);
        }
    }
}

fn edge_midpoint(store: &VertexStore, start: VertexId, end: VertexId) -> Result<GeoCoord> {
    let a = store
        .position(start)
        .ok_or(TopologyError::UnknownVertex(start))?;
    let b = store
        .position(end)
        .ok_or(TopologyError::UnknownVertex(end))?;
    Ok(a.midpoint(b))
}
