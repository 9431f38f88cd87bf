pub mod vertex;

pub use vertex::{Vertex, VertexId};

use crate::error::TopologyError;
use crate::math::{self, GeoCoord};

/// Minimum number of vertices for a closed, renderable polygon.
pub const MIN_VALID_VERTICES: usize = 3;

/// Cyclic predecessor and successor of a vertex.
///
/// Both are `None` for a lone vertex. With two vertices they coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors {
    pub prev: Option<VertexId>,
    pub next: Option<VertexId>,
}

/// Ordered, cyclic sequence of polygon vertices.
///
/// The sequence order defines adjacency and winding; the last vertex
/// connects back to the first. Ids come from a monotonic counter and are
/// never handed out twice.
#[derive(Debug, Default)]
pub struct VertexStore {
    vertices: Vec<Vertex>,
    next_id: u64,
}

impl VertexStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a vertex immediately after `after` in sequence order, or
    /// appends it when `after` is `None`. Returns the new vertex's id.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidReference` if `after` is not in the store.
    pub fn insert_after(
        &mut self,
        after: Option<VertexId>,
        position: GeoCoord,
    ) -> Result<VertexId, TopologyError> {
        let index = match after {
            Some(reference) => {
                self.index_of(reference)
                    .ok_or(TopologyError::InvalidReference(reference))?
                    + 1
            }
            None => self.vertices.len(),
        };

        let id = VertexId::new(self.next_id);
        self.next_id += 1;
        self.vertices.insert(index, Vertex { id, position });
        Ok(id)
    }

    /// Moves a vertex. Ordering and neighbors are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnknownVertex` if `id` is not in the store.
    pub fn move_to(&mut self, id: VertexId, position: GeoCoord) -> Result<(), TopologyError> {
        let vertex = self
            .vertices
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(TopologyError::UnknownVertex(id))?;
        vertex.position = position;
        Ok(())
    }

    /// Removes a vertex, closing the gap in cyclic order. Returns the removed vertex.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnknownVertex` if `id` is not in the store.
    pub fn remove(&mut self, id: VertexId) -> Result<Vertex, TopologyError> {
        let index = self.index_of(id).ok_or(TopologyError::UnknownVertex(id))?;
        Ok(self.vertices.remove(index))
    }

    /// Returns the cyclic predecessor and successor of `id`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnknownVertex` if `id` is not in the store.
    pub fn neighbors(&self, id: VertexId) -> Result<Neighbors, TopologyError> {
        let index = self.index_of(id).ok_or(TopologyError::UnknownVertex(id))?;
        let n = self.vertices.len();
        if n < 2 {
            return Ok(Neighbors::default());
        }
        Ok(Neighbors {
            prev: Some(self.vertices[(index + n - 1) % n].id),
            next: Some(self.vertices[(index + 1) % n].id),
        })
    }

    /// Arithmetic mean of all vertex positions, or `None` when empty.
    #[must_use]
    pub fn centroid(&self) -> Option<GeoCoord> {
        math::mean(self.vertices.iter().map(|v| v.position))
    }

    /// Returns `true` if the store holds enough vertices to form a polygon.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= MIN_VALID_VERTICES
    }

    /// Returns the position of a vertex, or `None` if it is not in the store.
    #[must_use]
    pub fn position(&self, id: VertexId) -> Option<GeoCoord> {
        self.vertices
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.position)
    }

    /// Returns `true` if `id` is currently in the store.
    #[must_use]
    pub fn contains(&self, id: VertexId) -> bool {
        self.index_of(id).is_some()
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the store holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates vertices in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Vertex ids in sequence order.
    #[must_use]
    pub fn ids(&self) -> Vec<VertexId> {
        self.vertices.iter().map(|v| v.id).collect()
    }

    fn index_of(&self, id: VertexId) -> Option<usize> {
        self.vertices.iter().position(|v| v.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;
    use approx::assert_abs_diff_eq;

    fn triangle() -> VertexStore {
        let mut store = VertexStore::new();
        store.insert_after(None, GeoCoord::new(10.0, 20.0)).unwrap();
        store
            .insert_after(Some(VertexId::new(0)), GeoCoord::new(11.0, 21.0))
            .unwrap();
        store
            .insert_after(Some(VertexId::new(1)), GeoCoord::new(9.0, 19.0))
            .unwrap();
        store
    }

    fn raw_ids(store: &VertexStore) -> Vec<u64> {
        store.ids().into_iter().map(VertexId::raw).collect()
    }

    #[test]
    fn ids_are_sequential_from_zero() {
        let store = triangle();
        assert_eq!(raw_ids(&store), vec![0, 1, 2]);
        assert!(store.is_valid());
        let c = store.centroid().unwrap();
        assert_abs_diff_eq!(c.lat, 10.0, epsilon = TOLERANCE);
        assert_abs_diff_eq!(c.lng, 20.0, epsilon = TOLERANCE);
    }

    #[test]
    fn remove_middle_recomputes_centroid() {
        let mut store = triangle();
        store.remove(VertexId::new(1)).unwrap();
        assert_eq!(raw_ids(&store), vec![0, 2]);
        assert!(!store.is_valid());
        let c = store.centroid().unwrap();
        assert_abs_diff_eq!(c.lat, 9.5, epsilon = TOLERANCE);
        assert_abs_diff_eq!(c.lng, 19.5, epsilon = TOLERANCE);
    }

    #[test]
    fn positional_insert_lands_after_reference() {
        let mut store = triangle();
        let id = store
            .insert_after(Some(VertexId::new(0)), GeoCoord::new(0.0, 0.0))
            .unwrap();
        assert_eq!(id, VertexId::new(3));
        assert_eq!(raw_ids(&store), vec![0, 3, 1, 2]);
    }

    #[test]
    fn insert_after_last_appends() {
        let mut store = triangle();
        store
            .insert_after(Some(VertexId::new(2)), GeoCoord::new(0.0, 0.0))
            .unwrap();
        assert_eq!(raw_ids(&store), vec![0, 1, 2, 3]);
    }

    #[test]
    fn insert_after_missing_reference_fails() {
        let mut store = triangle();
        let err = store
            .insert_after(Some(VertexId::new(42)), GeoCoord::new(0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, TopologyError::InvalidReference(VertexId::new(42)));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut store = triangle();
        store.remove(VertexId::new(2)).unwrap();
        let id = store.insert_after(None, GeoCoord::new(1.0, 1.0)).unwrap();
        assert_eq!(id, VertexId::new(3));
    }

    #[test]
    fn move_keeps_order() {
        let mut store = triangle();
        store
            .move_to(VertexId::new(1), GeoCoord::new(50.0, 60.0))
            .unwrap();
        assert_eq!(raw_ids(&store), vec![0, 1, 2]);
        assert_eq!(
            store.position(VertexId::new(1)),
            Some(GeoCoord::new(50.0, 60.0))
        );
    }

    #[test]
    fn unknown_vertex_errors() {
        let mut store = triangle();
        let missing = VertexId::new(7);
        assert_eq!(
            store.move_to(missing, GeoCoord::default()).unwrap_err(),
            TopologyError::UnknownVertex(missing)
        );
        assert_eq!(
            store.remove(missing).unwrap_err(),
            TopologyError::UnknownVertex(missing)
        );
        assert_eq!(
            store.neighbors(missing).unwrap_err(),
            TopologyError::UnknownVertex(missing)
        );
    }

    #[test]
    fn neighbors_wrap_around() {
        let store = triangle();
        let n = store.neighbors(VertexId::new(0)).unwrap();
        assert_eq!(n.prev, Some(VertexId::new(2)));
        assert_eq!(n.next, Some(VertexId::new(1)));
        let n = store.neighbors(VertexId::new(2)).unwrap();
        assert_eq!(n.prev, Some(VertexId::new(1)));
        assert_eq!(n.next, Some(VertexId::new(0)));
    }

    #[test]
    fn neighbors_of_small_polygons() {
        let mut store = VertexStore::new();
        let a = store.insert_after(None, GeoCoord::default()).unwrap();
        assert_eq!(store.neighbors(a).unwrap(), Neighbors::default());

        let b = store.insert_after(None, GeoCoord::default()).unwrap();
        let n = store.neighbors(a).unwrap();
        assert_eq!(n.prev, Some(b));
        assert_eq!(n.next, Some(b));
    }

    #[test]
    fn cyclic_neighbors_are_consistent() {
        let mut store = triangle();
        store
            .insert_after(Some(VertexId::new(1)), GeoCoord::new(3.0, 3.0))
            .unwrap();
        for id in store.ids() {
            let next = store.neighbors(id).unwrap().next.unwrap();
            assert_eq!(store.neighbors(next).unwrap().prev, Some(id));
        }
    }

    #[test]
    fn empty_store() {
        let store = VertexStore::new();
        assert!(store.is_empty());
        assert!(store.centroid().is_none());
        assert!(!store.is_valid());
    }
}
