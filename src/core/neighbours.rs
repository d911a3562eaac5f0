use crate::core::entity::{EntityId, SurfaceEntity};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// Result of a neighbour search: for each entity, the ids recorded as its neighbours.
///
/// Every searched entity has a key, possibly mapped to an empty set. Iteration is ordered by
/// entity id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighbourMap {
    neighbours: BTreeMap<EntityId, BTreeSet<EntityId>>,
}

impl NeighbourMap {
    /// Collapse per-index accumulators into an id-keyed map.
    ///
    /// `sets[k]` holds arena indices into `entities` and belongs to `entities[k]`.
    pub(crate) fn from_indexed(entities: &[SurfaceEntity], sets: Vec<BTreeSet<usize>>) -> Self {
        let neighbours = entities
            .iter()
            .zip(sets)
            .map(|(e, set)| (e.id(), set.into_iter().map(|k| entities[k].id()).collect()))
            .collect();
        Self { neighbours }
    }

    /// Neighbours of `id`, or `None` if `id` was not part of the search.
    pub fn get(&self, id: EntityId) -> Option<&BTreeSet<EntityId>> {
        self.neighbours.get(&id)
    }

    /// Whether `b` was recorded as a neighbour of `a`.
    pub fn are_neighbours(&self, a: EntityId, b: EntityId) -> bool {
        self.neighbours.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Number of entities (keys), including those without neighbours.
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    /// Whether the search covered no entities at all.
    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }

    /// Entities and their neighbour sets, ordered by id.
    pub fn iter(&self) -> btree_map::Iter<'_, EntityId, BTreeSet<EntityId>> {
        self.neighbours.iter()
    }

    /// Unordered neighbour pairs as `(a, b)` with `a < b`.
    pub fn pairs(&self) -> Vec<(EntityId, EntityId)> {
        self.neighbours
            .iter()
            .flat_map(|(&a, set)| set.range(a..).filter(move |&&b| b != a).map(move |&b| (a, b)))
            .collect()
    }

    /// Number of unordered neighbour pairs.
    pub fn pair_count(&self) -> usize {
        self.neighbours.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Whether the relation is symmetric and irreflexive.
    pub fn is_consistent(&self) -> bool {
        self.neighbours.iter().all(|(&a, set)| {
            !set.contains(&a) && set.iter().all(|&b| self.are_neighbours(b, a))
        })
    }
}

impl<'a> IntoIterator for &'a NeighbourMap {
    type Item = (&'a EntityId, &'a BTreeSet<EntityId>);
    type IntoIter = btree_map::Iter<'a, EntityId, BTreeSet<EntityId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
