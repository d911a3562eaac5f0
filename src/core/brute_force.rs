use crate::core::algorithm::{check_entities, surface_distance, Algorithm};
use crate::core::entity::SurfaceEntity;
use crate::core::neighbours::NeighbourMap;
use crate::core::params::CimParameters;
use crate::error::Result;
use log::debug;
use std::collections::BTreeSet;

/// Exhaustive all-pairs search. Reference for [`CellIndexMethod`](crate::core::CellIndexMethod);
/// `num_cells` is ignored.
#[derive(Debug, Clone, Copy)]
pub struct BruteForce {
    params: CimParameters,
}

impl BruteForce {
    /// Exhaustive search with the domain, cutoff and boundary of `params`. `M` is ignored.
    pub fn new(params: CimParameters) -> Self {
        Self { params }
    }
}

impl Algorithm for BruteForce {
    fn neighbours(&self, entities: &[SurfaceEntity]) -> Result<NeighbourMap> {
        check_entities(entities)?;
        let p = &self.params;
        let mut sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); entities.len()];
        for (i, a) in entities.iter().enumerate() {
            for (j, b) in entities.iter().enumerate().skip(i + 1) {
                if surface_distance(a, b, p.domain_size(), p.boundary()) <= p.cutoff() {
                    sets[i].insert(j);
                    sets[j].insert(i);
                }
            }
        }
        let map = NeighbourMap::from_indexed(entities, sets);
        debug!(
            "brute force: {} entities, {} neighbour pairs",
            entities.len(),
            map.pair_count()
        );
        Ok(map)
    }
}
