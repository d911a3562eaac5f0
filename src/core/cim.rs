use crate::core::algorithm::{check_entities, surface_distance, Algorithm};
use crate::core::entity::{Footprint, SurfaceEntity};
use crate::core::grid::{Boundary, Grid};
use crate::core::neighbours::NeighbourMap;
use crate::core::offset::{Offset, TraversalOffset};
use crate::core::params::CimParameters;
use crate::error::Result;
use log::{debug, trace, warn};
use std::collections::BTreeSet;

/// Cell Index Method neighbour search.
///
/// Entities are bucketed into an `M x M` grid; each entity is then compared only against
/// the entities of its own cell and of the half-neighbour cells, and every hit is recorded
/// on both sides. When a cell is narrower than `cutoff + 2 * max_radius` the half pattern
/// grows by as many rings as needed, so the result does not depend on `M`.
#[derive(Debug, Clone, Copy)]
pub struct CellIndexMethod {
    params: CimParameters,
}

impl CellIndexMethod {
    /// A search over the domain and grid described by `params`.
    pub fn new(params: CimParameters) -> Self {
        Self { params }
    }

    /// The parameters this search was built with.
    pub fn params(&self) -> &CimParameters {
        &self.params
    }
}

impl Algorithm for CellIndexMethod {
    fn neighbours(&self, entities: &[SurfaceEntity]) -> Result<NeighbourMap> {
        let max_radius = check_entities(entities)?;
        let p = &self.params;
        let boundary = p.boundary();
        let mut grid = Grid::new(p.domain_size(), p.num_cells())?;

        let placed: Vec<(f64, f64)> = entities
            .iter()
            .map(|e| {
                let (x, y) = e.position();
                if let Err(err) = grid.check_in_range(x, y) {
                    warn!("entity {}: {err}", e.id());
                }
                match boundary {
                    Boundary::Periodic => (grid.wrap(x), grid.wrap(y)),
                    Boundary::Open => (x, y),
                }
            })
            .collect();
        for (k, &(x, y)) in placed.iter().enumerate() {
            grid.place(k, x, y);
        }

        let reach = p.cutoff() + 2.0 * max_radius;
        let rings = grid.rings_for(reach, boundary);
        if rings > 1 {
            trace!(
                "cell side {} is below reach {reach}; scanning {rings} rings",
                grid.cell_size()
            );
        }
        let offsets = TraversalOffset::half(rings);

        let mut scan: Vec<Option<Vec<usize>>> = vec![None; grid.cells().len()];
        let mut sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); entities.len()];
        for (k, e) in entities.iter().enumerate() {
            let (x, y) = placed[k];
            let own = grid.index_of(grid.locate(x, y));
            let targets = scan[own].get_or_insert_with(|| scan_list(&grid, own, &offsets, boundary));
            for &c in targets.iter() {
                for &other in grid.cells()[c].entities() {
                    if other == k {
                        continue;
                    }
                    if surface_distance(e, &entities[other], p.domain_size(), boundary) <= p.cutoff() {
                        sets[k].insert(other);
                        sets[other].insert(k);
                    }
                }
            }
        }

        let map = NeighbourMap::from_indexed(entities, sets);
        debug!(
            "cell index method: {} entities, {} neighbour pairs, M = {}, rings = {rings}",
            entities.len(),
            map.pair_count(),
            p.num_cells()
        );
        Ok(map)
    }
}

/// Cell `own` followed by its half-pattern neighbours, each cell once.
fn scan_list(grid: &Grid, own: usize, offsets: &[Offset], boundary: Boundary) -> Vec<usize> {
    let cell = &grid.cells()[own];
    let mut list: Vec<usize> = grid
        .neighbours_of(cell, offsets, boundary)
        .into_iter()
        .map(|n| grid.index_of(n))
        .filter(|&idx| idx != own)
        .collect();
    list.sort_unstable();
    list.dedup();
    list.insert(0, own);
    list
}
