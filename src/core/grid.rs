use crate::core::cell::{box_intersects_circle, Cell};
use crate::core::entity::Footprint;
use crate::core::offset::{Offset, TraversalOffset};
use crate::core::params::MAX_CELLS_PER_SIDE;
use crate::error::{Error, Result};
use log::debug;

/// How the edges of the domain behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Opposite edges are glued together; distances follow the minimum-image convention.
    #[default]
    Periodic,
    /// Hard edges; offsets leaving the grid are dropped.
    Open,
}

/// An `L x L` domain split into `M x M` square cells of side `L / M`.
///
/// Cells are stored row-major: cell `(i, j)` lives at `j * M + i`, with `i` along x.
#[derive(Debug, Clone)]
pub struct Grid {
    domain_size: f64,
    num_cells: usize,
    cell_size: f64,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build an empty grid.
    ///
    /// Errors:
    /// - `Error::Configuration` if `num_cells` is 0 or above [`MAX_CELLS_PER_SIDE`], or
    ///   `domain_size` is not finite and > 0.
    pub fn new(domain_size: f64, num_cells: usize) -> Result<Self> {
        if num_cells == 0 {
            return Err(Error::config("num_cells must be > 0"));
        }
        if num_cells > MAX_CELLS_PER_SIDE {
            return Err(Error::config(format!(
                "num_cells must be <= {MAX_CELLS_PER_SIDE}, got {num_cells}"
            )));
        }
        if !domain_size.is_finite() || domain_size <= 0.0 {
            return Err(Error::config("domain_size must be finite and > 0"));
        }
        let total = num_cells
            .checked_mul(num_cells)
            .ok_or_else(|| Error::config("num_cells squared overflows"))?;
        let cell_size = domain_size / num_cells as f64;
        let mut cells = Vec::with_capacity(total);
        for j in 0..num_cells {
            for i in 0..num_cells {
                cells.push(Cell::new(i, j, cell_size));
            }
        }
        debug!("grid {domain_size}x{domain_size} split into {num_cells}x{num_cells} cells of side {cell_size}");
        Ok(Self {
            domain_size,
            num_cells,
            cell_size,
            cells,
        })
    }

    /// Side `L` of the square domain.
    #[inline]
    pub fn domain_size(&self) -> f64 {
        self.domain_size
    }

    /// Cells per side (`M`).
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// Side of one cell, `L / M`.
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell at `(i, j)`, if inside the grid.
    pub fn cell(&self, i: usize, j: usize) -> Option<&Cell> {
        if i < self.num_cells && j < self.num_cells {
            Some(&self.cells[self.index(i, j)])
        } else {
            None
        }
    }

    /// Row-major position of `cell` in [`cells`](Self::cells).
    #[inline]
    pub fn index_of(&self, cell: &Cell) -> usize {
        self.index(cell.i(), cell.j())
    }

    /// Cell coordinates owning `(x, y)`.
    ///
    /// Each axis maps through `min(floor(c * M / L), M - 1)`; negative and NaN
    /// coordinates land in column/row 0.
    pub fn coords(&self, x: f64, y: f64) -> (usize, usize) {
        (self.axis(x), self.axis(y))
    }

    /// The cell owning `(x, y)`.
    pub fn locate(&self, x: f64, y: f64) -> &Cell {
        let (i, j) = self.coords(x, y);
        &self.cells[self.index(i, j)]
    }

    /// Add arena index `entity` to the cell owning `(x, y)`.
    pub fn place(&mut self, entity: usize, x: f64, y: f64) {
        let (i, j) = self.coords(x, y);
        let idx = self.index(i, j);
        self.cells[idx].place(entity);
    }

    /// Errors:
    /// - `Error::OutOfRange` if `(x, y)` lies outside `[0, L)` on either axis.
    pub fn check_in_range(&self, x: f64, y: f64) -> Result<()> {
        let inside = |c: f64| (0.0..self.domain_size).contains(&c);
        if inside(x) && inside(y) {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                x,
                y,
                domain_size: self.domain_size,
            })
        }
    }

    /// Fold a coordinate back into `[0, L)`.
    pub fn wrap(&self, c: f64) -> f64 {
        c.rem_euclid(self.domain_size)
    }

    /// Cells at each of `offsets` from `cell`, in offset order.
    ///
    /// With [`Boundary::Open`] offsets falling outside the grid are skipped. With
    /// [`Boundary::Periodic`] indices wrap modulo `M`, so on small grids the same cell may
    /// appear more than once.
    pub fn neighbours_of(&self, cell: &Cell, offsets: &[Offset], boundary: Boundary) -> Vec<&Cell> {
        offsets
            .iter()
            .filter_map(|&offset| self.shifted(cell.i(), cell.j(), offset, boundary))
            .map(|(i, j)| &self.cells[self.index(i, j)])
            .collect()
    }

    /// The owning cell of `(x, y)` followed by every other cell whose box intersects the
    /// disk of radius `r` around it. Each cell appears once.
    ///
    /// In periodic mode a neighbour is tested at its unwrapped position next to the owning
    /// cell, so disks crossing an edge pick up cells on the opposite side.
    pub fn locate_footprint(&self, x: f64, y: f64, r: f64, boundary: Boundary) -> Vec<&Cell> {
        let (x, y) = match boundary {
            Boundary::Periodic => (self.wrap(x), self.wrap(y)),
            Boundary::Open => (x, y),
        };
        let (ci, cj) = self.coords(x, y);
        let mut seen = vec![self.index(ci, cj)];

        let rings = ((r / self.cell_size).ceil() as usize).clamp(1, self.num_cells);
        for (di, dj) in TraversalOffset::moore(rings) {
            let min_x = (ci as i64 + di) as f64 * self.cell_size;
            let min_y = (cj as i64 + dj) as f64 * self.cell_size;
            if !box_intersects_circle(min_x, min_y, self.cell_size, x, y, r) {
                continue;
            }
            if let Some((i, j)) = self.shifted(ci, cj, (di, dj), boundary) {
                let idx = self.index(i, j);
                if !seen.contains(&idx) {
                    seen.push(idx);
                }
            }
        }
        seen.into_iter().map(|idx| &self.cells[idx]).collect()
    }

    /// Place `entity` in every cell its footprint overlaps. Returns the number of cells.
    pub fn place_footprint<F: Footprint + ?Sized>(
        &mut self,
        entity: usize,
        footprint: &F,
        boundary: Boundary,
    ) -> usize {
        let (x, y) = footprint.position();
        let targets: Vec<usize> = self
            .locate_footprint(x, y, footprint.radius(), boundary)
            .into_iter()
            .map(|cell| self.index_of(cell))
            .collect();
        for &idx in &targets {
            self.cells[idx].place(entity);
        }
        targets.len()
    }

    /// Number of cell rings a traversal must cover so that every pair of points within
    /// `reach` of each other lies in cells at most that many rings apart.
    ///
    /// Capped where further rings would only revisit cells already covered. An infinite
    /// reach (radii so large that their sum overflows) takes the cap.
    pub fn rings_for(&self, reach: f64, boundary: Boundary) -> usize {
        let cap = match boundary {
            Boundary::Periodic => self.num_cells / 2,
            Boundary::Open => self.num_cells - 1,
        }
        .max(1);
        let k = (reach * self.num_cells as f64 / self.domain_size).ceil();
        if k.is_nan() || k < 1.0 {
            1
        } else if k.is_infinite() {
            cap
        } else {
            (k as usize).min(cap)
        }
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        j * self.num_cells + i
    }

    #[inline]
    fn axis(&self, c: f64) -> usize {
        // `as` saturates: negatives and NaN become 0.
        let raw = (c * self.num_cells as f64 / self.domain_size) as usize;
        raw.min(self.num_cells - 1)
    }

    fn shifted(&self, i: usize, j: usize, (di, dj): Offset, boundary: Boundary) -> Option<(usize, usize)> {
        let m = self.num_cells as i64;
        let (ni, nj) = (i as i64 + di, j as i64 + dj);
        match boundary {
            Boundary::Periodic => Some((ni.rem_euclid(m) as usize, nj.rem_euclid(m) as usize)),
            Boundary::Open => {
                if (0..m).contains(&ni) && (0..m).contains(&nj) {
                    Some((ni as usize, nj as usize))
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords_of(cells: &[&Cell]) -> Vec<(usize, usize)> {
        let mut out: Vec<(usize, usize)> = cells.iter().map(|c| (c.i(), c.j())).collect();
        out.sort();
        out
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(Grid::new(10.0, 0), Err(Error::Configuration(_))));
        assert!(matches!(Grid::new(10.0, 1 << 33), Err(Error::Configuration(_))));
        assert!(matches!(
            Grid::new(10.0, MAX_CELLS_PER_SIDE + 1),
            Err(Error::Configuration(_))
        ));
        assert!(Grid::new(10.0, MAX_CELLS_PER_SIDE).is_ok());
        assert!(matches!(Grid::new(0.0, 4), Err(Error::Configuration(_))));
        assert!(matches!(Grid::new(-1.0, 4), Err(Error::Configuration(_))));
        assert!(matches!(Grid::new(f64::INFINITY, 4), Err(Error::Configuration(_))));
    }

    #[test]
    fn builds_all_cells() -> Result<()> {
        let grid = Grid::new(10.0, 5)?;
        assert_eq!(grid.cells().len(), 25);
        assert_eq!(grid.cell_size(), 2.0);
        let cell = grid.cell(3, 1).map(|c| (c.i(), c.j()));
        assert_eq!(cell, Some((3, 1)));
        assert!(grid.cell(5, 0).is_none());
        Ok(())
    }

    #[test]
    fn locate_maps_and_clamps() -> Result<()> {
        let grid = Grid::new(10.0, 5)?;
        assert_eq!(grid.coords(0.0, 0.0), (0, 0));
        assert_eq!(grid.coords(1.99, 2.0), (0, 1));
        assert_eq!(grid.coords(9.99, 5.5), (4, 2));
        // The far edge belongs to the last cell.
        assert_eq!(grid.coords(10.0, 10.0), (4, 4));
        assert_eq!(grid.coords(-3.0, 12.0), (0, 4));
        let cell = grid.locate(7.0, 3.0);
        assert_eq!((cell.i(), cell.j()), (3, 1));
        Ok(())
    }

    #[test]
    fn place_adds_to_owning_cell() -> Result<()> {
        let mut grid = Grid::new(4.0, 4)?;
        grid.place(0, 0.5, 0.5);
        grid.place(1, 3.5, 0.5);
        grid.place(2, 0.9, 0.1);
        assert_eq!(grid.locate(0.0, 0.0).entities(), &[0, 2]);
        assert_eq!(grid.locate(3.0, 0.0).entities(), &[1]);
        assert!(grid.locate(2.0, 2.0).is_empty());
        Ok(())
    }

    #[test]
    fn range_check() -> Result<()> {
        let grid = Grid::new(10.0, 2)?;
        assert!(grid.check_in_range(0.0, 9.999).is_ok());
        assert!(matches!(
            grid.check_in_range(10.0, 1.0),
            Err(Error::OutOfRange { .. })
        ));
        assert!(grid.check_in_range(-0.1, 1.0).is_err());
        Ok(())
    }

    #[test]
    fn open_neighbours_drop_outside_offsets() -> Result<()> {
        let grid = Grid::new(3.0, 3)?;
        let corner = grid.locate(0.1, 0.1);
        let around = grid.neighbours_of(corner, &TraversalOffset::EIGHT_NEIGHBOURS, Boundary::Open);
        assert_eq!(coords_of(&around), vec![(0, 1), (1, 0), (1, 1)]);

        let center = grid.locate(1.5, 1.5);
        let around = grid.neighbours_of(center, &TraversalOffset::EIGHT_NEIGHBOURS, Boundary::Open);
        assert_eq!(around.len(), 8);
        Ok(())
    }

    #[test]
    fn periodic_neighbours_wrap() -> Result<()> {
        let grid = Grid::new(4.0, 4)?;
        let left = grid.locate(0.5, 1.5);
        let half = grid.neighbours_of(left, &TraversalOffset::HALF_NEIGHBOURS, Boundary::Periodic);
        // (1,0) (1,1) (0,1) (-1,1) from (0,1)
        let got: Vec<(usize, usize)> = half.iter().map(|c| (c.i(), c.j())).collect();
        assert_eq!(got, vec![(1, 1), (1, 2), (0, 2), (3, 2)]);

        let top_right = grid.locate(3.5, 3.5);
        let half = grid.neighbours_of(top_right, &TraversalOffset::HALF_NEIGHBOURS, Boundary::Periodic);
        let got: Vec<(usize, usize)> = half.iter().map(|c| (c.i(), c.j())).collect();
        assert_eq!(got, vec![(0, 3), (0, 0), (3, 0), (2, 0)]);
        Ok(())
    }

    #[test]
    fn footprint_covers_overlapped_cells() -> Result<()> {
        let grid = Grid::new(4.0, 4)?;
        // Disk around (1.9, 1.5) with r = 0.2 pokes into the cell on the right only.
        let cells = grid.locate_footprint(1.9, 1.5, 0.2, Boundary::Open);
        assert_eq!(coords_of(&cells), vec![(1, 1), (2, 1)]);
        // Own cell comes first.
        assert_eq!((cells[0].i(), cells[0].j()), (1, 1));

        // Near a corner the diagonal cell is included too.
        let cells = grid.locate_footprint(1.95, 1.95, 0.2, Boundary::Open);
        assert_eq!(coords_of(&cells), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
        Ok(())
    }

    #[test]
    fn footprint_wraps_in_periodic_mode() -> Result<()> {
        let grid = Grid::new(4.0, 4)?;
        let open = grid.locate_footprint(0.1, 1.5, 0.3, Boundary::Open);
        assert_eq!(coords_of(&open), vec![(0, 1)]);
        let periodic = grid.locate_footprint(0.1, 1.5, 0.3, Boundary::Periodic);
        assert_eq!(coords_of(&periodic), vec![(0, 1), (3, 1)]);
        Ok(())
    }

    #[test]
    fn wide_footprint_spans_several_rings() -> Result<()> {
        let grid = Grid::new(10.0, 10)?;
        let cells = grid.locate_footprint(5.5, 5.5, 1.6, Boundary::Open);
        // Two rings out along the axes, but the diagonal corner (7, 7) is ~2.1 away.
        assert!(cells.iter().any(|c| (c.i(), c.j()) == (7, 5)));
        assert!(cells.iter().any(|c| (c.i(), c.j()) == (3, 5)));
        assert!(!cells.iter().any(|c| (c.i(), c.j()) == (7, 7)));
        Ok(())
    }

    #[test]
    fn place_footprint_uses_capability() -> Result<()> {
        struct Disk(f64, f64, f64);
        impl Footprint for Disk {
            fn position(&self) -> (f64, f64) {
                (self.0, self.1)
            }
            fn radius(&self) -> f64 {
                self.2
            }
        }

        let mut grid = Grid::new(4.0, 4)?;
        let placed = grid.place_footprint(7, &Disk(1.9, 1.5, 0.2), Boundary::Open);
        assert_eq!(placed, 2);
        assert_eq!(grid.locate(1.5, 1.5).entities(), &[7]);
        assert_eq!(grid.locate(2.5, 1.5).entities(), &[7]);
        Ok(())
    }

    #[test]
    fn rings_cover_reach() -> Result<()> {
        let grid = Grid::new(10.0, 10)?;
        assert_eq!(grid.rings_for(0.5, Boundary::Periodic), 1);
        assert_eq!(grid.rings_for(1.0, Boundary::Periodic), 1);
        assert_eq!(grid.rings_for(2.5, Boundary::Periodic), 3);
        assert_eq!(grid.rings_for(100.0, Boundary::Periodic), 5);
        assert_eq!(grid.rings_for(100.0, Boundary::Open), 9);

        let coarse = Grid::new(10.0, 1)?;
        assert_eq!(coarse.rings_for(3.0, Boundary::Periodic), 1);
        assert_eq!(coarse.rings_for(3.0, Boundary::Open), 1);
        Ok(())
    }

    #[test]
    fn infinite_reach_takes_the_cap() -> Result<()> {
        let grid = Grid::new(100.0, 10)?;
        let reach: f64 = 1.0 + 2.0 * 1e308;
        assert!(reach.is_infinite());
        assert_eq!(grid.rings_for(reach, Boundary::Periodic), 5);
        assert_eq!(grid.rings_for(reach, Boundary::Open), 9);
        assert_eq!(grid.rings_for(f64::MAX, Boundary::Open), 9);
        Ok(())
    }

    #[test]
    fn negative_radius_footprint_is_own_cell() -> Result<()> {
        let grid = Grid::new(4.0, 4)?;
        let cells = grid.locate_footprint(1.9, 1.5, -0.5, Boundary::Open);
        assert_eq!(coords_of(&cells), vec![(1, 1)]);
        let cells = grid.locate_footprint(0.1, 1.5, -0.3, Boundary::Periodic);
        assert_eq!(coords_of(&cells), vec![(0, 1)]);
        Ok(())
    }
}
