use crate::core::grid::Boundary;
use crate::error::{Error, Result};

/// Largest accepted `M`, and the upper bound for [`CimParameters::optimal_num_cells`].
pub const MAX_CELLS_PER_SIDE: usize = 512;

/// Validated inputs of a neighbour search.
///
/// - `domain_size`: side `L` of the square domain (finite, > 0)
/// - `num_cells`: cells per side `M` (in `1..=MAX_CELLS_PER_SIDE`)
/// - `cutoff`: surface-to-surface distance `rc` under which two entities are neighbours
///   (finite, >= 0). It is shared by every pair.
/// - `boundary`: periodic unless set otherwise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CimParameters {
    domain_size: f64,
    num_cells: usize,
    cutoff: f64,
    boundary: Boundary,
}

impl CimParameters {
    /// Errors:
    /// - `Error::Configuration` on a `num_cells` of 0 or above [`MAX_CELLS_PER_SIDE`], a
    ///   non-positive `domain_size`, or a negative/non-finite `cutoff`.
    pub fn new(domain_size: f64, num_cells: usize, cutoff: f64) -> Result<Self> {
        if !domain_size.is_finite() || domain_size <= 0.0 {
            return Err(Error::config("domain_size must be finite and > 0"));
        }
        if num_cells == 0 {
            return Err(Error::config("num_cells must be > 0"));
        }
        if num_cells > MAX_CELLS_PER_SIDE {
            return Err(Error::config(format!(
                "num_cells must be <= {MAX_CELLS_PER_SIDE}, got {num_cells}"
            )));
        }
        if !cutoff.is_finite() || cutoff < 0.0 {
            return Err(Error::config("cutoff must be finite and >= 0"));
        }
        Ok(Self {
            domain_size,
            num_cells,
            cutoff,
            boundary: Boundary::default(),
        })
    }

    /// Same parameters with another edge behaviour.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Side `L` of the domain.
    #[inline]
    pub fn domain_size(&self) -> f64 {
        self.domain_size
    }

    /// Cells per side `M`.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// Surface-to-surface cutoff `rc`.
    #[inline]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Edge behaviour; periodic by default.
    #[inline]
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Largest `M` whose cell side is at least `cutoff + 2 * max_radius`, so that a single
    /// ring of cells covers every candidate. At least 1, at most [`MAX_CELLS_PER_SIDE`].
    pub fn optimal_num_cells(domain_size: f64, cutoff: f64, max_radius: f64) -> Result<usize> {
        if !domain_size.is_finite() || domain_size <= 0.0 {
            return Err(Error::config("domain_size must be finite and > 0"));
        }
        if !cutoff.is_finite() || cutoff < 0.0 {
            return Err(Error::config("cutoff must be finite and >= 0"));
        }
        if !max_radius.is_finite() || max_radius < 0.0 {
            return Err(Error::config("max_radius must be finite and >= 0"));
        }
        let reach = cutoff + 2.0 * max_radius;
        if reach <= 0.0 {
            return Ok(MAX_CELLS_PER_SIDE);
        }
        let m = (domain_size / reach).floor();
        Ok((m as usize).clamp(1, MAX_CELLS_PER_SIDE))
    }
}
