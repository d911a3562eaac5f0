use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::core::{
    Algorithm, Boundary, BruteForce, CellIndexMethod, CimParameters, EntityId, IdIssuer,
    NeighbourMap, SurfaceEntity,
};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing wrapper around the neighbour search.
///
/// API:
/// - __new__(domain_size, num_cells, cutoff, periodic=True)
/// - neighbours(positions, radii) -> list[list[int]]
/// - pairs(positions, radii) -> np.ndarray, shape (P, 2)
/// - brute_force(positions, radii) -> list[list[int]]
#[pyclass]
pub struct CellIndex {
    params: CimParameters,
}

#[pymethods]
impl CellIndex {
    /// Configure a search over a square domain.
    ///
    /// Parameters
    /// - domain_size: side L of the domain (float, > 0)
    /// - num_cells: cells per side M (int, > 0)
    /// - cutoff: surface-to-surface cutoff rc (float, >= 0)
    /// - periodic: wrap the domain edges (default True)
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (domain_size, num_cells, cutoff, periodic=true))]
    fn new(domain_size: f64, num_cells: usize, cutoff: f64, periodic: bool) -> PyResult<Self> {
        let boundary = if periodic {
            Boundary::Periodic
        } else {
            Boundary::Open
        };
        let params = CimParameters::new(domain_size, num_cells, cutoff)
            .map_err(py_err)?
            .with_boundary(boundary);
        Ok(Self { params })
    }

    /// Neighbour indices of every row of `positions` (shape (N, 2)), using the cell index method.
    /// `radii` must have length N. Releases the GIL during computation.
    fn neighbours<'py>(
        &self,
        py: Python<'py>,
        positions: PyReadonlyArray2<'py, f64>,
        radii: PyReadonlyArray1<'py, f64>,
    ) -> PyResult<Vec<Vec<usize>>> {
        let entities = build_entities(&positions, &radii)?;
        let cim = CellIndexMethod::new(self.params);
        let map = py.detach(|| cim.neighbours(&entities)).map_err(py_err)?;
        Ok(indexed(&entities, &map))
    }

    /// Unordered neighbour pairs (i, j), i < j, as an int64 array of shape (P, 2).
    fn pairs<'py>(
        &self,
        py: Python<'py>,
        positions: PyReadonlyArray2<'py, f64>,
        radii: PyReadonlyArray1<'py, f64>,
    ) -> PyResult<Py<PyArray2<i64>>> {
        let lists = self.neighbours(py, positions, radii)?;
        let pairs: Vec<(usize, usize)> = lists
            .iter()
            .enumerate()
            .flat_map(|(i, ns)| ns.iter().filter(move |&&j| j > i).map(move |&j| (i, j)))
            .collect();
        let mut arr = Array2::<i64>::zeros((pairs.len(), 2));
        for (row, (i, j)) in pairs.into_iter().enumerate() {
            arr[[row, 0]] = i as i64;
            arr[[row, 1]] = j as i64;
        }
        Ok(arr.into_pyarray(py).unbind())
    }

    /// Same result as `neighbours`, computed by exhaustive pairwise comparison.
    fn brute_force<'py>(
        &self,
        py: Python<'py>,
        positions: PyReadonlyArray2<'py, f64>,
        radii: PyReadonlyArray1<'py, f64>,
    ) -> PyResult<Vec<Vec<usize>>> {
        let entities = build_entities(&positions, &radii)?;
        let brute = BruteForce::new(self.params);
        let map = py.detach(|| brute.neighbours(&entities)).map_err(py_err)?;
        Ok(indexed(&entities, &map))
    }

    #[getter]
    fn num_cells(&self) -> usize {
        self.params.num_cells()
    }

    #[getter]
    fn periodic(&self) -> bool {
        self.params.boundary() == Boundary::Periodic
    }
}

fn build_entities(
    positions: &PyReadonlyArray2<'_, f64>,
    radii: &PyReadonlyArray1<'_, f64>,
) -> PyResult<Vec<SurfaceEntity>> {
    let pos = positions.as_array();
    let radii = radii.as_array();
    if pos.shape()[1] != 2 {
        return Err(py_err(format!(
            "positions must have shape (N, 2), got {:?}",
            pos.shape()
        )));
    }
    let n = pos.shape()[0];
    if radii.len() != n {
        return Err(py_err(format!(
            "radii must have length {}, got {}",
            n,
            radii.len()
        )));
    }
    let mut ids = IdIssuer::new();
    (0..n)
        .map(|k| {
            let entity = ids.entity(radii[k])?;
            SurfaceEntity::new(entity, pos[[k, 0]], pos[[k, 1]])
        })
        .collect::<crate::error::Result<Vec<_>>>()
        .map_err(py_err)
}

fn indexed(entities: &[SurfaceEntity], map: &NeighbourMap) -> Vec<Vec<usize>> {
    let index: HashMap<EntityId, usize> = entities
        .iter()
        .enumerate()
        .map(|(k, e)| (e.id(), k))
        .collect();
    entities
        .iter()
        .map(|e| {
            map.get(e.id())
                .map(|set| set.iter().filter_map(|id| index.get(id).copied()).collect())
                .unwrap_or_default()
        })
        .collect()
}

/// The cellindex Python module entry point.
#[pymodule]
fn cellindex(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<CellIndex>()?;
    Ok(())
}
