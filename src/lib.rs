//! Cell Index Method neighbour search.
//!
//! Given circular entities in a square domain of side `L`, optionally periodic, find for each
//! entity every other entity whose surface lies within a cutoff distance `rc`. The domain is
//! split into `M x M` cells so that each entity is only compared against nearby cells.
//!
//! ```
//! use cellindex::core::{Algorithm, CellIndexMethod, CimParameters, IdIssuer, SurfaceEntity};
//!
//! # fn main() -> cellindex::error::Result<()> {
//! let mut ids = IdIssuer::new();
//! let a = SurfaceEntity::new(ids.entity(0.0)?, 1.0, 1.0)?;
//! let b = SurfaceEntity::new(ids.entity(0.0)?, 1.5, 1.0)?;
//! let cim = CellIndexMethod::new(CimParameters::new(10.0, 5, 1.0)?);
//! let map = cim.neighbours(&[a.clone(), b.clone()])?;
//! assert!(map.are_neighbours(a.id(), b.id()));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod input;

#[cfg(feature = "python")]
mod python;
