//! Spatial index and neighbour-search algorithms.
//!
//! The grid and every accumulator are rebuilt on each search; nothing persists between
//! invocations.

pub mod algorithm;
pub mod brute_force;
pub mod cell;
pub mod cim;
pub mod entity;
pub mod event;
pub mod grid;
pub mod neighbours;
pub mod offset;
pub mod params;

pub use algorithm::{surface_distance, Algorithm};
pub use brute_force::BruteForce;
pub use cell::Cell;
pub use cim::CellIndexMethod;
pub use entity::{Entity, EntityId, Footprint, IdIssuer, SurfaceEntity};
pub use event::{Event, EventListener, EventPayload, EventsQueue};
pub use grid::{Boundary, Grid};
pub use neighbours::NeighbourMap;
pub use offset::{Offset, TraversalOffset};
pub use params::CimParameters;
