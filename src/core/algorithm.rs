use crate::core::entity::{Footprint, SurfaceEntity};
use crate::core::event::{Event, EventListener, EventPayload};
use crate::core::grid::Boundary;
use crate::core::neighbours::NeighbourMap;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// A neighbour-search strategy.
pub trait Algorithm {
    /// Compute the neighbour map of `entities`.
    fn neighbours(&self, entities: &[SurfaceEntity]) -> Result<NeighbourMap>;

    /// Compute the neighbour map and emit it as a single event stamped `time`.
    ///
    /// Nothing is emitted when the search fails.
    fn calculate(
        &self,
        time: f64,
        entities: &[SurfaceEntity],
        listener: &mut dyn EventListener,
    ) -> Result<()> {
        if !time.is_finite() {
            return Err(Error::config("event time must be finite"));
        }
        let map = self.neighbours(entities)?;
        listener.emit(Event::new(time, EventPayload::Neighbours(map))?);
        Ok(())
    }
}

/// Center-to-center distance minus both radii.
///
/// Under [`Boundary::Periodic`] each axis uses the minimum image: the shorter of the direct
/// and the wrapped-around separation in a domain of side `domain_size`.
pub fn surface_distance<A, B>(a: &A, b: &B, domain_size: f64, boundary: Boundary) -> f64
where
    A: Footprint + ?Sized,
    B: Footprint + ?Sized,
{
    let (ax, ay) = a.position();
    let (bx, by) = b.position();
    let (dx, dy) = match boundary {
        Boundary::Periodic => (
            minimum_image(ax - bx, domain_size),
            minimum_image(ay - by, domain_size),
        ),
        Boundary::Open => ((ax - bx).abs(), (ay - by).abs()),
    };
    dx.hypot(dy) - (a.radius() + b.radius())
}

#[inline]
fn minimum_image(delta: f64, domain_size: f64) -> f64 {
    let d = delta.abs().rem_euclid(domain_size);
    if d > domain_size / 2.0 {
        domain_size - d
    } else {
        d
    }
}

/// Reject duplicate identities and return the largest radius (0 for an empty slice).
pub(crate) fn check_entities(entities: &[SurfaceEntity]) -> Result<f64> {
    let mut seen = HashSet::with_capacity(entities.len());
    let mut max_radius = 0.0_f64;
    for e in entities {
        if !seen.insert(e.id()) {
            return Err(Error::config(format!(
                "entity {} appears more than once",
                e.id()
            )));
        }
        max_radius = max_radius.max(e.radius());
    }
    Ok(max_radius)
}
