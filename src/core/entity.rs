use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Stable identity of an [`Entity`], issued by an [`IdIssuer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    /// Raw numeric value of the id.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out sequential entity identities, starting at 0.
///
/// Uniqueness holds per issuer: entities that are compared against each other must come
/// from the same issuer.
#[derive(Debug, Default)]
pub struct IdIssuer {
    next: u64,
}

impl IdIssuer {
    /// An issuer whose first identity is 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next identity.
    pub fn issue(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of identities issued so far.
    pub fn issued(&self) -> u64 {
        self.next
    }

    /// Issue a new entity with the given radius.
    ///
    /// Errors:
    /// - `Error::Configuration` if `radius` is negative or not finite.
    pub fn entity(&mut self, radius: f64) -> Result<Arc<Entity>> {
        Entity::validate_radius(radius)?;
        Ok(Arc::new(Entity {
            id: self.issue(),
            radius,
        }))
    }
}

/// A circular body: an identity plus its physical attributes.
///
/// Equality, ordering and hashing use the identity only.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    radius: f64,
}

impl Entity {
    /// Identity, unique within the issuing [`IdIssuer`].
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Radius, finite and >= 0.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn validate_radius(radius: f64) -> Result<()> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::config("radius must be finite and >= 0"));
        }
        Ok(())
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// Anything the grid can index: a center position and a radius.
pub trait Footprint {
    fn position(&self) -> (f64, f64);
    fn radius(&self) -> f64;
}

/// A positioned snapshot of an [`Entity`].
///
/// The wrapped entity is shared between snapshots; the position belongs to this snapshot.
#[derive(Debug, Clone)]
pub struct SurfaceEntity {
    entity: Arc<Entity>,
    x: f64,
    y: f64,
}

impl SurfaceEntity {
    /// Errors:
    /// - `Error::Configuration` if either coordinate is NaN or infinite.
    pub fn new(entity: Arc<Entity>, x: f64, y: f64) -> Result<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::config(format!(
                "position of entity {} must be finite",
                entity.id()
            )));
        }
        Ok(Self { entity, x, y })
    }

    /// New snapshot of the same entity at another position.
    pub fn moved_to(&self, x: f64, y: f64) -> Result<Self> {
        Self::new(Arc::clone(&self.entity), x, y)
    }

    /// The shared entity behind this snapshot.
    #[inline]
    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    /// Identity of the wrapped entity.
    #[inline]
    pub fn id(&self) -> EntityId {
        self.entity.id()
    }

    /// Center x coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Center y coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }
}

impl Footprint for SurfaceEntity {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn radius(&self) -> f64 {
        self.entity.radius()
    }
}

impl PartialEq for SurfaceEntity {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
    }
}

impl Eq for SurfaceEntity {}

impl Hash for SurfaceEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity.hash(state);
    }
}
