//! The entity contract: everything a plugin may ask of a live entity.
//!
//! Zombies, sheep, players, dropped items and experience orbs are entities.
//! Blocks, and items sitting in inventories, are not.

use glam::DVec3;
use rand::rngs::StdRng;
use std::sync::Arc;
use thiserror::Error;

use super::damage::DamageSource;
use super::types::{EntityId, EntitySnapshot, EntityType};
use crate::data::key::{DataHolder, Key};
use crate::data::transaction::DataTransactionResult;
use crate::data::value::Value;
use crate::event::cause::{Cause, CauseObject};
use crate::world::extent::World;
use crate::world::location::{Location, RelativePositions, Transform, WorldTarget};

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("distance must be above zero, got {0}")]
    InvalidDistance(f64),
}

/// A live entity. Implemented by the host; all state lives there.
///
/// Rotations use `x -> pitch`, `y -> yaw`, `z -> roll`.
pub trait Entity: DataHolder + Send + Sync {
    fn unique_id(&self) -> EntityId;

    fn entity_type(&self) -> &EntityType;

    /// The world this entity currently resides in.
    fn world(&self) -> Arc<dyn World>;

    fn create_snapshot(&self) -> EntitySnapshot;

    fn random(&mut self) -> &mut StdRng;

    fn location(&self) -> Location;

    /// Equivalent to a teleport; passengers move along.
    fn set_location(&mut self, location: Location);

    /// Teleport to the nearest safe location around `location`. Returns
    /// false when none was found.
    fn set_location_safely(&mut self, location: Location) -> bool;

    fn rotation(&self) -> DVec3;

    fn set_rotation(&mut self, rotation: DVec3);

    /// Move and rotate at once. Components listed in `relative` are offsets
    /// from the current transform.
    fn set_location_and_rotation_relative(
        &mut self,
        location: Location,
        rotation: DVec3,
        relative: RelativePositions,
    );

    fn set_location_and_rotation_relative_safely(
        &mut self,
        location: Location,
        rotation: DVec3,
        relative: RelativePositions,
    ) -> bool;

    fn set_location_and_rotation(&mut self, location: Location, rotation: DVec3) {
        self.set_location_and_rotation_relative(location, rotation, RelativePositions::empty());
    }

    fn set_location_and_rotation_safely(&mut self, location: Location, rotation: DVec3) -> bool {
        self.set_location_and_rotation_relative_safely(
            location,
            rotation,
            RelativePositions::empty(),
        )
    }

    /// Not used by the game yet; always [`DVec3::ONE`].
    fn scale(&self) -> DVec3 {
        DVec3::ONE
    }

    /// Not used by the game yet; does nothing.
    fn set_scale(&mut self, _scale: DVec3) {}

    /// A copy of position, rotation and scale.
    fn transform(&self) -> Transform;

    fn set_transform(&mut self, transform: Transform);

    /// Move to `position` in another world, loading it first if it is
    /// enabled but unloaded. Fails for worlds that are neither loaded nor
    /// enabled.
    fn transfer_to_world(&mut self, target: &WorldTarget, position: DVec3) -> bool;

    /// The entity riding this one.
    fn passenger(&self) -> Option<EntityId>;

    /// Set the rider; `None` ejects the current one.
    fn set_passenger(&mut self, passenger: Option<EntityId>) -> DataTransactionResult;

    /// The entity this one is riding.
    fn vehicle(&self) -> Option<EntityId>;

    /// Set the mount; `None` dismounts.
    fn set_vehicle(&mut self, vehicle: Option<EntityId>) -> DataTransactionResult;

    /// Bottom of the riding stack this entity belongs to. Returns this
    /// entity's own id if it isn't riding anything.
    fn base_vehicle(&self) -> EntityId;

    fn velocity(&self) -> DVec3 {
        match self.get(Key::Velocity) {
            Some(Value::Vector(velocity)) => velocity,
            _ => DVec3::ZERO,
        }
    }

    fn set_velocity(&mut self, velocity: DVec3) -> DataTransactionResult {
        self.offer(Key::Velocity, Value::Vector(velocity))
    }

    fn is_on_ground(&self) -> bool;

    fn is_removed(&self) -> bool;

    /// Whether this entity is still loaded in a world and chunk.
    fn is_loaded(&self) -> bool;

    /// Mark for removal, preferably within one tick.
    fn remove(&mut self);

    fn damage(&mut self, amount: f64, source: DamageSource) -> bool {
        let cause = Cause::source(CauseObject::Damage(source.clone())).build();
        self.damage_with_cause(amount, source, cause)
    }

    /// Damage with an explicit cause. The cause should carry the damage
    /// source for plugins inspecting it.
    fn damage_with_cause(&mut self, amount: f64, source: DamageSource, cause: Cause) -> bool;

    /// Entities in the same world within `distance` of this one.
    fn nearby_entities(&self, distance: f64) -> Result<Vec<EntitySnapshot>, EntityError> {
        // NaN fails this comparison too
        if !(distance > 0.0) {
            return Err(EntityError::InvalidDistance(distance));
        }
        let origin = self.transform().position;
        Ok(self.nearby_entities_matching(&|other: &EntitySnapshot| {
            other.transform.position.distance(origin) <= distance
        }))
    }

    fn nearby_entities_matching(
        &self,
        filter: &dyn Fn(&EntitySnapshot) -> bool,
    ) -> Vec<EntitySnapshot> {
        self.world().entities(filter)
    }

    /// The player that created this entity, if known.
    fn creator(&self) -> Option<EntityId>;

    /// The player that last notified this entity, if known.
    fn notifier(&self) -> Option<EntityId>;

    fn set_creator(&mut self, creator: Option<EntityId>);

    fn set_notifier(&mut self, notifier: Option<EntityId>);

    /// Whether `other` is visible to this entity.
    fn can_see(&self, other: &dyn Entity) -> bool {
        !matches!(other.get(Key::Invisible), Some(Value::Bool(true)))
    }
}
