//! World ids, locations and transforms.

use bitflags::bitflags;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype wrapper for world UUIDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub u128);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_uuid(self.0, f)
    }
}

/// Writes `value` in the 8-4-4-4-12 hyphenated form.
pub(crate) fn write_uuid(value: u128, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let hex = format!("{:032x}", value);
    write!(
        f,
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Names a world either by its name or by its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldTarget {
    Name(String),
    Id(WorldId),
}

/// A position within a specific world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: WorldId,
    pub position: DVec3,
}

impl Location {
    pub fn new(world: WorldId, position: DVec3) -> Self {
        Self { world, position }
    }

    /// Integer block coordinates containing this position.
    pub fn block_position(&self) -> glam::IVec3 {
        self.position.floor().as_ivec3()
    }
}

bitflags! {
    /// Components of a location/rotation update that are applied relative to
    /// the current value instead of replacing it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RelativePositions: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const Z = 1 << 2;
        const PITCH = 1 << 3;
        const YAW = 1 << 4;
    }
}

/// Position, rotation and scale of an object in a world.
///
/// Rotation is stored as `x -> pitch`, `y -> yaw`, `z -> roll`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub world: WorldId,
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Transform {
    pub fn new(world: WorldId, position: DVec3) -> Self {
        Self {
            world,
            position,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }

    pub fn from_location(location: Location) -> Self {
        Self::new(location.world, location.position)
    }

    pub fn location(&self) -> Location {
        Location::new(self.world, self.position)
    }

    pub fn with_rotation(mut self, rotation: DVec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn pitch(&self) -> f64 {
        self.rotation.x
    }

    pub fn yaw(&self) -> f64 {
        self.rotation.y
    }

    pub fn roll(&self) -> f64 {
        self.rotation.z
    }

    /// Produce the transform that results from moving to `location` with
    /// `rotation`. Components named in `relative` are offsets from this
    /// transform; the rest replace it. The world always comes from
    /// `location`, and roll is always replaced.
    pub fn apply_relative(
        &self,
        location: Location,
        rotation: DVec3,
        relative: RelativePositions,
    ) -> Transform {
        let pick = |flag: RelativePositions, current: f64, value: f64| {
            if relative.contains(flag) {
                current + value
            } else {
                value
            }
        };
        Transform {
            world: location.world,
            position: DVec3::new(
                pick(RelativePositions::X, self.position.x, location.position.x),
                pick(RelativePositions::Y, self.position.y, location.position.y),
                pick(RelativePositions::Z, self.position.z, location.position.z),
            ),
            rotation: DVec3::new(
                pick(RelativePositions::PITCH, self.rotation.x, rotation.x),
                pick(RelativePositions::YAW, self.rotation.y, rotation.y),
                rotation.z,
            ),
            scale: self.scale,
        }
    }
}
