//! Entity displacement: continuous movement and discrete teleports.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::base::{Cancellable, CauseTracked, TargetEntityEvent};
use super::cause::Cause;
use crate::entity::types::EntityId;
use crate::world::extent::TeleporterAgent;
use crate::world::location::Transform;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("not a teleport event")]
    NotTeleport,
}

/// What the displaced entity is known to be. Each kind includes the ones
/// before it: every player is a human, every human is living.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetKind {
    Entity,
    Living,
    Human,
    Player,
}

impl TargetKind {
    /// Returns the tag string for this target kind (e.g., "target:player").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Entity => "target:entity",
            Self::Living => "target:living",
            Self::Human => "target:human",
            Self::Player => "target:player",
        }
    }

    /// True when a target of this kind also counts as `required`.
    pub fn satisfies(&self, required: TargetKind) -> bool {
        *self >= required
    }

    pub fn is_living(&self) -> bool {
        self.satisfies(Self::Living)
    }

    pub fn is_human(&self) -> bool {
        self.satisfies(Self::Human)
    }

    pub fn is_player(&self) -> bool {
        self.satisfies(Self::Player)
    }
}

/// Field-less discriminant of [`DisplaceKind`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplaceKindTag {
    Move,
    Teleport,
}

impl DisplaceKindTag {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Move => "displace:move",
            Self::Teleport => "displace:teleport",
        }
    }
}

/// Data carried only by teleports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleportDetails {
    pub cause: Cause,
    pub teleporter: TeleporterAgent,
    /// Whether the entity keeps its velocity after arriving.
    pub keeps_velocity: bool,
}

impl CauseTracked for TeleportDetails {
    fn cause(&self) -> &Cause {
        &self.cause
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DisplaceKind {
    /// Continuous movement.
    Move,
    /// Discrete movement.
    Teleport(TeleportDetails),
}

impl DisplaceKind {
    pub fn tag(&self) -> DisplaceKindTag {
        match self {
            Self::Move => DisplaceKindTag::Move,
            Self::Teleport(_) => DisplaceKindTag::Teleport,
        }
    }
}

/// Fired when an entity changes position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaceEntityEvent {
    target: EntityId,
    target_kind: TargetKind,
    old_transform: Transform,
    new_transform: Transform,
    kind: DisplaceKind,
    cancelled: bool,
}

impl DisplaceEntityEvent {
    pub fn moved(
        target: EntityId,
        target_kind: TargetKind,
        old_transform: Transform,
        new_transform: Transform,
    ) -> Self {
        Self {
            target,
            target_kind,
            old_transform,
            new_transform,
            kind: DisplaceKind::Move,
            cancelled: false,
        }
    }

    pub fn teleported(
        target: EntityId,
        target_kind: TargetKind,
        old_transform: Transform,
        new_transform: Transform,
        cause: Cause,
        teleporter: TeleporterAgent,
    ) -> Self {
        Self {
            target,
            target_kind,
            old_transform,
            new_transform,
            kind: DisplaceKind::Teleport(TeleportDetails {
                cause,
                teleporter,
                keeps_velocity: false,
            }),
            cancelled: false,
        }
    }

    pub fn target_kind(&self) -> TargetKind {
        self.target_kind
    }

    pub fn kind(&self) -> &DisplaceKind {
        &self.kind
    }

    /// A copy of the transform the entity had before displacement.
    pub fn old_transform(&self) -> Transform {
        self.old_transform
    }

    /// A copy of the transform the entity will have.
    pub fn new_transform(&self) -> Transform {
        self.new_transform
    }

    pub fn set_new_transform(&mut self, transform: Transform) {
        self.new_transform = transform;
    }

    pub fn changes_world(&self) -> bool {
        self.old_transform.world != self.new_transform.world
    }

    pub fn is_teleport(&self) -> bool {
        matches!(self.kind, DisplaceKind::Teleport(_))
    }

    pub fn teleport(&self) -> Option<&TeleportDetails> {
        match &self.kind {
            DisplaceKind::Teleport(details) => Some(details),
            DisplaceKind::Move => None,
        }
    }

    pub fn teleport_mut(&mut self) -> Option<&mut TeleportDetails> {
        match &mut self.kind {
            DisplaceKind::Teleport(details) => Some(details),
            DisplaceKind::Move => None,
        }
    }

    pub fn teleporter_agent(&self) -> Option<&TeleporterAgent> {
        self.teleport().map(|details| &details.teleporter)
    }

    pub fn keeps_velocity(&self) -> Option<bool> {
        self.teleport().map(|details| details.keeps_velocity)
    }

    pub fn set_keeps_velocity(&mut self, keeps_velocity: bool) -> Result<(), EventError> {
        let details = self.teleport_mut().ok_or(EventError::NotTeleport)?;
        details.keeps_velocity = keeps_velocity;
        Ok(())
    }

    /// The triggering cause; only teleports track one.
    pub fn cause(&self) -> Option<&Cause> {
        self.teleport().map(CauseTracked::cause)
    }
}

impl Cancellable for DisplaceEntityEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

impl TargetEntityEvent for DisplaceEntityEvent {
    fn target_entity(&self) -> EntityId {
        self.target
    }
}

/// Selects displacement events by kind and target, e.g. "teleports of
/// players". A target requirement also accepts more specific targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplaceFilter {
    pub kind: Option<DisplaceKindTag>,
    pub target: TargetKind,
}

impl DisplaceFilter {
    pub fn any() -> Self {
        Self {
            kind: None,
            target: TargetKind::Entity,
        }
    }

    pub fn moves() -> Self {
        Self {
            kind: Some(DisplaceKindTag::Move),
            ..Self::any()
        }
    }

    pub fn teleports() -> Self {
        Self {
            kind: Some(DisplaceKindTag::Teleport),
            ..Self::any()
        }
    }

    pub fn targeting(mut self, target: TargetKind) -> Self {
        self.target = target;
        self
    }

    pub fn matches(&self, event: &DisplaceEntityEvent) -> bool {
        self.kind.map_or(true, |kind| kind == event.kind.tag())
            && event.target_kind.satisfies(self.target)
    }
}
