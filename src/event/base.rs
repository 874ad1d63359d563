//! Traits shared by events.

use super::cause::Cause;
use crate::entity::types::EntityId;

/// An event a listener may veto.
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    fn set_cancelled(&mut self, cancelled: bool);
}

/// An event acting on one entity.
pub trait TargetEntityEvent {
    fn target_entity(&self) -> EntityId;
}

/// An event that carries the [`Cause`] that triggered it.
pub trait CauseTracked {
    fn cause(&self) -> &Cause;
}
