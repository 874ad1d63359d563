//! The host-implemented world trait and teleporter settings.

use serde::{Deserialize, Serialize};

use super::location::WorldId;
use crate::entity::types::EntitySnapshot;

/// A loaded world. Implemented by the host.
pub trait World: Send + Sync {
    fn unique_id(&self) -> WorldId;

    fn name(&self) -> &str;

    /// Snapshots of every entity in this world accepted by `filter`.
    fn entities(&self, filter: &dyn Fn(&EntitySnapshot) -> bool) -> Vec<EntitySnapshot>;

    fn entity_count(&self) -> usize {
        self.entities(&|_: &EntitySnapshot| true).len()
    }
}

/// How a teleport through a portal searches for, or creates, its exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeleporterAgent {
    pub search_radius: i32,
    pub creation_radius: i32,
    pub can_create_teleporter: bool,
}

impl Default for TeleporterAgent {
    fn default() -> Self {
        Self {
            search_radius: 128,
            creation_radius: 16,
            can_create_teleporter: true,
        }
    }
}
