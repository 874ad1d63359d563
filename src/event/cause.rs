//! Event causes: ordered, named cause objects.

use serde::{Deserialize, Serialize};

use crate::entity::damage::DamageSource;
use crate::entity::types::EntityId;
use crate::world::extent::TeleporterAgent;

/// An object participating in a [`Cause`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CauseObject {
    Damage(DamageSource),
    Entity(EntityId),
    Plugin(String),
    Teleporter(TeleporterAgent),
}

/// A [`CauseObject`] under a name, e.g. `"source"` or `"owner"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedCause {
    pub name: String,
    pub object: CauseObject,
}

/// The ordered chain of objects responsible for an action. The first entry
/// is the root cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cause {
    entries: Vec<NamedCause>,
}

pub const SOURCE: &str = "source";

impl Cause {
    /// Start a cause whose root is `object`, named [`SOURCE`].
    pub fn source(object: CauseObject) -> CauseBuilder {
        CauseBuilder {
            entries: vec![NamedCause {
                name: SOURCE.to_string(),
                object,
            }],
        }
    }

    pub fn root(&self) -> Option<&NamedCause> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[NamedCause] {
        &self.entries
    }

    /// First object stored under `name`.
    pub fn get(&self, name: &str) -> Option<&CauseObject> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.object)
    }

    /// First object matching `pick`, in chain order.
    pub fn first<T>(&self, pick: impl Fn(&CauseObject) -> Option<&T>) -> Option<&T> {
        self.entries.iter().find_map(|entry| pick(&entry.object))
    }

    pub fn damage_source(&self) -> Option<&DamageSource> {
        self.first(|object| match object {
            CauseObject::Damage(source) => Some(source),
            _ => None,
        })
    }
}

/// Builds a [`Cause`] starting from its root entry.
#[derive(Debug, Clone)]
pub struct CauseBuilder {
    entries: Vec<NamedCause>,
}

impl CauseBuilder {
    pub fn named(mut self, name: impl Into<String>, object: CauseObject) -> Self {
        self.entries.push(NamedCause {
            name: name.into(),
            object,
        });
        self
    }

    pub fn build(self) -> Cause {
        Cause {
            entries: self.entries,
        }
    }
}
