//! Data keys and the holder trait for keyed entity data.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::transaction::DataTransactionResult;
use super::value::{Value, ValueKind};

/// Identifies a piece of data stored on a [`DataHolder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Velocity,
    Invisible,
    DisplayName,
    OnGround,
}

impl Key {
    /// The value kind this key accepts.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Velocity => ValueKind::Vector,
            Self::Invisible => ValueKind::Bool,
            Self::DisplayName => ValueKind::Text,
            Self::OnGround => ValueKind::Bool,
        }
    }

    /// Namespaced id, e.g. `sponge:velocity`.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Velocity => "sponge:velocity",
            Self::Invisible => "sponge:invisible",
            Self::DisplayName => "sponge:display_name",
            Self::OnGround => "sponge:on_ground",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Anything that stores keyed data. Implemented by the host.
pub trait DataHolder {
    fn get(&self, key: Key) -> Option<Value>;

    /// Offer a value. The holder decides whether to accept it; `value` has
    /// already been checked against `key.kind()` when called through
    /// [`DataHolder::offer_checked`].
    fn offer(&mut self, key: Key, value: Value) -> DataTransactionResult;

    fn supports(&self, key: Key) -> bool;

    /// Offer a value, rejecting it up front if its kind doesn't match the key
    /// or the holder doesn't support the key.
    fn offer_checked(&mut self, key: Key, value: Value) -> DataTransactionResult {
        if value.kind() != key.kind() || !self.supports(key) {
            return DataTransactionResult::fail_result(key, value);
        }
        self.offer(key, value)
    }
}
