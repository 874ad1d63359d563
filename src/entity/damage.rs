//! Damage types and sources.

use serde::{Deserialize, Serialize};

/// Broad category of damage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Attack,
    Contact,
    Drown,
    Explosive,
    Fall,
    Fire,
    Generic,
    Hunger,
    Magic,
    Projectile,
    Suffocate,
    Void,
    Custom(String),
}

impl DamageType {
    pub fn id(&self) -> &str {
        match self {
            Self::Attack => "attack",
            Self::Contact => "contact",
            Self::Drown => "drown",
            Self::Explosive => "explosive",
            Self::Fall => "fall",
            Self::Fire => "fire",
            Self::Generic => "generic",
            Self::Hunger => "hunger",
            Self::Magic => "magic",
            Self::Projectile => "projectile",
            Self::Suffocate => "suffocate",
            Self::Void => "void",
            Self::Custom(id) => id,
        }
    }
}

/// The source of damage dealt to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageSource {
    pub damage_type: DamageType,
    /// Absolute damage ignores every modifier, armor included.
    pub absolute: bool,
    pub bypasses_armor: bool,
}

impl DamageSource {
    pub fn new(damage_type: DamageType) -> Self {
        Self {
            damage_type,
            absolute: false,
            bypasses_armor: false,
        }
    }

    pub fn absolute(mut self) -> Self {
        self.absolute = true;
        self.bypasses_armor = true;
        self
    }

    pub fn bypassing_armor(mut self) -> Self {
        self.bypasses_armor = true;
        self
    }
}
