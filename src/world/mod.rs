//! Worlds, locations and biome generation registration.

pub mod biome;
pub mod extent;
pub mod gen;
pub mod location;
