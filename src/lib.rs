//! Sponge API: the plugin-facing contract layer of a voxel game server.
//!
//! Plugins compile against the traits and value types in this crate; a host
//! server runtime implements them. The only executable core here is the
//! [`text::template::TextTemplate`] evaluator, plus the registration
//! surfaces for biome generation and the displacement event model.

pub mod data;
pub mod entity;
pub mod event;
pub mod registry;
pub mod text;
pub mod world;
