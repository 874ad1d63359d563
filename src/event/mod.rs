//! Events fired at plugins.

pub mod base;
pub mod cause;
pub mod displace;
