//! Entity contract and value types.

pub mod contract;
pub mod damage;
pub mod types;
