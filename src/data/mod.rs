//! Keyed data values and transactions.

pub mod key;
pub mod transaction;
pub mod value;
