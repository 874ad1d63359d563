//! Results of offering data to a holder.

use serde::{Deserialize, Serialize};

use super::key::Key;
use super::value::Value;

/// Overall outcome of a data offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Data was accepted.
    Success,
    /// Data was refused; the holder is unchanged.
    Failure,
    /// The holder hit an error while applying data.
    Error,
}

/// Record of what a [`DataHolder`](super::key::DataHolder) did with offered data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTransactionResult {
    pub kind: TransactionKind,
    pub successful: Vec<(Key, Value)>,
    pub replaced: Vec<(Key, Value)>,
    pub rejected: Vec<(Key, Value)>,
}

impl DataTransactionResult {
    fn empty(kind: TransactionKind) -> Self {
        Self {
            kind,
            successful: Vec::new(),
            replaced: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Success where nothing was stored or replaced (e.g. clearing a
    /// passenger that was already absent).
    pub fn success_no_data() -> Self {
        Self::empty(TransactionKind::Success)
    }

    pub fn success(key: Key, value: Value) -> Self {
        let mut result = Self::empty(TransactionKind::Success);
        result.successful.push((key, value));
        result
    }

    pub fn success_replace(key: Key, value: Value, replaced: Value) -> Self {
        let mut result = Self::success(key, value);
        result.replaced.push((key, replaced));
        result
    }

    pub fn failure_no_data() -> Self {
        Self::empty(TransactionKind::Failure)
    }

    pub fn fail_result(key: Key, value: Value) -> Self {
        let mut result = Self::empty(TransactionKind::Failure);
        result.rejected.push((key, value));
        result
    }

    pub fn error_result(key: Key, value: Value) -> Self {
        let mut result = Self::empty(TransactionKind::Error);
        result.rejected.push((key, value));
        result
    }

    pub fn is_successful(&self) -> bool {
        self.kind == TransactionKind::Success
    }
}
