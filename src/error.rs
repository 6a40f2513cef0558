//! Error types shared across the hot-keys subsystems.
//!
//! Only invocation-wide failures surface as [`HotKeysError`]. A single node's
//! failure is absorbed by the coordinator and shows up as an annotation in the
//! final report instead.

use thiserror::Error;

pub type HotKeysResult<T> = Result<T, HotKeysError>;

/// Failures that abort a whole fetch.
#[derive(Debug, Error)]
pub enum HotKeysError {
    /// No storage-owning members were found, so there is nothing to dispatch to.
    #[error("There must be storage members in service '{service}' for fetch top n keys to run")]
    NoStorageMembers { service: String },

    /// The await step was cancelled or ran past its deadline.
    #[error("Interrupted while awaiting invocation completion: {0}")]
    Interrupted(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by a node-local hot-key scan.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Unknown cache '{0}' on this member")]
    UnknownCache(String),

    #[error("Cache service mismatch: requested '{requested}', member runs '{actual}'")]
    ServiceMismatch { requested: String, actual: String },

    #[error("Failed to decode key '{key}': {reason}")]
    KeyDecode { key: String, reason: String },

    #[error("Task aborted: {0}")]
    Panicked(String),
}
