//! Error types shared across the memory engine.
//!
//! Each component defines its own narrow error enum; [`MemoryError`] is the
//! umbrella type returned from the memory core and scope router, and maps
//! onto the caller-visible error kinds (not found / invalid argument /
//! backend unavailable / persistence) that the operation surface uses to
//! decide how to respond.

use thiserror::Error;

/// Errors raised by the waypoint association graph.
#[derive(Debug, Error)]
pub enum WaypointError {
    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors raised by the temporal knowledge graph.
#[derive(Debug, Error)]
pub enum TemporalError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors raised by the on-disk JSON persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("could not resolve a data directory")]
    NoDataDir,
}

/// Umbrella error for the memory core and scope router.
///
/// This is the boundary type the operation-surface layer inspects to decide
/// whether a failure is recoverable (`NotFound`, `InvalidArgument`,
/// `BackendUnavailable` become structured responses) or fatal
/// (`Persistence` propagates as an error to the in-flight call).
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("memory not found")]
    NotFound,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("embedding backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Waypoint(#[from] WaypointError),
    #[error(transparent)]
    Temporal(#[from] TemporalError),
}

/// Caller-visible classification of a [`MemoryError`], per the error
/// handling design: recoverable conditions turn into structured responses,
/// only persistence failures are treated as fatal to the in-flight call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    BackendUnavailable,
    PersistenceError,
}

impl MemoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MemoryError::NotFound => ErrorKind::NotFound,
            MemoryError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            MemoryError::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
            MemoryError::Storage(_) | MemoryError::Waypoint(_) | MemoryError::Temporal(_) => {
                ErrorKind::PersistenceError
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MemoryError>;
