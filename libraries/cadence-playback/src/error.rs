//! Error types for playback management

use cadence_core::CoreError;
use thiserror::Error;

use crate::renderer::RendererError;

/// Playback errors
///
/// Every synchronous rejection leaves controller state exactly as it was
/// before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// Argument outside its accepted range (speed, pitch, move operation)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not allowed in the current state (B before A, after shutdown)
    #[error("Illegal state transition: {0}")]
    IllegalStateTransition(String),

    /// Referenced item is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Position outside the queue
    #[error("Index out of range: {index} (queue length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Requested placement is not a valid total order
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// Manual reordering is meaningless for the playlist's sort order
    #[error("Moving is not allowed for sort order {0:?}")]
    MoveNotAllowed(String),

    /// Asynchronous renderer failure (I/O, decoding)
    #[error("Renderer failure: {0}")]
    Renderer(#[from] RendererError),

    /// Repository collaborator failure
    #[error("Repository failure: {0}")]
    Repository(#[from] CoreError),

    /// Invalid player configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Playback thread could not be started
    #[error("Playback thread error: {0}")]
    Thread(String),
}

impl PlaybackError {
    pub(crate) fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalStateTransition(msg.into())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn shut_down() -> Self {
        Self::IllegalStateTransition("player has been shut down".to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
