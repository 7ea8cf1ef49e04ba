//! Renderer adapter
//!
//! Abstracts the platform player that actually decodes and outputs audio.
//! The controller only drives it; loading is asynchronous and its outcome
//! comes back through [`RendererEvents`].

use cadence_core::AudioSource;
use crossbeam_channel::Sender;
use std::fmt;
use thiserror::Error;

use crate::player::Message;

/// Identifies one prepare request
///
/// Every prepare gets a fresh token. Events carrying an older token are
/// stale and dropped by the controller, so at most one prepare is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrepareToken(pub(crate) u64);

impl PrepareToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Category of renderer failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererErrorKind {
    /// Media could not be read
    Io,

    /// Media could not be decoded
    Decode,

    /// Anything else the platform reports
    Other,
}

impl fmt::Display for RendererErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Io => "I/O",
            Self::Decode => "decode",
            Self::Other => "renderer",
        };
        f.write_str(name)
    }
}

/// Failure reported asynchronously by a renderer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct RendererError {
    pub kind: RendererErrorKind,
    pub message: String,
}

impl RendererError {
    pub fn new(kind: RendererErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(RendererErrorKind::Io, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(RendererErrorKind::Decode, message)
    }
}

/// Asynchronous renderer outcomes, serialized onto the playback thread
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    /// Item loaded; duration and resume position are known
    Prepared {
        token: PrepareToken,
        duration_ms: u32,
        progress_ms: u32,
    },

    /// Item played to its end
    Completed { token: PrepareToken },

    /// Loading or playback failed
    Failed {
        token: PrepareToken,
        error: RendererError,
    },
}

/// Handle a renderer uses to report back to the playback thread
///
/// Cheap to clone; sending after the player has shut down is a silent no-op.
#[derive(Debug, Clone)]
pub struct RendererEvents {
    tx: Sender<Message>,
}

impl RendererEvents {
    pub(crate) fn new(tx: Sender<Message>) -> Self {
        Self { tx }
    }

    pub fn prepared(&self, token: PrepareToken, duration_ms: u32, progress_ms: u32) {
        self.send(RendererEvent::Prepared {
            token,
            duration_ms,
            progress_ms,
        });
    }

    pub fn completed(&self, token: PrepareToken) {
        self.send(RendererEvent::Completed { token });
    }

    pub fn failed(&self, token: PrepareToken, error: RendererError) {
        self.send(RendererEvent::Failed { token, error });
    }

    fn send(&self, event: RendererEvent) {
        if self.tx.send(Message::Renderer(event)).is_err() {
            tracing::debug!("Renderer event dropped, playback thread is gone");
        }
    }
}

/// Platform renderer driven by the controller
///
/// Implementors own decoding and output. `prepare` must not block: it starts
/// loading and later reports through [`RendererEvents`] with the given token.
/// All other calls act on the currently loaded item and are cheap.
pub trait Renderer: Send {
    /// Start loading `item`; report `prepared` or `failed` with `token`
    fn prepare(&mut self, item: &AudioSource, token: PrepareToken);

    /// Start or resume output
    fn start(&mut self);

    /// Pause output, keeping position
    fn pause(&mut self);

    /// Jump to a position in milliseconds
    fn seek_to(&mut self, position_ms: u32);

    /// Current position in milliseconds
    fn progress(&self) -> u32;

    fn set_speed(&mut self, speed: f32);

    fn set_pitch(&mut self, pitch: f32);

    /// Free platform resources; no further calls follow
    fn release(&mut self);
}
