//! Cadence Core
//!
//! Value model and collaborator traits shared by the Cadence playback engine.
//!
//! This crate provides:
//! - **Value types**: `AudioMetadata`, `AudioSource`, `Playlist`, `MoveOp`
//! - **Collaborator traits**: `PlaylistRepository` (durable playlist storage)
//! - **Error handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{are_sources_the_same, AudioMetadata, AudioSource};
//!
//! let metadata = AudioMetadata::builder()
//!     .title("Intro")
//!     .artist("Some Band")
//!     .duration_ms(180_000)
//!     .build();
//!
//! let original = AudioSource::new(1, "/music/intro.mp3", metadata);
//! let reissue = AudioSource::new(2, "/music/intro.mp3", AudioMetadata::default());
//!
//! assert_ne!(original, reissue);
//! assert!(are_sources_the_same(&original, &reissue));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod repository;
pub mod types;

pub use error::{CoreError, Result};
pub use repository::PlaylistRepository;
pub use types::{
    are_sources_the_same, copy_audio_source, copy_metadata, AudioMetadata, AudioSource,
    MetadataBuilder, MoveOp, Playlist, PlaylistId,
};
