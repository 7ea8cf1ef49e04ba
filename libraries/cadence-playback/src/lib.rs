//! Cadence - Playback Engine
//!
//! Platform-agnostic playback state machine for Cadence.
//!
//! This crate provides:
//! - Audio source queue (natural order + shuffle permutation)
//! - Playback controller (prepare / play / pause / seek lifecycle)
//! - Shuffle and repeat modes (Off, One, All)
//! - A-B loop, playback speed and pitch
//! - Ordered observer notifications
//! - A threaded `Player` facade and playlist hand-off to a repository
//!
//! # Architecture
//!
//! `cadence-playback` never decodes or outputs audio. A platform supplies a
//! [`Renderer`]; the controller drives it and receives its asynchronous
//! outcomes through [`RendererEvents`]. All state lives on one playback
//! thread, owned by [`Player`].
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cadence_core::{AudioMetadata, AudioSource};
//! use cadence_playback::{Player, PlayerConfig, PrepareToken, Renderer, RendererEvents};
//!
//! struct SilentRenderer {
//!     events: RendererEvents,
//! }
//!
//! impl Renderer for SilentRenderer {
//!     fn prepare(&mut self, item: &AudioSource, token: PrepareToken) {
//!         // Real renderers load asynchronously and report later
//!         self.events.prepared(token, item.duration_ms(), 0);
//!     }
//!     fn start(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn seek_to(&mut self, _position_ms: u32) {}
//!     fn progress(&self) -> u32 { 0 }
//!     fn set_speed(&mut self, _speed: f32) {}
//!     fn set_pitch(&mut self, _pitch: f32) {}
//!     fn release(&mut self) {}
//! }
//!
//! let player = Player::new(PlayerConfig::default(), |events| SilentRenderer { events })?;
//!
//! let song = AudioSource::new(
//!     1,
//!     "/music/song.mp3",
//!     AudioMetadata::builder().title("My Song").duration_ms(180_000).build(),
//! );
//! player.set_queue(vec![song], 0, true)?;
//! player.pause()?;
//! player.shutdown()?;
//! # Ok::<(), cadence_playback::PlaybackError>(())
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use cadence_playback::{PlayerConfig, RepeatMode, ShuffleMode};
//!
//! let config = PlayerConfig::from_json(r#"{"shuffle": "on", "repeat": "all"}"#).unwrap();
//! assert_eq!(config.shuffle, ShuffleMode::On);
//! assert_eq!(config.repeat, RepeatMode::All);
//! ```

mod controller;
mod editor;
mod error;
mod observer;
mod player;
mod queue;
mod renderer;
pub mod shuffle;
pub mod types;

// Public exports
pub use controller::PlaybackController;
pub use editor::PlaylistEditor;
pub use error::{PlaybackError, Result};
pub use observer::{ObserverRegistry, PlaybackSnapshot, PlayerObserver, PlayerState};
pub use player::Player;
pub use queue::{AudioSourceQueue, Relocation, Removal};
pub use renderer::{
    PrepareToken, Renderer, RendererError, RendererErrorKind, RendererEvent, RendererEvents,
};
pub use types::{AbLoop, EngineState, PlayerConfig, RepeatMode, ShuffleMode};
