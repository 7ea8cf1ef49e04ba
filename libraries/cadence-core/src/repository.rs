//! Playlist repository trait
//!
//! The playback engine reads initial queue contents from, and persists queue
//! edits to, an implementation of this trait. Storage itself lives outside
//! this workspace.

use crate::error::Result;
use crate::types::{AudioSource, MoveOp, Playlist};
use async_trait::async_trait;

/// Durable playlist storage consumed by the engine
///
/// Every call reports success or failure asynchronously. Arguments are owned
/// point-in-time copies; implementations never share them with the live
/// queue.
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Ordered songs of a playlist
    async fn songs(&self, playlist: &Playlist) -> Result<Vec<AudioSource>>;

    /// Whether manual reordering makes sense for the given sort order
    ///
    /// Alphabetical and similar derived orders return `false`.
    async fn is_moving_allowed_for_sort_order(&self, sort_order: &str) -> Result<bool>;

    /// Append songs to a playlist
    async fn add_to_playlist(&self, playlist: &Playlist, items: Vec<AudioSource>) -> Result<()>;

    /// Remove one song from a playlist
    async fn remove_from_playlist(&self, playlist: &Playlist, item: AudioSource) -> Result<()>;

    /// Remove several songs from a playlist
    async fn remove_all_from_playlist(
        &self,
        playlist: &Playlist,
        items: Vec<AudioSource>,
    ) -> Result<()>;

    /// Move the entry at `from` so it ends up at `to`
    async fn move_item_in_playlist(&self, playlist: &Playlist, from: usize, to: usize)
        -> Result<()>;

    /// Adjacency-based move
    async fn move_item(&self, playlist: &Playlist, op: MoveOp) -> Result<()>;
}
