//! Playlist editing through the player
//!
//! Keeps a live queue and its backing playlist in step: every edit is applied
//! to the queue first, then an independent copy is handed to the repository.
//! Repository failures do not roll the queue back; they surface to observers
//! as `on_internal_error_occurred`.

use cadence_core::{copy_audio_source, AudioSource, CoreError, MoveOp, Playlist, PlaylistRepository};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{PlaybackError, Result};
use crate::player::Player;

/// Edits a playlist that is loaded into a [`Player`]
pub struct PlaylistEditor {
    player: Arc<Player>,
    repository: Arc<dyn PlaylistRepository>,
    playlist: Playlist,
}

impl PlaylistEditor {
    pub fn new(
        player: Arc<Player>,
        repository: Arc<dyn PlaylistRepository>,
        playlist: Playlist,
    ) -> Self {
        Self {
            player,
            repository,
            playlist,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }

    /// Read the playlist and install it as the queue
    ///
    /// A repository failure is reported to observers and returned.
    pub async fn load(&self, start_position: usize, start_playing: bool) -> Result<()> {
        let songs = match self.repository.songs(&self.playlist).await {
            Ok(songs) => songs,
            Err(e) => return Err(self.report(e)),
        };
        debug!(
            "Loaded {} songs from playlist {}",
            songs.len(),
            self.playlist.id
        );
        self.player.set_queue(songs, start_position, start_playing)
    }

    pub async fn add(&self, items: Vec<AudioSource>) -> Result<()> {
        self.player.add(copies(&items))?;
        let result = self.repository.add_to_playlist(&self.playlist, items).await;
        self.settle(result);
        Ok(())
    }

    pub async fn remove(&self, item: AudioSource) -> Result<()> {
        self.player.remove(copy_audio_source(&item))?;
        let result = self
            .repository
            .remove_from_playlist(&self.playlist, item)
            .await;
        self.settle(result);
        Ok(())
    }

    pub async fn remove_all(&self, items: Vec<AudioSource>) -> Result<()> {
        self.player.remove_all(copies(&items))?;
        let result = self
            .repository
            .remove_all_from_playlist(&self.playlist, items)
            .await;
        self.settle(result);
        Ok(())
    }

    /// Adjacency-based move, only where the sort order allows reordering
    ///
    /// # Errors
    /// - `MoveNotAllowed` when the repository rejects manual ordering for
    ///   `sort_order`; nothing changes
    /// - `NotFound` / `InvalidMove` from the live queue; nothing is persisted
    pub async fn move_item(&self, op: MoveOp, sort_order: &str) -> Result<()> {
        self.ensure_moving_allowed(sort_order).await?;

        self.player.move_item(op.clone())?;
        let result = self.repository.move_item(&self.playlist, op).await;
        self.settle(result);
        Ok(())
    }

    /// Index-based move of the entry at `from` to `to`, gated like
    /// [`move_item`](Self::move_item)
    pub async fn move_to(&self, from: usize, to: usize, sort_order: &str) -> Result<()> {
        self.ensure_moving_allowed(sort_order).await?;

        self.player.move_to(from, to)?;
        let result = self
            .repository
            .move_item_in_playlist(&self.playlist, from, to)
            .await;
        self.settle(result);
        Ok(())
    }

    async fn ensure_moving_allowed(&self, sort_order: &str) -> Result<()> {
        let allowed = match self
            .repository
            .is_moving_allowed_for_sort_order(sort_order)
            .await
        {
            Ok(allowed) => allowed,
            Err(e) => return Err(self.report(e)),
        };
        if !allowed {
            debug!("Refusing move for sort order {}", sort_order);
            return Err(PlaybackError::MoveNotAllowed(sort_order.to_string()));
        }
        Ok(())
    }

    fn settle(&self, result: cadence_core::Result<()>) {
        if let Err(e) = result {
            self.report(e);
        }
    }

    fn report(&self, error: CoreError) -> PlaybackError {
        warn!("Playlist {} repository error: {}", self.playlist.id, error);
        let error = PlaybackError::Repository(error);
        if let Err(e) = self.player.report_error(error.clone()) {
            debug!("Could not report repository error: {}", e);
        }
        error
    }
}

fn copies(items: &[AudioSource]) -> Vec<AudioSource> {
    items.iter().map(copy_audio_source).collect()
}
