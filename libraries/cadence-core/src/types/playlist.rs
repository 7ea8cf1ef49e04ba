/// Playlist domain types
use serde::{Deserialize, Serialize};
use std::fmt;

use super::AudioSource;
use crate::error::{CoreError, Result};

/// Playlist identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(i64);

impl PlaylistId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playlist handle passed to the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,
}

impl Playlist {
    /// Create a playlist handle
    pub fn new(id: PlaylistId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Adjacency-based move of one playlist entry
///
/// `previous` and `next` are the items that must end up immediately before
/// and after `target`. Both absent means "move to the only position", which
/// only makes sense for a single-item playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOp {
    /// Item being moved
    pub target: AudioSource,

    /// Item that will precede the target after the move
    pub previous: Option<AudioSource>,

    /// Item that will follow the target after the move
    pub next: Option<AudioSource>,
}

impl MoveOp {
    /// Create a move operation
    ///
    /// # Errors
    /// `InvalidArgument` when `previous` or `next` is the target itself, or
    /// both flanks are the same item.
    pub fn new(
        target: AudioSource,
        previous: Option<AudioSource>,
        next: Option<AudioSource>,
    ) -> Result<Self> {
        let flank_is_target = [&previous, &next]
            .into_iter()
            .flatten()
            .any(|flank| flank.is_same_source(&target));
        if flank_is_target {
            return Err(CoreError::invalid_argument(format!(
                "move target {} cannot flank itself",
                target.source()
            )));
        }

        if let (Some(prev), Some(next)) = (&previous, &next) {
            if prev.is_same_source(next) {
                return Err(CoreError::invalid_argument(format!(
                    "previous and next are both {}",
                    prev.source()
                )));
            }
        }

        Ok(Self {
            target,
            previous,
            next,
        })
    }
}
