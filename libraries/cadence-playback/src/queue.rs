//! Audio source queue
//!
//! Natural (insertion) order plus a shuffle order kept alongside it:
//!
//! ```text
//! natural:  [A, B, C, D]        positions 0..4, canonical
//! shuffle:  [2, 0, 3, 1]        permutation of natural indices -> C, A, D, B
//! ```
//!
//! Structural edits (append, remove, move) rewrite both so the shuffle order
//! always stays a permutation of `0..len()`.

use cadence_core::AudioSource;
use rand::thread_rng;

use crate::error::{PlaybackError, Result};
use crate::shuffle::{insertion_slot, shuffled_order};
use crate::types::ShuffleMode;

/// Ordered collection of audio sources with a shuffle permutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioSourceQueue {
    items: Vec<AudioSource>,
    shuffle_order: Vec<usize>,
}

/// Natural indices removed by [`AudioSourceQueue::remove_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    /// Removed natural indices, ascending, in pre-removal numbering
    pub natural: Vec<usize>,

    /// Removed shuffle slots, ascending, in pre-removal numbering
    pub shuffled: Vec<usize>,
}

impl Removal {
    pub fn is_empty(&self) -> bool {
        self.natural.is_empty()
    }

    /// Where a surviving natural index ends up; `None` if it was removed
    pub fn map_index(&self, index: usize) -> Option<usize> {
        shift_down(&self.natural, index)
    }

    /// Where a surviving position of the given order ends up
    pub fn map_position(&self, position: usize, mode: ShuffleMode) -> Option<usize> {
        shift_down(self.removed_positions(mode), position)
    }

    /// Position that the first survivor at or after `position` takes
    ///
    /// Used when the current item was removed: whatever slid into its slot
    /// plays next.
    pub fn successor_position(&self, position: usize, mode: ShuffleMode) -> usize {
        let removed = self.removed_positions(mode);
        position - removed.iter().filter(|&&p| p < position).count()
    }

    fn removed_positions(&self, mode: ShuffleMode) -> &[usize] {
        match mode {
            ShuffleMode::Off => &self.natural,
            ShuffleMode::On => &self.shuffled,
        }
    }
}

fn shift_down(removed: &[usize], index: usize) -> Option<usize> {
    if removed.binary_search(&index).is_ok() {
        return None;
    }
    Some(index - removed.iter().filter(|&&r| r < index).count())
}

/// One item relocated within natural order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub from: usize,
    pub to: usize,
}

impl Relocation {
    /// Where a pre-move natural index ends up
    pub fn map_index(&self, index: usize) -> usize {
        let Relocation { from, to } = *self;
        if index == from {
            to
        } else if from < to && index > from && index <= to {
            index - 1
        } else if to < from && index >= to && index < from {
            index + 1
        } else {
            index
        }
    }
}

impl AudioSourceQueue {
    /// Create a queue in the given natural order; shuffle order starts as identity
    pub fn new(items: Vec<AudioSource>) -> Self {
        let shuffle_order = (0..items.len()).collect();
        Self {
            items,
            shuffle_order,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at a natural position
    ///
    /// # Errors
    /// `IndexOutOfRange` outside `[0, len)`
    pub fn at(&self, position: usize) -> Result<&AudioSource> {
        self.items.get(position).ok_or(PlaybackError::IndexOutOfRange {
            index: position,
            len: self.items.len(),
        })
    }

    pub fn get(&self, position: usize) -> Option<&AudioSource> {
        self.items.get(position)
    }

    /// Items in natural order
    pub fn items(&self) -> &[AudioSource] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &AudioSource> {
        self.items.iter()
    }

    /// Current shuffle permutation of natural indices
    pub fn shuffle_order(&self) -> &[usize] {
        &self.shuffle_order
    }

    /// Natural position of the first item with the given id
    pub fn index_of_id(&self, id: i64) -> Option<usize> {
        self.position(|item| item.id() == id)
    }

    /// Natural position of the first item with the same source
    pub fn index_of(&self, item: &AudioSource) -> Option<usize> {
        self.position(|candidate| candidate.is_same_source(item))
    }

    pub fn position(&self, predicate: impl Fn(&AudioSource) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }

    pub fn find_first(&self, predicate: impl Fn(&AudioSource) -> bool) -> Option<&AudioSource> {
        self.items.iter().find(|item| predicate(item))
    }

    /// # Errors
    /// `NotFound` when nothing matches
    pub fn find(&self, predicate: impl Fn(&AudioSource) -> bool) -> Result<&AudioSource> {
        self.find_first(predicate)
            .ok_or_else(|| PlaybackError::NotFound("no queue item matches".to_string()))
    }

    // ===== Active order =====

    /// Position of a natural index within the active order
    pub fn active_position(&self, natural: usize, mode: ShuffleMode) -> Option<usize> {
        if natural >= self.items.len() {
            return None;
        }
        match mode {
            ShuffleMode::Off => Some(natural),
            ShuffleMode::On => self.shuffle_order.iter().position(|&i| i == natural),
        }
    }

    /// Natural index found at a position of the active order
    pub fn natural_index(&self, position: usize, mode: ShuffleMode) -> Option<usize> {
        match mode {
            ShuffleMode::Off => (position < self.items.len()).then_some(position),
            ShuffleMode::On => self.shuffle_order.get(position).copied(),
        }
    }

    /// Items as the active order presents them
    pub fn active_items(&self, mode: ShuffleMode) -> Vec<&AudioSource> {
        match mode {
            ShuffleMode::Off => self.items.iter().collect(),
            ShuffleMode::On => self.shuffle_order.iter().map(|&i| &self.items[i]).collect(),
        }
    }

    // ===== Mutation =====

    /// New uniformly random shuffle order, `pinned` (natural index) first
    pub fn regenerate_shuffle_order(&mut self, pinned: Option<usize>) {
        self.shuffle_order = shuffled_order(self.items.len(), pinned);
    }

    /// Append to natural order; each new index lands in a random shuffle slot
    ///
    /// With `keep_head` slot 0 is never used, so a playing item pinned there
    /// stays first.
    pub fn append(&mut self, items: Vec<AudioSource>, keep_head: bool) {
        let mut rng = thread_rng();
        for item in items {
            let index = self.items.len();
            self.items.push(item);
            let slot = insertion_slot(&mut rng, self.shuffle_order.len(), keep_head);
            self.shuffle_order.insert(slot, index);
        }
    }

    /// Replace the item at a natural position, keeping both orders
    pub(crate) fn replace(&mut self, position: usize, item: AudioSource) -> Result<()> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(position)
            .ok_or(PlaybackError::IndexOutOfRange {
                index: position,
                len,
            })?;
        *slot = item;
        Ok(())
    }

    /// Remove every entry sharing the item's source; absent items are a no-op
    pub fn remove(&mut self, item: &AudioSource) -> Removal {
        self.remove_all(std::slice::from_ref(item))
    }

    /// Remove every entry sharing a source with any of `items`
    pub fn remove_all(&mut self, items: &[AudioSource]) -> Removal {
        let natural: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, entry)| items.iter().any(|item| item.is_same_source(entry)))
            .map(|(index, _)| index)
            .collect();

        if natural.is_empty() {
            return Removal::default();
        }

        let shuffled: Vec<usize> = self
            .shuffle_order
            .iter()
            .enumerate()
            .filter(|(_, index)| natural.binary_search(index).is_ok())
            .map(|(slot, _)| slot)
            .collect();

        let removal = Removal { natural, shuffled };

        let mut index = 0;
        self.items.retain(|_| {
            let keep = removal.natural.binary_search(&index).is_err();
            index += 1;
            keep
        });
        self.shuffle_order = self
            .shuffle_order
            .iter()
            .filter_map(|&i| removal.map_index(i))
            .collect();

        removal
    }

    /// Move the item at natural position `from` so it ends up at `to`
    ///
    /// # Errors
    /// `IndexOutOfRange` when either position is outside the queue
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<Relocation> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(PlaybackError::IndexOutOfRange { index, len });
            }
        }

        let relocation = Relocation { from, to };
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
            for index in &mut self.shuffle_order {
                *index = relocation.map_index(*index);
            }
        }
        Ok(relocation)
    }

    /// Place `target` right after `preceding` and right before `following`
    ///
    /// An absent `preceding` means the head, an absent `following` the tail.
    ///
    /// # Errors
    /// - `NotFound` when any referenced item is not in the queue
    /// - `InvalidMove` when a flank is the target itself or the flanks are
    ///   not adjacent once the target is lifted out; the queue is unchanged
    pub fn move_item(
        &mut self,
        target: &AudioSource,
        preceding: Option<&AudioSource>,
        following: Option<&AudioSource>,
    ) -> Result<Relocation> {
        let from = self
            .index_of(target)
            .ok_or_else(|| PlaybackError::NotFound(format!("move target {}", target.source())))?;

        if [preceding, following]
            .into_iter()
            .flatten()
            .any(|flank| flank.is_same_source(target))
        {
            return Err(PlaybackError::InvalidMove(format!(
                "{} cannot flank itself",
                target.source()
            )));
        }

        // Order once the target is lifted out
        let remaining: Vec<usize> = (0..self.items.len()).filter(|&i| i != from).collect();
        let locate = |flank: &AudioSource| {
            remaining
                .iter()
                .position(|&i| self.items[i].is_same_source(flank))
                .ok_or_else(|| PlaybackError::NotFound(format!("move flank {}", flank.source())))
        };
        let before = preceding.map(locate).transpose()?;
        let after = following.map(locate).transpose()?;

        let to = match (before, after) {
            (Some(p), Some(n)) if n == p + 1 => n,
            (Some(p), None) if p + 1 == remaining.len() => remaining.len(),
            (None, Some(0)) => 0,
            (None, None) if remaining.is_empty() => 0,
            _ => {
                return Err(PlaybackError::InvalidMove(format!(
                    "flanks of {} are not adjacent",
                    target.source()
                )))
            }
        };

        self.move_to(from, to)
    }
}
