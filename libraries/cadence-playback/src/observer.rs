//! Observer protocol
//!
//! Every controller transition is reported to registered observers, one
//! method per event. Delivery happens on the playback thread:
//! - observers are called in registration order
//! - all callbacks of one transition finish before the next command runs
//! - nothing is delivered after `on_shutdown`

use cadence_core::AudioSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::PlaybackError;
use crate::queue::AudioSourceQueue;
use crate::types::{AbLoop, EngineState, RepeatMode, ShuffleMode};

/// Read-only view of the emitting engine, handed to every callback
///
/// Values are cached on the playback thread; reading them never blocks.
/// Duration and progress are meaningful once `on_prepared` has fired for
/// the current item.
pub trait PlayerState {
    fn state(&self) -> EngineState;

    fn is_playing(&self) -> bool {
        self.state() == EngineState::Playing
    }

    fn current_item(&self) -> Option<&AudioSource>;

    /// Position of the current item in the active order
    fn position_in_queue(&self) -> Option<usize>;

    fn queue(&self) -> &AudioSourceQueue;

    fn duration(&self) -> u32;

    fn progress(&self) -> u32;

    fn shuffle_mode(&self) -> ShuffleMode;

    fn repeat_mode(&self) -> RepeatMode;

    fn ab_loop(&self) -> AbLoop;

    fn speed(&self) -> f32;

    fn pitch(&self) -> f32;

    fn last_error(&self) -> Option<&PlaybackError>;
}

/// Receives playback notifications
///
/// All methods default to no-ops so implementors only override what they
/// need. Callbacks run on the playback thread and should return quickly.
#[allow(unused_variables)]
pub trait PlayerObserver: Send + Sync {
    /// Current item loaded; duration/progress are now valid
    fn on_prepared(&self, player: &dyn PlayerState, duration: u32, progress: u32) {}

    fn on_playback_started(&self, player: &dyn PlayerState) {}

    fn on_playback_paused(&self, player: &dyn PlayerState) {}

    /// User-initiated seek only; A-B loop jumps are silent
    fn on_sought_to(&self, player: &dyn PlayerState, position: u32) {}

    fn on_queue_changed(&self, player: &dyn PlayerState, queue: &AudioSourceQueue) {}

    fn on_audio_source_changed(
        &self,
        player: &dyn PlayerState,
        item: Option<&AudioSource>,
        position_in_queue: Option<usize>,
    ) {
    }

    fn on_audio_source_updated(&self, player: &dyn PlayerState, item: &AudioSource) {}

    fn on_position_in_queue_changed(&self, player: &dyn PlayerState, position_in_queue: usize) {}

    fn on_shuffle_mode_changed(&self, player: &dyn PlayerState, mode: ShuffleMode) {}

    fn on_repeat_mode_changed(&self, player: &dyn PlayerState, mode: RepeatMode) {}

    fn on_ab_changed(&self, player: &dyn PlayerState, a_pointed: bool, b_pointed: bool) {}

    fn on_playback_speed_changed(&self, player: &dyn PlayerState, speed: f32) {}

    fn on_playback_pitch_changed(&self, player: &dyn PlayerState, pitch: f32) {}

    /// Not terminal; something went wrong and was handled
    fn on_internal_error_occurred(&self, player: &dyn PlayerState, error: &PlaybackError) {}

    /// Terminal; guaranteed to be the last callback
    fn on_shutdown(&self, player: &dyn PlayerState) {}
}

/// Insertion-ordered set of observers
///
/// Identity is the `Arc` allocation. Membership only changes through
/// `&mut self`, so it can never shift under an in-flight [`dispatch`].
///
/// [`dispatch`]: ObserverRegistry::dispatch
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn PlayerObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the observer was already registered
    pub fn register(&mut self, observer: Arc<dyn PlayerObserver>) -> bool {
        if self.contains(&observer) {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Returns `false` if the observer was not registered
    pub fn unregister(&mut self, observer: &Arc<dyn PlayerObserver>) -> bool {
        let before = self.observers.len();
        self.observers
            .retain(|registered| !same_observer(registered, observer));
        self.observers.len() != before
    }

    pub fn contains(&self, observer: &Arc<dyn PlayerObserver>) -> bool {
        self.observers
            .iter()
            .any(|registered| same_observer(registered, observer))
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    /// Call `notify` once per observer, in registration order
    pub fn dispatch(&self, mut notify: impl FnMut(&dyn PlayerObserver)) {
        for observer in &self.observers {
            notify(observer.as_ref());
        }
    }
}

// Compare data pointers only; vtable pointers may differ across codegen units
fn same_observer(a: &Arc<dyn PlayerObserver>, b: &Arc<dyn PlayerObserver>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a).cast::<()>(),
        Arc::as_ptr(b).cast::<()>(),
    )
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Owned copy of the engine state, for callers off the playback thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: EngineState,
    pub current_item: Option<AudioSource>,
    pub position_in_queue: Option<usize>,

    /// Items in the active order: shuffle order when shuffle is on, natural
    /// order otherwise. `position_in_queue` indexes into this.
    pub queue: Vec<AudioSource>,
    pub duration: u32,
    pub progress: u32,
    pub shuffle_mode: ShuffleMode,
    pub repeat_mode: RepeatMode,
    pub ab_loop: AbLoop,
    pub speed: f32,
    pub pitch: f32,
    pub last_error: Option<String>,
}

impl PlaybackSnapshot {
    /// Copy everything observable out of a live view
    pub fn capture(player: &dyn PlayerState) -> Self {
        Self {
            state: player.state(),
            current_item: player.current_item().cloned(),
            position_in_queue: player.position_in_queue(),
            queue: player
                .queue()
                .active_items(player.shuffle_mode())
                .into_iter()
                .cloned()
                .collect(),
            duration: player.duration(),
            progress: player.progress(),
            shuffle_mode: player.shuffle_mode(),
            repeat_mode: player.repeat_mode(),
            ab_loop: player.ab_loop(),
            speed: player.speed(),
            pitch: player.pitch(),
            last_error: player.last_error().map(ToString::to_string),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == EngineState::Playing
    }
}
