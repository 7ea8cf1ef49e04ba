//! Playback controller - the state machine
//!
//! Owns the queue, the play/pause/prepare lifecycle, shuffle/repeat/A-B
//! state and the renderer. Every method runs to completion on one thread;
//! [`Player`](crate::Player) gives it that thread.
//!
//! ```text
//!            set_queue / skip / advance
//!   Idle ───────────────────────────────▶ Preparing
//!    ▲                                        │ prepared
//!    │ empty queue / failure                  ▼
//!    └──────────────────────────────────── Paused ◀──▶ Playing
//!                                            play / pause
//! ```
//!
//! Any state goes to `Shutdown` on [`PlaybackController::shutdown`].

use cadence_core::AudioSource;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{PlaybackError, Result};
use crate::observer::{ObserverRegistry, PlayerObserver, PlayerState};
use crate::queue::{AudioSourceQueue, Relocation};
use crate::renderer::{PrepareToken, Renderer, RendererError, RendererEvent};
use crate::types::{AbLoop, EngineState, PlayerConfig, RepeatMode, ShuffleMode};

/// Playback state machine
pub struct PlaybackController {
    state: EngineState,
    queue: AudioSourceQueue,

    /// Natural index of the current item
    current: Option<usize>,

    shuffle: ShuffleMode,
    repeat: RepeatMode,

    /// Start playing as soon as the current item is prepared
    play_when_ready: bool,

    ab: AbLoop,
    speed: f32,
    pitch: f32,

    /// Cached from the renderer, milliseconds
    duration: u32,
    progress: u32,

    last_error: Option<PlaybackError>,

    /// Bumped on every prepare, cancel and shutdown
    generation: u64,

    /// Completion already handled for the loaded item
    completion_handled: bool,

    /// Automatic skip after a renderer failure already used
    skip_retry_spent: bool,

    renderer: Option<Box<dyn Renderer>>,
    observers: ObserverRegistry,
    config: PlayerConfig,
}

impl PlaybackController {
    /// Create an idle controller driving `renderer`
    pub fn new(config: PlayerConfig, renderer: Box<dyn Renderer>) -> Self {
        Self {
            state: EngineState::Idle,
            queue: AudioSourceQueue::default(),
            current: None,
            shuffle: config.shuffle,
            repeat: config.repeat,
            play_when_ready: false,
            ab: AbLoop::Unset,
            speed: config.speed,
            pitch: config.pitch,
            duration: 0,
            progress: 0,
            last_error: None,
            generation: 0,
            completion_handled: false,
            skip_retry_spent: false,
            renderer: Some(renderer),
            observers: ObserverRegistry::new(),
            config,
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.state == EngineState::Shutdown
    }

    // ===== Observers =====

    /// Returns `false` if the observer was already registered
    pub fn register_observer(&mut self, observer: Arc<dyn PlayerObserver>) -> Result<bool> {
        self.ensure_alive()?;
        Ok(self.observers.register(observer))
    }

    /// Returns `false` if the observer was not registered
    pub fn unregister_observer(&mut self, observer: &Arc<dyn PlayerObserver>) -> Result<bool> {
        self.ensure_alive()?;
        Ok(self.observers.unregister(observer))
    }

    // ===== Queue =====

    /// Replace the queue and prepare the item at natural `start_position`
    ///
    /// An empty queue leaves the controller idle.
    pub fn set_queue(
        &mut self,
        items: Vec<AudioSource>,
        start_position: usize,
        start_playing: bool,
    ) -> Result<()> {
        self.ensure_alive()?;
        if !items.is_empty() && start_position >= items.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index: start_position,
                len: items.len(),
            });
        }

        info!(
            "Installing queue of {} items at position {}",
            items.len(),
            start_position
        );

        self.queue = AudioSourceQueue::new(items);
        if self.shuffle == ShuffleMode::On {
            self.queue.regenerate_shuffle_order(Some(start_position));
        }
        self.current = None;
        self.play_when_ready = start_playing;
        self.skip_retry_spent = false;
        self.last_error = None;

        self.emit(|o, p| o.on_queue_changed(p, p.queue()));

        if self.queue.is_empty() {
            self.go_idle();
        } else {
            self.switch_to(start_position);
        }
        Ok(())
    }

    /// Append items; loads the first one (paused) if the queue was empty
    pub fn add(&mut self, items: Vec<AudioSource>) -> Result<()> {
        self.ensure_alive()?;
        if items.is_empty() {
            return Ok(());
        }

        let was_empty = self.queue.is_empty();
        let before = self.position_in_queue();
        debug!("Adding {} items to queue", items.len());

        self.queue.append(items, self.current.is_some());
        self.emit(|o, p| o.on_queue_changed(p, p.queue()));

        if was_empty {
            if let Some(first) = self.queue.natural_index(0, self.shuffle) {
                self.play_when_ready = false;
                self.skip_retry_spent = false;
                self.switch_to(first);
            }
        } else {
            self.notify_position_change(before);
        }
        Ok(())
    }

    /// Remove every entry sharing the item's source
    pub fn remove(&mut self, item: &AudioSource) -> Result<()> {
        self.remove_all(std::slice::from_ref(item))
    }

    /// Remove every entry sharing a source with any of `items`
    ///
    /// If the current item goes, whatever slides into its position is
    /// prepared instead (wrapping to the head).
    pub fn remove_all(&mut self, items: &[AudioSource]) -> Result<()> {
        self.ensure_alive()?;

        let before = self.position_in_queue();
        let removal = self.queue.remove_all(items);
        if removal.is_empty() {
            return Ok(());
        }
        debug!("Removed {} items from queue", removal.natural.len());

        let previous = self.current;
        self.current = previous.and_then(|index| removal.map_index(index));
        self.emit(|o, p| o.on_queue_changed(p, p.queue()));

        if previous.is_some() && self.current.is_none() {
            if self.queue.is_empty() {
                self.go_idle();
                return Ok(());
            }
            let mut position = before.map_or(0, |p| removal.successor_position(p, self.shuffle));
            if position >= self.queue.len() {
                position = 0;
            }
            if let Some(index) = self.queue.natural_index(position, self.shuffle) {
                self.switch_to(index);
            }
        } else {
            self.notify_position_change(before);
        }
        Ok(())
    }

    /// Place `target` between `preceding` and `following` (natural order)
    pub fn move_item(
        &mut self,
        target: &AudioSource,
        preceding: Option<&AudioSource>,
        following: Option<&AudioSource>,
    ) -> Result<()> {
        self.ensure_alive()?;
        let before = self.position_in_queue();
        let relocation = self.queue.move_item(target, preceding, following)?;
        self.after_relocation(relocation, before);
        Ok(())
    }

    /// Move the item at natural position `from` to `to`
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_alive()?;
        let before = self.position_in_queue();
        let relocation = self.queue.move_to(from, to)?;
        self.after_relocation(relocation, before);
        Ok(())
    }

    fn after_relocation(&mut self, relocation: Relocation, before: Option<usize>) {
        if relocation.from == relocation.to {
            return;
        }
        debug!("Moved queue item {} -> {}", relocation.from, relocation.to);
        self.current = self.current.map(|index| relocation.map_index(index));
        self.emit(|o, p| o.on_queue_changed(p, p.queue()));
        self.notify_position_change(before);
    }

    /// Replace the current item with a refreshed copy of the same source
    pub fn update(&mut self, item: AudioSource) -> Result<()> {
        self.ensure_alive()?;
        let index = self
            .current
            .filter(|&index| {
                self.queue
                    .get(index)
                    .is_some_and(|current| current.is_same_source(&item))
            })
            .ok_or_else(|| {
                PlaybackError::NotFound(format!("{} is not the current item", item.source()))
            })?;

        self.queue.replace(index, item)?;
        self.emit(|o, p| {
            if let Some(current) = p.current_item() {
                o.on_audio_source_updated(p, current);
            }
        });
        Ok(())
    }

    // ===== Transport =====

    pub fn play(&mut self) -> Result<()> {
        self.ensure_alive()?;
        match self.state {
            EngineState::Paused => {
                self.play_when_ready = true;
                self.start_playback();
            }
            // Honored once prepared
            EngineState::Preparing => self.play_when_ready = true,
            EngineState::Idle | EngineState::Playing | EngineState::Shutdown => {}
        }
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.ensure_alive()?;
        match self.state {
            EngineState::Playing => {
                self.play_when_ready = false;
                self.pause_playback();
            }
            EngineState::Preparing => self.play_when_ready = false,
            EngineState::Idle | EngineState::Paused | EngineState::Shutdown => {}
        }
        Ok(())
    }

    /// Play when paused, pause when playing
    pub fn toggle(&mut self) -> Result<()> {
        let playing = match self.state {
            EngineState::Playing => true,
            EngineState::Preparing => self.play_when_ready,
            _ => false,
        };
        if playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Seek within the current item, clamped to its duration
    ///
    /// Seeking outside an active A-B segment clears the loop.
    pub fn seek_to(&mut self, position: u32) -> Result<()> {
        self.ensure_alive()?;
        self.ensure_prepared("seek")?;

        let target = position.min(self.duration);
        if let Some((a, b)) = self.ab.segment() {
            if target < a || target > b {
                self.clear_ab();
            }
        }

        debug!("Seeking to {}ms", target);
        self.progress = target;
        self.completion_handled = false;
        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.seek_to(target);
        }
        self.emit(|o, p| o.on_sought_to(p, target));
        Ok(())
    }

    /// Explicit skip always moves under `One`; only `Off` stops at the ends
    pub fn skip_to_next(&mut self) -> Result<()> {
        self.ensure_alive()?;
        let wrap = self.repeat != RepeatMode::Off;
        if let Some(next) = self.neighbour(true, wrap) {
            self.skip_retry_spent = false;
            self.switch_to(next);
        }
        Ok(())
    }

    pub fn skip_to_previous(&mut self) -> Result<()> {
        self.ensure_alive()?;
        let wrap = self.repeat != RepeatMode::Off;
        if let Some(previous) = self.neighbour(false, wrap) {
            self.skip_retry_spent = false;
            self.switch_to(previous);
        }
        Ok(())
    }

    /// Jump to a position of the active order
    pub fn skip_to(&mut self, position: usize) -> Result<()> {
        self.ensure_alive()?;
        let index = self.queue.natural_index(position, self.shuffle).ok_or(
            PlaybackError::IndexOutOfRange {
                index: position,
                len: self.queue.len(),
            },
        )?;
        self.skip_retry_spent = false;
        self.switch_to(index);
        Ok(())
    }

    // ===== Modes =====

    pub fn set_shuffle_mode(&mut self, mode: ShuffleMode) -> Result<()> {
        self.ensure_alive()?;
        if self.shuffle == mode {
            return Ok(());
        }

        let before = self.position_in_queue();
        self.shuffle = mode;
        if mode == ShuffleMode::On {
            self.queue.regenerate_shuffle_order(self.current);
        }
        info!("Shuffle mode set to {:?}", mode);

        self.emit(|o, p| o.on_shuffle_mode_changed(p, mode));
        self.notify_position_change(before);
        Ok(())
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) -> Result<()> {
        self.ensure_alive()?;
        if self.repeat == mode {
            return Ok(());
        }
        self.repeat = mode;
        info!("Repeat mode set to {:?}", mode);
        self.emit(|o, p| o.on_repeat_mode_changed(p, mode));
        Ok(())
    }

    /// Point or clear the A-B loop
    ///
    /// Pointing captures the renderer's current position. B requires A and
    /// must differ from it; points are kept ordered so that A < B.
    pub fn set_ab(&mut self, a_pointed: bool, b_pointed: bool) -> Result<()> {
        self.ensure_alive()?;

        let next = match (a_pointed, b_pointed) {
            (false, false) => AbLoop::Unset,
            (false, true) => {
                return Err(PlaybackError::illegal_state("cannot point B without A"));
            }
            (true, false) => {
                self.ensure_prepared("point A")?;
                AbLoop::A(self.live_progress())
            }
            (true, true) => {
                let a = match self.ab {
                    AbLoop::A(a) | AbLoop::Both { a, .. } => a,
                    AbLoop::Unset => {
                        return Err(PlaybackError::illegal_state("cannot point B without A"));
                    }
                };
                self.ensure_prepared("point B")?;
                let b = self.live_progress();
                if b == a {
                    return Err(PlaybackError::invalid_argument(format!(
                        "B must differ from A ({a}ms)"
                    )));
                }
                AbLoop::Both {
                    a: a.min(b),
                    b: a.max(b),
                }
            }
        };

        if next != self.ab {
            debug!("A-B loop set to {:?}", next);
            self.ab = next;
            self.emit(|o, p| o.on_ab_changed(p, next.a_pointed(), next.b_pointed()));
        }
        Ok(())
    }

    pub fn point_a(&mut self) -> Result<()> {
        self.set_ab(true, false)
    }

    pub fn point_b(&mut self) -> Result<()> {
        self.set_ab(true, true)
    }

    pub fn reset_ab(&mut self) -> Result<()> {
        self.set_ab(false, false)
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<()> {
        self.ensure_alive()?;
        check_bounds("speed", speed, self.config.min_speed, self.config.max_speed)?;

        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.set_speed(speed);
        }
        if speed != self.speed {
            self.speed = speed;
            self.emit(|o, p| o.on_playback_speed_changed(p, speed));
        }
        Ok(())
    }

    pub fn set_pitch(&mut self, pitch: f32) -> Result<()> {
        self.ensure_alive()?;
        check_bounds("pitch", pitch, self.config.min_pitch, self.config.max_pitch)?;

        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.set_pitch(pitch);
        }
        if pitch != self.pitch {
            self.pitch = pitch;
            self.emit(|o, p| o.on_playback_pitch_changed(p, pitch));
        }
        Ok(())
    }

    // ===== Errors & lifecycle =====

    /// Record a failure from outside the renderer (repository hand-off)
    pub fn report_error(&mut self, error: PlaybackError) -> Result<()> {
        self.ensure_alive()?;
        warn!("Reported error: {}", error);
        self.last_error = Some(error.clone());
        self.emit(|o, p| o.on_internal_error_occurred(p, &error));
        Ok(())
    }

    /// Release the renderer and deliver `on_shutdown`; idempotent
    pub fn shutdown(&mut self) {
        if self.is_shut_down() {
            return;
        }
        info!("Shutting down playback controller");

        self.generation += 1;
        self.play_when_ready = false;
        if let Some(mut renderer) = self.renderer.take() {
            renderer.release();
        }

        self.state = EngineState::Shutdown;
        let view: &Self = self;
        view.observers.dispatch(|o| o.on_shutdown(view));
        self.observers.clear();
    }

    // ===== Renderer input =====

    /// Apply an asynchronous renderer outcome; stale tokens are dropped
    pub fn handle_renderer_event(&mut self, event: RendererEvent) {
        if self.is_shut_down() {
            return;
        }
        match event {
            RendererEvent::Prepared {
                token,
                duration_ms,
                progress_ms,
            } => self.handle_prepared(token, duration_ms, progress_ms),
            RendererEvent::Completed { token } => {
                if self.is_current(token) {
                    self.complete();
                } else {
                    debug!("Dropping stale completion (generation {})", token.generation());
                }
            }
            RendererEvent::Failed { token, error } => self.handle_failure(token, error),
        }
    }

    /// Periodic progress poll; only does work while playing
    pub fn tick(&mut self) {
        if self.state != EngineState::Playing {
            return;
        }

        self.progress = self.live_progress();

        if let Some((a, b)) = self.ab.segment() {
            if self.progress >= b {
                // Silent jump: not a user seek
                self.progress = a;
                if let Some(renderer) = self.renderer.as_deref_mut() {
                    renderer.seek_to(a);
                }
                return;
            }
        }

        if self.duration > 0 && self.progress >= self.duration {
            self.complete();
        }
    }

    fn handle_prepared(&mut self, token: PrepareToken, duration: u32, progress: u32) {
        if !self.is_current(token) || self.state != EngineState::Preparing {
            debug!("Dropping stale prepared event (generation {})", token.generation());
            return;
        }

        let progress = progress.min(duration);
        self.duration = duration;
        self.progress = progress;
        self.state = EngineState::Paused;
        self.skip_retry_spent = false;
        debug!("Prepared: duration {}ms, progress {}ms", duration, progress);

        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.set_speed(self.speed);
            renderer.set_pitch(self.pitch);
        }

        self.emit(|o, p| o.on_prepared(p, duration, progress));
        if self.play_when_ready && self.state == EngineState::Paused {
            self.start_playback();
        }
    }

    fn handle_failure(&mut self, token: PrepareToken, error: RendererError) {
        if !self.is_current(token) {
            debug!("Dropping stale failure (generation {}): {}", token.generation(), error);
            return;
        }
        warn!("Renderer failed: {}", error);

        let error = PlaybackError::Renderer(error);
        self.last_error = Some(error.clone());
        self.emit(|o, p| o.on_internal_error_occurred(p, &error));

        let retry = if self.skip_retry_spent {
            None
        } else {
            self.neighbour(true, true)
                .filter(|&next| Some(next) != self.current)
        };

        match retry {
            Some(next) => {
                info!("Skipping past failed item");
                self.skip_retry_spent = true;
                self.switch_to(next);
            }
            None => self.settle_after_failure(),
        }
    }

    // ===== Internal transitions =====

    /// Handle natural completion of the loaded item, at most once
    fn complete(&mut self) {
        if self.completion_handled || !self.state.is_prepared() {
            return;
        }
        self.completion_handled = true;
        debug!("Item completed (repeat {:?})", self.repeat);

        match self.repeat {
            RepeatMode::One => {
                if let Some(index) = self.current {
                    self.switch_to(index);
                }
            }
            RepeatMode::All => {
                if let Some(next) = self.neighbour(true, true) {
                    self.switch_to(next);
                }
            }
            RepeatMode::Off => match self.neighbour(true, false) {
                Some(next) => self.switch_to(next),
                None => self.rewind_at_end(),
            },
        }
    }

    /// End of the active order with repeat off: back to 0, paused
    fn rewind_at_end(&mut self) {
        let was_playing = self.state == EngineState::Playing;
        info!("Reached end of queue");

        self.play_when_ready = false;
        self.state = EngineState::Paused;
        self.progress = 0;
        self.completion_handled = false;
        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.pause();
            renderer.seek_to(0);
        }
        if was_playing {
            self.emit(|o, p| o.on_playback_paused(p));
        }
    }

    /// Make `index` current and start preparing it
    fn switch_to(&mut self, index: usize) {
        self.current = Some(index);
        self.generation += 1;
        self.state = EngineState::Preparing;
        self.duration = 0;
        self.progress = 0;
        self.completion_handled = false;
        let had_loop = self.take_ab();

        let token = PrepareToken(self.generation);
        debug!("Preparing queue item {} (generation {})", index, self.generation);

        self.emit(|o, p| o.on_audio_source_changed(p, p.current_item(), p.position_in_queue()));
        if had_loop {
            self.emit(|o, p| o.on_ab_changed(p, false, false));
        }

        if let (Some(renderer), Some(item)) = (self.renderer.as_deref_mut(), self.queue.get(index)) {
            renderer.prepare(item, token);
        }
    }

    /// Nothing loaded; cancels any outstanding prepare
    fn go_idle(&mut self) {
        let was_playing = self.state == EngineState::Playing;
        self.current = None;
        self.generation += 1;
        self.state = EngineState::Idle;
        self.play_when_ready = false;
        self.duration = 0;
        self.progress = 0;
        let had_loop = self.take_ab();

        if was_playing {
            if let Some(renderer) = self.renderer.as_deref_mut() {
                renderer.pause();
            }
        }
        debug!("Controller idle");
        self.emit(|o, p| o.on_audio_source_changed(p, None, None));
        if had_loop {
            self.emit(|o, p| o.on_ab_changed(p, false, false));
        }
    }

    /// Repeated failure: stop trying, keep the queue and current item
    fn settle_after_failure(&mut self) {
        let was_playing = self.state == EngineState::Playing;
        warn!("Giving up after renderer failure");

        self.generation += 1;
        self.state = EngineState::Idle;
        self.play_when_ready = false;
        self.duration = 0;
        self.progress = 0;
        self.clear_ab();

        if was_playing {
            if let Some(renderer) = self.renderer.as_deref_mut() {
                renderer.pause();
            }
            self.emit(|o, p| o.on_playback_paused(p));
        }
    }

    fn start_playback(&mut self) {
        self.state = EngineState::Playing;
        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.start();
        }
        debug!("Playback started");
        self.emit(|o, p| o.on_playback_started(p));
    }

    fn pause_playback(&mut self) {
        self.state = EngineState::Paused;
        self.progress = self.live_progress();
        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.pause();
        }
        debug!("Playback paused");
        self.emit(|o, p| o.on_playback_paused(p));
    }

    fn clear_ab(&mut self) {
        if self.take_ab() {
            self.emit(|o, p| o.on_ab_changed(p, false, false));
        }
    }

    /// Drop the loop without notifying; returns whether one was set
    fn take_ab(&mut self) -> bool {
        std::mem::take(&mut self.ab) != AbLoop::Unset
    }

    fn notify_position_change(&self, before: Option<usize>) {
        if let Some(after) = self.position_in_queue() {
            if Some(after) != before {
                self.emit(|o, p| o.on_position_in_queue_changed(p, after));
            }
        }
    }

    /// Natural index one step forward/backward in the active order
    fn neighbour(&self, forward: bool, wrap: bool) -> Option<usize> {
        let len = self.queue.len();
        let position = self.position_in_queue()?;

        let target = if forward {
            if position + 1 < len {
                position + 1
            } else if wrap {
                0
            } else {
                return None;
            }
        } else if position > 0 {
            position - 1
        } else if wrap {
            len - 1
        } else {
            return None;
        };

        self.queue.natural_index(target, self.shuffle)
    }

    /// Renderer position clamped to the known duration
    fn live_progress(&self) -> u32 {
        let progress = self
            .renderer
            .as_deref()
            .map_or(self.progress, |renderer| renderer.progress());
        if self.duration > 0 {
            progress.min(self.duration)
        } else {
            progress
        }
    }

    fn is_current(&self, token: PrepareToken) -> bool {
        token.generation() == self.generation
    }

    fn emit(&self, notify: impl Fn(&dyn PlayerObserver, &dyn PlayerState)) {
        if self.is_shut_down() {
            return;
        }
        self.observers.dispatch(|observer| notify(observer, self));
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_shut_down() {
            return Err(PlaybackError::shut_down());
        }
        Ok(())
    }

    fn ensure_prepared(&self, action: &str) -> Result<()> {
        if self.state.is_prepared() {
            Ok(())
        } else {
            Err(PlaybackError::illegal_state(format!(
                "cannot {action} while {:?}",
                self.state
            )))
        }
    }
}

fn check_bounds(name: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PlaybackError::invalid_argument(format!(
            "{name} must be finite and positive, got {value}"
        )));
    }
    if value < min || value > max {
        return Err(PlaybackError::invalid_argument(format!(
            "{name} {value} outside [{min}, {max}]"
        )));
    }
    Ok(())
}

impl PlayerState for PlaybackController {
    fn state(&self) -> EngineState {
        self.state
    }

    fn current_item(&self) -> Option<&AudioSource> {
        self.current.and_then(|index| self.queue.get(index))
    }

    fn position_in_queue(&self) -> Option<usize> {
        self.current
            .and_then(|index| self.queue.active_position(index, self.shuffle))
    }

    fn queue(&self) -> &AudioSourceQueue {
        &self.queue
    }

    fn duration(&self) -> u32 {
        self.duration
    }

    fn progress(&self) -> u32 {
        self.progress
    }

    fn shuffle_mode(&self) -> ShuffleMode {
        self.shuffle
    }

    fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    fn ab_loop(&self) -> AbLoop {
        self.ab
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }

    fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("current", &self.current)
            .field("queue_len", &self.queue.len())
            .field("shuffle", &self.shuffle)
            .field("repeat", &self.repeat)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
