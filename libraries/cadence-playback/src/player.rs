//! Threaded player facade
//!
//! Runs a [`PlaybackController`] on a dedicated `cadence-playback` thread.
//! Calls from other threads become commands on a crossbeam channel and
//! block until the controller has applied them, so synchronous rejections
//! still reach the caller. Calls made on the playback thread itself (from
//! inside an observer callback) are queued behind the current transition
//! and return `Ok(())` immediately.

use cadence_core::{AudioSource, MoveOp};
use crossbeam_channel::{bounded, never, select, tick, unbounded, Receiver, Sender};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::controller::PlaybackController;
use crate::error::{PlaybackError, Result};
use crate::observer::{PlaybackSnapshot, PlayerObserver, PlayerState};
use crate::renderer::{Renderer, RendererEvent, RendererEvents};
use crate::types::{PlayerConfig, RepeatMode, ShuffleMode};

/// Commands applied by the playback thread
pub(crate) enum Request {
    SetQueue {
        items: Vec<AudioSource>,
        start_position: usize,
        start_playing: bool,
    },
    Play,
    Pause,
    Toggle,
    SeekTo(u32),
    SkipToNext,
    SkipToPrevious,
    SkipTo(usize),
    SetShuffleMode(ShuffleMode),
    SetRepeatMode(RepeatMode),
    SetAb {
        a_pointed: bool,
        b_pointed: bool,
    },
    SetSpeed(f32),
    SetPitch(f32),
    Update(AudioSource),
    Add(Vec<AudioSource>),
    RemoveAll(Vec<AudioSource>),
    MoveItem(MoveOp),
    MoveTo {
        from: usize,
        to: usize,
    },
    RegisterObserver(Arc<dyn PlayerObserver>),
    UnregisterObserver(Arc<dyn PlayerObserver>),
    ReportError(PlaybackError),
    Shutdown,
}

impl Request {
    fn name(&self) -> &'static str {
        match self {
            Self::SetQueue { .. } => "SetQueue",
            Self::Play => "Play",
            Self::Pause => "Pause",
            Self::Toggle => "Toggle",
            Self::SeekTo(_) => "SeekTo",
            Self::SkipToNext => "SkipToNext",
            Self::SkipToPrevious => "SkipToPrevious",
            Self::SkipTo(_) => "SkipTo",
            Self::SetShuffleMode(_) => "SetShuffleMode",
            Self::SetRepeatMode(_) => "SetRepeatMode",
            Self::SetAb { .. } => "SetAb",
            Self::SetSpeed(_) => "SetSpeed",
            Self::SetPitch(_) => "SetPitch",
            Self::Update(_) => "Update",
            Self::Add(_) => "Add",
            Self::RemoveAll(_) => "RemoveAll",
            Self::MoveItem(_) => "MoveItem",
            Self::MoveTo { .. } => "MoveTo",
            Self::RegisterObserver(_) => "RegisterObserver",
            Self::UnregisterObserver(_) => "UnregisterObserver",
            Self::ReportError(_) => "ReportError",
            Self::Shutdown => "Shutdown",
        }
    }

    fn apply(self, controller: &mut PlaybackController) -> Result<()> {
        match self {
            Self::SetQueue {
                items,
                start_position,
                start_playing,
            } => controller.set_queue(items, start_position, start_playing),
            Self::Play => controller.play(),
            Self::Pause => controller.pause(),
            Self::Toggle => controller.toggle(),
            Self::SeekTo(position) => controller.seek_to(position),
            Self::SkipToNext => controller.skip_to_next(),
            Self::SkipToPrevious => controller.skip_to_previous(),
            Self::SkipTo(position) => controller.skip_to(position),
            Self::SetShuffleMode(mode) => controller.set_shuffle_mode(mode),
            Self::SetRepeatMode(mode) => controller.set_repeat_mode(mode),
            Self::SetAb {
                a_pointed,
                b_pointed,
            } => controller.set_ab(a_pointed, b_pointed),
            Self::SetSpeed(speed) => controller.set_speed(speed),
            Self::SetPitch(pitch) => controller.set_pitch(pitch),
            Self::Update(item) => controller.update(item),
            Self::Add(items) => controller.add(items),
            Self::RemoveAll(items) => controller.remove_all(&items),
            Self::MoveItem(op) => {
                controller.move_item(&op.target, op.previous.as_ref(), op.next.as_ref())
            }
            Self::MoveTo { from, to } => controller.move_to(from, to),
            Self::RegisterObserver(observer) => controller.register_observer(observer).map(drop),
            Self::UnregisterObserver(observer) => {
                controller.unregister_observer(&observer).map(drop)
            }
            Self::ReportError(error) => controller.report_error(error),
            Self::Shutdown => {
                controller.shutdown();
                Ok(())
            }
        }
    }
}

/// Playback thread inbox
pub(crate) enum Message {
    /// Apply a request; reply when someone is waiting
    Request {
        request: Request,
        reply: Option<Sender<Result<()>>>,
    },

    /// Capture the current state
    Snapshot(Sender<PlaybackSnapshot>),

    /// Asynchronous renderer outcome
    Renderer(RendererEvent),
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { request, reply } => f
                .debug_struct("Request")
                .field("request", &request.name())
                .field("awaits_reply", &reply.is_some())
                .finish(),
            Self::Snapshot(_) => f.write_str("Snapshot"),
            Self::Renderer(event) => f.debug_tuple("Renderer").field(event).finish(),
        }
    }
}

/// Thread-safe handle to a running playback engine
///
/// Dropping the handle shuts the engine down and joins its thread.
pub struct Player {
    tx: Sender<Message>,
    thread_id: ThreadId,
    handle: Mutex<Option<JoinHandle<()>>>,
    shut_down: AtomicBool,
}

impl Player {
    /// Start a playback thread
    ///
    /// `make_renderer` receives the handle the renderer reports through.
    ///
    /// # Returns
    /// * `Ok(player)` - Engine idle, ready for a queue
    /// * `Err(InvalidConfig)` - Configuration failed validation
    /// * `Err(Thread)` - Playback thread could not be spawned
    pub fn new<R, F>(config: PlayerConfig, make_renderer: F) -> Result<Self>
    where
        R: Renderer + 'static,
        F: FnOnce(RendererEvents) -> R,
    {
        config.validate()?;

        let (tx, rx) = unbounded();
        let renderer = make_renderer(RendererEvents::new(tx.clone()));
        let interval = Duration::from_millis(config.progress_interval_ms);
        let controller = PlaybackController::new(config, Box::new(renderer));

        let handle = thread::Builder::new()
            .name("cadence-playback".to_string())
            .spawn(move || run(controller, &rx, interval))
            .map_err(|e| PlaybackError::Thread(e.to_string()))?;

        Ok(Self {
            tx,
            thread_id: handle.thread().id(),
            handle: Mutex::new(Some(handle)),
            shut_down: AtomicBool::new(false),
        })
    }

    // ===== Queue =====

    pub fn set_queue(
        &self,
        items: Vec<AudioSource>,
        start_position: usize,
        start_playing: bool,
    ) -> Result<()> {
        self.request(Request::SetQueue {
            items,
            start_position,
            start_playing,
        })
    }

    pub fn add(&self, items: Vec<AudioSource>) -> Result<()> {
        self.request(Request::Add(items))
    }

    pub fn remove(&self, item: AudioSource) -> Result<()> {
        self.request(Request::RemoveAll(vec![item]))
    }

    pub fn remove_all(&self, items: Vec<AudioSource>) -> Result<()> {
        self.request(Request::RemoveAll(items))
    }

    /// Place `op.target` between `op.previous` and `op.next`
    pub fn move_item(&self, op: MoveOp) -> Result<()> {
        self.request(Request::MoveItem(op))
    }

    pub fn move_to(&self, from: usize, to: usize) -> Result<()> {
        self.request(Request::MoveTo { from, to })
    }

    pub fn update(&self, item: AudioSource) -> Result<()> {
        self.request(Request::Update(item))
    }

    // ===== Transport =====

    pub fn play(&self) -> Result<()> {
        self.request(Request::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.request(Request::Pause)
    }

    pub fn toggle(&self) -> Result<()> {
        self.request(Request::Toggle)
    }

    pub fn seek_to(&self, position_ms: u32) -> Result<()> {
        self.request(Request::SeekTo(position_ms))
    }

    pub fn skip_to_next(&self) -> Result<()> {
        self.request(Request::SkipToNext)
    }

    pub fn skip_to_previous(&self) -> Result<()> {
        self.request(Request::SkipToPrevious)
    }

    /// Jump to a position of the active order
    pub fn skip_to(&self, position: usize) -> Result<()> {
        self.request(Request::SkipTo(position))
    }

    // ===== Modes =====

    pub fn set_shuffle_mode(&self, mode: ShuffleMode) -> Result<()> {
        self.request(Request::SetShuffleMode(mode))
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode) -> Result<()> {
        self.request(Request::SetRepeatMode(mode))
    }

    pub fn set_ab(&self, a_pointed: bool, b_pointed: bool) -> Result<()> {
        self.request(Request::SetAb {
            a_pointed,
            b_pointed,
        })
    }

    pub fn point_a(&self) -> Result<()> {
        self.set_ab(true, false)
    }

    pub fn point_b(&self) -> Result<()> {
        self.set_ab(true, true)
    }

    pub fn reset_ab(&self) -> Result<()> {
        self.set_ab(false, false)
    }

    pub fn set_speed(&self, speed: f32) -> Result<()> {
        self.request(Request::SetSpeed(speed))
    }

    pub fn set_pitch(&self, pitch: f32) -> Result<()> {
        self.request(Request::SetPitch(pitch))
    }

    // ===== Observers & lifecycle =====

    /// Registering the same observer twice is a no-op
    pub fn register_observer(&self, observer: Arc<dyn PlayerObserver>) -> Result<()> {
        self.request(Request::RegisterObserver(observer))
    }

    /// Unregistering an unknown observer is a no-op
    pub fn unregister_observer(&self, observer: Arc<dyn PlayerObserver>) -> Result<()> {
        self.request(Request::UnregisterObserver(observer))
    }

    /// Surface an external failure as `on_internal_error_occurred`
    pub fn report_error(&self, error: PlaybackError) -> Result<()> {
        self.request(Request::ReportError(error))
    }

    /// Copy of the engine state as of now
    ///
    /// Observers already receive a live view; calling this from the
    /// playback thread is rejected.
    pub fn snapshot(&self) -> Result<PlaybackSnapshot> {
        if self.on_playback_thread() {
            return Err(PlaybackError::illegal_state(
                "snapshot requested from the playback thread",
            ));
        }
        let (reply_tx, reply_rx) = bounded(1);
        self.tx
            .send(Message::Snapshot(reply_tx))
            .map_err(|_| PlaybackError::shut_down())?;
        reply_rx.recv().map_err(|_| PlaybackError::shut_down())
    }

    /// Stop the engine and join its thread; later calls are no-ops
    pub fn shutdown(&self) -> Result<()> {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if let Err(e) = self.request(Request::Shutdown) {
            debug!("Shutdown request not delivered: {}", e);
        }

        if !self.on_playback_thread() {
            let handle = self.handle.lock().ok().and_then(|mut handle| handle.take());
            if let Some(handle) = handle {
                if handle.join().is_err() {
                    warn!("Playback thread panicked");
                }
            }
        }
        Ok(())
    }

    fn request(&self, request: Request) -> Result<()> {
        if self.on_playback_thread() {
            debug!("Queueing re-entrant {} request", request.name());
            return self
                .tx
                .send(Message::Request {
                    request,
                    reply: None,
                })
                .map_err(|_| PlaybackError::shut_down());
        }

        let (reply_tx, reply_rx) = bounded(1);
        self.tx
            .send(Message::Request {
                request,
                reply: Some(reply_tx),
            })
            .map_err(|_| PlaybackError::shut_down())?;
        reply_rx.recv().map_err(|_| PlaybackError::shut_down())?
    }

    fn on_playback_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("thread_id", &self.thread_id)
            .field("shut_down", &self.shut_down.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.shutdown().ok();
    }
}

/// Playback thread main loop
fn run(mut controller: PlaybackController, rx: &Receiver<Message>, interval: Duration) {
    info!("Playback thread started");

    // Only ticks while playing
    let mut ticker: Option<Receiver<Instant>> = None;

    loop {
        let idle = never();
        let ticks = ticker.as_ref().unwrap_or(&idle);

        select! {
            recv(rx) -> message => match message {
                Ok(message) => handle_message(&mut controller, message),
                Err(_) => {
                    debug!("All player handles dropped");
                    controller.shutdown();
                }
            },
            recv(ticks) -> _ => controller.tick(),
        }

        if controller.is_shut_down() {
            break;
        }

        match (controller.is_playing(), ticker.is_some()) {
            (true, false) => ticker = Some(tick(interval)),
            (false, true) => ticker = None,
            _ => {}
        }
    }

    info!("Playback thread stopped");
}

fn handle_message(controller: &mut PlaybackController, message: Message) {
    match message {
        Message::Request { request, reply } => {
            let name = request.name();
            let result = request.apply(controller);
            if let Err(e) = &result {
                debug!("{} rejected: {}", name, e);
            }
            if let Some(reply) = reply {
                reply.send(result).ok();
            }
        }
        Message::Snapshot(reply) => {
            reply.send(PlaybackSnapshot::capture(&*controller)).ok();
        }
        Message::Renderer(event) => controller.handle_renderer_event(event),
    }
}
