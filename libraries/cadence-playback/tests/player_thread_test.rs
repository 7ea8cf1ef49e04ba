//! End-to-end tests for the threaded player
//!
//! Renderers here report through the real event channel, so every test
//! exercises the playback thread, its ticker and re-entrant observer calls.

use cadence_core::{AudioMetadata, AudioSource, MoveOp};
use cadence_playback::{
    AudioSourceQueue, EngineState, PlaybackError, PlaybackSnapshot, Player, PlayerConfig,
    PlayerObserver, PlayerState, PrepareToken, Renderer, RendererError, RendererEvents,
    RepeatMode,
};
use std::sync::{Arc, Mutex, Once, OnceLock, Weak};
use std::thread;
use std::time::{Duration, Instant};

// ===== Test Helpers =====

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Loads instantly; plays a whole item in one progress tick
struct SteppingRenderer {
    events: RendererEvents,
    duration: u32,
    position: Arc<Mutex<u32>>,
    fail_sources: Vec<String>,
}

impl SteppingRenderer {
    fn new(events: RendererEvents) -> Self {
        Self {
            events,
            duration: 0,
            position: Arc::new(Mutex::new(0)),
            fail_sources: Vec::new(),
        }
    }
}

impl Renderer for SteppingRenderer {
    fn prepare(&mut self, item: &AudioSource, token: PrepareToken) {
        if self.fail_sources.iter().any(|s| s == item.source()) {
            self.events
                .failed(token, RendererError::io(format!("{} missing", item.source())));
            return;
        }
        self.duration = item.duration_ms();
        *self.position.lock().unwrap() = 0;
        self.events.prepared(token, self.duration, 0);
    }

    fn start(&mut self) {
        *self.position.lock().unwrap() = self.duration;
    }

    fn pause(&mut self) {}

    fn seek_to(&mut self, position_ms: u32) {
        *self.position.lock().unwrap() = position_ms;
    }

    fn progress(&self) -> u32 {
        *self.position.lock().unwrap()
    }

    fn set_speed(&mut self, _speed: f32) {}

    fn set_pitch(&mut self, _pitch: f32) {}

    fn release(&mut self) {}
}

/// Loads only when the test says so
struct ManualRenderer {
    token: Arc<Mutex<Option<PrepareToken>>>,
}

impl Renderer for ManualRenderer {
    fn prepare(&mut self, _item: &AudioSource, token: PrepareToken) {
        *self.token.lock().unwrap() = Some(token);
    }
    fn start(&mut self) {}
    fn pause(&mut self) {}
    fn seek_to(&mut self, _position_ms: u32) {}
    fn progress(&self) -> u32 {
        0
    }
    fn set_speed(&mut self, _speed: f32) {}
    fn set_pitch(&mut self, _pitch: f32) {}
    fn release(&mut self) {}
}

struct NamedObserver {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl NamedObserver {
    fn push(&self, event: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, event));
    }
}

impl PlayerObserver for NamedObserver {
    fn on_queue_changed(&self, _player: &dyn PlayerState, _queue: &AudioSourceQueue) {
        self.push("queue");
    }
    fn on_audio_source_changed(
        &self,
        _player: &dyn PlayerState,
        _item: Option<&AudioSource>,
        _position: Option<usize>,
    ) {
        self.push("source");
    }
    fn on_prepared(&self, _player: &dyn PlayerState, _duration: u32, _progress: u32) {
        self.push("prepared");
    }
    fn on_playback_started(&self, _player: &dyn PlayerState) {
        self.push("started");
    }
    fn on_playback_paused(&self, _player: &dyn PlayerState) {
        self.push("paused");
    }
    fn on_internal_error_occurred(&self, _player: &dyn PlayerState, _error: &PlaybackError) {
        self.push("error");
    }
    fn on_shutdown(&self, _player: &dyn PlayerState) {
        self.push("shutdown");
    }
}

fn create_test_item(n: i64) -> AudioSource {
    AudioSource::new(
        n,
        format!("/music/{n}.wav"),
        AudioMetadata::builder()
            .title(format!("Track {n}"))
            .duration_ms(5_000)
            .build(),
    )
}

fn create_items(len: i64) -> Vec<AudioSource> {
    (0..len).map(create_test_item).collect()
}

fn fast_config() -> PlayerConfig {
    init_logging();
    PlayerConfig {
        progress_interval_ms: 5,
        ..PlayerConfig::default()
    }
}

fn stepping_player() -> Player {
    Player::new(fast_config(), SteppingRenderer::new).unwrap()
}

/// Poll snapshots until `condition` holds
fn wait_for(player: &Player, condition: impl Fn(&PlaybackSnapshot) -> bool) -> PlaybackSnapshot {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let snapshot = player.snapshot().unwrap();
        if condition(&snapshot) {
            return snapshot;
        }
        assert!(Instant::now() < deadline, "timed out, last state: {snapshot:?}");
        thread::sleep(Duration::from_millis(2));
    }
}

fn current_id(snapshot: &PlaybackSnapshot) -> Option<i64> {
    snapshot.current_item.as_ref().map(AudioSource::id)
}

// ===== Tests =====

#[test]
fn synchronous_rejections_reach_the_caller() {
    let player = stepping_player();

    assert_eq!(
        player.set_queue(create_items(2), 5, false),
        Err(PlaybackError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert!(matches!(
        player.set_speed(0.0),
        Err(PlaybackError::InvalidArgument(_))
    ));
    assert!(matches!(
        player.set_ab(false, true),
        Err(PlaybackError::IllegalStateTransition(_))
    ));
}

#[test]
fn observers_are_called_in_registration_order() {
    let player = stepping_player();
    let log = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second"] {
        player
            .register_observer(Arc::new(NamedObserver {
                name,
                log: Arc::clone(&log),
            }))
            .unwrap();
    }

    player.set_queue(create_items(1), 0, false).unwrap();
    wait_for(&player, |s| s.state == EngineState::Paused);

    let log = log.lock().unwrap().clone();
    assert_eq!(
        log,
        vec![
            "first:queue",
            "second:queue",
            "first:source",
            "second:source",
            "first:prepared",
            "second:prepared",
        ]
    );
}

#[test]
fn progress_ticks_drive_completion() {
    let player = stepping_player();
    player.set_queue(create_items(3), 0, true).unwrap();

    // Each item completes on the first tick after it starts; repeat off
    // stops at the last item, rewound and paused
    let snapshot = wait_for(&player, |s| {
        current_id(s) == Some(2) && s.state == EngineState::Paused
    });
    assert_eq!(snapshot.progress, 0);
    assert!(!snapshot.is_playing());
}

#[test]
fn repeat_all_keeps_cycling() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let player = stepping_player();
    player
        .register_observer(Arc::new(NamedObserver {
            name: "o",
            log: Arc::clone(&log),
        }))
        .unwrap();
    player.set_repeat_mode(RepeatMode::All).unwrap();
    player.set_queue(create_items(2), 0, true).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while log
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.as_str() == "o:started")
        .count()
        < 5
    {
        assert!(Instant::now() < deadline, "player stopped cycling");
        thread::sleep(Duration::from_millis(2));
    }
    player.pause().unwrap();
}

#[test]
fn play_during_prepare_is_honored() {
    let token = Arc::new(Mutex::new(None));
    let events = Arc::new(Mutex::new(None));
    let player = Player::new(fast_config(), |handle| {
        *events.lock().unwrap() = Some(handle);
        ManualRenderer {
            token: Arc::clone(&token),
        }
    })
    .unwrap();

    player.set_queue(create_items(1), 0, false).unwrap();
    player.play().unwrap();
    assert_eq!(player.snapshot().unwrap().state, EngineState::Preparing);

    let token = token.lock().unwrap().unwrap();
    let events = events.lock().unwrap().clone().unwrap();
    events.prepared(token, 5_000, 0);

    let snapshot = wait_for(&player, |s| s.state != EngineState::Preparing);
    assert!(snapshot.is_playing());
    assert_eq!(snapshot.duration, 5_000);
}

#[test]
fn late_events_for_replaced_items_are_ignored() {
    let token = Arc::new(Mutex::new(None));
    let events = Arc::new(Mutex::new(None));
    let player = Player::new(fast_config(), |handle| {
        *events.lock().unwrap() = Some(handle);
        ManualRenderer {
            token: Arc::clone(&token),
        }
    })
    .unwrap();
    let events = events.lock().unwrap().clone().unwrap();

    player.set_queue(create_items(2), 0, false).unwrap();
    let stale = token.lock().unwrap().unwrap();
    player.skip_to_next().unwrap();

    events.failed(stale, RendererError::io("late"));
    events.prepared(stale, 1_000, 0);

    let snapshot = player.snapshot().unwrap();
    assert_eq!(snapshot.state, EngineState::Preparing);
    assert_eq!(current_id(&snapshot), Some(1));
    assert!(snapshot.last_error.is_none());
}

#[test]
fn failing_item_is_skipped() {
    let player = Player::new(fast_config(), |events| {
        let mut renderer = SteppingRenderer::new(events);
        renderer.fail_sources.push("/music/0.wav".to_string());
        renderer
    })
    .unwrap();

    player.set_queue(create_items(3), 0, false).unwrap();
    let snapshot = wait_for(&player, |s| s.state == EngineState::Paused);
    assert_eq!(current_id(&snapshot), Some(1));
    assert!(snapshot.last_error.unwrap().contains("/music/0.wav missing"));
}

/// Pauses the player from inside its own callback
struct PauseOnStart {
    player: OnceLock<Weak<Player>>,
    started: Mutex<usize>,
}

impl PlayerObserver for PauseOnStart {
    fn on_playback_started(&self, _player: &dyn PlayerState) {
        *self.started.lock().unwrap() += 1;
        if let Some(player) = self.player.get().and_then(Weak::upgrade) {
            // Queued behind the current transition
            assert_eq!(player.pause(), Ok(()));
        }
    }
}

#[test]
fn reentrant_pause_lands_after_start() {
    // Slow ticks so the item cannot complete before the queued pause runs
    let config = PlayerConfig {
        progress_interval_ms: 10_000,
        ..PlayerConfig::default()
    };
    let player = Arc::new(Player::new(config, SteppingRenderer::new).unwrap());
    let observer = Arc::new(PauseOnStart {
        player: OnceLock::new(),
        started: Mutex::new(0),
    });
    observer.player.set(Arc::downgrade(&player)).unwrap();
    player.register_observer(observer.clone()).unwrap();

    player.set_queue(create_items(2), 0, true).unwrap();
    let snapshot = wait_for(&player, |s| s.state == EngineState::Paused);

    assert_eq!(*observer.started.lock().unwrap(), 1);
    assert_eq!(current_id(&snapshot), Some(0));
}

#[test]
fn edits_through_the_player() {
    let player = stepping_player();
    player.set_queue(create_items(4), 0, false).unwrap();

    let op = MoveOp::new(
        create_test_item(0),
        Some(create_test_item(2)),
        Some(create_test_item(3)),
    )
    .unwrap();
    player.move_item(op).unwrap();
    player.remove(create_test_item(1)).unwrap();
    player.add(vec![create_test_item(9)]).unwrap();

    let snapshot = player.snapshot().unwrap();
    let ids: Vec<i64> = snapshot.queue.iter().map(AudioSource::id).collect();
    assert_eq!(ids, vec![2, 0, 3, 9]);
    assert_eq!(current_id(&snapshot), Some(0));
    assert_eq!(snapshot.position_in_queue, Some(1));

    assert!(matches!(
        player.move_to(0, 10),
        Err(PlaybackError::IndexOutOfRange { .. })
    ));
}

#[test]
fn shutdown_delivers_last_callback_and_rejects_calls() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let player = stepping_player();
    player
        .register_observer(Arc::new(NamedObserver {
            name: "o",
            log: Arc::clone(&log),
        }))
        .unwrap();
    player.set_queue(create_items(2), 0, true).unwrap();

    player.shutdown().unwrap();
    assert_eq!(log.lock().unwrap().last().map(String::as_str), Some("o:shutdown"));
    let len = log.lock().unwrap().len();

    assert!(matches!(
        player.play(),
        Err(PlaybackError::IllegalStateTransition(_))
    ));
    assert!(player.snapshot().is_err());
    assert_eq!(player.shutdown(), Ok(()));

    thread::sleep(Duration::from_millis(20));
    assert_eq!(log.lock().unwrap().len(), len);
}

#[test]
fn dropping_the_player_shuts_it_down() {
    let log = Arc::new(Mutex::new(Vec::new()));
    {
        let player = stepping_player();
        player
            .register_observer(Arc::new(NamedObserver {
                name: "o",
                log: Arc::clone(&log),
            }))
            .unwrap();
    }
    assert_eq!(*log.lock().unwrap(), vec!["o:shutdown".to_string()]);
}

#[test]
fn player_is_shareable_across_threads() {
    let player = Arc::new(stepping_player());
    player.set_queue(create_items(10), 0, false).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let player = Arc::clone(&player);
            thread::spawn(move || {
                for _ in 0..5 {
                    player.skip_to_next().unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = player.snapshot().unwrap();
    assert_eq!(snapshot.position_in_queue, Some(9));
}
