//! The frame player: lifecycle, load orchestration and transport controls.
//!
//! All state lives in [`FramePlayer`] and is mutated on the host's thread.
//! Loading runs as a separate future ([`LoadTask`]) that the host spawns on
//! its local executor; it reports back over a channel which the player drains
//! in [`FramePlayer::tick`] / [`FramePlayer::pump`].

use std::time::{Duration, Instant};

use futures_channel::mpsc::{self, UnboundedReceiver};
use futures_util::future::{abortable, AbortHandle, LocalBoxFuture};
use futures_util::{FutureExt, StreamExt};

use crate::config::{OverlayStyle, PlayerConfig};
use crate::error::{PlayerError, PlayerResult};
use crate::loader::{load_frame_set, FrameSource, LoadingProgress};
use crate::{AnimationState, FrameSet, PlaybackClock};

/// Pause between load completion and autoplay start.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Position of the player in its state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Not loaded, or disposed
    Idle,
    /// Batches in flight
    Loading,
    /// Frames ready, clock stopped
    Paused,
    /// Frames ready, clock running
    Playing,
    /// Load failed; terminal for this load attempt
    Error,
}

/// Snapshot of the playback state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackState {
    /// 0-based index of the displayed frame
    pub current_index: usize,
    /// Clock is advancing
    pub is_playing: bool,
    /// A load is in flight
    pub is_loading: bool,
    /// Frames attempted so far (0.0 - 1.0)
    pub loaded_fraction: f32,
    /// Error from the last failed load
    pub last_error: Option<PlayerError>,
}

/// How a [`LoadTask`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Completed,
    Failed,
    /// Aborted by `dispose`/reload, or the player went away
    Cancelled,
}

/// Future that loads a frame set for one player. Spawn it on a local executor.
pub type LoadTask = LocalBoxFuture<'static, LoadOutcome>;

type Observer = Box<dyn FnMut(&PlayerView<'_>)>;

enum LoadEvent {
    Progress(LoadingProgress),
    Finished(FrameSet),
    Failed(PlayerError),
}

/// What the host renders.
#[derive(Clone, Debug)]
pub struct PlayerView<'a> {
    pub status: PlayerStatus,
    /// Text of the current frame ("" until ready)
    pub frame: &'a str,
    pub current_index: usize,
    pub frame_count: usize,
    pub is_playing: bool,
    pub is_loading: bool,
    pub progress: LoadingProgress,
    pub error: Option<&'a PlayerError>,
    /// Gradient overlay when enabled in the config
    pub overlay: Option<&'a OverlayStyle>,
    pub show_controls: bool,
    /// Configured source location, for diagnostics
    pub source: &'a str,
}

impl PlayerView<'_> {
    #[inline]
    pub fn loaded_fraction(&self) -> f32 {
        self.progress.fraction()
    }

    /// 1-based position, e.g. "12/161".
    pub fn position_label(&self) -> String {
        format!("{}/{}", self.current_index + 1, self.frame_count)
    }

    /// Label for the play/pause control.
    pub fn play_label(&self) -> &'static str {
        if self.is_playing {
            "Pause"
        } else {
            "Play"
        }
    }

    /// Loading text, e.g. "19% - 31/161".
    pub fn loading_message(&self) -> String {
        self.progress.message()
    }
}

/// Plays back a fixed-length sequence of text frames.
///
/// ## Example
///
/// ```rust,ignore
/// let mut player = FramePlayer::create(PlayerConfig::new("colored"))?;
/// player.subscribe(|view| render(view.frame));
/// tokio::task::spawn_local(player.load(DirectorySource::new("public/frames")));
///
/// // once per rendering opportunity:
/// player.tick(Instant::now());
///
/// // when the view goes away:
/// player.dispose();
/// ```
pub struct FramePlayer {
    config: PlayerConfig,
    overlay: Option<OverlayStyle>,
    clock: PlaybackClock,
    frames: Option<FrameSet>,
    progress: LoadingProgress,
    is_loading: bool,
    last_error: Option<PlayerError>,
    visible: bool,
    autoplay_at: Option<Instant>,
    events: Option<UnboundedReceiver<LoadEvent>>,
    abort: Option<AbortHandle>,
    observers: Vec<Observer>,
    disposed: bool,
}

impl FramePlayer {
    /// Create an idle player. Fails if the config is invalid.
    pub fn create(config: PlayerConfig) -> PlayerResult<Self> {
        config.validate()?;
        Ok(Self {
            overlay: config.overlay_style(),
            clock: PlaybackClock::new(config.fps),
            progress: LoadingProgress::new(config.frame_count),
            config,
            frames: None,
            is_loading: false,
            last_error: None,
            visible: true,
            autoplay_at: None,
            events: None,
            abort: None,
            observers: Vec::new(),
            disposed: false,
        })
    }

    /// Configuration the player was created with.
    #[inline]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Register an observer called with the view after every state change.
    pub fn subscribe(&mut self, observer: impl FnMut(&PlayerView<'_>) + 'static) {
        if !self.disposed {
            self.observers.push(Box::new(observer));
        }
    }

    /// Start loading frames from `source`.
    ///
    /// Any load already in flight is cancelled. The returned task must be
    /// driven by the host; its results are applied on the next `tick`/`pump`.
    pub fn load<S>(&mut self, source: S) -> LoadTask
    where
        S: FrameSource + 'static,
    {
        if self.disposed {
            return futures_util::future::ready(LoadOutcome::Cancelled).boxed_local();
        }
        self.cancel_load();

        self.frames = None;
        self.clock.reset();
        self.clock.set_fps(self.config.fps);
        self.progress = LoadingProgress::new(self.config.frame_count);
        self.is_loading = true;
        self.last_error = None;
        self.autoplay_at = None;

        let (tx, rx) = mpsc::unbounded();
        let location = self.config.source.clone();
        let count = self.config.frame_count;
        tracing::debug!(%location, count, "starting frame load");

        let task = async move {
            let result = load_frame_set(&source, &location, count, |progress| {
                let _ = tx.unbounded_send(LoadEvent::Progress(progress));
            })
            .await;

            let (event, outcome) = match result {
                Ok(frames) => (LoadEvent::Finished(frames), LoadOutcome::Completed),
                Err(err) => (LoadEvent::Failed(err), LoadOutcome::Failed),
            };
            match tx.unbounded_send(event) {
                Ok(()) => outcome,
                Err(_) => LoadOutcome::Cancelled,
            }
        };
        let (task, handle) = abortable(task);

        self.events = Some(rx);
        self.abort = Some(handle);
        self.notify();

        task.map(|res| res.unwrap_or(LoadOutcome::Cancelled))
            .boxed_local()
    }

    /// Apply pending load results. Returns true if state changed.
    ///
    /// `now` anchors the autoplay settling delay. [`tick`](Self::tick) calls
    /// this itself; call it directly only when not animating.
    pub fn pump(&mut self, now: Instant) -> bool {
        let changed = self.drain_events(now);
        if changed {
            self.notify();
        }
        changed
    }

    /// Advance the player for one rendering opportunity.
    ///
    /// Applies pending load results, starts autoplay once the settling delay
    /// has passed, and advances at most one frame. Returns true if state
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let mut changed = self.drain_events(now);

        if self.autoplay_at.is_some_and(|at| now >= at) {
            self.autoplay_at = None;
            self.clock.play();
            changed = true;
        }

        changed |= self.clock.tick(now);

        if changed {
            self.notify();
        }
        changed
    }

    /// Flip between playing and paused. No effect unless ready.
    pub fn toggle_play(&mut self) {
        if self.is_ready() {
            self.autoplay_at = None;
            self.clock.toggle();
            self.notify();
        }
    }

    /// Jump to the first frame and play.
    pub fn restart(&mut self) {
        if self.is_ready() {
            self.autoplay_at = None;
            self.clock.restart();
            self.notify();
        }
    }

    /// Pause and show the next frame.
    pub fn step_forward(&mut self) {
        if self.is_ready() {
            self.autoplay_at = None;
            self.clock.step_forward();
            self.notify();
        }
    }

    /// Pause and show the previous frame.
    pub fn step_back(&mut self) {
        if self.is_ready() {
            self.autoplay_at = None;
            self.clock.step_backward();
            self.notify();
        }
    }

    /// Report host visibility.
    ///
    /// Losing visibility pauses playback and drops a pending autoplay;
    /// regaining it does not resume.
    pub fn set_visible(&mut self, visible: bool) {
        if self.disposed {
            return;
        }
        self.visible = visible;
        if !visible {
            self.autoplay_at = None;
            if self.clock.is_playing() {
                self.clock.pause();
                tracing::debug!(source = %self.config.source, "paused on visibility loss");
                self.notify();
            }
        }
    }

    /// Tear down: abort loading, release frames, stop notifying.
    ///
    /// Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_load();
        self.observers.clear();
        self.frames = None;
        self.clock.reset();
        self.progress = LoadingProgress::new(self.config.frame_count);
        self.is_loading = false;
        self.last_error = None;
        self.autoplay_at = None;
        self.disposed = true;
        tracing::debug!(source = %self.config.source, "player disposed");
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether frames are loaded and playable.
    #[inline]
    pub fn is_ready(&self) -> bool {
        !self.disposed && self.frames.is_some()
    }

    /// Lifecycle status derived from the current state.
    pub fn status(&self) -> PlayerStatus {
        if self.disposed {
            PlayerStatus::Idle
        } else if self.is_loading {
            PlayerStatus::Loading
        } else if self.last_error.is_some() {
            PlayerStatus::Error
        } else if self.frames.is_none() {
            PlayerStatus::Idle
        } else if self.clock.state() == AnimationState::Playing {
            PlayerStatus::Playing
        } else {
            PlayerStatus::Paused
        }
    }

    /// Snapshot of index, play flag, load progress and error.
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current_index: self.clock.current_frame(),
            is_playing: self.clock.is_playing(),
            is_loading: self.is_loading,
            loaded_fraction: self.progress.fraction(),
            last_error: self.last_error.clone(),
        }
    }

    /// Text of the current frame, or "" when not ready.
    pub fn current_frame(&self) -> &str {
        self.frames
            .as_ref()
            .map(|f| f.get(self.clock.current_frame()))
            .unwrap_or("")
    }

    pub fn view(&self) -> PlayerView<'_> {
        PlayerView {
            status: self.status(),
            frame: self.current_frame(),
            current_index: self.clock.current_frame(),
            frame_count: self.config.frame_count,
            is_playing: self.clock.is_playing(),
            is_loading: self.is_loading,
            progress: self.progress,
            error: self.last_error.as_ref(),
            overlay: self.overlay.as_ref(),
            show_controls: self.config.show_controls,
            source: &self.config.source,
        }
    }

    fn cancel_load(&mut self) {
        if let Some(handle) = self.abort.take() {
            handle.abort();
        }
        self.events = None;
    }

    fn drain_events(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(rx) = self.events.as_mut() {
            let next = rx.next().now_or_never();
            match next {
                Some(Some(event)) => {
                    self.apply(event, now);
                    changed = true;
                }
                Some(None) => {
                    // Sender gone without a final event: the task was dropped.
                    self.events = None;
                    self.abort = None;
                    if self.is_loading {
                        self.is_loading = false;
                        self.last_error = Some(PlayerError::load("load task dropped before completion"));
                        changed = true;
                    }
                }
                None => break,
            }
        }
        changed
    }

    fn apply(&mut self, event: LoadEvent, now: Instant) {
        match event {
            LoadEvent::Progress(progress) => {
                if progress.attempted >= self.progress.attempted {
                    self.progress = progress;
                }
            }
            LoadEvent::Finished(frames) => {
                self.events = None;
                self.abort = None;
                self.is_loading = false;
                self.progress.attempted = self.progress.total;
                self.clock.set_frame_count(frames.len());
                tracing::info!(
                    source = %self.config.source,
                    frames = frames.len(),
                    filled = frames.filled(),
                    "frames ready"
                );
                self.frames = Some(frames);
                if self.config.autoplay && self.visible {
                    self.autoplay_at = Some(now + SETTLE_DELAY);
                }
            }
            LoadEvent::Failed(err) => {
                self.events = None;
                self.abort = None;
                self.is_loading = false;
                self.frames = None;
                tracing::warn!(source = %self.config.source, error = %err, "load failed");
                self.last_error = Some(err);
            }
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let mut observers = std::mem::take(&mut self.observers);
        let view = self.view();
        for observer in observers.iter_mut() {
            observer(&view);
        }
        self.observers = observers;
    }
}

impl Drop for FramePlayer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for FramePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePlayer")
            .field("source", &self.config.source)
            .field("status", &self.status())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
