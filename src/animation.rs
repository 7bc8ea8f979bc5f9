//! Fixed-rate playback clock.

use std::time::{Duration, Instant};

/// Current state of the clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationState {
    /// Clock is paused
    #[default]
    Stopped,
    /// Clock advances on tick
    Playing,
}

/// Platform-agnostic playback clock.
///
/// The clock does not own a timer. The host calls [`tick`](Self::tick) once
/// per rendering opportunity with the current time; the clock advances by at
/// most one frame per call once a full frame interval has elapsed since the
/// last advance. Playback always loops.
///
/// ## Example
///
/// ```rust
/// use std::time::{Duration, Instant};
/// use ascii_frame_player::{AnimationState, PlaybackClock};
///
/// let mut clock = PlaybackClock::new(24); // 24 FPS
/// clock.set_frame_count(100);
/// clock.play();
///
/// let start = Instant::now();
/// clock.tick(start); // first tick only records the reference time
/// assert!(clock.tick(start + Duration::from_millis(42)));
/// assert_eq!(clock.current_frame(), 1);
///
/// clock.pause();
/// assert_eq!(clock.state(), AnimationState::Stopped);
/// ```
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    /// Current frame index
    current_frame: usize,
    /// Total number of frames
    frame_count: usize,
    /// Frames per second
    fps: u32,
    state: AnimationState,
    /// Time of the last advance, set on the first tick after play
    last_advance: Option<Instant>,
}

impl PlaybackClock {
    /// Create a new clock with the given FPS.
    pub fn new(fps: u32) -> Self {
        Self {
            current_frame: 0,
            frame_count: 0,
            fps: fps.max(1),
            state: AnimationState::Stopped,
            last_advance: None,
        }
    }

    /// Set the total number of frames.
    pub fn set_frame_count(&mut self, count: usize) {
        self.frame_count = count;
        if count == 0 {
            self.current_frame = 0;
            self.pause();
        } else if self.current_frame >= count {
            self.current_frame = count - 1;
        }
    }

    /// Number of frames the clock cycles through.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Set the playback FPS.
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.max(1);
    }

    /// Playback rate in frames per second.
    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Time between frame advances (1/fps seconds).
    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }

    /// Start or resume playback.
    ///
    /// Has no effect without frames.
    pub fn play(&mut self) {
        if self.frame_count > 0 && self.state != AnimationState::Playing {
            self.state = AnimationState::Playing;
            self.last_advance = None;
        }
    }

    /// Stop advancing; the current frame is kept.
    pub fn pause(&mut self) {
        self.state = AnimationState::Stopped;
        self.last_advance = None;
    }

    /// Toggle play/pause.
    pub fn toggle(&mut self) {
        match self.state {
            AnimationState::Playing => self.pause(),
            AnimationState::Stopped => self.play(),
        }
    }

    /// Jump to the first frame and play.
    pub fn restart(&mut self) {
        if self.frame_count == 0 {
            return;
        }
        self.current_frame = 0;
        self.play();
    }

    /// Current playback state.
    #[inline]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// True while the clock advances on `tick`.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == AnimationState::Playing
    }

    /// 0-based index of the displayed frame.
    #[inline]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Set the current frame index, clamped to the last frame.
    pub fn set_current_frame(&mut self, frame: usize) {
        self.current_frame = frame.min(self.frame_count.saturating_sub(1));
    }

    /// Advance by one frame if a full interval has elapsed.
    ///
    /// Never skips frames to catch up: a long stall yields a single advance.
    /// Returns true if the frame changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state != AnimationState::Playing || self.frame_count == 0 {
            return false;
        }

        let Some(last) = self.last_advance else {
            self.last_advance = Some(now);
            return false;
        };

        if now.saturating_duration_since(last) >= self.interval() {
            self.current_frame = (self.current_frame + 1) % self.frame_count;
            self.last_advance = Some(now);
            true
        } else {
            false
        }
    }

    /// Pause and advance one frame, wrapping at the end.
    pub fn step_forward(&mut self) {
        if self.frame_count == 0 {
            return;
        }
        self.pause();
        self.current_frame = (self.current_frame + 1) % self.frame_count;
    }

    /// Pause and go back one frame, wrapping at the start.
    pub fn step_backward(&mut self) {
        if self.frame_count == 0 {
            return;
        }
        self.pause();
        self.current_frame = if self.current_frame == 0 {
            self.frame_count - 1
        } else {
            self.current_frame - 1
        };
    }

    /// Reset the clock to its initial state, keeping fps.
    pub fn reset(&mut self) {
        self.current_frame = 0;
        self.frame_count = 0;
        self.state = AnimationState::Stopped;
        self.last_advance = None;
    }
}
