/// Common types shared by the player backends and the playback controller
use std::time::Duration;

/// Playback state as seen by the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Media is loading, nothing has been played yet
    #[default]
    Idle,
    /// The item is ready but the buffer is not yet sufficient to start
    ReadyToPlay,
    Playing,
    Paused,
    Failed,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::ReadyToPlay => "ready",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Failed => "failed",
        }
    }
}

/// Status of the loaded item as reported by the player
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    #[default]
    Unknown,
    ReadyToPlay,
    Failed(String),
}

impl PlayerStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, PlayerStatus::ReadyToPlay)
    }
}

/// Transport status of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControlStatus {
    #[default]
    Paused,
    /// Playback was requested but the player is waiting (usually for data)
    WaitingToPlay,
    Playing,
}

/// Discrete notifications a player publishes to its subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    StatusChanged(PlayerStatus),
    TimeControlChanged(TimeControlStatus),
    BufferChanged { likely_to_keep_up: bool },
    DurationChanged(Duration),
    PeriodicTick { position: Duration, duration: Duration },
    EndOfStream,
}

/// Current position within the loaded item. A zero `duration` means the
/// length is not known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackPosition {
    pub current: Duration,
    pub duration: Duration,
}

impl PlaybackPosition {
    /// Build a position, clamping `current` into `[0, duration]` when the
    /// duration is known
    pub fn new(current: Duration, duration: Duration) -> Self {
        let current = if duration.is_zero() {
            current
        } else {
            current.min(duration)
        };
        Self { current, duration }
    }

    pub fn duration_known(&self) -> bool {
        !self.duration.is_zero()
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.current)
    }

    /// Fraction of the item played, 0.0 when the duration is unknown
    pub fn fraction(&self) -> f64 {
        if !self.duration_known() {
            0.0
        } else {
            (self.current.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        }
    }
}
