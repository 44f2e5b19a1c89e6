use anyhow::{Result, bail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;
use videocourse::player::{MediaPlayer, PlayerEvent, PlayerStatus};
use videocourse::ui::{ButtonIcon, PlaybackView, TransportButton, VideoBounds};

/// Commands the controller issued to the player, in order
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    Subscribe(Duration),
    Load(String),
    Play,
    Pause,
    Seek(Duration),
}

#[derive(Default)]
struct MockPlayerState {
    calls: Vec<PlayerCall>,
    position: Option<Duration>,
    duration: Option<Duration>,
    load_error: Option<String>,
    play_error: Option<String>,
    sender: Option<mpsc::UnboundedSender<PlayerEvent>>,
}

/// Scriptable player. Clones share state so tests can keep one after the
/// controller takes ownership.
#[derive(Clone, Default)]
pub struct MockPlayer {
    inner: Arc<Mutex<MockPlayerState>>,
}

impl MockPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockPlayerState> {
        self.inner.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<PlayerCall> {
        self.state().calls.clone()
    }

    pub fn seeks(&self) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlayerCall::Seek(position) => Some(position),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, expected: &PlayerCall) -> usize {
        self.calls().iter().filter(|call| *call == expected).count()
    }

    pub fn set_position(&self, position: Duration) {
        self.state().position = Some(position);
    }

    pub fn set_duration(&self, duration: Duration) {
        self.state().duration = Some(duration);
    }

    pub fn fail_load(&self, message: &str) {
        self.state().load_error = Some(message.to_string());
    }

    pub fn fail_play(&self, message: &str) {
        self.state().play_error = Some(message.to_string());
    }

    /// Publish an event to the subscriber, updating the scripted position
    /// and duration the way a real player would
    pub fn emit(&self, event: PlayerEvent) {
        let mut state = self.state();
        match &event {
            PlayerEvent::DurationChanged(duration) => state.duration = Some(*duration),
            PlayerEvent::PeriodicTick { position, duration } => {
                state.position = Some(*position);
                state.duration = Some(*duration);
            }
            _ => {}
        }
        let sender = state.sender.as_ref().expect("subscribe was not called");
        sender.send(event).expect("controller dropped its event receiver");
    }

    /// Emit the events of an item that loaded and buffered
    pub fn emit_ready(&self, duration: Duration) {
        self.emit(PlayerEvent::DurationChanged(duration));
        self.emit(PlayerEvent::StatusChanged(PlayerStatus::ReadyToPlay));
        self.emit(PlayerEvent::BufferChanged {
            likely_to_keep_up: true,
        });
    }
}

#[async_trait]
impl MediaPlayer for MockPlayer {
    fn subscribe(&self, tick_interval: Duration) -> mpsc::UnboundedReceiver<PlayerEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut state = self.state();
        state.calls.push(PlayerCall::Subscribe(tick_interval));
        state.sender = Some(sender);
        receiver
    }

    async fn load_media(&self, url: &Url) -> Result<()> {
        let mut state = self.state();
        state.calls.push(PlayerCall::Load(url.to_string()));
        if let Some(message) = state.load_error.clone() {
            bail!(message);
        }
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        let mut state = self.state();
        state.calls.push(PlayerCall::Play);
        if let Some(message) = state.play_error.clone() {
            bail!(message);
        }
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.state().calls.push(PlayerCall::Pause);
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        let mut state = self.state();
        state.calls.push(PlayerCall::Seek(position));
        state.position = Some(position);
        Ok(())
    }

    async fn get_position(&self) -> Option<Duration> {
        self.state().position
    }

    async fn get_duration(&self) -> Option<Duration> {
        self.state().duration
    }
}

/// Everything the controller drew, as last set
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub icons: HashMap<TransportButton, ButtonIcon>,
    pub progress: f64,
    pub progress_updates: usize,
    pub elapsed: String,
    pub remaining: String,
    pub buttons_visible: bool,
    pub progress_visible: bool,
    pub last_fade: Option<Duration>,
    pub loading: Option<String>,
    pub error: Option<String>,
    pub bounds: Option<VideoBounds>,
}

impl ViewState {
    pub fn play_icon(&self) -> Option<ButtonIcon> {
        self.icons.get(&TransportButton::PlayPause).copied()
    }
}

#[derive(Clone, Default)]
pub struct RecordingView {
    inner: Arc<Mutex<ViewState>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewState {
        self.inner.lock().unwrap().clone()
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.inner.lock().unwrap()
    }
}

impl PlaybackView for RecordingView {
    fn set_button_icon(&mut self, button: TransportButton, icon: ButtonIcon) {
        self.state().icons.insert(button, icon);
    }

    fn set_progress(&mut self, fraction: f64) {
        let mut state = self.state();
        state.progress = fraction;
        state.progress_updates += 1;
    }

    fn set_time_labels(&mut self, elapsed: &str, remaining: &str) {
        let mut state = self.state();
        state.elapsed = elapsed.to_string();
        state.remaining = remaining.to_string();
    }

    fn set_buttons_visible(&mut self, visible: bool, fade: Duration) {
        let mut state = self.state();
        state.buttons_visible = visible;
        state.last_fade = Some(fade);
    }

    fn set_progress_visible(&mut self, visible: bool, fade: Duration) {
        let mut state = self.state();
        state.progress_visible = visible;
        state.last_fade = Some(fade);
    }

    fn show_loading(&mut self, message: &str) {
        self.state().loading = Some(message.to_string());
    }

    fn hide_loading(&mut self) {
        self.state().loading = None;
    }

    fn show_error(&mut self, message: &str) {
        self.state().error = Some(message.to_string());
    }

    fn set_video_bounds(&mut self, bounds: VideoBounds) {
        self.state().bounds = Some(bounds);
    }
}
