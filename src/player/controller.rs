use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use super::traits::MediaPlayer;
use super::types::{PlaybackPosition, PlaybackState, PlayerEvent, PlayerStatus, TimeControlStatus};
use crate::config::Config;
use crate::ui::seek_bar::{absolute_seek_target, relative_seek_target};
use crate::ui::{
    ButtonIcon, ControlsVisibility, LoadingOverlay, PlaybackView, SeekBar, TransportButton,
    VideoBounds,
};
use crate::utils::errors::{PlaybackError, PlaybackResult};

/// Inputs the UI runtime sends to the playback controller
#[derive(Debug)]
pub enum ControllerInput {
    /// Play/pause button pressed
    PlayPause,
    /// Rewind button pressed
    Rewind,
    /// Fast-forward button pressed
    FastForward,
    /// Slider moved to a fraction of the item
    Scrub(f64),
    /// User started dragging the slider
    ScrubStarted,
    /// User released the slider
    ScrubEnded,
    /// Tap on the video surface
    Tap,
    /// The video container was laid out again
    LayoutChanged(VideoBounds),
    /// Read the current controller state
    GetSnapshot {
        respond_to: oneshot::Sender<ControllerSnapshot>,
    },
}

/// Point-in-time view of the controller state
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub state: PlaybackState,
    pub position: PlaybackPosition,
    pub buttons_visible: bool,
    pub progress_visible: bool,
    pub controls_pinned: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// Owns the player and the view and reacts to user input and player
/// events on a single task.
pub struct PlaybackController<P, V> {
    config: Config,
    player: P,
    view: V,
    receiver: mpsc::UnboundedReceiver<ControllerInput>,
    events: Option<mpsc::UnboundedReceiver<PlayerEvent>>,

    state: PlaybackState,
    status: PlayerStatus,
    time_control: TimeControlStatus,
    likely_to_keep_up: bool,
    position: PlaybackPosition,
    error_message: Option<String>,

    controls: ControlsVisibility,
    seek_bar: SeekBar,
    loading: LoadingOverlay,
}

impl<P: MediaPlayer, V: PlaybackView> PlaybackController<P, V> {
    /// Create a new controller and the handle used to drive it
    pub fn new(config: &Config, player: P, view: V) -> (ControllerHandle, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let controller = PlaybackController {
            config: config.clone(),
            player,
            view,
            receiver,
            events: None,
            state: PlaybackState::Idle,
            status: PlayerStatus::Unknown,
            time_control: TimeControlStatus::Paused,
            likely_to_keep_up: false,
            position: PlaybackPosition::default(),
            error_message: None,
            controls: ControlsVisibility::new(&config.controls),
            seek_bar: SeekBar::new(),
            loading: LoadingOverlay::new(config.playback.loading_message.clone()),
        };

        (ControllerHandle { sender }, controller)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position(&self) -> PlaybackPosition {
        self.position
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn controls(&self) -> &ControlsVisibility {
        &self.controls
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            state: self.state,
            position: self.position,
            buttons_visible: self.controls.buttons_visible(),
            progress_visible: self.controls.progress_visible(),
            controls_pinned: self.controls.is_pinned(),
            loading: self.loading.is_visible(),
            error: self.error_message.clone(),
        }
    }

    /// Validate the source, subscribe to the player, load the media and
    /// draw the initial screen. Nothing is played when the source is
    /// missing or malformed.
    pub async fn setup(&mut self) -> PlaybackResult<()> {
        let url = self.source_url()?;

        self.draw_initial_view();
        self.events = Some(self.player.subscribe(self.config.playback.tick_interval()));

        if let Err(e) = self.player.load_media(&url).await {
            error!("Failed to load {}: {:#}", url, e);
            self.fail(format!("Failed to load video: {e}")).await;
            return Err(PlaybackError::Player(e));
        }

        self.loading.show(&mut self.view);
        info!("Playback screen set up for {}", url);
        Ok(())
    }

    fn source_url(&self) -> PlaybackResult<Url> {
        let raw = self.config.playback.source_url.trim();
        if raw.is_empty() {
            error!("No video to play");
            return Err(PlaybackError::MissingSource);
        }

        Url::parse(raw).map_err(|e| {
            error!("No video to play: '{}' is not a valid URL ({})", raw, e);
            PlaybackError::InvalidSource {
                url: raw.to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn draw_initial_view(&mut self) {
        self.view
            .set_button_icon(TransportButton::PlayPause, ButtonIcon::Play);
        self.view
            .set_button_icon(TransportButton::Rewind, ButtonIcon::Rewind);
        self.view
            .set_button_icon(TransportButton::FastForward, ButtonIcon::FastForward);
        self.seek_bar.reset(&mut self.view);
        self.controls.reset(&mut self.view);
    }

    /// Play/pause button: pause when playing, otherwise play if the player
    /// is ready. No-op while the media is not ready.
    pub async fn toggle_play_pause(&mut self) {
        match self.state {
            PlaybackState::Playing => {
                if let Err(e) = self.player.pause().await {
                    warn!("Failed to pause: {:#}", e);
                    return;
                }
                self.set_state(PlaybackState::Paused);
                self.view
                    .set_button_icon(TransportButton::PlayPause, ButtonIcon::Play);
            }
            PlaybackState::Failed => {
                debug!("Ignoring play/pause, playback failed");
                return;
            }
            _ if !self.status.is_ready() => {
                debug!("Ignoring play/pause, player not ready");
                return;
            }
            _ => {
                if let Err(e) = self.player.play().await {
                    warn!("Failed to start playback: {:#}", e);
                    return;
                }
                self.set_state(PlaybackState::Playing);
                self.view
                    .set_button_icon(TransportButton::PlayPause, ButtonIcon::Pause);
                self.loading.hide(&mut self.view);
            }
        }
        self.note_interaction();
    }

    pub async fn rewind(&mut self) {
        let skip = self.config.playback.skip_interval();
        self.seek_relative(-skip).await;
    }

    pub async fn fast_forward(&mut self) {
        let skip = self.config.playback.skip_interval();
        self.seek_relative(skip).await;
    }

    /// Skip by `delta_secs`, clamped to `[0, duration - end_guard]`
    pub async fn seek_relative(&mut self, delta_secs: f64) {
        if !self.status.is_ready() {
            debug!("Ignoring skip, player not ready");
            return;
        }

        let current = self
            .player
            .get_position()
            .await
            .unwrap_or(self.position.current);
        let duration = Self::current_duration(&self.player, self.position.duration).await;

        let Some(target) = relative_seek_target(
            current,
            delta_secs,
            duration,
            self.config.playback.end_guard(),
        ) else {
            debug!("Skip of {}s from {:?} not possible", delta_secs, current);
            return;
        };

        self.seek_to(target, duration).await;
    }

    /// Seek to a slider fraction of the item
    pub async fn seek_absolute(&mut self, fraction: f64) {
        if !self.status.is_ready() {
            debug!("Ignoring scrub, player not ready");
            return;
        }

        let duration = Self::current_duration(&self.player, self.position.duration).await;
        let Some(target) = duration.and_then(|d| absolute_seek_target(fraction, d)) else {
            debug!("Ignoring scrub to {}, duration unknown", fraction);
            return;
        };

        self.seek_to(target, duration).await;
    }

    /// Duration reported by the player, falling back to the last known one
    async fn current_duration(player: &P, known: Duration) -> Option<Duration> {
        player
            .get_duration()
            .await
            .filter(|d| !d.is_zero())
            .or_else(|| Some(known).filter(|d| !d.is_zero()))
    }

    async fn seek_to(&mut self, target: Duration, duration: Option<Duration>) {
        debug!("Seeking to {:?}", target);
        if let Err(e) = self.player.seek(target).await {
            warn!("Seek to {:?} failed: {:#}", target, e);
            return;
        }

        // An unknown duration stays unknown
        let duration = duration.unwrap_or(self.position.duration);
        self.position = PlaybackPosition::new(target, duration);
        self.seek_bar.update_position(&self.position, &mut self.view);
        self.note_interaction();
    }

    pub fn begin_scrub(&mut self) {
        self.seek_bar.set_seeking(true);
        self.note_interaction();
    }

    pub fn end_scrub(&mut self) {
        self.seek_bar.set_seeking(false);
        self.note_interaction();
    }

    /// Periodic time callback: refresh the slider and both labels
    pub fn on_periodic_tick(&mut self, current: Duration, duration: Duration) {
        let duration = if duration.is_zero() {
            self.position.duration
        } else {
            duration
        };
        self.position = PlaybackPosition::new(current, duration);
        trace!(
            "Tick {:?} / {:?}",
            self.position.current, self.position.duration
        );
        self.seek_bar.update_position(&self.position, &mut self.view);
    }

    pub fn on_duration_changed(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        debug!("Duration now {:?}", duration);
        self.position = PlaybackPosition::new(self.position.current, duration);
        self.seek_bar.update_position(&self.position, &mut self.view);
    }

    /// Item status changed: auto-start when ready and buffered, fail when
    /// the player reports an error
    pub async fn on_status_changed(&mut self, status: PlayerStatus) {
        debug!("Player status {:?}", status);
        self.status = status;
        self.evaluate_readiness().await;
    }

    pub fn on_end_of_stream(&mut self) {
        if !matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            return;
        }
        info!("Reached end of video");
        self.set_state(PlaybackState::Paused);
        self.view
            .set_button_icon(TransportButton::PlayPause, ButtonIcon::Play);
        self.controls.transition_to_visible(&mut self.view, false);
    }

    /// Tap on the video: show the controls and restart the hide sequence
    pub fn show_controls(&mut self) {
        self.controls.transition_to_visible(&mut self.view, true);
    }

    pub fn layout_changed(&mut self, bounds: VideoBounds) {
        if bounds.is_empty() {
            debug!("Ignoring empty layout {:?}", bounds);
            return;
        }
        self.view.set_video_bounds(bounds);
    }

    fn buffer_satisfied(&self) -> bool {
        self.time_control != TimeControlStatus::WaitingToPlay && self.likely_to_keep_up
    }

    async fn evaluate_readiness(&mut self) {
        if let PlayerStatus::Failed(message) = &self.status {
            let message = message.clone();
            self.fail(message).await;
            return;
        }

        if !self.status.is_ready()
            || !matches!(self.state, PlaybackState::Idle | PlaybackState::ReadyToPlay)
        {
            return;
        }

        if self.buffer_satisfied() {
            self.start_playback().await;
        } else if self.state == PlaybackState::Idle {
            debug!("Ready to play, waiting for buffer");
            self.set_state(PlaybackState::ReadyToPlay);
        }
    }

    async fn start_playback(&mut self) {
        if let Err(e) = self.player.play().await {
            warn!("Failed to auto-start playback: {:#}", e);
            return;
        }

        info!("Playback started");
        self.set_state(PlaybackState::Playing);
        self.loading.hide(&mut self.view);
        self.view
            .set_button_icon(TransportButton::PlayPause, ButtonIcon::Pause);
        self.controls.transition_to_visible(&mut self.view, true);
    }

    async fn fail(&mut self, message: String) {
        if self.state == PlaybackState::Failed {
            return;
        }
        error!("Playback failed: {}", message);

        if let Err(e) = self.player.pause().await {
            debug!("Pause after failure failed: {:#}", e);
        }
        self.set_state(PlaybackState::Failed);
        self.loading.hide(&mut self.view);
        self.view
            .set_button_icon(TransportButton::PlayPause, ButtonIcon::Play);
        self.view.show_error(&message);
        self.controls.pin(&mut self.view);
        self.error_message = Some(message);
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!("State {} -> {}", self.state.as_str(), state.as_str());
            self.state = state;
        }
    }

    /// Any control interaction keeps the chrome up for another round
    fn note_interaction(&mut self) {
        if !self.controls.is_pinned() {
            self.controls.transition_to_visible(&mut self.view, true);
        }
    }

    pub async fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::StatusChanged(status) => self.on_status_changed(status).await,
            PlayerEvent::TimeControlChanged(time_control) => {
                trace!("Time control {:?}", time_control);
                self.time_control = time_control;
                self.evaluate_readiness().await;
            }
            PlayerEvent::BufferChanged { likely_to_keep_up } => {
                trace!("Likely to keep up: {}", likely_to_keep_up);
                self.likely_to_keep_up = likely_to_keep_up;
                self.evaluate_readiness().await;
            }
            PlayerEvent::DurationChanged(duration) => self.on_duration_changed(duration),
            PlayerEvent::PeriodicTick { position, duration } => {
                self.on_periodic_tick(position, duration)
            }
            PlayerEvent::EndOfStream => self.on_end_of_stream(),
        }
    }

    pub async fn handle_input(&mut self, input: ControllerInput) {
        trace!("Input {:?}", input);
        match input {
            ControllerInput::PlayPause => self.toggle_play_pause().await,
            ControllerInput::Rewind => self.rewind().await,
            ControllerInput::FastForward => self.fast_forward().await,
            ControllerInput::Scrub(fraction) => self.seek_absolute(fraction).await,
            ControllerInput::ScrubStarted => self.begin_scrub(),
            ControllerInput::ScrubEnded => self.end_scrub(),
            ControllerInput::Tap => self.show_controls(),
            ControllerInput::LayoutChanged(bounds) => self.layout_changed(bounds),
            ControllerInput::GetSnapshot { respond_to } => {
                let _ = respond_to.send(self.snapshot());
            }
        }
    }

    /// Run the controller event loop until `shutdown` fires or every
    /// handle is dropped
    pub async fn run(mut self, shutdown: CancellationToken) {
        debug!("PlaybackController event loop started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Playback controller shutting down");
                    break;
                }
                input = self.receiver.recv() => match input {
                    Some(input) => self.handle_input(input).await,
                    None => {
                        debug!("All controller handles dropped");
                        break;
                    }
                },
                event = next_event(&mut self.events) => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        warn!("Player event stream closed");
                        self.events = None;
                    }
                },
                step = self.controls.next_step() => {
                    self.controls.apply_step(step, &mut self.view);
                }
            }
        }
    }
}

async fn next_event(
    events: &mut Option<mpsc::UnboundedReceiver<PlayerEvent>>,
) -> Option<PlayerEvent> {
    match events {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

/// Cloneable handle the UI runtime uses to drive the controller
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    sender: mpsc::UnboundedSender<ControllerInput>,
}

impl ControllerHandle {
    fn send(&self, input: ControllerInput) -> PlaybackResult<()> {
        self.sender
            .send(input)
            .map_err(|_| PlaybackError::ControllerClosed)
    }

    pub fn play_pause(&self) -> PlaybackResult<()> {
        self.send(ControllerInput::PlayPause)
    }

    pub fn rewind(&self) -> PlaybackResult<()> {
        self.send(ControllerInput::Rewind)
    }

    pub fn fast_forward(&self) -> PlaybackResult<()> {
        self.send(ControllerInput::FastForward)
    }

    pub fn scrub(&self, fraction: f64) -> PlaybackResult<()> {
        self.send(ControllerInput::Scrub(fraction))
    }

    pub fn scrub_started(&self) -> PlaybackResult<()> {
        self.send(ControllerInput::ScrubStarted)
    }

    pub fn scrub_ended(&self) -> PlaybackResult<()> {
        self.send(ControllerInput::ScrubEnded)
    }

    pub fn tap(&self) -> PlaybackResult<()> {
        self.send(ControllerInput::Tap)
    }

    pub fn layout_changed(&self, bounds: VideoBounds) -> PlaybackResult<()> {
        self.send(ControllerInput::LayoutChanged(bounds))
    }

    /// Request a snapshot of the controller state
    pub async fn snapshot(&self) -> PlaybackResult<ControllerSnapshot> {
        let (respond_to, response) = oneshot::channel();
        self.send(ControllerInput::GetSnapshot { respond_to })?;
        response.await.map_err(|_| PlaybackError::ControllerClosed)
    }
}
