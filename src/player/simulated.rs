use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace};
use url::Url;

use super::traits::MediaPlayer;
use super::types::{PlayerEvent, PlayerStatus, TimeControlStatus};

#[derive(Debug, Default)]
struct SimState {
    status: PlayerStatus,
    /// Position accumulated up to the last play/pause/seek
    base: Duration,
    /// Set while playing; elapsed time since then is added to `base`
    anchor: Option<Instant>,
}

impl SimState {
    fn position(&self, duration: Duration) -> Duration {
        let position = match self.anchor {
            Some(anchor) => self.base + anchor.elapsed(),
            None => self.base,
        };
        position.min(duration)
    }

    fn is_playing(&self) -> bool {
        self.anchor.is_some()
    }

    fn freeze(&mut self, duration: Duration) {
        self.base = self.position(duration);
        self.anchor = None;
    }
}

struct Subscriber {
    sender: mpsc::UnboundedSender<PlayerEvent>,
    tick_interval: Duration,
}

/// Clock-driven player that needs no media stack.
///
/// Becomes ready `load_delay` after `load_media`, advances with tokio time
/// while playing and stops itself at the end of the item.
pub struct SimulatedPlayer {
    duration: Duration,
    load_delay: Duration,
    state: Arc<Mutex<SimState>>,
    subscriber: Mutex<Option<Subscriber>>,
    clock_task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedPlayer {
    pub fn new(duration: Duration, load_delay: Duration) -> Self {
        Self {
            duration,
            load_delay,
            state: Arc::new(Mutex::new(SimState::default())),
            subscriber: Mutex::new(None),
            clock_task: Mutex::new(None),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        lock(&self.state)
    }

    fn emit(&self, event: PlayerEvent) {
        if let Some(subscriber) = lock(&self.subscriber).as_ref() {
            let _ = subscriber.sender.send(event);
        }
    }

    fn tick_event(&self) -> PlayerEvent {
        PlayerEvent::PeriodicTick {
            position: self.state().position(self.duration),
            duration: self.duration,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drive readiness and periodic ticks for one loaded item
async fn run_clock(
    state: Arc<Mutex<SimState>>,
    sender: mpsc::UnboundedSender<PlayerEvent>,
    duration: Duration,
    load_delay: Duration,
    tick_interval: Duration,
) {
    tokio::time::sleep(load_delay).await;
    lock(&state).status = PlayerStatus::ReadyToPlay;
    debug!("Simulated media ready ({:?})", duration);

    let ready = [
        PlayerEvent::DurationChanged(duration),
        PlayerEvent::StatusChanged(PlayerStatus::ReadyToPlay),
        PlayerEvent::BufferChanged {
            likely_to_keep_up: true,
        },
    ];
    for event in ready {
        if sender.send(event).is_err() {
            return;
        }
    }

    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let (position, finished) = {
            let mut state = lock(&state);
            if !state.is_playing() {
                continue;
            }
            let position = state.position(duration);
            let finished = position >= duration;
            if finished {
                state.freeze(duration);
            }
            (position, finished)
        };

        trace!("Simulated tick at {:?}", position);
        let mut events = vec![PlayerEvent::PeriodicTick { position, duration }];
        if finished {
            info!("Simulated media reached the end");
            events.push(PlayerEvent::TimeControlChanged(TimeControlStatus::Paused));
            events.push(PlayerEvent::EndOfStream);
        }

        for event in events {
            if sender.send(event).is_err() {
                return;
            }
        }
    }
}

#[async_trait]
impl MediaPlayer for SimulatedPlayer {
    fn subscribe(&self, tick_interval: Duration) -> mpsc::UnboundedReceiver<PlayerEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *lock(&self.subscriber) = Some(Subscriber {
            sender,
            tick_interval,
        });
        receiver
    }

    async fn load_media(&self, url: &Url) -> Result<()> {
        info!("Loading simulated media: {}", url);

        let (sender, tick_interval) = match lock(&self.subscriber).as_ref() {
            Some(subscriber) => (subscriber.sender.clone(), subscriber.tick_interval),
            None => bail!("No subscriber registered before loading media"),
        };

        *self.state() = SimState::default();

        let task = tokio::spawn(run_clock(
            self.state.clone(),
            sender,
            self.duration,
            self.load_delay,
            tick_interval,
        ));
        if let Some(previous) = lock(&self.clock_task).replace(task) {
            previous.abort();
        }
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        {
            let mut state = self.state();
            if !state.status.is_ready() {
                bail!("Media is not ready to play");
            }
            if state.is_playing() {
                return Ok(());
            }
            if state.base >= self.duration {
                state.base = Duration::ZERO;
            }
            state.anchor = Some(Instant::now());
        }
        debug!("Simulated playback started");
        self.emit(PlayerEvent::TimeControlChanged(TimeControlStatus::Playing));
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.state().freeze(self.duration);
        debug!("Simulated playback paused");
        self.emit(PlayerEvent::TimeControlChanged(TimeControlStatus::Paused));
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        {
            let mut state = self.state();
            if !state.status.is_ready() {
                bail!("Media is not ready for seeking");
            }
            state.base = position.min(self.duration);
            if state.is_playing() {
                state.anchor = Some(Instant::now());
            }
        }
        debug!("Simulated seek to {:?}", position);
        self.emit(self.tick_event());
        Ok(())
    }

    async fn get_position(&self) -> Option<Duration> {
        let state = self.state();
        state
            .status
            .is_ready()
            .then(|| state.position(self.duration))
    }

    async fn get_duration(&self) -> Option<Duration> {
        self.state().status.is_ready().then_some(self.duration)
    }
}

impl Drop for SimulatedPlayer {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.clock_task).take() {
            task.abort();
        }
    }
}
