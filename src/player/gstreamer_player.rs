use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::StreamExt;
use gstreamer as gst;
use gstreamer::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use super::traits::MediaPlayer;
use super::types::{PlayerEvent, PlayerStatus, TimeControlStatus};

struct Subscriber {
    sender: mpsc::UnboundedSender<PlayerEvent>,
    tick_interval: Duration,
}

/// Playbin-backed player. Bus messages are translated into
/// [`PlayerEvent`]s by a tokio task that also emits the periodic ticks.
pub struct GStreamerPlayer {
    playbin: Arc<Mutex<Option<gst::Element>>>,
    status: Arc<Mutex<PlayerStatus>>,
    subscriber: Mutex<Option<Subscriber>>,
    bus_task: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn clock_to_duration(time: gst::ClockTime) -> Duration {
    Duration::from_nanos(time.nseconds())
}

impl GStreamerPlayer {
    pub fn new() -> Result<Self> {
        debug!("Initializing GStreamer player");

        if let Err(e) = gst::init() {
            error!("Failed to initialize GStreamer: {}", e);
            return Err(anyhow!("Failed to initialize GStreamer: {}", e));
        }

        Ok(Self {
            playbin: Arc::new(Mutex::new(None)),
            status: Arc::new(Mutex::new(PlayerStatus::Unknown)),
            subscriber: Mutex::new(None),
            bus_task: Mutex::new(None),
        })
    }

    fn playbin(&self) -> Option<gst::Element> {
        lock(&self.playbin).as_ref().cloned()
    }
}

/// Translate bus messages and drive periodic ticks until the bus closes
async fn watch_bus(
    playbin: gst::Element,
    status: Arc<Mutex<PlayerStatus>>,
    sender: mpsc::UnboundedSender<PlayerEvent>,
    tick_interval: Duration,
) {
    let Some(bus) = playbin.bus() else {
        error!("Playbin has no bus, no events will be delivered");
        return;
    };
    let mut messages = bus.stream();
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut playing = false;

    loop {
        let events = tokio::select! {
            message = messages.next() => {
                let Some(message) = message else {
                    debug!("Bus stream closed");
                    return;
                };
                translate_message(&message, &playbin, &status, &mut playing)
            }
            _ = ticker.tick() => {
                if !playing {
                    continue;
                }
                match (
                    playbin.query_position::<gst::ClockTime>(),
                    playbin.query_duration::<gst::ClockTime>(),
                ) {
                    (Some(position), Some(duration)) => vec![PlayerEvent::PeriodicTick {
                        position: clock_to_duration(position),
                        duration: clock_to_duration(duration),
                    }],
                    _ => Vec::new(),
                }
            }
        };

        for event in events {
            if sender.send(event).is_err() {
                debug!("Event subscriber dropped, stopping bus watch");
                return;
            }
        }
    }
}

fn translate_message(
    message: &gst::Message,
    playbin: &gst::Element,
    status: &Arc<Mutex<PlayerStatus>>,
    playing: &mut bool,
) -> Vec<PlayerEvent> {
    use gst::MessageView;

    match message.view() {
        MessageView::AsyncDone(_) => {
            let mut events = Vec::new();
            let became_ready = {
                let mut status = lock(status);
                let was_ready = status.is_ready();
                if !matches!(*status, PlayerStatus::Failed(_)) {
                    *status = PlayerStatus::ReadyToPlay;
                }
                !was_ready && status.is_ready()
            };
            if let Some(duration) = playbin.query_duration::<gst::ClockTime>() {
                events.push(PlayerEvent::DurationChanged(clock_to_duration(duration)));
            }
            if became_ready {
                info!("Pipeline prerolled, media ready to play");
                events.push(PlayerEvent::StatusChanged(PlayerStatus::ReadyToPlay));
                events.push(PlayerEvent::BufferChanged {
                    likely_to_keep_up: true,
                });
            }
            events
        }
        MessageView::DurationChanged(_) => playbin
            .query_duration::<gst::ClockTime>()
            .map(|duration| vec![PlayerEvent::DurationChanged(clock_to_duration(duration))])
            .unwrap_or_default(),
        MessageView::Buffering(buffering) => {
            let percent = buffering.percent();
            debug!("Buffering: {}%", percent);
            let likely_to_keep_up = percent >= 100;
            let mut events = vec![PlayerEvent::BufferChanged { likely_to_keep_up }];
            if !likely_to_keep_up && *playing {
                events.push(PlayerEvent::TimeControlChanged(
                    TimeControlStatus::WaitingToPlay,
                ));
            }
            events
        }
        MessageView::StateChanged(state_changed) => {
            let from_playbin = state_changed
                .src()
                .is_some_and(|src| src == playbin.upcast_ref::<gst::Object>());
            if !from_playbin {
                return Vec::new();
            }
            debug!(
                "Playbin state changed from {:?} to {:?}",
                state_changed.old(),
                state_changed.current()
            );
            match state_changed.current() {
                gst::State::Playing => {
                    *playing = true;
                    vec![PlayerEvent::TimeControlChanged(TimeControlStatus::Playing)]
                }
                gst::State::Paused if *playing => {
                    *playing = false;
                    vec![PlayerEvent::TimeControlChanged(TimeControlStatus::Paused)]
                }
                _ => Vec::new(),
            }
        }
        MessageView::Eos(_) => {
            info!("End of stream");
            *playing = false;
            vec![
                PlayerEvent::TimeControlChanged(TimeControlStatus::Paused),
                PlayerEvent::EndOfStream,
            ]
        }
        MessageView::Error(err) => {
            error!(
                "Bus error from {:?}: {} ({:?})",
                err.src().map(|s| s.path_string()),
                err.error(),
                err.debug()
            );
            let failed = PlayerStatus::Failed(err.error().to_string());
            *lock(status) = failed.clone();
            *playing = false;
            vec![PlayerEvent::StatusChanged(failed)]
        }
        _ => {
            trace!("Ignoring bus message: {:?}", message.type_());
            Vec::new()
        }
    }
}

#[async_trait]
impl MediaPlayer for GStreamerPlayer {
    fn subscribe(&self, tick_interval: Duration) -> mpsc::UnboundedReceiver<PlayerEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *lock(&self.subscriber) = Some(Subscriber {
            sender,
            tick_interval,
        });
        receiver
    }

    async fn load_media(&self, url: &Url) -> Result<()> {
        info!("Loading media: {}", url);

        let (sender, tick_interval) = lock(&self.subscriber)
            .as_ref()
            .map(|subscriber| (subscriber.sender.clone(), subscriber.tick_interval))
            .context("No subscriber registered before loading media")?;

        if let Some(old_playbin) = self.playbin() {
            debug!("Clearing existing playbin");
            old_playbin
                .set_state(gst::State::Null)
                .context("Failed to set old playbin to null state")?;
        }
        *lock(&self.status) = PlayerStatus::Unknown;

        let playbin = gst::ElementFactory::make("playbin")
            .name("player")
            .property("uri", url.as_str())
            .build()
            .context("Failed to create playbin element - GStreamer plugins may not be installed")?;

        let task = tokio::spawn(watch_bus(
            playbin.clone(),
            self.status.clone(),
            sender,
            tick_interval,
        ));
        if let Some(previous) = lock(&self.bus_task).replace(task) {
            previous.abort();
        }

        // Preroll so AsyncDone reports readiness before playback is requested
        playbin
            .set_state(gst::State::Paused)
            .context("Failed to preroll playbin")?;
        *lock(&self.playbin) = Some(playbin);
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        debug!("Starting playback");
        let playbin = self.playbin().context("No media loaded")?;
        playbin
            .set_state(gst::State::Playing)
            .context("Failed to set playbin to playing state")?;
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        debug!("Pausing playback");
        if let Some(playbin) = self.playbin() {
            playbin
                .set_state(gst::State::Paused)
                .context("Failed to set playbin to paused state")?;
        }
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        debug!("Seeking to {:?}", position);
        let playbin = self.playbin().context("No media loaded")?;
        if !lock(&self.status).is_ready() {
            warn!("Pipeline not ready for seeking");
            return Err(anyhow!("Pipeline not ready for seeking"));
        }

        let seek_flags = gst::SeekFlags::FLUSH | gst::SeekFlags::KEY_UNIT;
        let seek_position = gst::ClockTime::from_nseconds(position.as_nanos() as u64);
        playbin
            .seek_simple(seek_flags, seek_position)
            .context("Seek failed")?;
        Ok(())
    }

    async fn get_position(&self) -> Option<Duration> {
        self.playbin()?
            .query_position::<gst::ClockTime>()
            .map(clock_to_duration)
    }

    async fn get_duration(&self) -> Option<Duration> {
        self.playbin()?
            .query_duration::<gst::ClockTime>()
            .map(clock_to_duration)
    }
}

impl Drop for GStreamerPlayer {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.bus_task).take() {
            task.abort();
        }
        if let Some(playbin) = lock(&self.playbin).take() {
            let _ = playbin.set_state(gst::State::Null);
        }
    }
}
