use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

use super::types::PlayerEvent;

/// Platform media player driven by the playback controller.
///
/// State changes are pushed through the receiver returned by
/// [`MediaPlayer::subscribe`]; the getters are for on-demand reads such as
/// computing a skip target.
#[async_trait]
pub trait MediaPlayer: Send + Sync {
    /// Register the single event subscriber. `tick_interval` is the period
    /// of [`PlayerEvent::PeriodicTick`] while playing.
    fn subscribe(&self, tick_interval: Duration) -> mpsc::UnboundedReceiver<PlayerEvent>;
    async fn load_media(&self, url: &Url) -> Result<()>;
    async fn play(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn seek(&self, position: Duration) -> Result<()>;
    async fn get_position(&self) -> Option<Duration>;
    async fn get_duration(&self) -> Option<Duration>;
}
