// Playback screen controller: transport buttons, progress and auto-hiding
// controls wired to a media player capability.

pub mod config;
pub mod constants;
pub mod player;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use player::{
    ControllerHandle, ControllerSnapshot, MediaPlayer, PlaybackController, PlaybackState,
    PlayerEvent, PlayerStatus, SimulatedPlayer,
};
pub use ui::{PlaybackView, TracingView};
pub use utils::errors::{PlaybackError, PlaybackResult};
