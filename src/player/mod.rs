pub mod controller;
#[cfg(feature = "gstreamer")]
pub mod gstreamer_player;
pub mod simulated;
pub mod traits;
pub mod types;

pub use controller::{ControllerHandle, ControllerInput, ControllerSnapshot, PlaybackController};
#[cfg(feature = "gstreamer")]
pub use gstreamer_player::GStreamerPlayer;
pub use simulated::SimulatedPlayer;
pub use traits::MediaPlayer;
pub use types::{
    PlaybackPosition, PlaybackState, PlayerEvent, PlayerStatus, TimeControlStatus,
};
