use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("No video source configured")]
    MissingSource,

    #[error("Invalid video source '{url}': {reason}")]
    InvalidSource { url: String, reason: String },

    #[error("Player error: {0}")]
    Player(#[from] anyhow::Error),

    #[error("Playback controller disconnected")]
    ControllerClosed,
}

pub type PlaybackResult<T> = std::result::Result<T, PlaybackError>;
