use std::time::Duration;

/// Buttons in the transport row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportButton {
    PlayPause,
    Rewind,
    FastForward,
}

/// Icons a transport button can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonIcon {
    Play,
    Pause,
    Rewind,
    FastForward,
}

impl ButtonIcon {
    pub fn icon_name(&self) -> &'static str {
        match self {
            ButtonIcon::Play => "media-playback-start-symbolic",
            ButtonIcon::Pause => "media-playback-pause-symbolic",
            ButtonIcon::Rewind => "media-seek-backward-symbolic",
            ButtonIcon::FastForward => "media-seek-forward-symbolic",
        }
    }
}

/// Area the video surface should occupy after a layout pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VideoBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl VideoBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Rendering surface for the playback screen.
///
/// Implementations only draw; every decision is made by the controller.
/// `fade` is the animation length for visibility changes.
pub trait PlaybackView: Send {
    fn set_button_icon(&mut self, button: TransportButton, icon: ButtonIcon);
    /// Progress through the item in `[0, 1]`
    fn set_progress(&mut self, fraction: f64);
    fn set_time_labels(&mut self, elapsed: &str, remaining: &str);
    fn set_buttons_visible(&mut self, visible: bool, fade: Duration);
    fn set_progress_visible(&mut self, visible: bool, fade: Duration);
    fn show_loading(&mut self, message: &str);
    fn hide_loading(&mut self);
    fn show_error(&mut self, message: &str);
    fn set_video_bounds(&mut self, bounds: VideoBounds);
}
