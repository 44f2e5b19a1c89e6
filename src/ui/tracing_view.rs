use std::time::Duration;
use tracing::{debug, error, info, trace};

use super::view::{ButtonIcon, PlaybackView, TransportButton, VideoBounds};

/// Headless view that renders every update as a log line.
///
/// Progress updates arrive on every tick, so they are only traced; labels
/// are logged when the displayed text actually changes.
#[derive(Debug, Default)]
pub struct TracingView {
    last_labels: Option<(String, String)>,
}

impl TracingView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaybackView for TracingView {
    fn set_button_icon(&mut self, button: TransportButton, icon: ButtonIcon) {
        debug!("{:?} button icon -> {}", button, icon.icon_name());
    }

    fn set_progress(&mut self, fraction: f64) {
        trace!("Progress {:.1}%", fraction * 100.0);
    }

    fn set_time_labels(&mut self, elapsed: &str, remaining: &str) {
        let labels = (elapsed.to_string(), remaining.to_string());
        if self.last_labels.as_ref() != Some(&labels) {
            info!("{} / -{}", elapsed, remaining);
            self.last_labels = Some(labels);
        }
    }

    fn set_buttons_visible(&mut self, visible: bool, fade: Duration) {
        debug!(
            "Buttons row {} ({:?} fade)",
            if visible { "shown" } else { "hidden" },
            fade
        );
    }

    fn set_progress_visible(&mut self, visible: bool, fade: Duration) {
        debug!(
            "Progress row {} ({:?} fade)",
            if visible { "shown" } else { "hidden" },
            fade
        );
    }

    fn show_loading(&mut self, message: &str) {
        info!("{}", message);
    }

    fn hide_loading(&mut self) {
        debug!("Loading indicator removed");
    }

    fn show_error(&mut self, message: &str) {
        error!("Playback failed: {}", message);
    }

    fn set_video_bounds(&mut self, bounds: VideoBounds) {
        debug!(
            "Video surface resized to {}x{} at ({}, {})",
            bounds.width, bounds.height, bounds.x, bounds.y
        );
    }
}
