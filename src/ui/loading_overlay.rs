use super::view::PlaybackView;

/// Loading indicator shown over the video until playback first starts
#[derive(Debug)]
pub struct LoadingOverlay {
    message: String,
    visible: bool,
}

impl LoadingOverlay {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self, view: &mut impl PlaybackView) {
        view.show_loading(&self.message);
        self.visible = true;
    }

    /// Remove the indicator; no view call when it is already gone
    pub fn hide(&mut self, view: &mut impl PlaybackView) {
        if self.visible {
            view.hide_loading();
            self.visible = false;
        }
    }
}
