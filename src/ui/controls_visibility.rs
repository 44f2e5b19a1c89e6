use std::time::Duration;
use tracing::debug;

use super::view::PlaybackView;
use crate::config::ControlsConfig;
use crate::utils::DelayedTask;

/// Control visibility state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Buttons row and progress row are both on screen
    Visible,
    /// Buttons row faded out, progress row still on screen
    ButtonsHidden,
    /// Both rows faded out
    Hidden,
}

/// Pending step of the auto-hide sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideStep {
    HideButtons,
    HideProgress,
}

/// Auto-hiding chrome: show on demand, then fade the buttons row and the
/// progress row out on a timer that restarts with every trigger.
#[derive(Debug)]
pub struct ControlsVisibility {
    state: ControlState,
    /// Pinned controls stay visible and ignore auto-hide requests
    pinned: bool,
    timer: DelayedTask<HideStep>,
    buttons_hide_delay: Duration,
    progress_hide_delay: Duration,
    fade: Duration,
}

impl ControlsVisibility {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            state: ControlState::Visible,
            pinned: false,
            timer: DelayedTask::new(),
            buttons_hide_delay: config.buttons_hide_delay(),
            progress_hide_delay: config.progress_hide_delay(),
            fade: config.fade_duration(),
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn buttons_visible(&self) -> bool {
        self.state == ControlState::Visible
    }

    pub fn progress_visible(&self) -> bool {
        self.state != ControlState::Hidden
    }

    pub fn auto_hide_pending(&self) -> bool {
        self.timer.is_armed()
    }

    /// Draw both rows visible regardless of the tracked state
    pub fn reset(&mut self, view: &mut impl PlaybackView) {
        self.timer.cancel();
        self.pinned = false;
        self.state = ControlState::Visible;
        view.set_buttons_visible(true, Duration::ZERO);
        view.set_progress_visible(true, Duration::ZERO);
    }

    /// Transition to the Visible state, restarting the hide sequence when
    /// `auto_hide` is set and the controls are not pinned
    pub fn transition_to_visible(&mut self, view: &mut impl PlaybackView, auto_hide: bool) {
        self.timer.cancel();

        match self.state {
            ControlState::Visible => {}
            ControlState::ButtonsHidden => view.set_buttons_visible(true, self.fade),
            ControlState::Hidden => {
                view.set_buttons_visible(true, self.fade);
                view.set_progress_visible(true, self.fade);
            }
        }
        self.state = ControlState::Visible;

        if auto_hide && !self.pinned {
            debug!("Controls visible, hiding in {:?}", self.buttons_hide_delay);
            self.timer.arm(self.buttons_hide_delay, HideStep::HideButtons);
        }
    }

    /// Keep the controls on screen for good; the hide sequence never runs
    /// again
    pub fn pin(&mut self, view: &mut impl PlaybackView) {
        self.pinned = true;
        self.transition_to_visible(view, false);
    }

    /// Wait for the next step of the hide sequence. Cancel-safe.
    pub async fn next_step(&mut self) -> HideStep {
        self.timer.fired().await
    }

    /// Apply a fired hide step to the view
    pub fn apply_step(&mut self, step: HideStep, view: &mut impl PlaybackView) {
        if self.pinned {
            return;
        }

        match (step, self.state) {
            (HideStep::HideButtons, ControlState::Visible) => {
                debug!("Hiding buttons row");
                view.set_buttons_visible(false, self.fade);
                self.state = ControlState::ButtonsHidden;
                self.timer.arm(
                    self.progress_hide_delay.saturating_sub(self.buttons_hide_delay),
                    HideStep::HideProgress,
                );
            }
            (HideStep::HideProgress, ControlState::ButtonsHidden) => {
                debug!("Hiding progress row");
                view.set_progress_visible(false, self.fade);
                self.state = ControlState::Hidden;
            }
            (step, state) => {
                debug!("Ignoring stale {:?} in {:?}", step, state);
            }
        }
    }
}
