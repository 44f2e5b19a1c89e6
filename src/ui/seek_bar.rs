use std::time::Duration;

use super::view::PlaybackView;
use crate::player::PlaybackPosition;
use crate::utils::format_time;

/// Progress slider and the elapsed/remaining labels.
/// Tracks whether the user is dragging so ticks don't move the thumb
/// out from under them.
#[derive(Debug, Default)]
pub struct SeekBar {
    is_seeking: bool,
}

impl SeekBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set seeking state (true while the user is dragging the slider)
    pub fn set_seeking(&mut self, seeking: bool) {
        self.is_seeking = seeking;
    }

    /// Update labels and, unless the user is dragging, the slider
    pub fn update_position(&self, position: &PlaybackPosition, view: &mut impl PlaybackView) {
        if !self.is_seeking {
            view.set_progress(position.fraction());
        }
        self.update_labels(position, view);
    }

    pub fn update_labels(&self, position: &PlaybackPosition, view: &mut impl PlaybackView) {
        view.set_time_labels(
            &format_time(position.current),
            &format_time(position.remaining()),
        );
    }

    /// Reset to the initial state: empty slider, zeroed labels
    pub fn reset(&mut self, view: &mut impl PlaybackView) {
        self.is_seeking = false;
        view.set_progress(0.0);
        view.set_time_labels(&format_time(Duration::ZERO), &format_time(Duration::ZERO));
    }
}

/// Target for a skip of `delta_secs` from `current`.
///
/// Clamped to `[0, duration - end_guard]`. Returns `None` when the seek
/// should not happen: a forward skip with no known duration, or one that
/// would not move forward once clamped.
pub fn relative_seek_target(
    current: Duration,
    delta_secs: f64,
    duration: Option<Duration>,
    end_guard: Duration,
) -> Option<Duration> {
    let duration = duration.filter(|d| !d.is_zero());
    if delta_secs > 0.0 && duration.is_none() {
        return None;
    }

    let mut target = (current.as_secs_f64() + delta_secs).max(0.0);
    if let Some(duration) = duration {
        let limit = duration.saturating_sub(end_guard).as_secs_f64();
        target = target.min(limit);
    }
    let target = Duration::from_secs_f64(target.max(0.0));

    if delta_secs > 0.0 && target <= current {
        return None;
    }
    Some(target)
}

/// Map a slider fraction to a time within `duration`
pub fn absolute_seek_target(fraction: f64, duration: Duration) -> Option<Duration> {
    if duration.is_zero() || !fraction.is_finite() {
        return None;
    }
    Some(duration.mul_f64(fraction.clamp(0.0, 1.0)))
}
