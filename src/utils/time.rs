use std::time::Duration;

/// Format a playback time for the elapsed/remaining labels.
///
/// `H:MM:SS` once the value reaches an hour, `MM:SS` below that.
/// Fractional seconds are truncated.
pub fn format_time(time: Duration) -> String {
    let total_secs = time.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
