// Playback defaults shared by the config layer and the controller

/// Sample clip loaded when no source is configured
pub const DEFAULT_SOURCE_URL: &str =
    "http://mirrors.standaloneinstaller.com/video-sample/jellyfish-25-mbps-hd-hevc.mp4";

pub const DEFAULT_LOADING_MESSAGE: &str = "Loading Video..";

// === Transport ===
pub const SKIP_INTERVAL_SECS: f64 = 5.0;
pub const SEEK_END_GUARD_SECS: f64 = 5.0;
