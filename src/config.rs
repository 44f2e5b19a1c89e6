use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::{
    DEFAULT_LOADING_MESSAGE, DEFAULT_SOURCE_URL, SEEK_END_GUARD_SECS, SKIP_INTERVAL_SECS,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub controls: ControlsConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Video to load on start; empty means no source
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Seconds skipped by the rewind and fast-forward buttons
    #[serde(default = "default_skip_interval")]
    pub skip_interval_secs: f64,

    /// Fast-forward never lands closer than this to the end
    #[serde(default = "default_end_guard")]
    pub end_guard_secs: f64,

    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_loading_message")]
    pub loading_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Delay from a tap until the buttons row fades out
    #[serde(default = "default_buttons_hide_delay")]
    pub buttons_hide_delay_ms: u64,

    /// Delay from a tap until the progress row fades out
    #[serde(default = "default_progress_hide_delay")]
    pub progress_hide_delay_ms: u64,

    #[serde(default = "default_fade_duration")]
    pub fade_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_sim_duration")]
    pub duration_secs: u64,

    #[serde(default = "default_sim_load_delay")]
    pub load_delay_ms: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config = Self::from_toml_str(&contents)?;
        info!("Config loaded successfully");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", config_path);
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("videocourse").join("config.toml"))
    }
}

impl PlaybackConfig {
    /// Skip length in seconds; falls back to the default when the
    /// configured value is not a finite number
    pub fn skip_interval(&self) -> f64 {
        if self.skip_interval_secs.is_finite() {
            self.skip_interval_secs.abs()
        } else {
            default_skip_interval()
        }
    }

    pub fn end_guard(&self) -> Duration {
        Duration::try_from_secs_f64(self.end_guard_secs.max(0.0)).unwrap_or_default()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl ControlsConfig {
    pub fn buttons_hide_delay(&self) -> Duration {
        Duration::from_millis(self.buttons_hide_delay_ms)
    }

    pub fn progress_hide_delay(&self) -> Duration {
        Duration::from_millis(self.progress_hide_delay_ms)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }
}

impl SimulationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            skip_interval_secs: default_skip_interval(),
            end_guard_secs: default_end_guard(),
            tick_interval_ms: default_tick_interval(),
            loading_message: default_loading_message(),
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            buttons_hide_delay_ms: default_buttons_hide_delay(),
            progress_hide_delay_ms: default_progress_hide_delay(),
            fade_duration_ms: default_fade_duration(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_sim_duration(),
            load_delay_ms: default_sim_load_delay(),
        }
    }
}

// Default value functions
fn default_source_url() -> String { DEFAULT_SOURCE_URL.to_string() }
fn default_skip_interval() -> f64 { SKIP_INTERVAL_SECS }
fn default_end_guard() -> f64 { SEEK_END_GUARD_SECS }
fn default_tick_interval() -> u64 { 500 }
fn default_loading_message() -> String { DEFAULT_LOADING_MESSAGE.to_string() }
fn default_buttons_hide_delay() -> u64 { 3000 }
fn default_progress_hide_delay() -> u64 { 5000 }
fn default_fade_duration() -> u64 { 300 }
fn default_sim_duration() -> u64 { 30 }
fn default_sim_load_delay() -> u64 { 1500 }
