//! Game configuration resource.
//!
//! Manages session settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 800
//! height = 450
//! title = rayloop
//! target_fps = 60
//! vsync = true
//!
//! [timing]
//! delta_policy = clamp
//! max_delta = 0.25
//! time_scale = 1.0
//!
//! [input]
//! exit_key = escape
//!
//! [storage]
//! path = ./storage.data
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::error::EngineError;
use crate::resources::frametime::DeltaPolicy;
use crate::resources::input::Key;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 450;
const DEFAULT_TITLE: &str = "rayloop";
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_MAX_DELTA: f32 = 0.25;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";
const DEFAULT_STORAGE_PATH: &str = "./storage.data";

/// Game configuration resource.
///
/// Stores window settings, the delta-time policy, the exit key and the value
/// storage location. Inserted into the session world by the driver so games
/// can read it during load and update.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Window title.
    pub title: String,
    /// Target frames per second.
    pub target_fps: u32,
    /// Enable vertical sync.
    pub vsync: bool,
    /// Treatment of implausible frame deltas.
    pub delta_policy: DeltaPolicy,
    /// Multiplier applied to every frame delta.
    pub time_scale: f32,
    /// Key that ends the session. `None` disables it.
    pub exit_key: Option<Key>,
    /// File backing [`ValueStorage`](crate::resources::storage::ValueStorage).
    pub storage_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            delta_policy: DeltaPolicy::Unbounded,
            time_scale: DEFAULT_TIME_SCALE,
            exit_key: Some(Key::Escape),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), EngineError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| EngineError::Config(format!("failed to load config file: {}", e)))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), EngineError> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| EngineError::Config(format!("failed to parse config: {}", e)))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [window] section
        if let Some(width) = read_u32(config, "window", "width") {
            self.window_width = width;
        }
        if let Some(height) = read_u32(config, "window", "height") {
            self.window_height = height;
        }
        if let Some(title) = config.get("window", "title") {
            self.title = title;
        }
        if let Some(fps) = read_u32(config, "window", "target_fps") {
            self.target_fps = fps;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }

        // [timing] section
        let max_delta = read_f32(config, "timing", "max_delta", |v| v > 0.0)
            .unwrap_or(DEFAULT_MAX_DELTA);
        if let Some(name) = config.get("timing", "delta_policy") {
            match DeltaPolicy::from_name(&name, max_delta) {
                Some(policy) => self.delta_policy = policy,
                None => warn!("Unknown delta_policy '{}', keeping {:?}", name, self.delta_policy),
            }
        }
        if let Some(scale) = read_f32(config, "timing", "time_scale", |v| v >= 0.0) {
            self.time_scale = scale;
        }

        // [input] section
        if let Some(name) = config.get("input", "exit_key") {
            if name.trim().eq_ignore_ascii_case("none") {
                self.exit_key = None;
            } else {
                match Key::from_name(&name) {
                    Some(key) => self.exit_key = Some(key),
                    None => warn!("Unknown exit_key '{}', keeping {:?}", name, self.exit_key),
                }
            }
        }

        // [storage] section
        if let Some(path) = config.get("storage", "path") {
            self.storage_path = PathBuf::from(path);
        }

        info!(
            "Loaded config: {}x{} window '{}', fps={}, vsync={}, delta={:?}, exit_key={:?}",
            self.window_width,
            self.window_height,
            self.title,
            self.target_fps,
            self.vsync,
            self.delta_policy,
            self.exit_key
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), EngineError> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "title", Some(self.title.clone()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));

        // [timing] section
        let (policy, max_delta) = match self.delta_policy {
            DeltaPolicy::Unbounded => ("unbounded", DEFAULT_MAX_DELTA),
            DeltaPolicy::Clamp { max } => ("clamp", max),
            DeltaPolicy::Skip { max } => ("skip", max),
        };
        config.set("timing", "delta_policy", Some(policy.to_string()));
        config.set("timing", "max_delta", Some(max_delta.to_string()));
        config.set("timing", "time_scale", Some(self.time_scale.to_string()));

        // [input] section
        let exit_key = self.exit_key.map(Key::name).unwrap_or("none");
        config.set("input", "exit_key", Some(exit_key.to_string()));

        // [storage] section
        config.set(
            "storage",
            "path",
            Some(self.storage_path.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| EngineError::Config(format!("failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

/// Read a `u32` key, warning and returning `None` when it does not fit.
fn read_u32(config: &Ini, section: &str, key: &str) -> Option<u32> {
    match config.getuint(section, key) {
        Ok(Some(value)) => match u32::try_from(value) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("{}.{} = {} is out of range, keeping default", section, key, value);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Invalid {}.{}: {}", section, key, e);
            None
        }
    }
}

/// Read a finite `f32` key accepted by `valid`.
fn read_f32(config: &Ini, section: &str, key: &str, valid: impl Fn(f32) -> bool) -> Option<f32> {
    match config.getfloat(section, key) {
        Ok(Some(value)) => {
            let value = value as f32;
            if value.is_finite() && valid(value) {
                Some(value)
            } else {
                warn!("{}.{} = {} is out of range, keeping default", section, key, value);
                None
            }
        }
        Ok(None) => None,
        Err(e) => {
            warn!("Invalid {}.{}: {}", section, key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sample_window() {
        let config = GameConfig::new();
        assert_eq!(config.window_size(), (800, 450));
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.delta_policy, DeltaPolicy::Unbounded);
        assert_eq!(config.exit_key, Some(Key::Escape));
    }

    #[test]
    fn load_from_str_overrides_present_keys_only() {
        let mut config = GameConfig::new();
        config
            .load_from_str(
                "[window]\nwidth = 1024\ntitle = Mario Walkthrough\n\n[timing]\ndelta_policy = clamp\nmax_delta = 0.1\n",
            )
            .unwrap();
        assert_eq!(config.window_width, 1024);
        assert_eq!(config.window_height, 450);
        assert_eq!(config.title, "Mario Walkthrough");
        assert_eq!(config.delta_policy, DeltaPolicy::Clamp { max: 0.1 });
    }

    #[test]
    fn exit_key_none_disables_exit() {
        let mut config = GameConfig::new();
        config.load_from_str("[input]\nexit_key = none\n").unwrap();
        assert_eq!(config.exit_key, None);
    }

    #[test]
    fn unknown_values_keep_defaults() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[input]\nexit_key = hyper\n[timing]\ndelta_policy = warp\n")
            .unwrap();
        assert_eq!(config.exit_key, Some(Key::Escape));
        assert_eq!(config.delta_policy, DeltaPolicy::Unbounded);
    }

    #[test]
    fn out_of_range_numbers_keep_defaults() {
        let mut config = GameConfig::new();
        config
            .load_from_str(
                "[window]\nwidth = 5000000000\ntarget_fps = -3\n[timing]\ntime_scale = inf\ndelta_policy = clamp\nmax_delta = nan\n",
            )
            .unwrap();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.time_scale, 1.0);
        assert_eq!(config.delta_policy, DeltaPolicy::Clamp { max: DEFAULT_MAX_DELTA });

        config.load_from_str("[timing]\ntime_scale = -2\n").unwrap();
        assert_eq!(config.time_scale, 1.0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut config = GameConfig::with_path("./definitely/not/here/config.ini");
        assert!(matches!(config.load_from_file(), Err(EngineError::Config(_))));
        assert_eq!(config.window_size(), (800, 450));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let path = std::env::temp_dir().join(format!(
            "rayloop-config-{}-save_then_load.ini",
            std::process::id()
        ));
        let mut config = GameConfig::with_path(&path);
        config.window_width = 640;
        config.delta_policy = DeltaPolicy::Skip { max: 0.5 };
        config.exit_key = Some(Key::F12);
        config.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.window_width, 640);
        assert_eq!(loaded.delta_policy, DeltaPolicy::Skip { max: 0.5 });
        assert_eq!(loaded.exit_key, Some(Key::F12));
    }
}
