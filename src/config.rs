//! Configuration file handling for ascii-reel.
//!
//! Loads configuration from `<config dir>/ascii-reel/config.toml` or a custom path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capture::DEFAULT_SEEK_TIMEOUT;
use crate::project::LoopOptions;
use crate::raster::{FontRegistry, RasterError};
use crate::settings::Settings;

/// Configuration file structure for ascii-reel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub render: Settings,
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Font family name to font file
    #[serde(default)]
    pub fonts: BTreeMap<String, PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub seek_timeout_ms: u64,
    pub crossfade_frames: usize,
    #[serde(rename = "loop")]
    pub looping: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            seek_timeout_ms: DEFAULT_SEEK_TIMEOUT.as_millis() as u64,
            crossfade_frames: 0,
            looping: true,
        }
    }
}

impl CaptureConfig {
    pub fn seek_timeout(&self) -> Duration {
        Duration::from_millis(self.seek_timeout_ms)
    }

    pub fn loop_options(&self) -> LoopOptions {
        LoopOptions {
            looping: self.looping,
            crossfade_frames: self.crossfade_frames,
        }
    }
}

/// Errors that can occur when loading or writing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to write config file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Register every configured font file.
    pub fn load_fonts(&self, registry: &mut FontRegistry) -> Result<(), RasterError> {
        for (family, path) in &self.fonts {
            registry.register_file(family, path)?;
            log::debug!("Registered font '{}' from {}", family, path.display());
        }
        Ok(())
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ascii-reel")
        .join("config.toml")
}

/// Commented default configuration written by `config init`.
pub const DEFAULT_CONFIG: &str = r##"# ascii-reel configuration

[render]
# Font family used for density calibration (see [fonts])
font = "monospace"
fontSize = 11.0
# Candidate characters; order is decided by measured glyph density
chars = "{}[]<>/.,;:#$+-=|~_01"
# Grid width in characters
cols = 80
# Capture rate
fps = 15
# Glyph colour and opacity range
colour = "#C19A4E"
baseAlpha = 0.03
peakAlpha = 0.08
# Characters below this ramp position (0-1) are not drawn
clipThreshold = 0.0
background = "#151820"
transparentBg = false
# Tone mapping
gamma = 2.2
contrast = 1.0
brightness = 0.0
invertLuminance = false

[capture]
# Give up on a seek after this long and reuse the previous frame
seek_timeout_ms = 5000
# Frames dissolved across the loop seam (0 = off)
crossfade_frames = 0
loop = true

[fonts]
# Family name = path to a TTF/OTF file
# monospace = "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf"
"##;

/// Write [`DEFAULT_CONFIG`] to `path`, creating parent directories.
/// Refuses to overwrite an existing file.
pub fn init(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("Created config file {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_matches_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        let path = default_path();
        assert!(path.ends_with("ascii-reel/config.toml"));
    }

    #[test]
    fn test_capture_section_defaults() {
        let capture = CaptureConfig::default();
        assert_eq!(capture.seek_timeout(), Duration::from_secs(5));
        assert_eq!(
            capture.loop_options(),
            LoopOptions {
                looping: true,
                crossfade_frames: 0
            }
        );
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = Config::default();
        config.render.cols = 140;
        config.capture.looping = false;
        config
            .fonts
            .insert("Fira Code".to_string(), PathBuf::from("/fonts/fira.ttf"));
        let text = config.to_toml().unwrap();
        assert!(text.contains("loop = false"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
