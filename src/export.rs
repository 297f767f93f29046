//! Export of rendered sequences as JSON or TypeScript modules.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ascii::{RenderedFrame, DEFAULT_GAMMA};
use crate::settings::Settings;

/// Errors that can occur while writing or reading an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Nothing to export: no frames have been rendered")]
    NoFrames,

    #[error("Unsupported export format for '{}' (use .json or .ts)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse export '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Export '{}' has a frame rate of 0", .path.display())]
    InvalidFps { path: PathBuf },

    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Output file flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    TypeScript,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::TypeScript => "ts",
        }
    }

    /// Pick the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "ts" => Some(ExportFormat::TypeScript),
            _ => None,
        }
    }
}

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

fn default_contrast() -> f64 {
    1.0
}

/// Everything a player needs to draw the frames the way they were tuned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub cols: u32,
    pub rows: u32,
    pub fps: u32,
    pub total_frames: usize,
    pub font: String,
    pub font_size: f32,
    pub chars: String,
    pub colour: String,
    pub base_alpha: f64,
    pub peak_alpha: f64,
    pub background: String,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub crossfade_frames: usize,
    pub transparent_background: bool,
    pub clip_threshold: f64,
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default = "default_contrast")]
    pub contrast: f64,
    #[serde(default)]
    pub brightness: f64,
}

impl ExportMeta {
    pub fn new(
        settings: &Settings,
        rows: u32,
        total_frames: usize,
        looping: bool,
        crossfade_frames: usize,
    ) -> Self {
        Self {
            cols: settings.cols,
            rows,
            fps: settings.fps,
            total_frames,
            font: settings.font.clone(),
            font_size: settings.font_size,
            chars: settings.chars.clone(),
            colour: settings.colour.clone(),
            base_alpha: settings.base_alpha,
            peak_alpha: settings.peak_alpha,
            background: settings.background.clone(),
            looping,
            crossfade_frames,
            transparent_background: settings.transparent_bg,
            clip_threshold: settings.clip_threshold,
            gamma: settings.gamma,
            contrast: settings.contrast,
            brightness: settings.brightness,
        }
    }

    /// Settings equivalent to this metadata, for restyling a loaded export.
    pub fn to_settings(&self) -> Settings {
        Settings {
            font: self.font.clone(),
            font_size: self.font_size,
            chars: self.chars.clone(),
            cols: self.cols,
            colour: self.colour.clone(),
            base_alpha: self.base_alpha,
            peak_alpha: self.peak_alpha,
            fps: self.fps,
            invert_luminance: false,
            background: self.background.clone(),
            transparent_bg: self.transparent_background,
            clip_threshold: self.clip_threshold,
            gamma: self.gamma,
            contrast: self.contrast,
            brightness: self.brightness,
        }
    }
}

/// Metadata plus newline-joined frame strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsciiExport {
    pub meta: ExportMeta,
    pub frames: Vec<String>,
}

impl AsciiExport {
    pub fn new(meta: ExportMeta, frames: &[RenderedFrame]) -> Result<Self, ExportError> {
        if frames.is_empty() {
            return Err(ExportError::NoFrames);
        }
        Ok(Self {
            meta,
            frames: frames.iter().map(|f| f.as_str().to_string()).collect(),
        })
    }

    /// An export holding just one frame.
    pub fn single_frame(mut meta: ExportMeta, frame: &RenderedFrame) -> Self {
        meta.total_frames = 1;
        meta.looping = false;
        meta.crossfade_frames = 0;
        Self {
            meta,
            frames: vec![frame.as_str().to_string()],
        }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A TypeScript module exporting the data as a typed constant.
    pub fn to_typescript(&self) -> Result<String, ExportError> {
        Ok(format!(
            "export const asciiData = {} as const;\n",
            self.to_json()?
        ))
    }

    pub fn render(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::TypeScript => self.to_typescript(),
        }
    }

    /// Write to `path`, choosing JSON or TypeScript from its extension.
    pub fn write(&self, path: &Path) -> Result<ExportFormat, ExportError> {
        let format = ExportFormat::from_path(path)
            .ok_or_else(|| ExportError::UnsupportedFormat(path.to_path_buf()))?;
        let content = self.render(format)?;
        std::fs::write(path, content).map_err(|e| ExportError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!(
            "Wrote {} frames ({}x{}) to {}",
            self.frames.len(),
            self.meta.cols,
            self.meta.rows,
            path.display()
        );
        Ok(format)
    }

    /// Read a JSON export back.
    pub fn load_json(path: &Path) -> Result<Self, ExportError> {
        let content = std::fs::read_to_string(path).map_err(|e| ExportError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let export: AsciiExport =
            serde_json::from_str(&content).map_err(|e| ExportError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        if export.meta.fps == 0 {
            return Err(ExportError::InvalidFps {
                path: path.to_path_buf(),
            });
        }
        if export.meta.total_frames != export.frames.len() {
            log::warn!(
                "Export declares {} frames but contains {}",
                export.meta.total_frames,
                export.frames.len()
            );
        }
        Ok(export)
    }
}

/// `ascii-{cols}col-{fps}fps.{ext}`
pub fn generate_filename(cols: u32, fps: u32, format: ExportFormat) -> String {
    format!("ascii-{}col-{}fps.{}", cols, fps, format.extension())
}

/// `ascii-frame-{index}.json`
pub fn single_frame_filename(index: usize) -> String {
    format!("ascii-frame-{}.json", index)
}
