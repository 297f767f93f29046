//! Conversion and rendering settings, presets, and change classification.

use serde::{Deserialize, Serialize};

use crate::ascii::{usable_chars, CharSetPreset, RenderOptions, RenderOptionsError, CODE_CHARSET};

/// Errors for settings that cannot be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Column count must be at least 1")]
    InvalidColumns,

    #[error("Capture rate must be at least 1 fps, got {0}")]
    InvalidFps(u32),

    #[error("Font size must be greater than 0, got {0}")]
    InvalidFontSize(f32),

    #[error("Character set has no usable characters")]
    EmptyChars,

    #[error("{field} must be between 0 and 1, got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("Invalid colour '{0}': expected #RRGGBB")]
    InvalidColour(String),

    #[error(transparent)]
    Render(#[from] RenderOptionsError),
}

/// Everything that controls a conversion and how it is drawn.
///
/// Field names serialize in camelCase so settings files and exports share one
/// vocabulary. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub font: String,
    pub font_size: f32,
    pub chars: String,
    pub cols: u32,
    pub colour: String,
    pub base_alpha: f64,
    pub peak_alpha: f64,
    pub fps: u32,
    pub invert_luminance: bool,
    pub background: String,
    pub transparent_bg: bool,
    pub clip_threshold: f64,
    pub gamma: f64,
    pub contrast: f64,
    pub brightness: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font: "monospace".to_string(),
            font_size: 11.0,
            chars: CODE_CHARSET.to_string(),
            cols: 80,
            colour: "#C19A4E".to_string(),
            base_alpha: 0.03,
            peak_alpha: 0.08,
            fps: 15,
            invert_luminance: false,
            background: "#151820".to_string(),
            transparent_bg: false,
            clip_threshold: 0.0,
            gamma: 2.2,
            contrast: 1.0,
            brightness: 0.0,
        }
    }
}

/// How much work a settings change invalidates, from least to most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Impact {
    Unchanged,
    /// Only the backdrop changed; rendered frames stay valid
    Restyle,
    /// Tone mapping or glyph styling changed; re-render from captured pixels
    Rerender,
    /// Grid size, rate or ramp changed; the video must be captured again
    Recapture,
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.cols == 0 {
            return Err(SettingsError::InvalidColumns);
        }
        if self.fps == 0 {
            return Err(SettingsError::InvalidFps(self.fps));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(SettingsError::InvalidFontSize(self.font_size));
        }
        if usable_chars(&self.chars).is_empty() {
            return Err(SettingsError::EmptyChars);
        }
        for (field, value) in [
            ("baseAlpha", self.base_alpha),
            ("peakAlpha", self.peak_alpha),
            ("clipThreshold", self.clip_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::OutOfUnitRange { field, value });
            }
        }
        crate::style::Rgb::parse(&self.colour)?;
        crate::style::Rgb::parse(&self.background)?;
        self.render_options().validate()?;
        Ok(())
    }

    /// The tone-mapping subset of these settings.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            gamma: self.gamma,
            contrast: self.contrast,
            brightness: self.brightness,
            invert: self.invert_luminance,
        }
    }

    /// Classify the change from `self` to `new`.
    ///
    /// Character set, font and size feed the density ramp, and a captured
    /// sequence is tied to the ramp it was converted with, so those force a
    /// recapture together with the grid width and rate.
    pub fn impact_of(&self, new: &Settings) -> Impact {
        if self.chars != new.chars
            || self.font != new.font
            || self.font_size != new.font_size
            || self.cols != new.cols
            || self.fps != new.fps
        {
            return Impact::Recapture;
        }
        if self.render_options() != new.render_options()
            || self.colour != new.colour
            || self.base_alpha != new.base_alpha
            || self.peak_alpha != new.peak_alpha
            || self.clip_threshold != new.clip_threshold
        {
            return Impact::Rerender;
        }
        if self.background != new.background || self.transparent_bg != new.transparent_bg {
            return Impact::Restyle;
        }
        Impact::Unchanged
    }

    /// Overwrite the fields a style preset sets.
    pub fn apply_style(&mut self, preset: &StylePreset) {
        self.font = preset.font.to_string();
        self.chars = preset.chars.to_string();
        self.colour = preset.colour.to_string();
        self.base_alpha = preset.base_alpha;
        self.peak_alpha = preset.peak_alpha;
        self.background = preset.background.to_string();
    }

    pub fn apply_charset(&mut self, preset: CharSetPreset) {
        self.chars = preset.chars().to_string();
    }

    pub fn apply_resolution(&mut self, preset: ResolutionPreset) {
        self.cols = preset.cols();
    }
}

/// Named column counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPreset {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

impl ResolutionPreset {
    pub fn cols(&self) -> u32 {
        match self {
            ResolutionPreset::Low => 40,
            ResolutionPreset::Medium => 80,
            ResolutionPreset::High => 140,
            ResolutionPreset::Ultra => 200,
        }
    }
}

/// A named look: font, character set, colours and alpha range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StylePreset {
    pub name: &'static str,
    pub font: &'static str,
    pub chars: &'static str,
    pub colour: &'static str,
    pub base_alpha: f64,
    pub peak_alpha: f64,
    pub background: &'static str,
}

pub static STYLE_PRESETS: [StylePreset; 3] = [
    StylePreset {
        name: "kbanc hero",
        font: "JetBrains Mono",
        chars: CODE_CHARSET,
        colour: "#C19A4E",
        base_alpha: 0.03,
        peak_alpha: 0.08,
        background: "#151820",
    },
    StylePreset {
        name: "Terminal green",
        font: "JetBrains Mono",
        chars: "@#$%&*+=-:. ",
        colour: "#4ADE80",
        base_alpha: 0.1,
        peak_alpha: 1.0,
        background: "#0D1117",
    },
    StylePreset {
        name: "High contrast",
        font: "Courier Prime",
        chars: "@#$%&*+=-:. ",
        colour: "#FFFFFF",
        base_alpha: 0.1,
        peak_alpha: 1.0,
        background: "#000000",
    },
];

/// Look up a style preset by name, ignoring case.
pub fn style_preset(name: &str) -> Option<&'static StylePreset> {
    STYLE_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}
