//! CLI enum types for character set, resolution and style presets.

use clap::ValueEnum;

use crate::ascii::CharSetPreset;
use crate::settings::{ResolutionPreset, StylePreset, STYLE_PRESETS};

/// Character set preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    #[default]
    Code,
    Classic,
    Minimal,
    Dense,
    Blocks,
    Binary,
}

impl From<Preset> for CharSetPreset {
    fn from(p: Preset) -> Self {
        match p {
            Preset::Code => CharSetPreset::Code,
            Preset::Classic => CharSetPreset::Classic,
            Preset::Minimal => CharSetPreset::Minimal,
            Preset::Dense => CharSetPreset::Dense,
            Preset::Blocks => CharSetPreset::Blocks,
            Preset::Binary => CharSetPreset::Binary,
        }
    }
}

/// Named grid width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Resolution {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

impl From<Resolution> for ResolutionPreset {
    fn from(r: Resolution) -> Self {
        match r {
            Resolution::Low => ResolutionPreset::Low,
            Resolution::Medium => ResolutionPreset::Medium,
            Resolution::High => ResolutionPreset::High,
            Resolution::Ultra => ResolutionPreset::Ultra,
        }
    }
}

/// Style preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Style {
    Hero,
    TerminalGreen,
    HighContrast,
}

impl Style {
    pub fn preset(&self) -> &'static StylePreset {
        match self {
            Style::Hero => &STYLE_PRESETS[0],
            Style::TerminalGreen => &STYLE_PRESETS[1],
            Style::HighContrast => &STYLE_PRESETS[2],
        }
    }
}
