//! Character set presets and density-ordered character ramps.

use std::fmt;

use crate::raster::RasterError;

/// Bracket-and-punctuation set used by default.
pub const CODE_CHARSET: &str = "{}[]<>/.,;:#$+-=|~_01";

/// Classic dense-to-sparse ASCII set.
pub const CLASSIC_CHARSET: &str = "@#$%&*+=-:. ";

/// Short, clean set.
pub const MINIMAL_CHARSET: &str = ".:-=+*#@";

/// Large set for the most tonal steps.
pub const DENSE_CHARSET: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/|()1{}[]?-_+~<>i!lI;:,\"^'. ";

/// Unicode shade blocks.
pub const BLOCKS_CHARSET: &str = " ░▒▓█";

/// Zeros and ones.
pub const BINARY_CHARSET: &str = "01";

/// Named character set presets.
///
/// Presets only choose *which* characters are used. Their on-screen order is
/// always decided by measured glyph density, not by the order listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSetPreset {
    #[default]
    Code,
    Classic,
    Minimal,
    Dense,
    Blocks,
    Binary,
}

impl CharSetPreset {
    pub fn chars(&self) -> &'static str {
        match self {
            CharSetPreset::Code => CODE_CHARSET,
            CharSetPreset::Classic => CLASSIC_CHARSET,
            CharSetPreset::Minimal => MINIMAL_CHARSET,
            CharSetPreset::Dense => DENSE_CHARSET,
            CharSetPreset::Blocks => BLOCKS_CHARSET,
            CharSetPreset::Binary => BINARY_CHARSET,
        }
    }

    /// Get a human-readable name for the preset.
    pub fn name(&self) -> &'static str {
        match self {
            CharSetPreset::Code => "Code",
            CharSetPreset::Classic => "Classic",
            CharSetPreset::Minimal => "Minimal",
            CharSetPreset::Dense => "Dense",
            CharSetPreset::Blocks => "Blocks",
            CharSetPreset::Binary => "Binary",
        }
    }
}

/// Errors raised while building a character ramp.
#[derive(Debug, thiserror::Error)]
pub enum RampError {
    #[error("Character set has no usable characters")]
    EmptyRamp,

    #[error(transparent)]
    Rendering(#[from] RasterError),
}

/// Reduce a user-supplied character string to the characters a ramp may use:
/// control characters (newlines in particular) are dropped and duplicates
/// collapse onto their first occurrence.
pub fn usable_chars(chars: &str) -> Vec<char> {
    let mut seen = Vec::new();
    for ch in chars.chars() {
        if ch.is_control() || seen.contains(&ch) {
            continue;
        }
        seen.push(ch);
    }
    seen
}

/// Characters ordered from least to most ink.
///
/// Never empty: a single-character ramp maps every pixel to that character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRamp {
    chars: Vec<char>,
}

impl CharacterRamp {
    /// Build a ramp from characters already in ascending density order.
    pub fn new(chars: Vec<char>) -> Result<Self, RampError> {
        if chars.is_empty() {
            return Err(RampError::EmptyRamp);
        }
        Ok(Self { chars })
    }

    /// Build a ramp from a string already in ascending density order.
    pub fn from_ordered(chars: &str) -> Result<Self, RampError> {
        Self::new(usable_chars(chars))
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }

    /// Character at `index`, clamped to the densest character.
    #[inline]
    pub fn at(&self, index: usize) -> char {
        self.chars[index.min(self.chars.len() - 1)]
    }

    /// Position of `ch` in the ramp.
    pub fn position(&self, ch: char) -> Option<usize> {
        self.chars.iter().position(|&c| c == ch)
    }
}

impl fmt::Display for CharacterRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.chars {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_chars_collapses_duplicates() {
        assert_eq!(usable_chars("aabca"), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_usable_chars_drops_control_characters() {
        assert_eq!(usable_chars("#\n.\t "), vec!['#', '.', ' ']);
    }

    #[test]
    fn test_empty_ramp_is_rejected() {
        assert!(matches!(CharacterRamp::new(vec![]), Err(RampError::EmptyRamp)));
        assert!(matches!(
            CharacterRamp::from_ordered("\n\n"),
            Err(RampError::EmptyRamp)
        ));
    }

    #[test]
    fn test_ramp_at_clamps() {
        let ramp = CharacterRamp::from_ordered(" .#").unwrap();
        assert_eq!(ramp.at(0), ' ');
        assert_eq!(ramp.at(2), '#');
        assert_eq!(ramp.at(99), '#');
    }

    #[test]
    fn test_ramp_display() {
        let ramp = CharacterRamp::from_ordered(" ░▒▓█").unwrap();
        assert_eq!(ramp.to_string(), " ░▒▓█");
        assert_eq!(ramp.len(), 5);
    }

    #[test]
    fn test_preset_chars() {
        assert_eq!(CharSetPreset::default().chars(), CODE_CHARSET);
        assert_eq!(CharSetPreset::Blocks.chars(), " ░▒▓█");
        assert_eq!(CharSetPreset::Dense.name(), "Dense");
    }
}
