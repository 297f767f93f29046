//! Glyph colour and opacity for drawing rendered frames.
//!
//! Every character gets an opacity from its position in the listed
//! `chars`: the first fades towards `base_alpha`, the last towards
//! `peak_alpha`. The density order the frames were rendered with plays no
//! part, so an export looks the same whatever fonts are installed.
//! Characters below the clip threshold are not drawn at all.

use std::collections::HashMap;
use std::fmt::Write;

use crate::ascii::{usable_chars, RenderedFrame};
use crate::settings::{Settings, SettingsError};

const ANSI_RESET: &str = "\x1b[0m";

/// An opaque 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Parse `#RRGGBB` (case-insensitive).
    pub fn parse(hex: &str) -> Result<Self, SettingsError> {
        let invalid = || SettingsError::InvalidColour(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Source-over composite of `self` at `alpha` onto `background`.
    pub fn over(self, background: Rgb, alpha: f64) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8;
        Rgb {
            r: mix(self.r, background.r),
            g: mix(self.g, background.g),
            b: mix(self.b, background.b),
        }
    }
}

/// Per-character drawing style derived from [`Settings`].
#[derive(Debug, Clone)]
pub struct GlyphStyle {
    colour: Rgb,
    background: Rgb,
    transparent_background: bool,
    peak_alpha: f64,
    // None marks a clipped character
    alphas: HashMap<char, Option<f64>>,
}

impl GlyphStyle {
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        let colour = Rgb::parse(&settings.colour)?;
        let background = Rgb::parse(&settings.background)?;

        let chars = usable_chars(&settings.chars);
        let n = chars.len();
        let mut alphas = HashMap::with_capacity(n);
        for (i, ch) in chars.into_iter().enumerate() {
            let t = if n <= 1 {
                1.0
            } else {
                i as f64 / (n - 1) as f64
            };
            let alpha = if t < settings.clip_threshold {
                None
            } else {
                Some(settings.base_alpha + t * (settings.peak_alpha - settings.base_alpha))
            };
            alphas.insert(ch, alpha);
        }

        Ok(Self {
            colour,
            background,
            transparent_background: settings.transparent_bg,
            peak_alpha: settings.peak_alpha,
            alphas,
        })
    }

    pub fn background(&self) -> Option<Rgb> {
        (!self.transparent_background).then_some(self.background)
    }

    /// Opacity to draw `ch` with, or `None` if it is not drawn.
    ///
    /// Spaces are never drawn. Characters not listed in `chars` use the peak
    /// alpha.
    pub fn alpha_for(&self, ch: char) -> Option<f64> {
        if ch == ' ' {
            return None;
        }
        self.alphas.get(&ch).copied().unwrap_or(Some(self.peak_alpha))
    }

    /// Final on-screen colour of `ch`, composited over the background
    /// (over black when the background is transparent).
    pub fn cell_colour(&self, ch: char) -> Option<Rgb> {
        let backdrop = self.background().unwrap_or(Rgb::BLACK);
        self.alpha_for(ch).map(|a| self.colour.over(backdrop, a))
    }

    /// Paint a frame with 24-bit ANSI escapes, one terminal line per row.
    pub fn paint_ansi(&self, frame: &RenderedFrame) -> String {
        let mut out = String::with_capacity(frame.as_str().len() * 8);
        for (y, line) in frame.lines().enumerate() {
            if y > 0 {
                out.push_str("\r\n");
            }
            if let Some(bg) = self.background() {
                let _ = write!(out, "\x1b[48;2;{};{};{}m", bg.r, bg.g, bg.b);
            }
            let mut last: Option<Rgb> = None;
            for ch in line.chars() {
                match self.cell_colour(ch) {
                    Some(c) => {
                        if last != Some(c) {
                            let _ = write!(out, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b);
                            last = Some(c);
                        }
                        out.push(ch);
                    }
                    None => out.push(' '),
                }
            }
            out.push_str(ANSI_RESET);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(chars: &str, base: f64, peak: f64, clip: f64) -> Settings {
        Settings {
            chars: chars.to_string(),
            base_alpha: base,
            peak_alpha: peak,
            clip_threshold: clip,
            colour: "#FF8000".to_string(),
            background: "#000000".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            Rgb::parse("#C19A4E").unwrap(),
            Rgb {
                r: 0xC1,
                g: 0x9A,
                b: 0x4E
            }
        );
        assert_eq!(Rgb::parse("#ffffff").unwrap(), Rgb { r: 255, g: 255, b: 255 });
        for bad in ["C19A4E", "#C19A4", "#GG0000", "#C19A4E00", "#ÿÿÿ"] {
            assert!(Rgb::parse(bad).is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_over_blends_linearly() {
        let white = Rgb { r: 255, g: 255, b: 255 };
        assert_eq!(white.over(Rgb::BLACK, 1.0), white);
        assert_eq!(white.over(Rgb::BLACK, 0.0), Rgb::BLACK);
        assert_eq!(white.over(Rgb::BLACK, 0.5), Rgb { r: 128, g: 128, b: 128 });
    }

    #[test]
    fn test_alpha_follows_listed_order() {
        // Listed densest first; alphas still rise from first to last
        let style = GlyphStyle::new(&settings("#:.", 0.2, 1.0, 0.0)).unwrap();
        assert_eq!(style.alpha_for('#'), Some(0.2));
        assert!((style.alpha_for(':').unwrap() - 0.6).abs() < 1e-12);
        assert_eq!(style.alpha_for('.'), Some(1.0));
    }

    #[test]
    fn test_alpha_ignores_density_order() {
        let style = GlyphStyle::new(&settings("#. ", 0.1, 0.9, 0.0)).unwrap();
        assert_eq!(style.alpha_for('#'), Some(0.1));
        assert!((style.alpha_for('.').unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(style.alpha_for(' '), None);
    }

    #[test]
    fn test_duplicate_chars_keep_first_position() {
        let style = GlyphStyle::new(&settings(".#.", 0.0, 1.0, 0.0)).unwrap();
        assert_eq!(style.alpha_for('.'), Some(0.0));
        assert_eq!(style.alpha_for('#'), Some(1.0));
    }

    #[test]
    fn test_clip_threshold_hides_leading_chars() {
        let style = GlyphStyle::new(&settings(".:#", 0.2, 1.0, 0.5)).unwrap();
        assert_eq!(style.alpha_for('.'), None);
        assert!(style.alpha_for(':').is_some());
    }

    #[test]
    fn test_single_char_uses_peak() {
        let style = GlyphStyle::new(&settings("#", 0.1, 0.9, 0.95)).unwrap();
        assert_eq!(style.alpha_for('#'), Some(0.9));
    }

    #[test]
    fn test_space_and_unknown_chars() {
        let style = GlyphStyle::new(&settings(" #", 0.1, 0.9, 0.0)).unwrap();
        assert_eq!(style.alpha_for(' '), None);
        assert_eq!(style.alpha_for('@'), Some(0.9));
    }

    #[test]
    fn test_paint_ansi_layout() {
        let style = GlyphStyle::new(&settings(" #", 0.0, 1.0, 0.0)).unwrap();
        let frame = RenderedFrame::from_text("# \n ##");
        let painted = style.paint_ansi(&frame);
        let lines: Vec<&str> = painted.split("\r\n").collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\x1b[48;2;0;0;0m\x1b[38;2;255;128;0m# "));
        // colour escape is not repeated for a run of the same glyph
        assert_eq!(lines[1].matches("\x1b[38;2;").count(), 1);
        assert!(painted.ends_with(ANSI_RESET));
    }

    #[test]
    fn test_transparent_background_omits_backdrop() {
        let mut s = settings("#", 0.0, 1.0, 0.0);
        s.transparent_bg = true;
        let style = GlyphStyle::new(&s).unwrap();
        assert!(style.background().is_none());
        assert!(!style.paint_ansi(&RenderedFrame::from_text("#")).contains("48;2"));
    }
}
