//! CLI argument parsing with clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Preset, Resolution, Style};

/// Convert video clips into density-calibrated ASCII frame sequences
#[derive(Parser, Debug)]
#[command(name = "ascii-reel")]
#[command(version, about = "Video to ASCII capture and tone mapping", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Capture a video and export its ASCII frames
    Convert(ConvertArgs),
    /// Play an exported JSON reel in the terminal
    Play {
        /// Export file written by `convert`
        export: PathBuf,
        /// Stop at the last frame even if the export loops
        #[arg(long)]
        no_loop: bool,
    },
    /// Print the density-ordered ramp for a character set and font
    Ramp(RampArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Character set and font selection shared by `convert` and `ramp`.
#[derive(ClapArgs, Debug, Default)]
pub struct GlyphArgs {
    /// Font family to calibrate with
    #[arg(long)]
    pub font: Option<String>,

    /// Font file to register under the selected family
    #[arg(long)]
    pub font_file: Option<PathBuf>,

    /// Font size in pixels
    #[arg(long)]
    pub font_size: Option<f32>,

    /// Candidate characters
    #[arg(long, conflicts_with = "preset")]
    pub chars: Option<String>,

    /// Character set preset
    #[arg(long)]
    pub preset: Option<Preset>,
}

#[derive(ClapArgs, Debug)]
pub struct ConvertArgs {
    /// Input video file
    pub video: PathBuf,

    /// Output file (.json or .ts); defaults to ascii-{cols}col-{fps}fps.json
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Grid width in characters
    #[arg(long, conflicts_with = "resolution")]
    pub cols: Option<u32>,

    /// Named grid width
    #[arg(long)]
    pub resolution: Option<Resolution>,

    /// Capture rate
    #[arg(long)]
    pub fps: Option<u32>,

    /// Start time in seconds
    #[arg(long = "in", default_value = "0")]
    pub in_point: f64,

    /// End time in seconds (default: end of video)
    #[arg(long)]
    pub out_point: Option<f64>,

    #[command(flatten)]
    pub glyphs: GlyphArgs,

    /// Style preset applied before other overrides
    #[arg(long)]
    pub style: Option<Style>,

    #[arg(long)]
    pub gamma: Option<f64>,

    #[arg(long)]
    pub contrast: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub brightness: Option<f64>,

    /// Map bright pixels to sparse characters
    #[arg(long)]
    pub invert: bool,

    /// Frames to dissolve across the loop seam
    #[arg(long)]
    pub crossfade: Option<usize>,

    /// Mark the export as non-looping
    #[arg(long)]
    pub no_loop: bool,

    /// Export only this frame
    #[arg(long)]
    pub frame: Option<usize>,

    /// Seed for the crossfade dissolve
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(ClapArgs, Debug)]
pub struct RampArgs {
    #[command(flatten)]
    pub glyphs: GlyphArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_defaults() {
        let args = Args::parse_from(["ascii-reel", "convert", "clip.mp4"]);
        assert_eq!(args.verbose, 0);
        assert!(args.config.is_none());
        match args.command {
            Command::Convert(c) => {
                assert_eq!(c.video, PathBuf::from("clip.mp4"));
                assert_eq!(c.in_point, 0.0);
                assert!(c.out_point.is_none());
                assert!(c.cols.is_none());
                assert!(c.glyphs.preset.is_none());
                assert!(!c.invert);
                assert!(!c.no_loop);
            }
            _ => panic!("Expected Convert subcommand"),
        }
    }

    #[test]
    fn test_convert_options() {
        let args = Args::parse_from([
            "ascii-reel",
            "-vv",
            "convert",
            "clip.mp4",
            "--cols",
            "120",
            "--fps",
            "24",
            "--in",
            "1.5",
            "--out-point",
            "4",
            "--preset",
            "blocks",
            "--brightness",
            "-0.1",
            "--crossfade",
            "6",
            "-o",
            "out.ts",
        ]);
        assert_eq!(args.verbose, 2);
        match args.command {
            Command::Convert(c) => {
                assert_eq!(c.cols, Some(120));
                assert_eq!(c.fps, Some(24));
                assert_eq!(c.in_point, 1.5);
                assert_eq!(c.out_point, Some(4.0));
                assert_eq!(c.glyphs.preset, Some(Preset::Blocks));
                assert_eq!(c.brightness, Some(-0.1));
                assert_eq!(c.crossfade, Some(6));
                assert_eq!(c.output, Some(PathBuf::from("out.ts")));
            }
            _ => panic!("Expected Convert subcommand"),
        }
    }

    #[test]
    fn test_chars_conflicts_with_preset() {
        let result = Args::try_parse_from([
            "ascii-reel",
            "ramp",
            "--chars",
            "01",
            "--preset",
            "binary",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_play_subcommand() {
        let args = Args::parse_from(["ascii-reel", "play", "reel.json", "--no-loop"]);
        match args.command {
            Command::Play { export, no_loop } => {
                assert_eq!(export, PathBuf::from("reel.json"));
                assert!(no_loop);
            }
            _ => panic!("Expected Play subcommand"),
        }
    }

    #[test]
    fn test_config_subcommands() {
        let args = Args::parse_from(["ascii-reel", "config", "show"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));

        let args = Args::parse_from(["ascii-reel", "config", "init", "-c", "/tmp/r.toml"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Init
            }
        ));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/r.toml")));
    }
}
