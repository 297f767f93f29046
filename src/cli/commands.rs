//! Subcommand handlers for convert, ramp and config actions.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::args::{ConfigAction, ConvertArgs, GlyphArgs, RampArgs};
use crate::ascii::{CharSetPreset, DensityCalibrator, RampError};
use crate::capture::{FfmpegSource, SourceError, VideoSource};
use crate::config::{self, default_path as get_config_path, Config, ConfigError};
use crate::export::{generate_filename, single_frame_filename, ExportError, ExportFormat};
use crate::project::{LoopOptions, Project, ProjectError};
use crate::raster::{FontRegistry, FontdueRasterizer, RasterError, SoftwareRasterizer};
use crate::settings::{ResolutionPreset, Settings, SettingsError};

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Ramp(#[from] RampError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("Terminal output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Interrupted")]
    Interrupted,
}

/// Single-threaded runtime; the pipeline has one logical thread of control.
pub fn runtime() -> Result<tokio::runtime::Runtime, CommandError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CommandError::Runtime)
}

/// Apply font and character set flags on top of `settings`.
pub fn apply_glyph_args(settings: &mut Settings, glyphs: &GlyphArgs) {
    if let Some(ref font) = glyphs.font {
        settings.font = font.clone();
    }
    if let Some(size) = glyphs.font_size {
        settings.font_size = size;
    }
    if let Some(preset) = glyphs.preset {
        let preset = CharSetPreset::from(preset);
        log::debug!("Using the {} character set", preset.name());
        settings.apply_charset(preset);
    }
    if let Some(ref chars) = glyphs.chars {
        settings.chars = chars.clone();
    }
}

/// Fonts from the config file, plus `--font-file` registered under `family`.
pub fn build_fonts(
    config: &Config,
    glyphs: &GlyphArgs,
    family: &str,
) -> Result<FontRegistry, RasterError> {
    let mut registry = FontRegistry::new();
    config.load_fonts(&mut registry)?;
    if let Some(ref path) = glyphs.font_file {
        registry.register_file(family, path)?;
    }
    if registry.is_empty() {
        log::warn!("No fonts registered; add one with --font-file or a [fonts] config entry");
    }
    Ok(registry)
}

/// Settings for a conversion: config, then presets, then explicit flags.
pub fn convert_settings(args: &ConvertArgs, config: &Config) -> Result<Settings, SettingsError> {
    let mut settings = config.render.clone();
    if let Some(style) = args.style {
        settings.apply_style(style.preset());
    }
    if let Some(resolution) = args.resolution {
        settings.apply_resolution(ResolutionPreset::from(resolution));
    }
    if let Some(cols) = args.cols {
        settings.cols = cols;
    }
    if let Some(fps) = args.fps {
        settings.fps = fps;
    }
    apply_glyph_args(&mut settings, &args.glyphs);
    if let Some(gamma) = args.gamma {
        settings.gamma = gamma;
    }
    if let Some(contrast) = args.contrast {
        settings.contrast = contrast;
    }
    if let Some(brightness) = args.brightness {
        settings.brightness = brightness;
    }
    if args.invert {
        settings.invert_luminance = true;
    }
    settings.validate()?;
    Ok(settings)
}

/// Capture a video and write its export.
///
/// # Returns
/// The path written
pub fn convert(args: ConvertArgs, config: &Config) -> Result<PathBuf, CommandError> {
    let settings = convert_settings(&args, config)?;
    let fonts = build_fonts(config, &args.glyphs, &settings.font)?;

    let loop_options = LoopOptions {
        looping: config.capture.looping && !args.no_loop,
        crossfade_frames: args.crossfade.unwrap_or(config.capture.crossfade_frames),
    };
    let mut project = Project::new(
        settings,
        FontdueRasterizer::new(fonts),
        SoftwareRasterizer::new(),
    )?
    .with_seek_timeout(config.capture.seek_timeout())
    .with_loop_options(loop_options);

    let rt = runtime()?;
    rt.block_on(async {
        let mut source = FfmpegSource::open(&args.video).await?;
        let out_point = args.out_point.unwrap_or_else(|| source.duration());

        let outcome = tokio::select! {
            result = project.convert(&mut source, args.in_point, out_point, |p| {
                eprint!("\rCapturing {:>3.0}%", p * 100.0);
            }) => result.map_err(CommandError::from),
            _ = tokio::signal::ctrl_c() => Err(CommandError::Interrupted),
        };
        eprintln!();
        outcome.map(|_| ())
    })?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let s = project.settings();
    let (export, default_name) = match args.frame {
        Some(index) => (
            project.export_frame(index, &mut rng)?,
            single_frame_filename(index),
        ),
        None => (
            project.export(&mut rng)?,
            generate_filename(s.cols, s.fps, ExportFormat::Json),
        ),
    };

    if let Some(sequence) = project.sequence() {
        let placeholders = sequence.placeholders();
        if placeholders > 0 {
            log::warn!("{} frames are blank placeholders", placeholders);
        }
    }

    let path = args.output.unwrap_or_else(|| PathBuf::from(default_name));
    export.write(&path)?;
    println!(
        "Wrote {} frames ({}x{}) to {}",
        export.frames.len(),
        export.meta.cols,
        export.meta.rows,
        path.display()
    );
    Ok(path)
}

/// Print the calibrated ramp for the selected characters and font.
pub fn ramp(args: RampArgs, config: &Config) -> Result<(), CommandError> {
    let mut settings = config.render.clone();
    apply_glyph_args(&mut settings, &args.glyphs);
    let fonts = build_fonts(config, &args.glyphs, &settings.font)?;

    let mut calibrator = DensityCalibrator::new(FontdueRasterizer::new(fonts));
    let ramp = calibrator.calibrate(&settings.chars, &settings.font, settings.font_size)?;
    println!("{}", ramp);
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), CommandError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&config_path))?;
            if config_path.exists() {
                println!("# Config file: {} (exists)", config_path.display());
            } else {
                println!("# Config file: {} (not found)", config_path.display());
            }
            println!();
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init => {
            config::init(&config_path)?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use crate::cli::Command;
    use clap::Parser;

    fn convert_args(argv: &[&str]) -> ConvertArgs {
        let mut full = vec!["ascii-reel", "convert", "clip.mp4"];
        full.extend_from_slice(argv);
        match Args::parse_from(full).command {
            Command::Convert(c) => c,
            _ => panic!("Expected Convert subcommand"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.render.cols = 120;
        config.render.gamma = 1.8;

        let settings = convert_settings(&convert_args(&["--fps", "24"]), &config).unwrap();
        assert_eq!(settings.cols, 120);
        assert_eq!(settings.fps, 24);
        assert_eq!(settings.gamma, 1.8);

        let settings = convert_settings(&convert_args(&["--cols", "40", "--gamma", "1"]), &config)
            .unwrap();
        assert_eq!(settings.cols, 40);
        assert_eq!(settings.gamma, 1.0);
    }

    #[test]
    fn test_style_then_preset_then_chars() {
        let config = Config::default();
        let settings = convert_settings(
            &convert_args(&["--style", "high-contrast", "--preset", "binary"]),
            &config,
        )
        .unwrap();
        assert_eq!(settings.colour, "#FFFFFF");
        assert_eq!(settings.chars, "01");
        assert_eq!(settings.font, "Courier Prime");
    }

    #[test]
    fn test_resolution_preset() {
        let settings =
            convert_settings(&convert_args(&["--resolution", "high"]), &Config::default()).unwrap();
        assert_eq!(settings.cols, 140);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = convert_settings(&convert_args(&["--cols", "0"]), &Config::default());
        assert!(matches!(result, Err(SettingsError::InvalidColumns)));
    }

    #[test]
    fn test_missing_font_file_errors() {
        let glyphs = GlyphArgs {
            font_file: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..GlyphArgs::default()
        };
        assert!(build_fonts(&Config::default(), &glyphs, "monospace").is_err());
    }

    #[test]
    fn test_config_init_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        handle_config_action(ConfigAction::Init, Some(&path)).unwrap();
        assert!(path.exists());
        assert!(handle_config_action(ConfigAction::Show, Some(&path)).is_ok());
        assert!(matches!(
            handle_config_action(ConfigAction::Init, Some(&path)),
            Err(CommandError::Config(ConfigError::AlreadyExists(_)))
        ));
    }
}
