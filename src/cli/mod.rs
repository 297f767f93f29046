//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;
mod player;

pub use args::{Args, Command, ConfigAction, ConvertArgs, GlyphArgs, RampArgs};
pub use commands::{
    apply_glyph_args, build_fonts, convert, convert_settings, handle_config_action, ramp, runtime,
    CommandError,
};
pub use enums::{Preset, Resolution, Style};
pub use player::play;
