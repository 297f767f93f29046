//! Tone mapping from pixel frames to character grids.
//!
//! This module turns captured pixel data into text:
//!
//! 1. **Density calibration** - order a character set by measured ink coverage
//! 2. **Gamma decode** - linearize 8-bit channels through a lookup table
//! 3. **Tone mapping** - BT.709 luminance, contrast/brightness, perceptual re-encode
//! 4. **Crossfade** - dissolve the loop seam of a finished sequence
//!
//! # Character Sets
//!
//! Presets are available via [`CharSetPreset`]. A preset only picks the
//! characters; [`DensityCalibrator`] decides their order for a given font.

mod charset;
mod crossfade;
mod density;
mod dimensions;
mod gamma;
mod mapping;

pub use charset::{
    usable_chars, CharSetPreset, CharacterRamp, RampError, BINARY_CHARSET, BLOCKS_CHARSET,
    CLASSIC_CHARSET, CODE_CHARSET, DENSE_CHARSET, MINIMAL_CHARSET,
};
pub use crossfade::{apply_crossfade, blend_weight};
pub use density::DensityCalibrator;
pub use dimensions::{rows_for, rows_for_with_aspect, DEFAULT_CHAR_ASPECT_RATIO};
pub use gamma::{GammaCache, GammaTable, DEFAULT_GAMMA};
pub use mapping::{
    luminance, tone_index, RenderOptions, RenderOptionsError, RenderedFrame, TonalRenderer,
    BT709_WEIGHTS,
};
