//! A conversion in progress: settings, captured pixels and rendered frames.
//!
//! Capturing is the expensive step, so the [`Project`] keeps the captured
//! [`FrameSequence`] and re-renders from it whenever a cosmetic setting
//! changes. A failed conversion leaves everything from the previous one in
//! place.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;

use crate::ascii::{
    apply_crossfade, CharacterRamp, DensityCalibrator, RampError, RenderedFrame, TonalRenderer,
};
use crate::capture::{
    CaptureError, CaptureStatus, CaptureWalker, CaptureWindow, FrameSequence, VideoSource,
};
use crate::export::{AsciiExport, ExportError, ExportMeta};
use crate::raster::{GlyphRasterizer, Rasterizer};
use crate::settings::{Impact, Settings, SettingsError};
use crate::style::GlyphStyle;

/// Errors from project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Could not build character ramp: {0}")]
    Ramp(#[from] RampError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("No video has been converted yet")]
    NotConverted,
}

/// Loop behaviour of the finished reel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopOptions {
    pub looping: bool,
    /// Frames dissolved across the loop seam; 0 disables the crossfade
    pub crossfade_frames: usize,
}

struct Conversion {
    sequence: FrameSequence,
    ramp: CharacterRamp,
    rendered: Vec<RenderedFrame>,
}

/// Owns one video's conversion state.
pub struct Project<G, R> {
    settings: Settings,
    loop_options: LoopOptions,
    calibrator: DensityCalibrator<G>,
    walker: CaptureWalker<R>,
    renderer: TonalRenderer,
    conversion: Option<Conversion>,
    stale: bool,
}

impl<G: GlyphRasterizer, R: Rasterizer> Project<G, R> {
    pub fn new(settings: Settings, glyphs: G, rasterizer: R) -> Result<Self, ProjectError> {
        settings.validate()?;
        let cols = settings.cols;
        Ok(Self {
            settings,
            loop_options: LoopOptions {
                looping: true,
                crossfade_frames: 0,
            },
            calibrator: DensityCalibrator::new(glyphs),
            walker: CaptureWalker::new(rasterizer, cols),
            renderer: TonalRenderer::new(),
            conversion: None,
            stale: false,
        })
    }

    pub fn with_loop_options(mut self, options: LoopOptions) -> Self {
        self.loop_options = options;
        self
    }

    pub fn with_seek_timeout(mut self, timeout: Duration) -> Self {
        self.walker = self.walker.with_seek_timeout(timeout);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Observe capture progress from another task.
    pub fn subscribe(&self) -> watch::Receiver<CaptureStatus> {
        self.walker.subscribe()
    }

    pub fn sequence(&self) -> Option<&FrameSequence> {
        self.conversion.as_ref().map(|c| &c.sequence)
    }

    pub fn ramp(&self) -> Option<&CharacterRamp> {
        self.conversion.as_ref().map(|c| &c.ramp)
    }

    /// Rendered frames before any crossfade.
    pub fn rendered(&self) -> &[RenderedFrame] {
        self.conversion
            .as_ref()
            .map(|c| c.rendered.as_slice())
            .unwrap_or(&[])
    }

    /// True when settings changed in a way the current frames do not reflect.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Capture `in_point..out_point` of `source` and render it.
    ///
    /// # Returns
    /// The number of frames captured. On error the previous conversion is kept.
    pub async fn convert<S, F>(
        &mut self,
        source: &mut S,
        in_point: f64,
        out_point: f64,
        on_progress: F,
    ) -> Result<usize, ProjectError>
    where
        S: VideoSource,
        F: FnMut(f64),
    {
        self.settings.validate()?;
        let window = CaptureWindow::new(in_point, out_point, self.settings.fps as f64)?;
        let ramp = self.calibrator.calibrate(
            &self.settings.chars,
            &self.settings.font,
            self.settings.font_size,
        )?;

        self.walker.set_cols(self.settings.cols);
        let sequence = self
            .walker
            .run_with_progress(source, &window, on_progress)
            .await?;

        let rendered =
            self.renderer
                .render_sequence(&sequence, &ramp, &self.settings.render_options());
        let count = sequence.len();
        self.conversion = Some(Conversion {
            sequence,
            ramp,
            rendered,
        });
        self.stale = false;
        Ok(count)
    }

    /// Replace the settings, redoing as little work as the change allows.
    ///
    /// Tone changes re-render from the captured pixels immediately; changes
    /// to the grid, rate or character ramp mark the project stale until the
    /// next [`convert`](Project::convert).
    pub fn update_settings(&mut self, settings: Settings) -> Result<Impact, ProjectError> {
        settings.validate()?;
        let impact = self.settings.impact_of(&settings);
        self.settings = settings;

        match impact {
            Impact::Recapture if self.conversion.is_some() => {
                log::info!("Settings change requires a new conversion");
                self.stale = true;
            }
            Impact::Rerender => self.rerender(),
            _ => {}
        }
        Ok(impact)
    }

    fn rerender(&mut self) {
        let options = self.settings.render_options();
        if let Some(conversion) = self.conversion.as_mut() {
            conversion.rendered =
                self.renderer
                    .render_sequence(&conversion.sequence, &conversion.ramp, &options);
            log::debug!("Re-rendered {} frames", conversion.rendered.len());
        }
    }

    /// Glyph style for the current settings.
    pub fn style(&self) -> Result<GlyphStyle, ProjectError> {
        Ok(GlyphStyle::new(&self.settings)?)
    }

    /// Frames as shown and exported: rendered frames with the loop seam
    /// crossfaded.
    pub fn finalize<Rn: Rng + ?Sized>(&self, rng: &mut Rn) -> Vec<RenderedFrame> {
        apply_crossfade(self.rendered(), self.loop_options.crossfade_frames, rng)
    }

    /// Build an export of the finalized frames.
    pub fn export<Rn: Rng + ?Sized>(&self, rng: &mut Rn) -> Result<AsciiExport, ProjectError> {
        let conversion = self.conversion.as_ref().ok_or(ProjectError::NotConverted)?;
        let frames = self.finalize(rng);
        let meta = ExportMeta::new(
            &self.settings,
            conversion.sequence.rows(),
            frames.len(),
            self.loop_options.looping,
            self.loop_options.crossfade_frames,
        );
        Ok(AsciiExport::new(meta, &frames)?)
    }

    /// Export just frame `index` of the finalized frames.
    pub fn export_frame<Rn: Rng + ?Sized>(
        &self,
        index: usize,
        rng: &mut Rn,
    ) -> Result<AsciiExport, ProjectError> {
        let export = self.export(rng)?;
        let frame = export
            .frames
            .get(index)
            .cloned()
            .ok_or(ProjectError::Export(ExportError::NoFrames))?;
        Ok(AsciiExport::single_frame(
            export.meta,
            &RenderedFrame::from_text(frame),
        ))
    }
}
