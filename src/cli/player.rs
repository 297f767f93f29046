//! Terminal playback of exported reels.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;

use super::commands::{runtime, CommandError};
use crate::ascii::RenderedFrame;
use crate::export::{AsciiExport, ExportError};
use crate::playback::PlaybackScheduler;
use crate::style::GlyphStyle;

/// How often the scheduler is polled.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Global flag for handling Ctrl+C during playback
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Hides the cursor while alive and restores the terminal on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> std::io::Result<Self> {
        let mut out = std::io::stdout();
        write!(out, "\x1b[?25l\x1b[2J")?;
        out.flush()?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = std::io::stdout();
        let _ = write!(out, "\x1b[0m\x1b[?25h\r\n");
        let _ = out.flush();
    }
}

/// Play a JSON export in the terminal until it ends or Ctrl+C is pressed.
pub fn play(path: &Path, no_loop: bool) -> Result<(), CommandError> {
    let export = AsciiExport::load_json(path)?;
    if export.frames.is_empty() {
        return Err(ExportError::NoFrames.into());
    }

    let style = GlyphStyle::new(&export.meta.to_settings())?;
    let looping = export.meta.looping && !no_loop;

    ctrlc::set_handler(|| CTRLC_RECEIVED.store(true, Ordering::SeqCst))?;

    let frames: Vec<String> = export
        .frames
        .iter()
        .map(|f| style.paint_ansi(&RenderedFrame::from_text(f.as_str())))
        .collect();
    log::info!(
        "Playing {} frames at {} fps{}",
        frames.len(),
        export.meta.fps,
        if looping { " (looping)" } else { "" }
    );

    let rt = runtime()?;
    rt.block_on(run_player(&frames, export.meta.fps as f64, looping))
}

async fn run_player(frames: &[String], fps: f64, looping: bool) -> Result<(), CommandError> {
    let mut scheduler = PlaybackScheduler::new(frames.len(), fps, looping);
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let _guard = TerminalGuard::enter()?;
    let start = Instant::now();
    let mut out = std::io::stdout();

    loop {
        ticker.tick().await;
        if CTRLC_RECEIVED.load(Ordering::SeqCst) {
            return Ok(());
        }

        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        if let Some(selection) = scheduler.tick(now_ms) {
            write!(out, "\x1b[H{}", frames[selection.index])?;
            out.flush()?;
            if selection.stopped {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportMeta;
    use crate::settings::Settings;

    fn write_export(dir: &Path, fps: u32, frames: &[&str]) -> std::path::PathBuf {
        let settings = Settings {
            fps,
            ..Settings::default()
        };
        let rendered: Vec<RenderedFrame> =
            frames.iter().map(|f| RenderedFrame::from_text(*f)).collect();
        let meta = ExportMeta::new(&settings, 1, rendered.len(), true, 0);
        let export = AsciiExport {
            meta,
            frames: frames.iter().map(|f| f.to_string()).collect(),
        };
        let path = dir.join("reel.json");
        std::fs::write(&path, export.to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_play_rejects_zero_fps() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(dir.path(), 0, &["#"]);
        assert!(matches!(
            play(&path, true),
            Err(CommandError::Export(ExportError::InvalidFps { .. }))
        ));
    }

    #[test]
    fn test_play_rejects_empty_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(dir.path(), 10, &[]);
        assert!(matches!(
            play(&path, true),
            Err(CommandError::Export(ExportError::NoFrames))
        ));
    }
}
