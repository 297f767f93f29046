//! Dimension calculation for aspect-ratio-correct ASCII rendering.

/// Default character cell aspect ratio (height / width).
/// Monospaced character cells are typically ~2x taller than wide, so a grid
/// needs half as many rows as a square-pixel image would.
pub const DEFAULT_CHAR_ASPECT_RATIO: f64 = 2.0;

/// Number of character rows for a `cols`-wide grid over a `width x height`
/// source, compensating for tall character cells.
///
/// `rows = round(cols / (width / height) / 2)`
///
/// Returns 0 for a zero-sized source or zero columns.
///
/// # Example
/// ```ignore
/// // A 640x480 (4:3) source at 80 columns
/// assert_eq!(rows_for(80, 640, 480), 30);
/// ```
pub fn rows_for(cols: u32, width: u32, height: u32) -> u32 {
    rows_for_with_aspect(cols, width, height, DEFAULT_CHAR_ASPECT_RATIO)
}

/// Like [`rows_for`], with an explicit character cell aspect ratio.
pub fn rows_for_with_aspect(cols: u32, width: u32, height: u32, char_aspect: f64) -> u32 {
    if cols == 0 || width == 0 || height == 0 || char_aspect <= 0.0 {
        return 0;
    }
    let source_aspect = width as f64 / height as f64;
    (cols as f64 / source_aspect / char_aspect).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_for_common_aspects() {
        assert_eq!(rows_for(80, 640, 480), 30);
        assert_eq!(rows_for(160, 1920, 1080), 45);
        assert_eq!(rows_for(100, 1000, 1000), 50);
    }

    #[test]
    fn test_rows_for_portrait_source() {
        assert_eq!(rows_for(2, 2, 4), 2);
        assert_eq!(rows_for(40, 1080, 1920), 36); // 35.55...
    }

    #[test]
    fn test_rows_for_half_rounds_up() {
        // 2 / 1 / 2 = 0.5
        assert_eq!(rows_for(2, 2, 1), 1);
    }

    #[test]
    fn test_rows_for_degenerate_inputs() {
        assert_eq!(rows_for(0, 640, 480), 0);
        assert_eq!(rows_for(80, 0, 480), 0);
        assert_eq!(rows_for(80, 640, 0), 0);
    }

    #[test]
    fn test_custom_aspect() {
        assert_eq!(rows_for_with_aspect(80, 640, 480, 1.0), 60);
    }
}
