//! Captured pixel frames and the sequences they form.

use std::sync::Arc;

use crate::raster::{ImageView, RasterError, RGBA_CHANNELS};

/// An immutable `cols x rows` RGBA8 buffer sampled from one video frame.
///
/// The buffer is shared, so duplicating a frame (as seek-timeout recovery
/// does) costs a reference count, not a copy. A zero-length frame is a
/// placeholder for a timestamp that could not be captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    cols: u32,
    rows: u32,
    data: Arc<[u8]>,
}

impl PixelFrame {
    /// Wrap an RGBA buffer of exactly `cols * rows` pixels.
    pub fn new(cols: u32, rows: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        ImageView::new(cols, rows, &data)?;
        Ok(Self {
            cols,
            rows,
            data: data.into(),
        })
    }

    /// A zero-length placeholder frame.
    pub fn empty() -> Self {
        Self {
            cols: 0,
            rows: 0,
            data: Arc::from(Vec::new()),
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// RGBA at grid cell (x, y); cells outside the buffer read as transparent black.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.cols || y >= self.rows {
            return [0; 4];
        }
        let idx = (y as usize * self.cols as usize + x as usize) * RGBA_CHANNELS;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// True if both frames share the same underlying buffer.
    pub fn shares_buffer_with(&self, other: &PixelFrame) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// The output of one capture run: frames in timestamp order plus the grid
/// dimensions they all share.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSequence {
    cols: u32,
    rows: u32,
    frames: Vec<PixelFrame>,
}

impl FrameSequence {
    pub fn new(cols: u32, rows: u32, frames: Vec<PixelFrame>) -> Self {
        debug_assert!(frames
            .iter()
            .all(|f| f.is_empty() || (f.cols() == cols && f.rows() == rows)));
        Self { cols, rows, frames }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[PixelFrame] {
        &self.frames
    }

    pub fn get(&self, index: usize) -> Option<&PixelFrame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PixelFrame> {
        self.frames.iter()
    }

    /// Number of zero-length placeholder frames.
    pub fn placeholders(&self) -> usize {
        self.frames.iter().filter(|f| f.is_empty()).count()
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a PixelFrame;
    type IntoIter = std::slice::Iter<'a, PixelFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_frame_checks_length() {
        assert!(PixelFrame::new(2, 2, vec![0; 16]).is_ok());
        assert!(PixelFrame::new(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_empty_frame_reads_transparent() {
        let frame = PixelFrame::empty();
        assert!(frame.is_empty());
        assert_eq!(frame.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_clone_shares_buffer() {
        let frame = PixelFrame::new(1, 1, vec![1, 2, 3, 4]).unwrap();
        let dup = frame.clone();
        assert!(dup.shares_buffer_with(&frame));
        assert_eq!(dup.pixel(0, 0), [1, 2, 3, 4]);
    }

    #[test]
    fn test_sequence_counts_placeholders() {
        let frame = PixelFrame::new(1, 1, vec![0; 4]).unwrap();
        let seq = FrameSequence::new(1, 1, vec![PixelFrame::empty(), frame.clone(), frame]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.placeholders(), 1);
        assert_eq!(seq.cols(), 1);
        assert_eq!(seq.rows(), 1);
    }
}
