//! Gamma decode lookup table.

/// Display gamma used when nothing else is configured (sRGB-ish).
pub const DEFAULT_GAMMA: f64 = 2.2;

/// 256-entry decode table: `table[i] = (i / 255) ^ gamma`.
///
/// Maps a stored 8-bit channel value to linear light in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct GammaTable {
    gamma: f64,
    lut: [f64; 256],
}

impl GammaTable {
    pub fn new(gamma: f64) -> Self {
        let mut lut = [0f64; 256];
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = (i as f64 / 255.0).powf(gamma);
        }
        Self { gamma, lut }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Linearize one channel sample.
    #[inline]
    pub fn decode(&self, value: u8) -> f64 {
        self.lut[value as usize]
    }

    pub fn as_slice(&self) -> &[f64; 256] {
        &self.lut
    }
}

/// Single-slot cache: holds the table for the most recently requested gamma.
#[derive(Debug, Clone, Default)]
pub struct GammaCache {
    slot: Option<GammaTable>,
}

impl GammaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for `gamma`, rebuilding only when it differs from the cached one.
    pub fn get(&mut self, gamma: f64) -> &GammaTable {
        if !matches!(&self.slot, Some(table) if table.gamma == gamma) {
            log::debug!("Building gamma table for gamma {}", gamma);
            self.slot = Some(GammaTable::new(gamma));
        }
        self.slot.get_or_insert_with(|| GammaTable::new(gamma))
    }

    pub fn cached_gamma(&self) -> Option<f64> {
        self.slot.as_ref().map(|t| t.gamma)
    }
}
