use super::histogram1d::Histogram;

impl Histogram {
    pub fn get_bin_edges(&self) -> Vec<f64> {
        (0..=self.bins.len())
            .map(|i| self.range.0 + i as f64 * self.bin_width)
            .collect()
    }

    pub fn get_bin_centers(&self) -> Vec<f64> {
        bin_centers(&self.get_bin_edges())
    }

    /// Index of the bin holding `x`, or `None` outside `[min, max)` (and for NaN).
    pub fn get_bin_index(&self, x: f64) -> Option<usize> {
        if !(x >= self.range.0 && x < self.range.1) {
            return None;
        }

        let scaled = (x - self.range.0) / (self.range.1 - self.range.0);
        let bin_index = (scaled * self.bins.len() as f64).floor() as usize;

        Some(bin_index.min(self.bins.len() - 1))
    }
}

/// Midpoints of consecutive edges.
pub fn bin_centers(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}
