use super::histogram1d::Histogram;

impl Histogram {
    // Add a value with unit weight
    pub fn fill(&mut self, value: f64) {
        self.fill_weighted(value, 1.0);
    }

    pub fn fill_weighted(&mut self, value: f64, weight: f64) {
        if let Some(index) = self.get_bin_index(value) {
            self.bins[index] += weight;
            self.variances[index] += weight * weight;
        } else if value >= self.range.1 {
            self.overflow += weight;
        } else if value < self.range.0 {
            self.underflow += weight;
        }
        // NaN lands nowhere
    }
}
