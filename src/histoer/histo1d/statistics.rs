use super::histogram1d::Histogram;

impl Histogram {
    /// Sum of in-range weights.
    pub fn sum(&self) -> f64 {
        self.bins.iter().sum()
    }

    // Weighted integral, mean and standard deviation of the bin centers
    pub fn get_statistics(&self) -> (f64, f64, f64) {
        let centers = self.get_bin_centers();
        let total = self.sum();

        if total == 0.0 {
            return (0.0, 0.0, 0.0);
        }

        let mean = centers
            .iter()
            .zip(&self.bins)
            .map(|(center, count)| center * count)
            .sum::<f64>()
            / total;

        let sum_squared_diff: f64 = centers
            .iter()
            .zip(&self.bins)
            .map(|(center, count)| count * (center - mean).powi(2))
            .sum();

        (total, mean, (sum_squared_diff / total).sqrt())
    }
}
