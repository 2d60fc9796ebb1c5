use std::error::Error;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum HistogramError {
    AxisMismatch {
        name: String,
        left: (usize, (f64, f64)),
        right: (usize, (f64, f64)),
    },
}

impl Display for HistogramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AxisMismatch { name, left, right } => write!(
                f,
                "Histogram {name} cannot be merged: {} bins over {:?} vs {} bins over {:?}",
                left.0, left.1, right.0, right.1
            ),
        }
    }
}

impl Error for HistogramError {}

/// Weighted histogram over a regular axis.
///
/// `bins` holds the sum of weights and `variances` the sum of squared weights per bin.
/// There are no flow bins: entries outside `range` only show up in the `underflow` and
/// `overflow` tallies.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub name: String,
    pub bins: Vec<f64>,
    pub variances: Vec<f64>,
    pub range: (f64, f64),
    pub overflow: f64,
    pub underflow: f64,
    pub bin_width: f64,
}

impl Histogram {
    // Create a new Histogram with specified min, max, and number of bins
    pub fn new(name: &str, number_of_bins: usize, range: (f64, f64)) -> Self {
        Self {
            name: name.to_string(),
            bins: vec![0.0; number_of_bins],
            variances: vec![0.0; number_of_bins],
            range,
            overflow: 0.0,
            underflow: 0.0,
            bin_width: (range.1 - range.0) / number_of_bins as f64,
        }
    }

    pub fn reset(&mut self) {
        self.bins = vec![0.0; self.bins.len()];
        self.variances = vec![0.0; self.variances.len()];
        self.overflow = 0.0;
        self.underflow = 0.0;
    }

    pub fn number_of_bins(&self) -> usize {
        self.bins.len()
    }

    /// An empty histogram with the same axis.
    pub fn empty_like(&self) -> Self {
        let mut hist = self.clone();
        hist.reset();
        hist
    }

    pub fn same_axis(&self, other: &Self) -> bool {
        self.bins.len() == other.bins.len() && self.range == other.range
    }

    /// Add another histogram bin by bin. Both must share the same axis definition.
    pub fn merge(&mut self, other: &Self) -> Result<(), HistogramError> {
        if !self.same_axis(other) {
            return Err(HistogramError::AxisMismatch {
                name: self.name.clone(),
                left: (self.bins.len(), self.range),
                right: (other.bins.len(), other.range),
            });
        }

        for (bin, value) in self.bins.iter_mut().zip(&other.bins) {
            *bin += value;
        }
        for (variance, value) in self.variances.iter_mut().zip(&other.variances) {
            *variance += value;
        }
        self.overflow += other.overflow;
        self.underflow += other.underflow;

        Ok(())
    }

    pub fn values(&self) -> &[f64] {
        &self.bins
    }
}
