use super::categorized::CategoryHistogram;
use super::histo1d::histogram1d::HistogramError;
use std::collections::BTreeMap;

/// The five dielectron observables that get histogrammed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    Mass,
    PtLead,
    PtSublead,
    EtaLead,
    EtaSublead,
}

impl Variable {
    pub const ALL: [Self; 5] = [
        Self::Mass,
        Self::PtLead,
        Self::PtSublead,
        Self::EtaLead,
        Self::EtaSublead,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mass => "mass",
            Self::PtLead => "pt_lead",
            Self::PtSublead => "pt_sublead",
            Self::EtaLead => "eta_lead",
            Self::EtaSublead => "eta_sublead",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mass => "m_ee [GeV]",
            Self::PtLead => "p_T lead [GeV]",
            Self::PtSublead => "p_T sublead [GeV]",
            Self::EtaLead => "eta lead",
            Self::EtaSublead => "eta sublead",
        }
    }

    /// Number of bins and range of the regular axis.
    pub fn axis(&self) -> (usize, (f64, f64)) {
        match self {
            Self::Mass => (100, (60.0, 120.0)),
            Self::PtLead | Self::PtSublead => (100, (30.0, 90.0)),
            Self::EtaLead | Self::EtaSublead => (100, (-2.5, 2.5)),
        }
    }

    pub fn new_histogram(&self) -> CategoryHistogram {
        let (bins, range) = self.axis();
        CategoryHistogram::new(self.name(), bins, range)
    }
}

/// Accumulated output of the selection: number of events seen per dataset plus one
/// dataset-categorised histogram per [`Variable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Histogrammer {
    pub counts: BTreeMap<String, u64>,
    histograms: BTreeMap<Variable, CategoryHistogram>,
}

impl Default for Histogrammer {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            histograms: Variable::ALL
                .iter()
                .map(|variable| (*variable, variable.new_histogram()))
                .collect(),
        }
    }
}

impl Histogrammer {
    /// Make `dataset` known to the counts and to every histogram, with no entries.
    pub fn register_dataset(&mut self, dataset: &str) {
        self.counts.entry(dataset.to_string()).or_insert(0);
        for hist in self.histograms.values_mut() {
            hist.category_mut(dataset);
        }
    }

    pub fn add_count(&mut self, dataset: &str, events: u64) {
        *self.counts.entry(dataset.to_string()).or_insert(0) += events;
    }

    pub fn count(&self, dataset: &str) -> u64 {
        self.counts.get(dataset).copied().unwrap_or(0)
    }

    pub fn datasets(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn fill(&mut self, variable: Variable, dataset: &str, value: f64) {
        self.histogram_mut(variable).fill(dataset, value);
    }

    pub fn histogram(&self, variable: Variable) -> &CategoryHistogram {
        // Every variable is inserted by Default and never removed
        &self.histograms[&variable]
    }

    fn histogram_mut(&mut self, variable: Variable) -> &mut CategoryHistogram {
        self.histograms
            .entry(variable)
            .or_insert_with(|| variable.new_histogram())
    }

    /// Add another result into this one. Counts and histograms are summed per dataset.
    pub fn merge(&mut self, other: &Self) -> Result<(), HistogramError> {
        for (dataset, events) in &other.counts {
            self.add_count(dataset, *events);
        }
        for (variable, hist) in &other.histograms {
            self.histogram_mut(*variable).merge(hist)?;
        }
        Ok(())
    }
}
