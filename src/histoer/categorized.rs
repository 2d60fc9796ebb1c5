use super::histo1d::histogram1d::{Histogram, HistogramError};
use std::collections::BTreeMap;

/// A growable string category axis (the dataset label) crossed with one regular axis.
///
/// Every category shares the axis of `template`. Asking for a category that was never
/// filled gives back an empty histogram of the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryHistogram {
    pub name: String,
    template: Histogram,
    categories: BTreeMap<String, Histogram>,
}

impl CategoryHistogram {
    pub fn new(name: &str, bins: usize, range: (f64, f64)) -> Self {
        Self {
            name: name.to_string(),
            template: Histogram::new(name, bins, range),
            categories: BTreeMap::new(),
        }
    }

    pub fn axis(&self) -> &Histogram {
        &self.template
    }

    /// Histogram for `category`, growing the axis if needed.
    pub fn category_mut(&mut self, category: &str) -> &mut Histogram {
        self.categories
            .entry(category.to_string())
            .or_insert_with(|| self.template.empty_like())
    }

    pub fn fill(&mut self, category: &str, value: f64) {
        self.category_mut(category).fill(value);
    }

    pub fn get(&self, category: &str) -> Histogram {
        self.categories
            .get(category)
            .cloned()
            .unwrap_or_else(|| self.template.empty_like())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Sum the histograms of the given categories. Unknown categories add nothing and an
    /// empty selection yields an empty histogram.
    pub fn sum_categories<'a, I>(&self, categories: I) -> Result<Histogram, HistogramError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut total = self.template.empty_like();
        for category in categories {
            if let Some(hist) = self.categories.get(category) {
                total.merge(hist)?;
            }
        }
        Ok(total)
    }

    pub fn merge(&mut self, other: &Self) -> Result<(), HistogramError> {
        let (axis, other_axis) = (self.axis(), other.axis());
        if !axis.same_axis(other_axis) {
            return Err(HistogramError::AxisMismatch {
                name: self.name.clone(),
                left: (axis.number_of_bins(), axis.range),
                right: (other_axis.number_of_bins(), other_axis.range),
            });
        }

        for (category, hist) in &other.categories {
            self.category_mut(category).merge(hist)?;
        }
        Ok(())
    }
}
