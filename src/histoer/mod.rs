pub mod categorized;
pub mod histo1d;
pub mod histogrammer;
