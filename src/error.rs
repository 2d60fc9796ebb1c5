use super::config::ConfigError;
use super::event::EventError;
use super::histoer::histo1d::histogram1d::HistogramError;
use super::manifest::ManifestError;
use polars::error::PolarsError;
use rayon::ThreadPoolBuildError;
use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum TnPError {
    File(std::io::Error),
    DataFrame(PolarsError),
    Config(ConfigError),
    Manifest(ManifestError),
    Events(EventError),
    Histogram(HistogramError),
    ThreadPool(ThreadPoolBuildError),
}

impl From<std::io::Error> for TnPError {
    fn from(err: std::io::Error) -> Self {
        Self::File(err)
    }
}

impl From<PolarsError> for TnPError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame(err)
    }
}

impl From<ConfigError> for TnPError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ManifestError> for TnPError {
    fn from(err: ManifestError) -> Self {
        Self::Manifest(err)
    }
}

impl From<EventError> for TnPError {
    fn from(err: EventError) -> Self {
        Self::Events(err)
    }
}

impl From<HistogramError> for TnPError {
    fn from(err: HistogramError) -> Self {
        Self::Histogram(err)
    }
}

impl From<ThreadPoolBuildError> for TnPError {
    fn from(err: ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err)
    }
}

impl Display for TnPError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(x) => write!(f, "Run had a file I/O error: {x}"),
            Self::DataFrame(x) => write!(f, "Run had an error using polars: {x}"),
            Self::Config(x) => write!(f, "Run had a configuration error: {x}"),
            Self::Manifest(x) => write!(f, "Run had an error with the manifest: {x}"),
            Self::Events(x) => write!(f, "Run had an error reading events: {x}"),
            Self::Histogram(x) => write!(f, "Run had a histogram error: {x}"),
            Self::ThreadPool(x) => {
                write!(f, "Run was unable to build the worker pool: {x}")
            }
        }
    }
}

impl Error for TnPError {}
