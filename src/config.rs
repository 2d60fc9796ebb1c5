use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    File(std::io::Error),
    Parser(serde_yaml::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::File(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parser(e)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(x) => write!(f, "Config had an error reading the file: {x}"),
            Self::Parser(x) => write!(f, "Config had an error parsing the YAML: {x}"),
            Self::Invalid(x) => write!(f, "Config is invalid: {x}"),
        }
    }
}

impl Error for ConfigError {}

/// Thresholds of the dielectron selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionCuts {
    pub tag_cut_based: i32,
    pub barrel_eta_max: f64,
    pub endcap_eta_min: f64,
    pub endcap_eta_max: f64,
    pub tag_pt_min: f64, // GeV
}

impl Default for SelectionCuts {
    fn default() -> Self {
        Self {
            tag_cut_based: 4,
            barrel_eta_max: 1.4442,
            endcap_eta_min: 1.566,
            endcap_eta_max: 2.1,
            tag_pt_min: 35.0,
        }
    }
}

/// Column names of the flattened event files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSchema {
    pub trigger: String,
    pub electron_prefix: String,
}

impl Default for EventSchema {
    fn default() -> Self {
        Self {
            trigger: "HLT_Ele32_WPTight_Gsf".to_string(),
            electron_prefix: "Electron".to_string(),
        }
    }
}

impl EventSchema {
    pub fn electron_field(&self, field: &str) -> String {
        format!("{}_{}", self.electron_prefix, field)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub manifest: PathBuf,
    pub output_dir: PathBuf,
    pub workers: usize,
    pub chunk_size: usize,
    pub tree_name: String,
    pub schema: EventSchema,
    pub cuts: SelectionCuts,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("configs/TnP_2018.json"),
            output_dir: PathBuf::from("parquet"),
            workers: 10,
            chunk_size: 100_000,
            tree_name: "Events".to_string(),
            schema: EventSchema::default(),
            cuts: SelectionCuts::default(),
        }
    }
}

impl RunConfig {
    pub fn from_yaml(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: RunConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        log::info!("Loaded run configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
