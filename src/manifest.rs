use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ManifestError {
    File(std::io::Error),
    Parser(serde_json::Error),
}

impl From<std::io::Error> for ManifestError {
    fn from(e: std::io::Error) -> Self {
        Self::File(e)
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parser(e)
    }
}

impl Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(x) => {
                write!(f, "Dataset manifest had an error with the input file: {x}")
            }
            Self::Parser(x) => {
                write!(f, "Dataset manifest had an error parsing the JSON: {x}")
            }
        }
    }
}

impl Error for ManifestError {}

// Accepted shapes for one dataset entry:
//   "DY": ["a.parquet", "b.parquet"]
//   "DY": {"files": ["a.parquet"], "treename": "Events"}
//   "DY": {"files": {"a.parquet": "Events"}}
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetEntry {
    Files(Vec<PathBuf>),
    Detailed {
        files: FileList,
        #[serde(default)]
        treename: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileList {
    List(Vec<PathBuf>),
    WithTrees(BTreeMap<PathBuf, String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub tree_name: String,
}

/// Dataset name -> input files, read from the JSON manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fileset {
    datasets: BTreeMap<String, Vec<InputFile>>,
}

impl Fileset {
    pub fn from_json(path: &Path, default_tree: &str) -> Result<Self, ManifestError> {
        let json = std::fs::read_to_string(path)?;
        let fileset = Self::from_json_str(&json, default_tree)?;
        log::info!(
            "Loaded {} datasets ({} files) from {}",
            fileset.datasets.len(),
            fileset.total_files(),
            path.display()
        );
        Ok(fileset)
    }

    pub fn from_json_str(json: &str, default_tree: &str) -> Result<Self, ManifestError> {
        let entries: BTreeMap<String, DatasetEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries, default_tree))
    }

    fn from_entries(entries: BTreeMap<String, DatasetEntry>, default_tree: &str) -> Self {
        let datasets = entries
            .into_iter()
            .map(|(name, entry)| {
                let files = match entry {
                    DatasetEntry::Files(paths) => with_tree(paths, default_tree),
                    DatasetEntry::Detailed { files, treename } => {
                        let tree = treename.as_deref().unwrap_or(default_tree);
                        match files {
                            FileList::List(paths) => with_tree(paths, tree),
                            FileList::WithTrees(map) => map
                                .into_iter()
                                .map(|(path, tree_name)| InputFile { path, tree_name })
                                .collect(),
                        }
                    }
                };
                (name, files)
            })
            .collect();

        Self { datasets }
    }

    pub fn insert(&mut self, dataset: &str, files: Vec<InputFile>) {
        self.datasets.insert(dataset.to_string(), files);
    }

    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[InputFile])> {
        self.datasets
            .iter()
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    pub fn total_files(&self) -> usize {
        self.datasets.values().map(Vec::len).sum()
    }
}

fn with_tree(paths: Vec<PathBuf>, tree: &str) -> Vec<InputFile> {
    paths
        .into_iter()
        .map(|path| InputFile {
            path,
            tree_name: tree.to_string(),
        })
        .collect()
}
