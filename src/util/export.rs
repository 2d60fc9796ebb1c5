use crate::error::TnPError;
use crate::histoer::histo1d::histogram1d::HistogramError;
use crate::histoer::histo1d::utility::bin_centers;
use crate::histoer::histogrammer::{Histogrammer, Variable};

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Datasets summed together in the output, selected by name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetGroup {
    Data,
    DrellYan,
}

impl DatasetGroup {
    pub const ALL: [Self; 2] = [Self::Data, Self::DrellYan];

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Data => "Data",
            Self::DrellYan => "DY",
        }
    }

    pub fn members<'a>(&self, datasets: &[&'a str]) -> Vec<&'a str> {
        datasets
            .iter()
            .copied()
            .filter(|name| name.starts_with(self.prefix()))
            .collect()
    }
}

/// Bin centers and summed weights of one variable for one dataset group.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub group: DatasetGroup,
    pub variable: Variable,
    pub bin_centers: Vec<f64>,
    pub counts: Vec<f64>,
}

impl ResultTable {
    pub fn file_name(&self) -> String {
        format!("{}_{}.parquet", self.group.prefix(), self.variable.name())
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let prefix = self.group.prefix();
        df!(
            format!("{prefix}_bin_center").as_str() => self.bin_centers.as_slice(),
            format!("{prefix}_count").as_str() => self.counts.as_slice()
        )
    }

    pub fn write_parquet(&self, output_dir: &Path) -> Result<PathBuf, TnPError> {
        let path = output_dir.join(self.file_name());
        let mut df = self.to_dataframe()?;
        let mut output_file = File::create(&path)?;
        ParquetWriter::new(&mut output_file).finish(&mut df)?;
        log::info!(
            "Wrote {} rows of {} to {}",
            df.height(),
            self.variable.label(),
            path.display()
        );
        Ok(path)
    }
}

/// Sum `variable` over the datasets of `group`.
pub fn build_table(
    results: &Histogrammer,
    datasets: &[&str],
    group: DatasetGroup,
    variable: Variable,
) -> Result<ResultTable, HistogramError> {
    let members = group.members(datasets);
    let summed = results
        .histogram(variable)
        .sum_categories(members.iter().copied())?;

    Ok(ResultTable {
        group,
        variable,
        bin_centers: bin_centers(&summed.get_bin_edges()),
        counts: summed.values().to_vec(),
    })
}

/// One table per group and variable.
pub fn build_tables(
    results: &Histogrammer,
    datasets: &[&str],
) -> Result<Vec<ResultTable>, HistogramError> {
    for dataset in datasets {
        if !DatasetGroup::ALL
            .iter()
            .any(|group| dataset.starts_with(group.prefix()))
        {
            log::warn!("Dataset {dataset} belongs to no output group");
        }
    }

    let mut tables = Vec::with_capacity(DatasetGroup::ALL.len() * Variable::ALL.len());
    for group in DatasetGroup::ALL {
        if group.members(datasets).is_empty() {
            log::warn!("No datasets start with {}, writing empty tables", group.prefix());
        }
        for variable in Variable::ALL {
            tables.push(build_table(results, datasets, group, variable)?);
        }
    }
    Ok(tables)
}

pub fn write_tables(tables: &[ResultTable], output_dir: &Path) -> Result<Vec<PathBuf>, TnPError> {
    std::fs::create_dir_all(output_dir)?;
    tables
        .iter()
        .map(|table| table.write_parquet(output_dir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_results() -> Histogrammer {
        let mut results = Histogrammer::default();
        for dataset in ["Data_2018A", "Data_2018B", "DY_M50", "WJets"] {
            results.register_dataset(dataset);
            results.fill(Variable::Mass, dataset, 91.0);
        }
        results
    }

    #[test]
    fn test_group_members() {
        let datasets = ["Data_2018A", "DY_M50", "Data_2018B", "WJets"];
        assert_eq!(
            DatasetGroup::Data.members(&datasets),
            vec!["Data_2018A", "Data_2018B"]
        );
        assert_eq!(DatasetGroup::DrellYan.members(&datasets), vec!["DY_M50"]);
    }

    #[test]
    fn test_tables_sum_group_members() {
        let results = sample_results();
        let datasets: Vec<&str> = results.datasets().collect();
        let tables = build_tables(&results, &datasets).unwrap();
        assert_eq!(tables.len(), 10);

        let data_mass = &tables[0];
        assert_eq!(data_mass.group, DatasetGroup::Data);
        assert_eq!(data_mass.variable, Variable::Mass);
        assert_eq!(data_mass.counts.iter().sum::<f64>(), 2.0);
        assert_eq!(data_mass.bin_centers.len(), 100);
        assert!((data_mass.bin_centers[0] - 60.3).abs() < 1e-9);

        let dy_mass = &tables[5];
        assert_eq!(dy_mass.group, DatasetGroup::DrellYan);
        assert_eq!(dy_mass.counts.iter().sum::<f64>(), 1.0);
        assert_eq!(dy_mass.file_name(), "DY_mass.parquet");
    }

    #[test]
    fn test_empty_group_gives_zero_table() {
        let results = sample_results();
        let table = build_table(&results, &["DY_M50"], DatasetGroup::Data, Variable::PtLead)
            .unwrap();
        assert_eq!(table.counts.len(), 100);
        assert_eq!(table.bin_centers.len(), 100);
        assert!(table.counts.iter().all(|c| *c == 0.0));
        assert!((table.bin_centers[0] - 30.3).abs() < 1e-9);
    }

    #[test]
    fn test_write_tables() {
        let dir = std::env::temp_dir().join(format!("tagprobe_export_{}", std::process::id()));
        let results = sample_results();
        let datasets: Vec<&str> = results.datasets().collect();
        let tables = build_tables(&results, &datasets).unwrap();
        let paths = write_tables(&tables, &dir).unwrap();
        assert_eq!(paths.len(), 10);

        let file = File::open(dir.join("Data_mass.parquet")).unwrap();
        let df = ParquetReader::new(file).finish().unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(df.height(), 100);
        let counts = df.column("Data_count").unwrap();
        let counts = counts.as_materialized_series().f64().unwrap();
        assert_eq!(counts.sum(), Some(2.0));
        let centers = df.column("Data_bin_center").unwrap();
        let centers = centers.as_materialized_series().f64().unwrap();
        assert!((centers.get(0).unwrap() - 60.3).abs() < 1e-9);
    }
}
