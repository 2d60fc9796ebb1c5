use crate::analysis::selection::Selector;
use crate::config::RunConfig;
use crate::error::TnPError;
use crate::event::EventFile;
use crate::histoer::histogrammer::Histogrammer;
use crate::manifest::{Fileset, InputFile};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

/// One file of one dataset.
#[derive(Debug, Clone)]
struct WorkUnit<'a> {
    dataset: &'a str,
    file: &'a InputFile,
}

/// Runs the selection over every file of a fileset on a fixed-size worker pool and
/// merges the partial results.
pub struct Processor {
    pub config: RunConfig,
    pub selector: Selector,
}

impl Processor {
    pub fn new(config: RunConfig) -> Self {
        let selector = Selector::new(config.cuts.clone());
        Self { config, selector }
    }

    pub fn run(&self, fileset: &Fileset) -> Result<Histogrammer, TnPError> {
        let start = Instant::now();

        let units: Vec<WorkUnit<'_>> = fileset
            .iter()
            .flat_map(|(dataset, files)| files.iter().map(move |file| WorkUnit { dataset, file }))
            .collect();

        log::info!(
            "Processing {} files from {} datasets with {} workers",
            units.len(),
            fileset.dataset_names().count(),
            self.config.workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()?;

        let progress = ProgressBar::new(units.len() as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40} {pos}/{len} files [{elapsed_precise}] {msg}")
        {
            progress.set_style(style);
        }

        let merged = pool.install(|| {
            units
                .par_iter()
                .map(|unit| {
                    let result = self.process_unit(unit);
                    progress.inc(1);
                    result
                })
                .try_reduce(Histogrammer::default, |mut left, right| {
                    left.merge(&right)?;
                    Ok(left)
                })
        });
        progress.finish_and_clear();
        let mut output = merged?;

        // Datasets without files still show up, with nothing in them
        for dataset in fileset.dataset_names() {
            output.register_dataset(dataset);
        }

        log::info!("Processed all files in {:?}", start.elapsed());
        Ok(output)
    }

    fn process_unit(&self, unit: &WorkUnit<'_>) -> Result<Histogrammer, TnPError> {
        let start = Instant::now();
        log::debug!(
            "Opening {} (tree {}) for {}",
            unit.file.path.display(),
            unit.file.tree_name,
            unit.dataset
        );

        let events = EventFile::open(&unit.file.path, &self.config.schema)?;
        let mut output = Histogrammer::default();
        output.register_dataset(unit.dataset);

        for batch in events.batches(self.config.chunk_size) {
            let partial = self.selector.process(&batch?, unit.dataset);
            output.merge(&partial)?;
        }

        log::info!(
            "{}: {} events from {} in {:?}",
            unit.dataset,
            events.number_of_events(),
            unit.file.path.display(),
            start.elapsed()
        );

        Ok(output)
    }
}
