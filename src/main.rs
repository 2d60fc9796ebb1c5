use std::path::PathBuf;

use tagprobe::config::RunConfig;
use tagprobe::error::TnPError;
use tagprobe::histoer::histogrammer::Variable;
use tagprobe::manifest::Fileset;
use tagprobe::util::export::{build_tables, write_tables};
use tagprobe::util::processer::Processor;

fn main() -> Result<(), TnPError> {
    env_logger::init(); // RUST_LOG=info for per-file progress, debug for per-batch

    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::from_yaml(&PathBuf::from(path))?,
        None => {
            let config = RunConfig::default();
            config.validate()?;
            config
        }
    };

    let fileset = Fileset::from_json(&config.manifest, &config.tree_name)?;
    let output_dir = config.output_dir.clone();

    let processor = Processor::new(config);
    let results = processor.run(&fileset)?;

    let mass = results.histogram(Variable::Mass);
    for dataset in fileset.dataset_names() {
        let (integral, mean, stdev) = mass.get(dataset).get_statistics();
        log::info!(
            "{dataset}: {} events, {integral} pairs in mass window, \
             mass mean {mean:.3} GeV, stdev {stdev:.3} GeV",
            results.count(dataset)
        );
    }

    let datasets: Vec<&str> = fileset.dataset_names().collect();
    let tables = build_tables(&results, &datasets)?;
    let paths = write_tables(&tables, &output_dir)?;
    log::info!("Wrote {} tables to {}", paths.len(), output_dir.display());

    Ok(())
}
