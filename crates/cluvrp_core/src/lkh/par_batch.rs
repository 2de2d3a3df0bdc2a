//! Batch generation of `.par` run-configuration files over an instance tree.
//!
//! Expects the layout `<instances>/<group>/<name>.cluvrp` and emits one
//! `.par` per instance into the target directory. Paths inside the generated
//! files are written relative to the solver's working directory, which sits
//! one level below the tree root (`../INSTANCES/...`).

use std::{
    fs,
    path::{Path, PathBuf},
};

use rand::{RngCore, SeedableRng, rngs::StdRng};

use crate::{Error, Result, lkh::parameters::RunParameters};

const INSTANCE_EXTENSION: &str = "cluvrp";
const DEFAULT_RUNS: usize = 10;
const DEFAULT_BASE_SEED: u64 = 12_345;

#[derive(Clone, Debug)]
pub struct ParBatchConfig {
    /// Root of the instance tree, one subdirectory per group.
    pub instances_dir: PathBuf,
    /// Directory receiving the generated `.par` files.
    pub par_dir: PathBuf,
    /// `RUNS` value written into every file.
    pub runs: usize,
    /// Base seed; each file gets its own deterministic `SEED` derived from it.
    pub base_seed: u64,
    /// Directory names referenced from inside the generated files.
    pub tours_dir_name: String,
    pub solutions_dir_name: String,
}

impl ParBatchConfig {
    pub fn new(instances_dir: impl Into<PathBuf>, par_dir: impl Into<PathBuf>) -> Self {
        Self {
            instances_dir: instances_dir.into(),
            par_dir: par_dir.into(),
            runs: DEFAULT_RUNS,
            base_seed: DEFAULT_BASE_SEED,
            tours_dir_name: "TOURS".to_string(),
            solutions_dir_name: "SOLUTIONS".to_string(),
        }
    }
}

/// Scans the instance tree and writes one `.par` per discovered instance.
/// Returns the written paths in generation order.
pub fn generate_par_files(config: &ParBatchConfig) -> Result<Vec<PathBuf>> {
    let instances_root_name = config
        .instances_dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            Error::invalid_input(format!(
                "instances dir has no usable name: {}",
                config.instances_dir.display()
            ))
        })?
        .to_string();

    fs::create_dir_all(&config.par_dir)?;

    let mut rng = StdRng::seed_from_u64(config.base_seed);
    let mut written = Vec::new();

    log::info!(
        "par-batch: scanning {} for .{INSTANCE_EXTENSION} instances",
        config.instances_dir.display()
    );

    for group in sorted_dir_entries(&config.instances_dir)? {
        if !group.is_dir() {
            continue;
        }
        let Some(group_name) = group.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        log::info!("par-batch: group {group_name}");

        for file in sorted_dir_entries(&group)? {
            if file.extension().and_then(|ext| ext.to_str()) != Some(INSTANCE_EXTENSION) {
                continue;
            }
            let Some(stem) = file.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let Some(file_name) = file.file_name().and_then(|name| name.to_str()) else {
                continue;
            };

            let params = RunParameters::new(format!(
                "../{instances_root_name}/{group_name}/{file_name}"
            ))
            .with_tour_file(format!(
                "../{}/{group_name}/{stem}.tour",
                config.tours_dir_name
            ))
            .with_output_tour_file(format!(
                "../{}/{group_name}/{stem}.sol",
                config.solutions_dir_name
            ))
            .with_runs(config.runs)
            .with_seed(rng.next_u64());

            let par_path = config.par_dir.join(format!("{stem}.par"));
            params.write_to_file(&par_path)?;
            log::debug!("par-batch: wrote {}", par_path.display());
            written.push(par_path);
        }
    }

    log::info!("par-batch: generated {} file(s)", written.len());
    Ok(written)
}

fn sorted_dir_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| Error::missing_file(dir, e))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .collect();
    entries.sort();
    Ok(entries)
}
