//! Typed writer for LKH run-configuration (`.par`) files.

use std::{
    fmt::{Display, Formatter},
    fs,
    path::{Path, PathBuf},
};

use crate::{Result, spec_writer::SpecWriter};

/// The run-configuration keys this tool emits.
///
/// `PROBLEM_FILE` is mandatory and always written first; the remaining keys
/// stay alphabetical for stable, testable output.
#[derive(Clone, Debug, PartialEq)]
pub struct RunParameters {
    problem_file: PathBuf,

    pub output_tour_file: Option<PathBuf>,
    pub runs: Option<usize>,
    pub seed: Option<u64>,
    pub tour_file: Option<PathBuf>,
    pub trace_level: Option<usize>,
}

impl RunParameters {
    pub fn new(problem_file: impl Into<PathBuf>) -> Self {
        Self {
            problem_file: problem_file.into(),
            output_tour_file: None,
            runs: None,
            seed: None,
            tour_file: None,
            trace_level: None,
        }
    }

    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = Some(runs);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_trace_level(mut self, trace_level: usize) -> Self {
        self.trace_level = Some(trace_level);
        self
    }

    pub fn with_tour_file(mut self, tour_file: impl Into<PathBuf>) -> Self {
        self.tour_file = Some(tour_file.into());
        self
    }

    pub fn with_output_tour_file(mut self, output_tour_file: impl Into<PathBuf>) -> Self {
        self.output_tour_file = Some(output_tour_file.into());
        self
    }

    pub fn problem_file(&self) -> &Path {
        &self.problem_file
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl Display for RunParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut writer = SpecWriter::new(f);

        writer.kv_eq("PROBLEM_FILE", self.problem_file.display())?;

        writer.opt_path_eq("OUTPUT_TOUR_FILE", self.output_tour_file.as_ref())?;
        writer.opt_kv_eq("RUNS", self.runs)?;
        writer.opt_kv_eq("SEED", self.seed)?;
        writer.opt_path_eq("TOUR_FILE", self.tour_file.as_ref())?;
        writer.opt_kv_eq("TRACE_LEVEL", self.trace_level)?;

        Ok(())
    }
}
