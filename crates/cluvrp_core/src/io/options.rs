//! Hand-rolled CLI option parsing: `--flag`, `--flag=value`, `--flag value`,
//! plus a single optional positional instance name.

use std::{
    env,
    path::{Path, PathBuf},
};

use log::LevelFilter;

use crate::{Error, Result};

const DEFAULT_CLUSTER_COUNT: usize = 6;
const DEFAULT_BASE_SEED: u64 = 12_345;
const DEFAULT_TRACE_LEVEL: usize = 1;
const DEFAULT_EVAL_INSTANCES_DIR: &str = ".";
const DEFAULT_GEN_PARS_INSTANCES_DIR: &str = "INSTANCES";

/// Which pipeline the binary runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunMode {
    /// Score and render a solved instance.
    Eval,
    /// Convert a `.vrp` into `.tsp` + `.clu` + `.par`.
    Convert,
    /// Batch-generate `.par` files over an instance tree.
    GenPars,
}

impl RunMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "eval" => Ok(Self::Eval),
            "convert" => Ok(Self::Convert),
            "gen-pars" => Ok(Self::GenPars),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --mode: {value} (expected eval|convert|gen-pars)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --log-level: {value} (expected error|warn|info|debug|trace|off)"
            ))),
        }
    }

    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --log-format: {value} (expected compact|pretty)"
            ))),
        }
    }
}

/// Runtime options for all three run modes.
#[derive(Clone, Debug)]
pub struct AppOptions {
    pub mode: RunMode,
    /// Positional instance name (eval) or `.vrp` path (convert).
    pub instance: Option<String>,
    /// Directory holding paired `.tsp`/`.sol`/`.clu` files (eval) or the
    /// grouped `.cluvrp` tree (gen-pars); defaults differ per mode, so
    /// unset stays `None`. See [`Self::instances_root`].
    pub instances_dir: Option<PathBuf>,
    /// Target directory for generated `.par` files.
    pub par_dir: PathBuf,
    /// Target directory for converter output. Empty means alongside the input.
    pub output_dir: String,
    /// Optional output path for the rendered image. Empty means `<name>.png`.
    pub output: String,
    pub clusters: usize,
    /// `RUNS` value for generated files; defaults differ per mode (1 for
    /// convert, 10 for gen-pars), so unset stays `None`.
    pub runs: Option<usize>,
    pub seed: u64,
    pub trace_level: usize,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub log_timestamp: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            mode: RunMode::Eval,
            instance: None,
            instances_dir: None,
            par_dir: PathBuf::from("par_files"),
            output_dir: String::new(),
            output: String::new(),
            clusters: DEFAULT_CLUSTER_COUNT,
            runs: None,
            seed: DEFAULT_BASE_SEED,
            trace_level: DEFAULT_TRACE_LEVEL,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
        }
    }
}

impl AppOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter().map(|arg| arg.as_ref().to_owned());

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                if options.instance.is_some() {
                    return Err(Error::invalid_input(format!(
                        "Unexpected extra argument: {arg}\n\n{}",
                        Self::usage()
                    )));
                }
                options.instance = Some(arg);
                continue;
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = match raw_name.split_once('=') {
                Some((name, value)) => (name.to_string(), Some(value.to_string())),
                None => (raw_name.to_string(), None),
            };

            match name.as_str() {
                "mode" => options.mode = RunMode::parse(&require(&name, value, &mut args)?)?,
                "instances-dir" => {
                    options.instances_dir =
                        Some(PathBuf::from(require(&name, value, &mut args)?));
                }
                "par-dir" => options.par_dir = PathBuf::from(require(&name, value, &mut args)?),
                "output-dir" => options.output_dir = require(&name, value, &mut args)?,
                "output" => options.output = require(&name, value, &mut args)?,
                "clusters" => {
                    options.clusters = parse_usize(&name, &require(&name, value, &mut args)?)?;
                }
                "runs" => {
                    options.runs = Some(parse_usize(&name, &require(&name, value, &mut args)?)?);
                }
                "seed" => options.seed = parse_u64(&name, &require(&name, value, &mut args)?)?,
                "trace-level" => {
                    options.trace_level = parse_usize(&name, &require(&name, value, &mut args)?)?;
                }
                "log-level" => {
                    options.log_level = LogLevel::parse(&require(&name, value, &mut args)?)?;
                }
                "log-format" => {
                    options.log_format = LogFormat::parse(&require(&name, value, &mut args)?)?;
                }
                "log-timestamp" => {
                    options.log_timestamp = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  cluvrp-prep [options]                 # list instances and prompt\n",
            "  cluvrp-prep [options] <instance>      # evaluate one instance\n",
            "  cluvrp-prep --mode convert <file.vrp> # generate .tsp/.clu/.par\n",
            "  cluvrp-prep --mode gen-pars           # batch-generate .par files\n\n",
            "Options:\n",
            "  --mode <eval|convert|gen-pars>\n",
            "  --instances-dir <path>\n",
            "  --par-dir <path>\n",
            "  --output-dir <path>\n",
            "  --output <path>\n",
            "  --clusters <usize>\n",
            "  --runs <usize>\n",
            "  --seed <u64>\n",
            "  --trace-level <usize>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  cluvrp-prep eil22\n",
            "  cluvrp-prep --instances-dir data --output eil22.png eil22\n",
            "  cluvrp-prep --mode convert --clusters 6 eil22.vrp\n",
            "  cluvrp-prep --mode gen-pars --instances-dir INSTANCES --runs 10\n",
        )
    }

    /// `--instances-dir` with the per-mode default applied: eval scans the
    /// working directory, gen-pars expects the grouped `INSTANCES` tree next
    /// to it. The gen-pars default must carry a real directory name because
    /// it ends up inside the generated `../<name>/...` paths.
    pub fn instances_root(&self) -> PathBuf {
        match &self.instances_dir {
            Some(dir) => dir.clone(),
            None => match self.mode {
                RunMode::GenPars => PathBuf::from(DEFAULT_GEN_PARS_INSTANCES_DIR),
                RunMode::Eval | RunMode::Convert => PathBuf::from(DEFAULT_EVAL_INSTANCES_DIR),
            },
        }
    }

    pub fn output_path(&self) -> Option<&Path> {
        let output = self.output.trim();
        if output.is_empty() || output == "-" {
            None
        } else {
            Some(Path::new(output))
        }
    }

    pub fn output_dir_path(&self) -> Option<&Path> {
        let output_dir = self.output_dir.trim();
        if output_dir.is_empty() {
            None
        } else {
            Some(Path::new(output_dir))
        }
    }
}

fn require<I>(name: &str, inline: Option<String>, args: &mut I) -> Result<String>
where
    I: Iterator<Item = String>,
{
    inline
        .or_else(|| args.next())
        .ok_or_else(|| Error::invalid_input(format!("Missing value for --{name}")))
}

fn parse_usize(name: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| Error::invalid_input(format!("Invalid integer for --{name}: {value}")))
}

fn parse_u64(name: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::invalid_input(format!("Invalid integer for --{name}: {value}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}
