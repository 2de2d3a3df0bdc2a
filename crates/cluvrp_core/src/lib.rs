//! Preparation and evaluation toolkit for clustered vehicle-routing (CluVRP)
//! instances solved with an external LKH-style solver.
//!
//! The crate parses TSPLIB-flavored instance/cluster/tour files, scores tours
//! by the cluster-contiguity penalty, converts capacitated-VRP instances into
//! solver-ready TSP + cluster + parameter files, and renders tours with
//! cluster overlays.

mod convert;
mod error;
mod io;
mod lkh;
pub mod logging;
mod node;
mod render;
mod score;

pub(crate) use lkh::spec_writer;

pub use convert::{ConvertConfig, ConvertedPaths, convert_vrp_instance};
pub use error::{Error, Result};
pub use io::clusters::{ClusterAssignment, ClusterSectionFormat};
pub use io::discover::{InstancePaths, discover_instances, prompt_selection};
pub use io::instance::Instance;
pub use io::options::{AppOptions, LogFormat, LogLevel, RunMode};
pub use io::tour::Tour;
pub use lkh::par_batch::{ParBatchConfig, generate_par_files};
pub use lkh::parameters::RunParameters;
pub use lkh::problem::{DemandEntry, NodeCoord, TsplibProblem, TsplibProblemType};
pub use node::{Node, NodeRole};
pub use render::{RenderConfig, render_solution};
pub use score::{ContiguityReport, PENALTY_PER_BROKEN_CLUSTER, score_contiguity};
