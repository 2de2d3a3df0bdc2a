//! Offline conversion of a capacitated-VRP instance into solver-ready files:
//! a TSP-compatible problem file, a cluster-membership file produced by
//! k-means over the node coordinates, and a minimal run-configuration file.

use std::path::{Path, PathBuf};

use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::Array;

use crate::{
    ClusterAssignment, Error, Instance, Result, RunParameters, TsplibProblem, TsplibProblemType,
};

const DEFAULT_CLUSTER_COUNT: usize = 6;
const DEFAULT_RUNS: usize = 1;
const DEFAULT_TRACE_LEVEL: usize = 1;

#[derive(Clone, Debug)]
pub struct ConvertConfig {
    pub vrp_path: PathBuf,
    /// Where the generated files land. Defaults to the input's directory.
    pub output_dir: Option<PathBuf>,
    pub n_clusters: usize,
    pub runs: usize,
    pub trace_level: usize,
}

impl ConvertConfig {
    pub fn new(vrp_path: impl Into<PathBuf>) -> Self {
        Self {
            vrp_path: vrp_path.into(),
            output_dir: None,
            n_clusters: DEFAULT_CLUSTER_COUNT,
            runs: DEFAULT_RUNS,
            trace_level: DEFAULT_TRACE_LEVEL,
        }
    }
}

/// Paths of the three generated files.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConvertedPaths {
    pub problem: PathBuf,
    pub clusters: PathBuf,
    pub parameters: PathBuf,
}

/// Runs the full conversion pipeline and returns the written paths.
pub fn convert_vrp_instance(config: &ConvertConfig) -> Result<ConvertedPaths> {
    let instance = Instance::from_file(&config.vrp_path)?;
    if instance.is_empty() {
        return Err(Error::invalid_data(format!(
            "no coordinates found in {}",
            config.vrp_path.display()
        )));
    }

    let clusters = cluster_nodes(&instance, config.n_clusters)?;

    let output_dir = match &config.output_dir {
        Some(dir) => dir.clone(),
        None => config
            .vrp_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let stem = instance.name.clone();

    let paths = ConvertedPaths {
        problem: output_dir.join(format!("{stem}.tsp")),
        clusters: output_dir.join(format!("{stem}.clu")),
        parameters: output_dir.join(format!("{stem}.par")),
    };

    TsplibProblem::from_instance(&instance, TsplibProblemType::Cvrp).write_to_file(&paths.problem)?;
    clusters.write_pair_list(&paths.clusters)?;

    // Paths inside the parameter file are relative to the solver's working
    // directory, which is the output directory itself.
    RunParameters::new(format!("{stem}.tsp"))
        .with_output_tour_file(format!("{stem}.sol"))
        .with_runs(config.runs)
        .with_trace_level(config.trace_level)
        .write_to_file(&paths.parameters)?;

    log::info!(
        "convert: n={} clusters={} wrote {} {} {}",
        instance.len(),
        config.n_clusters,
        paths.problem.display(),
        paths.clusters.display(),
        paths.parameters.display()
    );
    Ok(paths)
}

/// Partitions the instance geometrically into `n_clusters` groups with
/// k-means; every node receives exactly one label in `[1, n_clusters]`.
pub(crate) fn cluster_nodes(instance: &Instance, n_clusters: usize) -> Result<ClusterAssignment> {
    if n_clusters == 0 {
        return Err(Error::invalid_input("cluster count must be at least 1"));
    }
    if instance.len() < n_clusters {
        return Err(Error::invalid_input(format!(
            "cannot split {} node(s) into {n_clusters} clusters",
            instance.len()
        )));
    }

    let ids: Vec<usize> = instance.nodes().map(|node| node.id).collect();
    let coords: Vec<f64> = instance
        .nodes()
        .flat_map(|node| [node.x, node.y])
        .collect();
    let observations = Array::from_shape_vec((ids.len(), 2), coords)
        .map_err(|e| Error::other(format!("clustering input: {e}")))?;
    let dataset = Dataset::from(observations);

    let model = KMeans::params(n_clusters)
        .fit(&dataset)
        .map_err(|e| Error::other(format!("k-means failed: {e}")))?;
    let predictions = model.predict(&dataset);

    let mut clusters = ClusterAssignment::default();
    for (idx, label) in predictions.iter().enumerate() {
        clusters.assign(ids[idx], label + 1);
    }
    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::{ConvertConfig, cluster_nodes, convert_vrp_instance};
    use crate::{ClusterAssignment, Instance};

    fn unique_temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("cluvrp-tests-{name}-{nanos}"))
    }

    fn two_blob_instance() -> Instance {
        // Two well-separated blobs so the split is unambiguous.
        Instance::from_text(
            "blobs",
            "NODE_COORD_SECTION\n\
             1 0 0\n2 1 0\n3 0 1\n\
             4 100 100\n5 101 100\n6 100 101\n\
             EOF\n",
        )
    }

    #[test]
    fn every_node_receives_a_label_in_range() {
        let instance = two_blob_instance();
        let clusters = cluster_nodes(&instance, 2).expect("cluster nodes");

        assert_eq!(clusters.len(), instance.len());
        for (_, cluster) in clusters.iter() {
            assert!((1..=2).contains(&cluster));
        }
    }

    #[test]
    fn separated_blobs_end_up_in_different_clusters() {
        let instance = two_blob_instance();
        let clusters = cluster_nodes(&instance, 2).expect("cluster nodes");

        assert_eq!(clusters.cluster_of(1), clusters.cluster_of(2));
        assert_eq!(clusters.cluster_of(1), clusters.cluster_of(3));
        assert_eq!(clusters.cluster_of(4), clusters.cluster_of(5));
        assert_ne!(clusters.cluster_of(1), clusters.cluster_of(4));
    }

    #[test]
    fn more_clusters_than_nodes_is_rejected() {
        let instance = Instance::from_text("tiny", "NODE_COORD_SECTION\n1 0 0\nEOF\n");
        assert!(cluster_nodes(&instance, 2).is_err());
        assert!(cluster_nodes(&instance, 0).is_err());
    }

    #[test]
    fn conversion_writes_the_three_files() {
        let dir = unique_temp_dir("convert");
        fs::create_dir_all(&dir).expect("create temp dir");
        let vrp = dir.join("mini.vrp");
        fs::write(
            &vrp,
            "NAME : mini\nCAPACITY : 50\n\
             NODE_COORD_SECTION\n1 0 0\n2 1 0\n3 100 100\n4 101 100\n\
             DEMAND_SECTION\n1 0\n2 10\n3 10\n4 10\n\
             DEPOT_SECTION\n1\n-1\nEOF\n",
        )
        .expect("write vrp file");

        let config = ConvertConfig {
            n_clusters: 2,
            ..ConvertConfig::new(&vrp)
        };
        let paths = convert_vrp_instance(&config).expect("convert instance");

        let problem_text = fs::read_to_string(&paths.problem).expect("read problem");
        assert!(problem_text.contains("TYPE : CVRP"));
        assert!(problem_text.contains("CAPACITY : 50"));
        assert!(problem_text.contains("NODE_COORD_SECTION"));

        let cluster_text = fs::read_to_string(&paths.clusters).expect("read clusters");
        let clusters = ClusterAssignment::from_text(&cluster_text);
        assert_eq!(clusters.len(), 4);
        assert_eq!(clusters.unique_clusters().len(), 2);

        let par_text = fs::read_to_string(&paths.parameters).expect("read parameters");
        assert!(par_text.contains("PROBLEM_FILE = mini.tsp"));
        assert!(par_text.contains("OUTPUT_TOUR_FILE = mini.sol"));
        assert!(par_text.contains("RUNS = 1"));
        assert!(par_text.contains("TRACE_LEVEL = 1"));

        fs::remove_dir_all(&dir).expect("cleanup temp dir");
    }

    #[test]
    fn conversion_of_a_missing_file_names_the_path() {
        let dir = unique_temp_dir("convert-missing");
        let config = ConvertConfig::new(dir.join("absent.vrp"));

        let err = convert_vrp_instance(&config).expect_err("missing input should fail");
        assert!(err.to_string().contains("absent.vrp"));
    }
}
