//! Instance discovery and interactive selection for the evaluation mode.

use std::{
    fs,
    io::BufRead,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

const PROBLEM_EXTENSION: &str = "tsp";
const TOUR_EXTENSION: &str = "sol";
const CLUSTER_EXTENSION: &str = "clu";

/// The file triple belonging to one solved instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstancePaths {
    pub name: String,
    pub problem: PathBuf,
    pub tour: PathBuf,
    pub clusters: PathBuf,
}

impl InstancePaths {
    pub fn for_name(dir: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            problem: dir.join(format!("{name}.{PROBLEM_EXTENSION}")),
            tour: dir.join(format!("{name}.{TOUR_EXTENSION}")),
            clusters: dir.join(format!("{name}.{CLUSTER_EXTENSION}")),
        }
    }
}

/// Lists instances in `dir` that have both a problem file and a solution
/// file, sorted by name. A missing cluster file is tolerated here; it only
/// fails later when the evaluation actually reads it.
pub fn discover_instances(dir: &Path) -> Result<Vec<InstancePaths>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::missing_file(dir, e))?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(PROBLEM_EXTENSION))
        .filter_map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .collect();
    names.sort();

    let instances: Vec<InstancePaths> = names
        .iter()
        .map(|name| InstancePaths::for_name(dir, name))
        .filter(|paths| paths.tour.exists())
        .collect();

    log::debug!(
        "discover: {} instance(s) with solutions under {}",
        instances.len(),
        dir.display()
    );
    Ok(instances)
}

/// Reads one selection line: a 1-based index into the listed instances, or
/// `q` to quit (`None`). Anything else is an invalid-input error; callers
/// print it as a user-facing message.
pub fn prompt_selection(input: &mut impl BufRead, count: usize) -> Result<Option<usize>> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let line = line.trim();

    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(None);
    }

    match line.parse::<usize>() {
        Ok(selection) if (1..=count).contains(&selection) => Ok(Some(selection - 1)),
        _ => Err(Error::invalid_input(format!(
            "Invalid selection '{line}': expected a number between 1 and {count}, or q to quit"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::{InstancePaths, discover_instances, prompt_selection};

    fn unique_temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("cluvrp-tests-{name}-{nanos}"))
    }

    #[test]
    fn for_name_builds_the_file_triple() {
        let paths = InstancePaths::for_name(std::path::Path::new("data"), "eil22");
        assert_eq!(paths.problem, PathBuf::from("data/eil22.tsp"));
        assert_eq!(paths.tour, PathBuf::from("data/eil22.sol"));
        assert_eq!(paths.clusters, PathBuf::from("data/eil22.clu"));
    }

    #[test]
    fn discovery_lists_only_instances_with_solutions() {
        let dir = unique_temp_dir("discover");
        fs::create_dir_all(&dir).expect("create temp dir");
        fs::write(dir.join("a.tsp"), "EOF\n").expect("write problem");
        fs::write(dir.join("a.sol"), "EOF\n").expect("write solution");
        fs::write(dir.join("b.tsp"), "EOF\n").expect("write problem without solution");
        fs::write(dir.join("c.clu"), "EOF\n").expect("write stray cluster file");

        let instances = discover_instances(&dir).expect("discover instances");
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].name, "a");

        fs::remove_dir_all(&dir).expect("cleanup temp dir");
    }

    #[test]
    fn discovery_of_missing_dir_is_an_error() {
        let dir = unique_temp_dir("discover-missing");
        let err = discover_instances(&dir).expect_err("missing dir should fail");
        assert!(err.to_string().contains("cannot read required file"));
    }

    #[test]
    fn selection_accepts_an_index_in_range() {
        let mut input = "2\n".as_bytes();
        let selection = prompt_selection(&mut input, 3).expect("valid selection");
        assert_eq!(selection, Some(1));
    }

    #[test]
    fn selection_accepts_quit() {
        let mut input = "q\n".as_bytes();
        let selection = prompt_selection(&mut input, 3).expect("quit is valid");
        assert_eq!(selection, None);
    }

    #[test]
    fn selection_rejects_out_of_range_and_garbage() {
        let mut input = "7\n".as_bytes();
        assert!(prompt_selection(&mut input, 3).is_err());

        let mut input = "lots\n".as_bytes();
        let err = prompt_selection(&mut input, 3).expect_err("garbage should fail");
        assert!(err.to_string().contains("Invalid selection 'lots'"));
    }
}
