//! Typed writer for the TSPLIB problem files handed to the solver.

use std::{
    fmt::{Display, Formatter},
    fs,
    path::Path,
};

use crate::{Instance, Result, spec_writer::SpecWriter};

const SECTION_END_MARKER: isize = -1;

/// TSPLIB `TYPE` values emitted by this tool.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TsplibProblemType {
    Tsp,
    Cvrp,
}

impl Display for TsplibProblemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tsp => write!(f, "TSP"),
            Self::Cvrp => write!(f, "CVRP"),
        }
    }
}

/// Entry in `NODE_COORD_SECTION`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeCoord {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl Display for NodeCoord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.id, self.x, self.y)
    }
}

/// Entry in `DEMAND_SECTION`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DemandEntry {
    pub id: usize,
    pub demand: i64,
}

impl Display for DemandEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.id, self.demand)
    }
}

/// The subset of the TSPLIB problem model this tool generates.
#[derive(Clone, Debug, PartialEq)]
pub struct TsplibProblem {
    pub name: String,
    pub problem_type: TsplibProblemType,
    pub comment_lines: Vec<String>,
    pub dimension: Option<usize>,
    pub capacity: Option<i64>,
    pub node_coord_section: Vec<NodeCoord>,
    pub demand_section: Vec<DemandEntry>,
    pub depot_section: Vec<usize>,
}

impl TsplibProblem {
    pub fn new(name: impl Into<String>, problem_type: TsplibProblemType) -> Self {
        Self {
            name: name.into(),
            problem_type,
            comment_lines: Vec::new(),
            dimension: None,
            capacity: None,
            node_coord_section: Vec::new(),
            demand_section: Vec::new(),
            depot_section: Vec::new(),
        }
    }

    /// Builds a solver-ready problem from a parsed instance, carrying over
    /// coordinates, demands, capacity, and the depot.
    pub fn from_instance(instance: &Instance, problem_type: TsplibProblemType) -> Self {
        let mut problem = Self::new(instance.name.clone(), problem_type);
        problem.dimension = Some(instance.len());
        problem.capacity = instance.capacity;

        for node in instance.nodes() {
            problem.node_coord_section.push(NodeCoord {
                id: node.id,
                x: node.x,
                y: node.y,
            });
            if let Some(demand) = node.demand {
                problem.demand_section.push(DemandEntry {
                    id: node.id,
                    demand,
                });
            }
            if node.is_depot() {
                problem.depot_section.push(node.id);
            }
        }

        problem
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl Display for TsplibProblem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut writer = SpecWriter::new(f);

        writer.kv_colon("NAME", &self.name)?;
        writer.kv_colon("TYPE", self.problem_type)?;

        for comment in &self.comment_lines {
            writer.kv_colon("COMMENT", comment)?;
        }

        writer.opt_kv_colon("DIMENSION", self.dimension)?;
        // Everything this tool emits is planar Euclidean.
        writer.kv_colon("EDGE_WEIGHT_TYPE", "EUC_2D")?;
        writer.opt_kv_colon("CAPACITY", self.capacity)?;

        writer.lines("NODE_COORD_SECTION", &self.node_coord_section)?;
        writer.lines("DEMAND_SECTION", &self.demand_section)?;

        if !self.depot_section.is_empty() {
            writer.lines("DEPOT_SECTION", &self.depot_section)?;
            writer.line(SECTION_END_MARKER)?;
        }

        writer.line("EOF")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DemandEntry, NodeCoord, TsplibProblem, TsplibProblemType};
    use crate::Instance;

    #[test]
    fn display_emits_headers_then_sections() {
        let mut problem = TsplibProblem::new("sample", TsplibProblemType::Cvrp);
        problem.dimension = Some(2);
        problem.capacity = Some(6_000);
        problem.node_coord_section = vec![
            NodeCoord { id: 1, x: 145.0, y: 215.0 },
            NodeCoord { id: 2, x: 151.0, y: 264.0 },
        ];
        problem.demand_section = vec![
            DemandEntry { id: 1, demand: 0 },
            DemandEntry { id: 2, demand: 1_100 },
        ];
        problem.depot_section = vec![1];

        let text = problem.to_string();
        assert!(text.contains("NAME : sample"));
        assert!(text.contains("TYPE : CVRP"));
        assert!(text.contains("DIMENSION : 2"));
        assert!(text.contains("EDGE_WEIGHT_TYPE : EUC_2D"));
        assert!(text.contains("CAPACITY : 6000"));
        assert!(text.contains("NODE_COORD_SECTION\n1 145 215\n2 151 264\n"));
        assert!(text.contains("DEMAND_SECTION\n1 0\n2 1100\n"));
        assert!(text.contains("DEPOT_SECTION\n1\n-1\n"));
        assert!(text.ends_with("EOF\n"));
    }

    #[test]
    fn emitted_problem_round_trips_through_the_instance_parser() {
        let source = Instance::from_text(
            "roundtrip",
            "CAPACITY : 100\nNODE_COORD_SECTION\n1 0 0\n2 3 4\nDEMAND_SECTION\n1 0\n2 7\nEOF\n",
        );
        let problem = TsplibProblem::from_instance(&source, TsplibProblemType::Cvrp);

        let reparsed = Instance::from_text("roundtrip", &problem.to_string());
        assert_eq!(reparsed, source);
    }

    #[test]
    fn from_instance_records_the_depot_section() {
        let instance = Instance::from_text(
            "tiny",
            "NODE_COORD_SECTION\n1 0 0\n2 5 5\nEOF\n",
        );
        let problem = TsplibProblem::from_instance(&instance, TsplibProblemType::Tsp);

        assert_eq!(problem.depot_section, vec![1]);
        assert_eq!(problem.dimension, Some(2));
    }
}
