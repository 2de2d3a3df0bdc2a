//! Best-effort TSPLIB/CluVRP instance parsing.
//!
//! Section markers may appear in any order and sections may be missing;
//! malformed lines inside a section are skipped. Only an unreadable file is
//! fatal.

use std::{
    collections::BTreeMap,
    fs,
    path::Path,
};

use crate::{Error, Node, NodeRole, Result};

const COORD_HEADER: &str = "NODE_COORD_SECTION";
const DEMAND_HEADER: &str = "DEMAND_SECTION";
const DEPOT_HEADER: &str = "DEPOT_SECTION";
const SECTION_END_MARKER: &str = "-1";
const EOF_MARKER: &str = "EOF";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Section {
    Coords,
    Demands,
    Depots,
    None,
}

/// Read-only snapshot of one parsed instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Instance {
    pub name: String,
    pub capacity: Option<i64>,
    nodes: BTreeMap<usize, Node>,
}

impl Instance {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::missing_file(path, e))?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("instance")
            .to_string();
        Ok(Self::from_text(name, &text))
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let mut instance = Self {
            name: name.into(),
            ..Self::default()
        };
        let mut section = Section::None;
        let mut saw_depot_section = false;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case(EOF_MARKER) {
                break;
            }
            if line.eq_ignore_ascii_case(COORD_HEADER) {
                section = Section::Coords;
                continue;
            }
            if line.eq_ignore_ascii_case(DEMAND_HEADER) {
                section = Section::Demands;
                continue;
            }
            if line.eq_ignore_ascii_case(DEPOT_HEADER) {
                section = Section::Depots;
                saw_depot_section = true;
                continue;
            }

            if section == Section::None || line.contains(':') {
                instance.parse_header_line(line);
                continue;
            }

            match section {
                Section::Coords => instance.parse_coord_line(line),
                Section::Demands => instance.parse_demand_line(line),
                Section::Depots => {
                    if line == SECTION_END_MARKER {
                        section = Section::None;
                    } else {
                        instance.parse_depot_line(line);
                    }
                }
                Section::None => {}
            }
        }

        // TSPLIB convention when no depot section named one.
        if !saw_depot_section {
            if let Some(node) = instance.nodes.get_mut(&1) {
                node.role = NodeRole::Depot;
            }
        }

        instance
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn depot(&self) -> Option<&Node> {
        self.nodes.values().find(|node| node.is_depot())
    }

    fn parse_header_line(&mut self, line: &str) {
        let Some((key, value)) = line.split_once(':') else {
            return;
        };
        match key.trim().to_ascii_uppercase().as_str() {
            "NAME" => self.name = value.trim().to_string(),
            "CAPACITY" => match value.trim().parse::<i64>() {
                Ok(capacity) => self.capacity = Some(capacity),
                Err(_) => log::debug!("instance: skipping bad CAPACITY line '{line}'"),
            },
            _ => {}
        }
    }

    fn parse_coord_line(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        let parsed = (
            parts.next().and_then(|t| t.parse::<usize>().ok()),
            parts.next().and_then(|t| t.parse::<f64>().ok()),
            parts.next().and_then(|t| t.parse::<f64>().ok()),
        );
        let (Some(id), Some(x), Some(y)) = parsed else {
            log::debug!("instance: skipping malformed coord line '{line}'");
            return;
        };

        let node = Node::new(id, x, y);
        if !node.is_valid() {
            log::debug!("instance: skipping out-of-range coord line '{line}'");
            return;
        }
        // Demand lines may have arrived first; keep whatever was recorded.
        let entry = self.nodes.entry(id).or_insert(node);
        entry.x = x;
        entry.y = y;
    }

    fn parse_demand_line(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        let parsed = (
            parts.next().and_then(|t| t.parse::<usize>().ok()),
            parts.next().and_then(|t| t.parse::<i64>().ok()),
        );
        let (Some(id), Some(demand)) = parsed else {
            log::debug!("instance: skipping malformed demand line '{line}'");
            return;
        };
        if demand < 0 {
            log::debug!("instance: skipping negative demand line '{line}'");
            return;
        }

        self.nodes
            .entry(id)
            .or_insert_with(|| Node::new(id, 0.0, 0.0))
            .demand = Some(demand);
    }

    fn parse_depot_line(&mut self, line: &str) {
        let Ok(id) = line.parse::<usize>() else {
            log::debug!("instance: skipping malformed depot line '{line}'");
            return;
        };
        if let Some(node) = self.nodes.get_mut(&id) {
            node.role = NodeRole::Depot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instance;

    const SAMPLE: &str = "\
NAME : eil5
TYPE : CVRP
DIMENSION : 5
EDGE_WEIGHT_TYPE : EUC_2D
CAPACITY : 6000
NODE_COORD_SECTION
1 145 215
2 151 264
3 159 261
4 130 254
5 128 252
DEMAND_SECTION
1 0
2 1100
3 700
4 800
5 1400
DEPOT_SECTION
1
-1
EOF
";

    #[test]
    fn parses_headers_coords_and_demands() {
        let instance = Instance::from_text("eil5", SAMPLE);

        assert_eq!(instance.name, "eil5");
        assert_eq!(instance.capacity, Some(6_000));
        assert_eq!(instance.len(), 5);

        let node = instance.node(2).expect("node 2 should exist");
        assert_eq!((node.x, node.y), (151.0, 264.0));
        assert_eq!(node.demand, Some(1_100));
    }

    #[test]
    fn depot_section_sets_the_depot_role() {
        let instance = Instance::from_text("eil5", SAMPLE);
        let depot = instance.depot().expect("depot should exist");
        assert_eq!(depot.id, 1);
    }

    #[test]
    fn node_one_is_depot_when_no_depot_section_exists() {
        let instance =
            Instance::from_text("tiny", "NODE_COORD_SECTION\n1 0 0\n2 5 5\nEOF\n");
        assert_eq!(instance.depot().map(|node| node.id), Some(1));
    }

    #[test]
    fn sections_may_appear_in_any_order() {
        let text = "DEMAND_SECTION\n1 0\n2 30\nNODE_COORD_SECTION\n1 0 0\n2 7 9\nEOF\n";
        let instance = Instance::from_text("swapped", text);

        assert_eq!(instance.len(), 2);
        let node = instance.node(2).expect("node 2 should exist");
        assert_eq!((node.x, node.y), (7.0, 9.0));
        assert_eq!(node.demand, Some(30));
    }

    #[test]
    fn malformed_lines_inside_sections_are_skipped() {
        let text = "NODE_COORD_SECTION\n1 0 0\ngarbage here\n2 1\n3 4 4\nEOF\n";
        let instance = Instance::from_text("messy", text);

        assert_eq!(instance.len(), 2);
        assert!(instance.contains(1));
        assert!(instance.contains(3));
    }

    #[test]
    fn parsing_stops_at_eof_marker() {
        let text = "NODE_COORD_SECTION\n1 0 0\nEOF\n2 1 1\n";
        let instance = Instance::from_text("stops", text);

        assert_eq!(instance.len(), 1);
    }

    #[test]
    fn missing_sections_are_not_an_error() {
        let instance = Instance::from_text("empty", "NAME : empty\nEOF\n");
        assert!(instance.is_empty());
        assert_eq!(instance.name, "empty");
    }

    #[test]
    fn negative_demands_are_skipped() {
        let text = "NODE_COORD_SECTION\n1 0 0\nDEMAND_SECTION\n1 -5\nEOF\n";
        let instance = Instance::from_text("neg", text);

        assert_eq!(
            instance.node(1).expect("node 1 should exist").demand,
            None
        );
    }
}
