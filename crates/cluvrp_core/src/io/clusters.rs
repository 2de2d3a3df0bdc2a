//! Cluster-membership parsing.
//!
//! Two textual encodings are in circulation and are selected by the section
//! marker alone, never by sniffing line shapes:
//!
//! - `CLUSTER_SECTION`: one `node cluster` pair per line;
//! - `GVRP_SET_SECTION`: one `cluster n1 n2 ... -1` group per line.

use std::{
    collections::BTreeMap,
    fs,
    path::Path,
};

use crate::{Error, Result};

const CLUSTER_PAIR_HEADER: &str = "CLUSTER_SECTION";
const CLUSTER_GROUP_HEADER: &str = "GVRP_SET_SECTION";
const GROUP_END_MARKER: &str = "-1";
const EOF_MARKER: &str = "EOF";

/// Which section marker introduced the cluster data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClusterSectionFormat {
    /// `node cluster` pairs.
    PairList,
    /// `cluster n1 n2 ... -1` groups.
    GroupList,
}

/// Mapping from node id to cluster id. A node belongs to at most one cluster.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClusterAssignment {
    members: BTreeMap<usize, usize>,
}

impl ClusterAssignment {
    pub fn assign(&mut self, node: usize, cluster: usize) {
        self.members.insert(node, cluster);
    }

    pub fn cluster_of(&self, node: usize) -> Option<usize> {
        self.members.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Distinct cluster ids, ascending.
    pub fn unique_clusters(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.members.values().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.members.iter().map(|(node, cluster)| (*node, *cluster))
    }

    /// Reads a cluster file from disk. The read itself is the only fatal
    /// failure; everything inside the file is parsed best-effort.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::missing_file(path, e))?;
        Ok(Self::from_text(&text))
    }

    /// Parses cluster data from text, skipping malformed lines.
    pub fn from_text(text: &str) -> Self {
        let mut clusters = Self::default();
        let mut format: Option<ClusterSectionFormat> = None;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case(EOF_MARKER) {
                break;
            }
            if line.eq_ignore_ascii_case(CLUSTER_PAIR_HEADER) {
                format = Some(ClusterSectionFormat::PairList);
                continue;
            }
            if line.eq_ignore_ascii_case(CLUSTER_GROUP_HEADER) {
                format = Some(ClusterSectionFormat::GroupList);
                continue;
            }

            match format {
                Some(ClusterSectionFormat::PairList) => clusters.parse_pair_line(line),
                Some(ClusterSectionFormat::GroupList) => clusters.parse_group_line(line),
                None => {}
            }
        }

        clusters
    }

    /// Serializes the assignment as a `CLUSTER_SECTION` pair-list document,
    /// the format the converter emits and this parser reads back.
    pub fn to_pair_list(&self) -> String {
        let mut text = String::from(CLUSTER_PAIR_HEADER);
        text.push('\n');
        for (node, cluster) in self.iter() {
            text.push_str(&format!("{node} {cluster}\n"));
        }
        text.push_str(EOF_MARKER);
        text.push('\n');
        text
    }

    pub fn write_pair_list(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_pair_list())?;
        Ok(())
    }

    fn parse_pair_line(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        let (Some(node), Some(cluster)) = (parts.next(), parts.next()) else {
            log::debug!("clusters: skipping short pair line '{line}'");
            return;
        };

        // Some generators emit pair values as floats ("3.0"); truncate them
        // the way the historical loader did.
        match (parse_truncated(node), parse_truncated(cluster)) {
            (Some(node), Some(cluster)) => self.assign(node, cluster),
            _ => log::debug!("clusters: skipping malformed pair line '{line}'"),
        }
    }

    fn parse_group_line(&mut self, line: &str) {
        let mut tokens = line.split_whitespace();
        let Some(cluster) = tokens.next().and_then(parse_truncated) else {
            log::debug!("clusters: skipping malformed group line '{line}'");
            return;
        };

        for token in tokens {
            if token == GROUP_END_MARKER {
                break;
            }
            match parse_truncated(token) {
                Some(node) => self.assign(node, cluster),
                None => log::debug!("clusters: skipping bad member token '{token}'"),
            }
        }
    }
}

fn parse_truncated(token: &str) -> Option<usize> {
    let value = token.parse::<f64>().ok()?;
    if !value.is_finite() || value < 1.0 {
        return None;
    }
    Some(value as usize)
}

#[cfg(test)]
mod tests {
    use super::ClusterAssignment;

    #[test]
    fn pair_list_parses_node_cluster_lines() {
        let clusters = ClusterAssignment::from_text(
            "CLUSTER_SECTION\n1 1\n2 1\n3 2\nEOF\n",
        );

        assert_eq!(clusters.cluster_of(1), Some(1));
        assert_eq!(clusters.cluster_of(2), Some(1));
        assert_eq!(clusters.cluster_of(3), Some(2));
        assert_eq!(clusters.cluster_of(4), None);
    }

    #[test]
    fn pair_list_truncates_float_values() {
        let clusters = ClusterAssignment::from_text("CLUSTER_SECTION\n5.0 3.0\nEOF\n");
        assert_eq!(clusters.cluster_of(5), Some(3));
    }

    #[test]
    fn group_list_parses_member_runs_with_terminator() {
        let clusters = ClusterAssignment::from_text(
            "GVRP_SET_SECTION\n1 2 3 4 -1\n2 5 6 -1\nEOF\n",
        );

        assert_eq!(clusters.cluster_of(2), Some(1));
        assert_eq!(clusters.cluster_of(4), Some(1));
        assert_eq!(clusters.cluster_of(5), Some(2));
        assert_eq!(clusters.cluster_of(6), Some(2));
        assert_eq!(clusters.len(), 5);
    }

    #[test]
    fn both_encodings_yield_the_same_assignment() {
        let pairs = ClusterAssignment::from_text(
            "CLUSTER_SECTION\n2 1\n3 1\n4 2\n5 2\nEOF\n",
        );
        let groups = ClusterAssignment::from_text(
            "GVRP_SET_SECTION\n1 2 3 -1\n2 4 5 -1\nEOF\n",
        );

        assert_eq!(pairs, groups);
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let clusters = ClusterAssignment::from_text(
            "CLUSTER_SECTION\nnot numbers\n7\n8 2\nEOF\n",
        );

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters.cluster_of(8), Some(2));
    }

    #[test]
    fn lines_before_any_marker_are_ignored() {
        let clusters = ClusterAssignment::from_text("1 1\n2 2\nCLUSTER_SECTION\n3 3\nEOF\n");

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters.cluster_of(3), Some(3));
    }

    #[test]
    fn parsing_stops_at_eof_marker() {
        let clusters = ClusterAssignment::from_text("CLUSTER_SECTION\n1 1\nEOF\n2 2\n");

        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn pair_list_output_round_trips_through_the_parser() {
        let mut clusters = ClusterAssignment::default();
        clusters.assign(1, 2);
        clusters.assign(2, 2);
        clusters.assign(3, 1);

        let reparsed = ClusterAssignment::from_text(&clusters.to_pair_list());
        assert_eq!(reparsed, clusters);
    }

    #[test]
    fn unique_clusters_are_sorted_and_deduplicated() {
        let clusters = ClusterAssignment::from_text(
            "CLUSTER_SECTION\n1 4\n2 1\n3 4\n4 2\nEOF\n",
        );

        assert_eq!(clusters.unique_clusters(), vec![1, 2, 4]);
    }
}
