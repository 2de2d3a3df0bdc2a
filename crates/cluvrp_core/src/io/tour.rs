//! Solver tour-file parsing.
//!
//! Accepts LKH/TSPLIB `.tour`/`.sol` output: optional headers, then
//! `TOUR_SECTION` with one id per line (whitespace-tolerant), terminated by
//! `-1` or `EOF`. Lines that fail integer parsing inside the section are
//! skipped, never fatal; an empty tour is a valid result.

use std::{fs, path::Path};

use crate::{Error, Instance, Result};

const TOUR_SECTION_HEADER: &str = "TOUR_SECTION";
const TOUR_END_MARKER: &str = "-1";
const EOF_MARKER: &str = "EOF";

/// Ordered visiting sequence, implicitly cyclic.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tour {
    pub nodes: Vec<usize>,
}

impl Tour {
    pub fn new(nodes: Vec<usize>) -> Self {
        Self { nodes }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::missing_file(path, e))?;
        Ok(Self::from_text(&text))
    }

    pub fn from_text(text: &str) -> Self {
        let mut nodes = Vec::new();
        let mut in_section = false;

        'lines: for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case(EOF_MARKER) {
                break;
            }
            if !in_section {
                if line.eq_ignore_ascii_case(TOUR_SECTION_HEADER) {
                    in_section = true;
                }
                continue;
            }

            for token in line.split_whitespace() {
                if token == TOUR_END_MARKER || token.eq_ignore_ascii_case(EOF_MARKER) {
                    break 'lines;
                }
                match token.parse::<usize>() {
                    Ok(id) if id >= 1 => nodes.push(id),
                    _ => log::debug!("tour: skipping bad token '{token}'"),
                }
            }
        }

        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops ids with no coordinate in the instance. This may silently shrink
    /// the effective tour; the dropped count is logged for diagnosis.
    pub fn filtered(&self, instance: &Instance) -> Vec<usize> {
        let filtered: Vec<usize> = self
            .nodes
            .iter()
            .copied()
            .filter(|id| instance.contains(*id))
            .collect();

        let dropped = self.nodes.len() - filtered.len();
        if dropped > 0 {
            log::debug!("tour: dropped {dropped} ids without coordinates");
        }
        filtered
    }

    /// Total cyclic tour length over instance coordinates, for metrics logs.
    pub fn cyclic_distance(&self, instance: &Instance) -> f64 {
        let nodes = self.filtered(instance);
        if nodes.len() < 2 {
            return 0.0;
        }

        let n = nodes.len();
        (0..n)
            .filter_map(|i| {
                let a = instance.node(nodes[i])?;
                let b = instance.node(nodes[(i + 1) % n])?;
                Some(a.dist(b))
            })
            .sum()
    }
}
