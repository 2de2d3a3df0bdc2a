use std::fmt;

/// Role of a node within an instance.
///
/// The depot is an explicit role rather than a magic id comparison; parsers
/// assign it from `DEPOT_SECTION` when present, falling back to the TSPLIB
/// convention of node 1.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NodeRole {
    Depot,
    #[default]
    Customer,
}

/// A single instance node: planar coordinate plus optional demand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub demand: Option<i64>,
    pub role: NodeRole,
}

impl Node {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            demand: None,
            role: NodeRole::Customer,
        }
    }

    pub fn is_depot(&self) -> bool {
        self.role == NodeRole::Depot
    }

    /// Euclidean distance, used for metrics logging only.
    pub fn dist(&self, rhs: &Self) -> f64 {
        let dx = self.x - rhs.x;
        let dy = self.y - rhs.y;
        dx.hypot(dy)
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.id > 0 && self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.x, self.y)
    }
}
