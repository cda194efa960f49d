//! Street network components - nodes and edges

use geo::{LineString, Point};

/// Street graph node
#[derive(Debug, Clone)]
pub struct WalkNode {
    /// External identifier from the source street dataset
    pub id: i64,
    /// Node coordinates (x = longitude, y = latitude)
    pub geometry: Point<f64>,
}

/// Street graph edge (one directed traversal of a street segment)
#[derive(Debug, Clone)]
pub struct WalkEdge {
    /// Segment length in meters
    pub length: f64,
    /// Segment geometry, oriented in traversal direction
    pub geometry: LineString<f64>,
    /// Candidate external segment identifiers. Geometry simplification
    /// can merge several source segments into one edge, so zero, one or
    /// many identifiers are all valid.
    pub osm_ids: Vec<String>,
    /// Blended incident risk in [0, 1], attached once per scoring run
    pub risk: f64,
}

impl WalkEdge {
    /// Traversal cost under a risk-tolerance coefficient `lambda`.
    ///
    /// `lambda = 0` recovers pure shortest-distance routing. Since risk
    /// is non-negative the cost never drops below the length, which
    /// keeps the straight-line heuristic admissible.
    pub fn traversal_cost(&self, lambda: f64) -> f64 {
        self.length * (1.0 + lambda * self.risk)
    }
}
