//! Street graph with a spatial index for coordinate snapping

use geo::{Distance, Haversine, Point};
use log::debug;
use petgraph::graph::{Graph, NodeIndex};
use rstar::{RTree, primitives::GeomWithData};

use crate::risk::RiskTable;

use super::components::{WalkEdge, WalkNode};

/// Graph node position indexed for nearest-neighbor queries
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Street network graph.
///
/// Topology is immutable after construction; the only post-load
/// mutation is [`WalkGraph::attach_risk`], which runs once per scoring
/// run before the graph is shared. Per-request traversal costs live in
/// a [`crate::routing::CostOverlay`], never in the graph itself, so
/// concurrent route requests with different risk tolerances can share
/// one instance.
///
/// Streets are bidirectional for pedestrians: every input edge is
/// stored as two directed edges with mirrored geometry. Parallel edges
/// between the same node pair are kept as distinct edges and resolved
/// to the cheapest one during search relaxation.
pub struct WalkGraph {
    pub graph: Graph<WalkNode, WalkEdge>,
    rtree: RTree<IndexedPoint>,
}

impl WalkGraph {
    pub(crate) fn from_graph(graph: Graph<WalkNode, WalkEdge>) -> Self {
        let points = graph
            .node_indices()
            .map(|idx| {
                let geometry = graph[idx].geometry;
                IndexedPoint::new([geometry.x(), geometry.y()], idx)
            })
            .collect();

        Self {
            graph,
            rtree: RTree::bulk_load(points),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_geometry(&self, node: NodeIndex) -> Option<Point<f64>> {
        self.graph.node_weight(node).map(|n| n.geometry)
    }

    pub fn external_id(&self, node: NodeIndex) -> Option<i64> {
        self.graph.node_weight(node).map(|n| n.id)
    }

    /// Snap a point to the nearest graph node.
    ///
    /// Returns the node and its haversine distance from the query point
    /// in meters. The index orders candidates in lon/lat space, which
    /// is accurate enough at city scale for picking the nearest node.
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<(NodeIndex, f64)> {
        self.rtree
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|indexed| {
                let node = indexed.data;
                let snapped = Point::new(indexed.geom()[0], indexed.geom()[1]);
                (node, Haversine.distance(*point, snapped))
            })
    }

    /// Attach risk scores to every edge from a scored segment table.
    ///
    /// Candidate identifiers are tested in order and the first match
    /// wins; edges with no match (including edges carrying no
    /// identifier at all) receive `neutral_risk`.
    pub fn attach_risk(&mut self, table: &RiskTable, neutral_risk: f64) {
        let mut missing = 0usize;

        for edge in self.graph.edge_weights_mut() {
            match edge.osm_ids.iter().find_map(|id| table.get(id)) {
                Some(risk) => edge.risk = risk,
                None => {
                    edge.risk = neutral_risk;
                    missing += 1;
                }
            }
        }

        if missing > 0 {
            debug!(
                "{missing} of {} edges had no risk table entry and use the neutral risk {neutral_risk}",
                self.graph.edge_count()
            );
        }
    }
}
