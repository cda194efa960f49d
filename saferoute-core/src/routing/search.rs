//! Minimum-cost path search over the street graph
//!
//! One implementation serves both strategies: Dijkstra is A* with a
//! zero heuristic, A* adds the haversine distance to the target as an
//! admissible estimate (edge cost is never below edge length, so the
//! straight-line distance never overestimates remaining cost).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use geo::{Distance, Haversine};
use hashbrown::HashMap;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::{Error, model::WalkGraph};

use super::cost::CostOverlay;

/// Search strategy for [`find_path`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Plain Dijkstra (zero heuristic)
    Dijkstra,
    /// A* with a haversine straight-line heuristic
    #[default]
    AStar,
}

/// A minimum-cost path, source to target inclusive
#[derive(Debug, Clone)]
pub struct PathTrace {
    pub nodes: Vec<NodeIndex>,
    /// Edges traversed, parallel to `nodes` windows
    pub edges: Vec<EdgeIndex>,
    pub total_cost: f64,
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    priority: f64,
    node: NodeIndex,
}

impl Eq for State {}

// Min-heap by priority (reversed from standard Rust BinaryHeap)
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.total_cmp(&self.priority)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the minimum-cost path from `source` to `target` under the
/// given cost overlay.
///
/// Parallel edges between a node pair are all relaxed, so the cheapest
/// one ends up in the path. Nodes may be pushed onto the frontier more
/// than once; stale entries are discarded against the node's current
/// best priority when popped.
///
/// # Errors
///
/// [`Error::Unreachable`] when the frontier empties before the target
/// is settled, [`Error::SearchLimitExceeded`] when `max_settled` is hit
/// first, [`Error::InvalidNodeIndex`] for endpoints outside the graph.
pub fn find_path(
    graph: &WalkGraph,
    costs: &CostOverlay,
    source: NodeIndex,
    target: NodeIndex,
    strategy: SearchStrategy,
    max_settled: Option<usize>,
) -> Result<PathTrace, Error> {
    let target_geometry = graph.node_geometry(target).ok_or(Error::InvalidNodeIndex)?;
    graph.node_geometry(source).ok_or(Error::InvalidNodeIndex)?;

    if source == target {
        return Ok(PathTrace {
            nodes: vec![source],
            edges: Vec::new(),
            total_cost: 0.0,
        });
    }

    let heuristic = |node: NodeIndex| -> f64 {
        match strategy {
            SearchStrategy::Dijkstra => 0.0,
            SearchStrategy::AStar => graph
                .node_geometry(node)
                .map_or(0.0, |geometry| Haversine.distance(geometry, target_geometry)),
        }
    };

    let estimated_nodes = graph.node_count().min(1000);
    let mut g_score: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut best_priority: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> =
        HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    g_score.insert(source, 0.0);
    let start_priority = heuristic(source);
    best_priority.insert(source, start_priority);
    heap.push(State {
        priority: start_priority,
        node: source,
    });

    let mut settled = 0usize;

    while let Some(State { priority, node }) = heap.pop() {
        if node == target {
            return reconstruct(graph, &g_score, &predecessors, source, target);
        }

        // Skip if a better entry for this node was already processed
        if let Some(&best) = best_priority.get(&node) {
            if priority > best {
                continue;
            }
        }

        settled += 1;
        if let Some(max) = max_settled {
            if settled > max {
                return Err(Error::SearchLimitExceeded(max));
            }
        }

        let current_cost = g_score.get(&node).copied().unwrap_or(f64::INFINITY);

        for edge in graph.graph.edges(node) {
            let next = edge.target();
            let tentative = current_cost + costs.cost(edge.id());

            if tentative < g_score.get(&next).copied().unwrap_or(f64::INFINITY) {
                g_score.insert(next, tentative);
                let next_priority = tentative + heuristic(next);
                best_priority.insert(next, next_priority);
                predecessors.insert(next, (node, edge.id()));
                heap.push(State {
                    priority: next_priority,
                    node: next,
                });
            }
        }
    }

    Err(Error::Unreachable {
        from: graph.external_id(source).unwrap_or_default(),
        to: graph.external_id(target).unwrap_or_default(),
    })
}

fn reconstruct(
    graph: &WalkGraph,
    g_score: &HashMap<NodeIndex, f64>,
    predecessors: &HashMap<NodeIndex, (NodeIndex, EdgeIndex)>,
    source: NodeIndex,
    target: NodeIndex,
) -> Result<PathTrace, Error> {
    let total_cost = g_score.get(&target).copied().ok_or(Error::Unreachable {
        from: graph.external_id(source).unwrap_or_default(),
        to: graph.external_id(target).unwrap_or_default(),
    })?;

    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut current = target;

    while current != source {
        let &(previous, edge) = predecessors
            .get(&current)
            .ok_or(Error::InvalidNodeIndex)?;
        nodes.push(previous);
        edges.push(edge);
        current = previous;
    }

    nodes.reverse();
    edges.reverse();

    Ok(PathTrace {
        nodes,
        edges,
        total_cost,
    })
}
