//! Street graph JSON schema and graph construction

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::{Coord, LineString, Point};
use hashbrown::HashMap;
use log::info;
use petgraph::graph::Graph;
use serde::Deserialize;

use crate::{
    DEFAULT_NEUTRAL_RISK, Error,
    model::{WalkEdge, WalkGraph, WalkNode},
};

/// One graph node as produced by the ETL step
#[derive(Debug, Clone, Deserialize)]
pub struct NodeRecord {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// One undirected street segment as produced by the ETL step.
///
/// `geometry` is a sequence of `[lon, lat]` pairs oriented `u` to `v`.
/// Repeated `(u, v)` records are valid and become parallel edges.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    pub u: i64,
    pub v: i64,
    pub length: f64,
    pub geometry: Vec<[f64; 2]>,
    #[serde(default)]
    pub osm_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GraphFile {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

/// Load a street graph from its JSON file
///
/// # Errors
///
/// Returns an error on I/O or schema problems, or when the records
/// violate graph invariants (see [`build_walk_graph`]).
pub fn load_walk_graph(path: &Path) -> Result<WalkGraph, Error> {
    let file = File::open(path)?;
    let parsed: GraphFile = serde_json::from_reader(BufReader::new(file))?;

    let graph = build_walk_graph(parsed.nodes, parsed.edges)?;
    info!(
        "Street graph loaded: {} nodes, {} directed edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Build a [`WalkGraph`] from raw node and edge records.
///
/// Every undirected record becomes two directed edges, the reverse one
/// with mirrored geometry. Edges start at the neutral risk until
/// [`WalkGraph::attach_risk`] runs.
///
/// # Errors
///
/// Rejects empty node sets, duplicate node identifiers, edges whose
/// endpoints are unknown, non-positive or non-finite lengths, and
/// geometries with fewer than two coordinates.
pub fn build_walk_graph(
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
) -> Result<WalkGraph, Error> {
    if nodes.is_empty() {
        return Err(Error::InvalidData("graph has no nodes".to_string()));
    }

    let mut graph = Graph::with_capacity(nodes.len(), edges.len() * 2);
    let mut node_indices = HashMap::with_capacity(nodes.len());

    for node in nodes {
        let index = graph.add_node(WalkNode {
            id: node.id,
            geometry: Point::new(node.lon, node.lat),
        });
        if node_indices.insert(node.id, index).is_some() {
            return Err(Error::InvalidData(format!(
                "duplicate node identifier {}",
                node.id
            )));
        }
    }

    for edge in edges {
        let u = *node_indices.get(&edge.u).ok_or_else(|| {
            Error::InvalidData(format!("edge references unknown node {}", edge.u))
        })?;
        let v = *node_indices.get(&edge.v).ok_or_else(|| {
            Error::InvalidData(format!("edge references unknown node {}", edge.v))
        })?;

        if !edge.length.is_finite() || edge.length <= 0.0 {
            return Err(Error::InvalidData(format!(
                "edge {} -> {} has invalid length {}",
                edge.u, edge.v, edge.length
            )));
        }
        if edge.geometry.len() < 2 {
            return Err(Error::InvalidData(format!(
                "edge {} -> {} has fewer than two geometry points",
                edge.u, edge.v
            )));
        }

        let forward: Vec<Coord<f64>> = edge
            .geometry
            .iter()
            .map(|&[x, y]| Coord { x, y })
            .collect();
        let mut backward = forward.clone();
        backward.reverse();

        graph.add_edge(
            u,
            v,
            WalkEdge {
                length: edge.length,
                geometry: LineString::new(forward),
                osm_ids: edge.osm_ids.clone(),
                risk: DEFAULT_NEUTRAL_RISK,
            },
        );
        graph.add_edge(
            v,
            u,
            WalkEdge {
                length: edge.length,
                geometry: LineString::new(backward),
                osm_ids: edge.osm_ids,
                risk: DEFAULT_NEUTRAL_RISK,
            },
        );
    }

    Ok(WalkGraph::from_graph(graph))
}
