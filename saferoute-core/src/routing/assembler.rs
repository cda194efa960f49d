//! Route assembly: snapping, search invocation and result reduction

use geo::{Coord, LineString, Point};
use geojson::{Feature, Geometry};
use log::debug;
use serde_json::json;

use crate::{DEFAULT_NEUTRAL_RISK, DEFAULT_RISK_TOLERANCE, Error, WALKING_SPEED, model::WalkGraph};

use super::cost::{CostOverlay, validate_risk_tolerance};
use super::search::{PathTrace, SearchStrategy, find_path};

/// Parameters of one route request
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    /// Risk-tolerance coefficient; 0 means pure shortest distance
    pub lambda: f64,
    pub strategy: SearchStrategy,
    /// Optional cap on settled nodes, guarding huge or hopeless queries
    pub max_settled: Option<usize>,
}

impl RouteRequest {
    pub fn new(start_lat: f64, start_lon: f64, end_lat: f64, end_lon: f64) -> Self {
        Self {
            start_lat,
            start_lon,
            end_lat,
            end_lon,
            lambda: DEFAULT_RISK_TOLERANCE,
            strategy: SearchStrategy::default(),
            max_settled: None,
        }
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// A computed route with its summary metrics
#[derive(Debug, Clone)]
pub struct RouteResult {
    /// External node identifiers, source to destination, no repeats
    pub path_nodes: Vec<i64>,
    pub distance_m: f64,
    pub time_min: f64,
    /// Length-weighted average risk along the path, in [0, 1]
    pub avg_risk: f64,
    /// Merged edge geometries in traversal order
    pub geometry: LineString<f64>,
    /// True when origin and destination snapped to the same node; the
    /// average risk then carries the neutral value rather than a
    /// measured one
    pub degenerate: bool,
}

impl RouteResult {
    /// Convert the route to a `GeoJSON` Feature
    pub fn to_geojson(&self) -> Feature {
        let value = json!({
            "type": "Feature",
            "geometry": Geometry::new((&self.geometry).into()),
            "properties": {
                "path_nodes": self.path_nodes,
                "distance_m": self.distance_m,
                "time_min": self.time_min,
                "avg_risk": self.avg_risk,
                "degenerate": self.degenerate,
            }
        });

        serde_json::from_value(value).unwrap()
    }

    pub fn to_geojson_string(&self) -> String {
        serde_json::to_string(&self.to_geojson()).unwrap_or_default()
    }
}

/// Compute a risk-aware walking route between two coordinates.
///
/// Snaps both coordinates to their nearest graph nodes, computes a
/// per-request cost overlay and searches for the minimum-cost path.
/// When both coordinates snap to the same node the result is a
/// zero-length degenerate success, not an error.
///
/// # Errors
///
/// Invalid coordinates and a negative risk tolerance are rejected
/// before snapping; an exhausted frontier surfaces unchanged as
/// [`Error::Unreachable`].
pub fn route(graph: &WalkGraph, request: &RouteRequest) -> Result<RouteResult, Error> {
    validate_coordinate(request.start_lat, request.start_lon)?;
    validate_coordinate(request.end_lat, request.end_lon)?;
    validate_risk_tolerance(request.lambda)?;

    let start = Point::new(request.start_lon, request.start_lat);
    let end = Point::new(request.end_lon, request.end_lat);

    let (source, start_snap) = graph.nearest_node(&start).ok_or(Error::NoPointsFound)?;
    let (target, end_snap) = graph.nearest_node(&end).ok_or(Error::NoPointsFound)?;

    debug!(
        "Snapped request endpoints {start_snap:.1} m and {end_snap:.1} m from their nearest nodes"
    );

    if source == target {
        let id = graph.external_id(source).ok_or(Error::InvalidNodeIndex)?;
        let position: Coord<f64> = graph
            .node_geometry(source)
            .ok_or(Error::InvalidNodeIndex)?
            .into();
        return Ok(RouteResult {
            path_nodes: vec![id],
            distance_m: 0.0,
            time_min: 0.0,
            avg_risk: DEFAULT_NEUTRAL_RISK,
            geometry: LineString::new(vec![position]),
            degenerate: true,
        });
    }

    let overlay = CostOverlay::build(graph, request.lambda)?;
    let trace = find_path(
        graph,
        &overlay,
        source,
        target,
        request.strategy,
        request.max_settled,
    )?;

    assemble(graph, &trace)
}

/// Reduce a path trace into distances, times, weighted risk and one
/// merged geometry.
fn assemble(graph: &WalkGraph, trace: &PathTrace) -> Result<RouteResult, Error> {
    let mut distance_m = 0.0;
    let mut weighted_risk = 0.0;
    let mut coords: Vec<Coord<f64>> = Vec::new();

    for &edge_index in &trace.edges {
        let edge = graph
            .graph
            .edge_weight(edge_index)
            .ok_or(Error::InvalidNodeIndex)?;

        distance_m += edge.length;
        weighted_risk += edge.risk * edge.length;

        // Consecutive edges share their joint coordinate
        for coord in edge.geometry.coords() {
            if coords.last() != Some(coord) {
                coords.push(*coord);
            }
        }
    }

    let path_nodes = trace
        .nodes
        .iter()
        .map(|&node| graph.external_id(node).ok_or(Error::InvalidNodeIndex))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RouteResult {
        path_nodes,
        distance_m,
        time_min: distance_m / WALKING_SPEED / 60.0,
        avg_risk: weighted_risk / distance_m,
        geometry: LineString::new(coords),
        degenerate: false,
    })
}

fn validate_coordinate(lat: f64, lon: f64) -> Result<(), Error> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(Error::InvalidCoordinate(format!(
            "coordinates must be finite numbers, got ({lat}, {lon})"
        )));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(Error::InvalidCoordinate(format!(
            "latitude {lat} outside [-90, 90]"
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(Error::InvalidCoordinate(format!(
            "longitude {lon} outside [-180, 180]"
        )));
    }
    Ok(())
}
