//! End-to-end tests: incident scoring through route assembly

use approx::assert_relative_eq;
use geo::line_string;

use saferoute_core::loading::{EdgeRecord, NodeRecord, build_walk_graph};
use saferoute_core::prelude::*;
use saferoute_core::risk::{IncidentCounts, count_incidents};

/// Scoring inputs: three segments in a projected CRS with an incident
/// cluster on the shortcut segment and a single incident on "bc".
/// Counts end up as ab: 0, bc: 1, ac: 3, so assault scores normalize
/// to 0, 1/3 and 1, and blended risks to 0, 0.7/3 and 0.7.
fn scoring_inputs() -> (Vec<SegmentRecord>, Vec<IncidentRecord>) {
    use geo::Point;

    let segments = vec![
        SegmentRecord {
            osm_id: "ab".into(),
            geometry: line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 100.0)],
        },
        SegmentRecord {
            osm_id: "bc".into(),
            geometry: line_string![(x: 1000.0, y: 0.0), (x: 1000.0, y: 100.0)],
        },
        SegmentRecord {
            osm_id: "ac".into(),
            geometry: line_string![(x: 2000.0, y: 0.0), (x: 2000.0, y: 200.0)],
        },
    ];
    let incidents = vec![
        IncidentRecord {
            category: IncidentCategory::Assault,
            location: Point::new(1005.0, 50.0),
        },
        IncidentRecord {
            category: IncidentCategory::Assault,
            location: Point::new(2005.0, 40.0),
        },
        IncidentRecord {
            category: IncidentCategory::Assault,
            location: Point::new(2005.0, 100.0),
        },
        IncidentRecord {
            category: IncidentCategory::Assault,
            location: Point::new(2005.0, 160.0),
        },
    ];
    (segments, incidents)
}

/// Routing graph: A and C connected by a 150 m shortcut carrying the
/// incident cluster, or a 200 m detour via B. Node spacing is tighter
/// than the declared lengths so the heuristic stays admissible.
fn routing_graph(table: &RiskTable) -> WalkGraph {
    let nodes = vec![
        NodeRecord {
            id: 1,
            lat: 43.6500,
            lon: -79.38,
        },
        NodeRecord {
            id: 2,
            lat: 43.6506,
            lon: -79.38,
        },
        NodeRecord {
            id: 3,
            lat: 43.6512,
            lon: -79.38,
        },
    ];
    let edges = vec![
        EdgeRecord {
            u: 1,
            v: 2,
            length: 100.0,
            geometry: vec![[-79.38, 43.6500], [-79.38, 43.6506]],
            osm_ids: vec!["ab".into()],
        },
        EdgeRecord {
            u: 2,
            v: 3,
            length: 100.0,
            geometry: vec![[-79.38, 43.6506], [-79.38, 43.6512]],
            osm_ids: vec!["bc".into()],
        },
        EdgeRecord {
            u: 1,
            v: 3,
            length: 150.0,
            geometry: vec![[-79.38, 43.6500], [-79.3805, 43.6506], [-79.38, 43.6512]],
            osm_ids: vec!["ac".into()],
        },
    ];
    let mut graph = build_walk_graph(nodes, edges).unwrap();
    graph.attach_risk(table, DEFAULT_NEUTRAL_RISK);
    graph
}

fn scored_graph() -> WalkGraph {
    let (segments, incidents) = scoring_inputs();
    let table = build_risk_table(&segments, &incidents, &RiskConfig::default()).unwrap();
    routing_graph(&table)
}

#[test]
fn spatial_join_counts_match_the_layout() {
    let (segments, incidents) = scoring_inputs();
    let counts = count_incidents(&segments, &incidents, 150.0).unwrap();
    assert_eq!(
        counts,
        vec![
            IncidentCounts {
                assault: 0,
                collision: 0
            },
            IncidentCounts {
                assault: 1,
                collision: 0
            },
            IncidentCounts {
                assault: 3,
                collision: 0
            },
        ]
    );
}

#[test]
fn zero_lambda_returns_the_shortest_distance_path() {
    let graph = scored_graph();
    let request = RouteRequest::new(43.6500, -79.38, 43.6512, -79.38).with_lambda(0.0);

    let result = route(&graph, &request).unwrap();

    assert_eq!(result.path_nodes, vec![1, 3]);
    assert_relative_eq!(result.distance_m, 150.0);
    assert_relative_eq!(result.time_min, 150.0 / 1.4 / 60.0);
    assert_relative_eq!(result.avg_risk, 0.7, epsilon = 1e-12);
    assert!(!result.degenerate);
}

#[test]
fn risk_averse_request_detours_around_the_incident_cluster() {
    let graph = scored_graph();
    let request = RouteRequest::new(43.6500, -79.38, 43.6512, -79.38).with_lambda(2.0);

    let result = route(&graph, &request).unwrap();

    // Shortcut cost: 150 * (1 + 2 * 0.7) = 360.
    // Detour: 100 * 1 + 100 * (1 + 2 * 0.7/3) = 246.67.
    assert_eq!(result.path_nodes, vec![1, 2, 3]);
    assert_relative_eq!(result.distance_m, 200.0);
    assert_relative_eq!(result.avg_risk, (0.7 / 3.0) * 100.0 / 200.0, epsilon = 1e-12);
}

#[test]
fn strategies_agree_through_the_public_entry_point() {
    let graph = scored_graph();
    for lambda in [0.0, 0.5, 2.0] {
        let base = RouteRequest::new(43.6500, -79.38, 43.6512, -79.38).with_lambda(lambda);
        let astar = route(&graph, &base.clone().with_strategy(SearchStrategy::AStar)).unwrap();
        let dijkstra =
            route(&graph, &base.with_strategy(SearchStrategy::Dijkstra)).unwrap();

        assert_relative_eq!(astar.distance_m, dijkstra.distance_m);
        assert_relative_eq!(astar.avg_risk, dijkstra.avg_risk);
    }
}

#[test]
fn path_has_no_repeated_nodes_and_ordered_geometry() {
    let graph = scored_graph();
    let request = RouteRequest::new(43.6500, -79.38, 43.6512, -79.38).with_lambda(2.0);

    let result = route(&graph, &request).unwrap();

    let mut seen = result.path_nodes.clone();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), result.path_nodes.len());

    let coords: Vec<_> = result.geometry.coords().collect();
    assert_eq!(coords.first().map(|c| c.y), Some(43.6500));
    assert_eq!(coords.last().map(|c| c.y), Some(43.6512));
    // The shared joint coordinate at node B appears once
    assert_eq!(coords.len(), 3);
}

#[test]
fn same_snapped_node_is_a_degenerate_success() {
    let graph = scored_graph();
    let request = RouteRequest::new(43.65001, -79.3800, 43.64999, -79.3801);

    let result = route(&graph, &request).unwrap();

    assert!(result.degenerate);
    assert_eq!(result.path_nodes, vec![1]);
    assert_relative_eq!(result.distance_m, 0.0);
    assert_relative_eq!(result.avg_risk, DEFAULT_NEUTRAL_RISK);
}

#[test]
fn unreachable_target_propagates_out_of_route() {
    let (segments, incidents) = scoring_inputs();
    let table = build_risk_table(&segments, &incidents, &RiskConfig::default()).unwrap();

    let nodes = vec![
        NodeRecord {
            id: 1,
            lat: 43.6500,
            lon: -79.38,
        },
        NodeRecord {
            id: 2,
            lat: 43.6506,
            lon: -79.38,
        },
        NodeRecord {
            id: 9,
            lat: 43.7500,
            lon: -79.20,
        },
    ];
    let edges = vec![EdgeRecord {
        u: 1,
        v: 2,
        length: 100.0,
        geometry: vec![[-79.38, 43.6500], [-79.38, 43.6506]],
        osm_ids: vec!["ab".into()],
    }];
    let mut graph = build_walk_graph(nodes, edges).unwrap();
    graph.attach_risk(&table, DEFAULT_NEUTRAL_RISK);

    let request = RouteRequest::new(43.6500, -79.38, 43.7500, -79.20);
    let result = route(&graph, &request);

    assert!(matches!(result, Err(Error::Unreachable { from: 1, to: 9 })));
}

#[test]
fn invalid_inputs_are_rejected_before_snapping() {
    let graph = scored_graph();

    let bad_lat = RouteRequest::new(95.0, -79.38, 43.6512, -79.38);
    assert!(matches!(
        route(&graph, &bad_lat),
        Err(Error::InvalidCoordinate(_))
    ));

    let bad_lambda = RouteRequest::new(43.6500, -79.38, 43.6512, -79.38).with_lambda(-1.0);
    assert!(matches!(
        route(&graph, &bad_lambda),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn geojson_output_carries_the_summary_properties() {
    let graph = scored_graph();
    let request = RouteRequest::new(43.6500, -79.38, 43.6512, -79.38);

    let feature = route(&graph, &request).unwrap().to_geojson();

    assert!(feature.geometry.is_some());
    let properties = feature.properties.unwrap();
    for key in ["path_nodes", "distance_m", "time_min", "avg_risk"] {
        assert!(properties.contains_key(key), "missing property {key}");
    }
}
