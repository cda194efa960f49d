//! Risk-aware pedestrian routing over a street network.
//!
//! The crate covers two pipelines. The offline scoring pipeline
//! ([`risk`]) counts historical incidents near each street segment,
//! normalizes the counts and blends them into a per-segment risk score.
//! The request-time routing pipeline ([`routing`]) snaps coordinates to
//! the street graph, annotates every edge with a distance/risk cost and
//! finds the minimum-cost path with Dijkstra or A*.
//!
//! Street graphs and incident tables are produced by an external ETL
//! step; [`loading`] reads its output formats.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod risk;
pub mod routing;

pub use error::Error;

/// Pedestrian walking speed in meters per second, used for travel time
/// estimates.
pub const WALKING_SPEED: f64 = 1.4;

/// Risk assigned to edges whose segment identifiers are absent from the
/// risk table. 0.5 is deliberately non-committal: buffered scoring
/// leaves some segments without a score and they should neither attract
/// nor repel routes.
pub const DEFAULT_NEUTRAL_RISK: f64 = 0.5;

/// Default risk-tolerance coefficient for route requests.
pub const DEFAULT_RISK_TOLERANCE: f64 = 0.5;
