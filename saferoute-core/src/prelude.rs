pub use crate::{DEFAULT_NEUTRAL_RISK, DEFAULT_RISK_TOLERANCE, WALKING_SPEED};

// Re-export key components
pub use crate::Error;
pub use crate::loading::{ModelConfig, create_routing_model, load_incidents, load_walk_graph};
pub use crate::model::{WalkEdge, WalkGraph, WalkNode};
pub use crate::risk::{
    IncidentCategory, IncidentRecord, RiskConfig, RiskTable, SegmentRecord, build_risk_table,
};
pub use crate::routing::{RouteRequest, RouteResult, SearchStrategy, route};
