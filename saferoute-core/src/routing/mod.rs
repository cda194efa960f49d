//! Request-time routing: cost annotation, path search and assembly

pub mod assembler;
pub mod cost;
pub mod search;

pub use assembler::{RouteRequest, RouteResult, route};
pub use cost::CostOverlay;
pub use search::{PathTrace, SearchStrategy, find_path};
