//! Pedestrian street network model

pub mod components;
pub mod graph;

pub use components::{WalkEdge, WalkNode};
pub use graph::{IndexedPoint, WalkGraph};
