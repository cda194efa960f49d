//! Loading of ETL outputs: street graphs, incident tables, risk tables

mod graph;
mod incidents;

use std::path::PathBuf;

use log::info;

use crate::{DEFAULT_NEUTRAL_RISK, Error, model::WalkGraph, risk::RiskTable};

pub use graph::{EdgeRecord, NodeRecord, build_walk_graph, load_walk_graph};
pub use incidents::load_incidents;

/// File locations and defaults for process startup
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Street graph JSON produced by the ETL step
    pub graph_path: PathBuf,
    /// Pre-built risk table JSON; `None` leaves every edge at the
    /// neutral risk
    pub risk_table_path: Option<PathBuf>,
    pub neutral_risk: f64,
}

impl ModelConfig {
    pub fn new(graph_path: impl Into<PathBuf>) -> Self {
        Self {
            graph_path: graph_path.into(),
            risk_table_path: None,
            neutral_risk: DEFAULT_NEUTRAL_RISK,
        }
    }

    pub fn with_risk_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.risk_table_path = Some(path.into());
        self
    }
}

/// Creates a routing model based on the provided configuration: loads
/// the street graph, then attaches risk scores so the graph is ready
/// for concurrent read-only use.
///
/// # Errors
///
/// Returns an error if there are problems reading or validating data
pub fn create_routing_model(config: &ModelConfig) -> Result<WalkGraph, Error> {
    validate_config(config)?;

    info!("Loading street graph: {}", config.graph_path.display());
    let mut graph = load_walk_graph(&config.graph_path)?;

    if let Some(path) = &config.risk_table_path {
        info!("Loading risk table: {}", path.display());
        let table = RiskTable::from_path(path)?;
        graph.attach_risk(&table, config.neutral_risk);
    }

    info!(
        "Routing model ready: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn validate_config(config: &ModelConfig) -> Result<(), Error> {
    if !config.graph_path.exists() {
        return Err(Error::InvalidData(format!(
            "graph file not found: {}",
            config.graph_path.display()
        )));
    }

    if let Some(path) = &config.risk_table_path {
        if !path.exists() {
            return Err(Error::InvalidData(format!(
                "risk table file not found: {}",
                path.display()
            )));
        }
    }

    if !(0.0..=1.0).contains(&config.neutral_risk) {
        return Err(Error::InvalidParameter(format!(
            "neutral risk must be in [0, 1], got {}",
            config.neutral_risk
        )));
    }

    Ok(())
}
