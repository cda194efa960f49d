//! Per-request edge costs
//!
//! The graph is shared read-only across requests, so traversal costs
//! are never written into it. Each request computes its own overlay,
//! a dense vector indexed by edge index, and hands it to the search.
//! Requests with different risk tolerances can therefore run
//! concurrently on one graph.

use petgraph::graph::EdgeIndex;

use crate::{Error, model::WalkGraph};

/// Traversal cost for every edge of one graph under one risk-tolerance
/// coefficient: `cost = length * (1 + lambda * risk)`.
pub struct CostOverlay {
    costs: Vec<f64>,
    lambda: f64,
}

impl CostOverlay {
    /// Compute costs for every edge of `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative or non-finite `lambda`, which
    /// would break cost monotonicity and heuristic admissibility.
    pub fn build(graph: &WalkGraph, lambda: f64) -> Result<Self, Error> {
        validate_risk_tolerance(lambda)?;

        let costs = graph
            .graph
            .edge_references()
            .map(|edge| edge.weight().traversal_cost(lambda))
            .collect();

        Ok(Self { costs, lambda })
    }

    /// Cost of an edge. Only valid for edge indices of the graph the
    /// overlay was built from.
    pub fn cost(&self, edge: EdgeIndex) -> f64 {
        self.costs[edge.index()]
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

pub(crate) fn validate_risk_tolerance(lambda: f64) -> Result<(), Error> {
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "risk tolerance must be finite and non-negative, got {lambda}"
        )));
    }
    Ok(())
}
