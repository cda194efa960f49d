//! Offline risk-scoring pipeline
//!
//! Counts historical incidents near each street segment, normalizes the
//! per-category counts across all segments and blends them into a
//! single risk score per segment. The resulting [`RiskTable`] is built
//! once and consumed read-only by routing.

pub mod scorer;
pub mod spatial_join;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::{LineString, Point};
use hashbrown::HashMap;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_NEUTRAL_RISK, Error};

pub use spatial_join::{IncidentCounts, count_incidents};

/// Incident category recognized by the scoring pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentCategory {
    Assault,
    Collision,
}

/// A single historical incident.
///
/// Coordinates must be in the same projected planar CRS as the segment
/// geometries being scored, so that buffer distances are Euclidean
/// meters. Records are discarded after counting; they are never part of
/// the routing graph.
#[derive(Debug, Clone)]
pub struct IncidentRecord {
    pub category: IncidentCategory,
    pub location: Point<f64>,
}

/// A street segment submitted for scoring, keyed by its external
/// identifier. Geometry in the same projected CRS as the incidents.
#[derive(Debug, Clone)]
pub struct SegmentRecord {
    pub osm_id: String,
    pub geometry: LineString<f64>,
}

/// Tunable parameters of the scoring pipeline.
///
/// The defaults (150 m buffer, 0.7/0.3 category weights) reproduce the
/// original calibration but carry no special justification, hence
/// configuration rather than constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Buffer distance around each segment, in projected-CRS meters
    pub buffer_distance: f64,
    /// Weight of the assault score in the blended risk
    pub assault_weight: f64,
    /// Weight of the collision score in the blended risk
    pub collision_weight: f64,
    /// Risk used for edges absent from the risk table
    pub neutral_risk: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            buffer_distance: 150.0,
            assault_weight: 0.7,
            collision_weight: 0.3,
            neutral_risk: DEFAULT_NEUTRAL_RISK,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.buffer_distance.is_finite() || self.buffer_distance <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "buffer distance must be positive, got {}",
                self.buffer_distance
            )));
        }
        if self.assault_weight < 0.0 || self.collision_weight < 0.0 {
            return Err(Error::InvalidParameter(
                "category weights must be non-negative".to_string(),
            ));
        }
        let total = self.assault_weight + self.collision_weight;
        if (total - 1.0).abs() > 1e-9 {
            return Err(Error::InvalidParameter(format!(
                "category weights must sum to 1.0, got {total}"
            )));
        }
        if !(0.0..=1.0).contains(&self.neutral_risk) {
            return Err(Error::InvalidParameter(format!(
                "neutral risk must be in [0, 1], got {}",
                self.neutral_risk
            )));
        }
        Ok(())
    }
}

/// Mapping from external segment identifier to blended risk in [0, 1]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskTable {
    scores: HashMap<String, f64>,
}

impl RiskTable {
    pub fn get(&self, osm_id: &str) -> Option<f64> {
        self.scores.get(osm_id).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(id, risk)| (id.as_str(), *risk))
    }

    /// Load a previously built table from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains risk
    /// values outside [0, 1].
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        let table: Self = serde_json::from_reader(BufReader::new(file))?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), Error> {
        for (id, risk) in &self.scores {
            if !risk.is_finite() || !(0.0..=1.0).contains(risk) {
                return Err(Error::InvalidData(format!(
                    "risk for segment {id} is {risk}, expected a value in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, f64)> for RiskTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Run the full scoring pipeline: spatial join, normalization and
/// weighted combination.
///
/// # Errors
///
/// Returns an error on an invalid configuration or on malformed/empty
/// segment or incident inputs.
pub fn build_risk_table(
    segments: &[SegmentRecord],
    incidents: &[IncidentRecord],
    config: &RiskConfig,
) -> Result<RiskTable, Error> {
    config.validate()?;

    info!(
        "Scoring {} segments against {} incidents (buffer {} m)",
        segments.len(),
        incidents.len(),
        config.buffer_distance
    );

    let counts = count_incidents(segments, incidents, config.buffer_distance)?;
    let table = scorer::score_segments(segments, &counts, config);

    info!("Risk table built with {} entries", table.len());
    Ok(table)
}
