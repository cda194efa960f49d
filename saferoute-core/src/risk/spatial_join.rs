//! Spatial join of incident points onto buffered street segments
//!
//! Each segment is conceptually expanded into a buffer polygon and
//! incidents falling inside it are counted per category. The
//! implementation skips materializing polygons: a point lies within the
//! buffer of a polyline exactly when its Euclidean distance to the
//! polyline is at most the buffer distance. An R-tree over the incident
//! points prunes candidates to each segment's expanded bounding box.
//!
//! Buffers of nearby segments overlap, so one incident may count toward
//! several segments. That is intended: the incident raises the risk of
//! every street it is close to.

use geo::{BoundingRect, Distance, Euclidean, Point};
use rayon::prelude::*;
use rstar::{AABB, RTree, primitives::GeomWithData};

use crate::Error;

use super::{IncidentCategory, IncidentRecord, SegmentRecord};

type IncidentPoint = GeomWithData<[f64; 2], IncidentCategory>;

/// Per-segment incident counts, one field per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncidentCounts {
    pub assault: u32,
    pub collision: u32,
}

/// Count, for every segment, the incidents within `buffer_distance`
/// meters of its geometry. Output order matches the segment order.
///
/// # Errors
///
/// Empty segment or incident inputs and degenerate or non-finite
/// geometries are data-validation errors; they are never skipped
/// silently.
pub fn count_incidents(
    segments: &[SegmentRecord],
    incidents: &[IncidentRecord],
    buffer_distance: f64,
) -> Result<Vec<IncidentCounts>, Error> {
    if !buffer_distance.is_finite() || buffer_distance <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "buffer distance must be positive, got {buffer_distance}"
        )));
    }
    if segments.is_empty() {
        return Err(Error::InvalidData(
            "no street segments to score".to_string(),
        ));
    }
    if incidents.is_empty() {
        return Err(Error::InvalidData("no incident records".to_string()));
    }
    validate_inputs(segments, incidents)?;

    let tree: RTree<IncidentPoint> = RTree::bulk_load(
        incidents
            .iter()
            .map(|incident| {
                IncidentPoint::new(
                    [incident.location.x(), incident.location.y()],
                    incident.category,
                )
            })
            .collect(),
    );

    // Independent per segment, so counting parallelizes trivially.
    let counts = segments
        .par_iter()
        .map(|segment| count_for_segment(segment, &tree, buffer_distance))
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(counts)
}

fn count_for_segment(
    segment: &SegmentRecord,
    tree: &RTree<IncidentPoint>,
    buffer_distance: f64,
) -> Result<IncidentCounts, Error> {
    let rect = segment.geometry.bounding_rect().ok_or_else(|| {
        Error::InvalidData(format!("segment {} has empty geometry", segment.osm_id))
    })?;

    let envelope = AABB::from_corners(
        [rect.min().x - buffer_distance, rect.min().y - buffer_distance],
        [rect.max().x + buffer_distance, rect.max().y + buffer_distance],
    );

    let mut counts = IncidentCounts::default();
    for candidate in tree.locate_in_envelope(&envelope) {
        let point = Point::new(candidate.geom()[0], candidate.geom()[1]);
        if Euclidean.distance(&point, &segment.geometry) <= buffer_distance {
            match candidate.data {
                IncidentCategory::Assault => counts.assault += 1,
                IncidentCategory::Collision => counts.collision += 1,
            }
        }
    }

    Ok(counts)
}

fn validate_inputs(segments: &[SegmentRecord], incidents: &[IncidentRecord]) -> Result<(), Error> {
    for segment in segments {
        if segment.geometry.0.len() < 2 {
            return Err(Error::InvalidData(format!(
                "segment {} has fewer than two coordinates",
                segment.osm_id
            )));
        }
        if segment
            .geometry
            .coords()
            .any(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(Error::InvalidData(format!(
                "segment {} has non-finite coordinates",
                segment.osm_id
            )));
        }
    }
    for incident in incidents {
        if !incident.location.x().is_finite() || !incident.location.y().is_finite() {
            return Err(Error::InvalidData(
                "incident record has non-finite coordinates".to_string(),
            ));
        }
    }
    Ok(())
}
