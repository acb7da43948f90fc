//! Render backends and the geometry assembly they share.
//!
//! Connection geometry (endpoint trimming, control-point rescaling, arrowhead
//! placement) is computed here exactly once so the raster and vector backends
//! cannot drift apart.

pub mod raster;
pub mod svg;

use kurbo::Point;

use crate::{
    geometry::{cubic_point, cubic_tangent, edge_intersection},
    model::{Connection, DiagramState},
    params::DiagramParams,
};

/// Filled triangular arrowhead at the curve midpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowHead {
    pub tip: Point,
    pub wing1: Point,
    pub wing2: Point,
}

/// Drawable form of one connection, shared by both backends.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionGeometry {
    pub start: Point,
    pub end: Point,
    pub control1: Point,
    pub control2: Point,
    pub dashed: bool,
    pub arrow: Option<ArrowHead>,
}

/// Assemble drawing geometry for `conn`, or `None` when the connection must
/// be skipped: missing node reference or zero center-to-center distance
/// (guards the trim-ratio division). A bad connection never fails the whole
/// pass.
pub fn connection_geometry(
    state: &DiagramState,
    conn: &Connection,
    params: &DiagramParams,
) -> Option<ConnectionGeometry> {
    let (Some(from), Some(to)) = (state.node(conn.from), state.node(conn.to)) else {
        tracing::debug!(conn = conn.id, "skipping connection with missing node");
        return None;
    };

    let from_center = from.center();
    let to_center = to.center();
    let distance = from_center.distance(to_center);
    if distance <= 0.0 {
        return None;
    }

    let start = edge_intersection(from, to_center, params.arrow_gap);
    let end = edge_intersection(to, from_center, params.arrow_gap);

    // Trimming shortened the chord relative to the center-to-center span the
    // stored control points were computed against, so re-project them outward
    // from the trimmed endpoints to compensate.
    let start_ratio = from_center.distance(start) / distance;
    let end_ratio = 1.0 - to_center.distance(end) / distance;
    let (control1, control2) = if start_ratio < 1.0 && end_ratio > 0.0 {
        (
            start + (conn.control1 - start) * (1.0 / (1.0 - start_ratio)),
            end + (conn.control2 - end) * (1.0 / end_ratio),
        )
    } else {
        // Trim consumed the whole chord; keep the stored control points.
        (conn.control1, conn.control2)
    };

    let arrow = conn.has_arrow.then(|| {
        // The arrowhead samples the original, non-rescaled control points.
        let tip = cubic_point(start, conn.control1, conn.control2, end, 0.5);
        let tangent = cubic_tangent(start, conn.control1, conn.control2, end, 0.5);
        let angle = tangent.y.atan2(tangent.x);
        let len = params.arrow_size;
        let wing = |a: f64| Point::new(tip.x - len * a.cos(), tip.y - len * a.sin());
        ArrowHead {
            tip,
            wing1: wing(angle - std::f64::consts::FRAC_PI_6),
            wing2: wing(angle + std::f64::consts::FRAC_PI_6),
        }
    });

    Some(ConnectionGeometry {
        start,
        end,
        control1,
        control2,
        dashed: conn.dashed,
        arrow,
    })
}
