//! Cross-state interpolation and easing.
//!
//! Geometry animates continuously while topology and styling flags pop to the
//! target's values immediately. States with mismatched cardinalities
//! interpolate by index-clamping the shorter list to its last element.

use kurbo::Point;

use crate::model::{Connection, DiagramState, Node};

/// Easing curves applied to animation progress before interpolation.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InOutQuad,
    #[default]
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

trait Lerp {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    // Affine form reproduces both endpoints exactly at t=0 and t=1.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a * (1.0 - t) + b * t
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(f64::lerp(&a.x, &b.x, t), f64::lerp(&a.y, &b.y, t))
    }
}

/// Element at `i`, clamped to the last element for out-of-range indices.
fn clamped<T>(items: &[T], i: usize) -> Option<&T> {
    items.get(i).or_else(|| items.last())
}

/// Interpolated state between `source` and `target` at `progress` in `[0,1]`.
///
/// Output cardinality is the larger of the two sides; the shorter side
/// contributes its clamped last element for the excess indices. Continuous
/// fields lerp; discrete fields (`id`, `from`, `to`, `dashed`, `has_arrow`)
/// come from the target, and a node label falls back to the source's when
/// the target has none.
pub fn interpolate(source: &DiagramState, target: &DiagramState, progress: f64) -> DiagramState {
    let t = progress.clamp(0.0, 1.0);

    let node_count = source.nodes.len().max(target.nodes.len());
    let mut nodes = Vec::with_capacity(node_count);
    for i in 0..node_count {
        let (Some(a), Some(b)) = (clamped(&source.nodes, i), clamped(&target.nodes, i)) else {
            // One side is entirely empty; take the other side verbatim.
            let side = clamped(&source.nodes, i).or_else(|| clamped(&target.nodes, i));
            if let Some(n) = side {
                nodes.push(n.clone());
            }
            continue;
        };
        nodes.push(Node {
            id: b.id,
            x: f64::lerp(&a.x, &b.x, t),
            y: f64::lerp(&a.y, &b.y, t),
            width: f64::lerp(&a.width, &b.width, t),
            height: f64::lerp(&a.height, &b.height, t),
            label: b.label.clone().or_else(|| a.label.clone()),
        });
    }

    let conn_count = source.connections.len().max(target.connections.len());
    let mut connections = Vec::with_capacity(conn_count);
    for i in 0..conn_count {
        let (Some(a), Some(b)) = (
            clamped(&source.connections, i),
            clamped(&target.connections, i),
        ) else {
            let side =
                clamped(&source.connections, i).or_else(|| clamped(&target.connections, i));
            if let Some(c) = side {
                connections.push(c.clone());
            }
            continue;
        };
        connections.push(Connection {
            id: b.id,
            from: b.from,
            to: b.to,
            curve: f64::lerp(&a.curve, &b.curve, t),
            dashed: b.dashed,
            has_arrow: b.has_arrow,
            control1: <Point as Lerp>::lerp(&a.control1, &b.control1, t),
            control2: <Point as Lerp>::lerp(&a.control2, &b.control2, t),
        });
    }

    DiagramState { nodes, connections }
}
