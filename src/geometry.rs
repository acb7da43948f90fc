//! Shared geometric kernel.
//!
//! Both render backends must use these functions; a divergent
//! reimplementation in either backend is a correctness bug, not an acceptable
//! variation.

use kurbo::{CubicBez, ParamCurve, ParamCurveDeriv, Point, Vec2};

use crate::model::Node;

/// Intersection of the ray from `node`'s center toward `target` with the
/// node's rectangle edge, pushed `gap` further along the same angle.
///
/// Edge choice compares `|cos|` against `|sin|` scaled by the rectangle's
/// aspect ratio: the ray exits left/right when `|sin| * width <= |cos| *
/// height`, top/bottom otherwise. The result sits just outside the node
/// boundary rather than at its geometric center.
pub fn edge_intersection(node: &Node, target: Point, gap: f64) -> Point {
    let center = node.center();
    let angle = (target.y - center.y).atan2(target.x - center.x);
    let (sin, cos) = angle.sin_cos();

    let half_w = node.width / 2.0;
    let half_h = node.height / 2.0;

    let edge = if sin.abs() * node.width <= cos.abs() * node.height {
        // Left or right edge.
        let t = half_w / cos.abs();
        Point::new(center.x + half_w * cos.signum(), center.y + sin * t)
    } else {
        // Top or bottom edge.
        let t = half_h / sin.abs();
        Point::new(center.x + cos * t, center.y + half_h * sin.signum())
    };

    Point::new(edge.x + gap * cos, edge.y + gap * sin)
}

/// Point on the cubic bezier `(p0, p1, p2, p3)` at parameter `t`.
pub fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    CubicBez::new(p0, p1, p2, p3).eval(t)
}

/// First derivative of the cubic at `t`: a non-normalized direction vector,
/// used only for angles via `atan2`.
pub fn cubic_tangent(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Vec2 {
    CubicBez::new(p0, p1, p2, p3).deriv().eval(t).to_vec2()
}
