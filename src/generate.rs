//! Deterministic diagram synthesis.
//!
//! `generate` is pure given the parameter snapshot: a fresh [`SeededRandom`]
//! is constructed from `params.random_seed` on every call and threaded through
//! a fixed draw order. The draw order is part of the determinism contract —
//! per node: jitter x, jitter y, spread x, spread y, width, height; per
//! connection candidate: density gate, target-policy branch draws, curve
//! variation, perpendicular offset, dashed, arrow, multi gate, then the
//! mirror edge's dashed and arrow draws. Reordering any of these changes
//! every diagram produced from that point on.

use kurbo::Point;

use crate::{
    model::{Connection, DiagramState, Node},
    params::DiagramParams,
    rng::SeededRandom,
};

/// Canvas margin in layout units; node placement is clamped inside it.
const MARGIN: f64 = 80.0;

/// Generate a complete diagram from a parameter snapshot.
///
/// Infallible for any `node_count >= 1` (lower values are clamped up).
/// Degenerate geometry such as a zero-length chord on a self-loop is legal
/// here; the zero-distance guard belongs to the renderers.
#[tracing::instrument(skip(params), fields(nodes = params.node_count, seed = params.random_seed))]
pub fn generate(params: &DiagramParams) -> DiagramState {
    let mut rng = SeededRandom::new(params.random_seed);
    let count = params.node_count.max(1) as usize;

    let nodes = place_nodes(params, count, &mut rng);
    let connections = synthesize_connections(params, &nodes, &mut rng);

    tracing::debug!(
        nodes = nodes.len(),
        connections = connections.len(),
        "diagram generated"
    );
    DiagramState { nodes, connections }
}

fn place_nodes(params: &DiagramParams, count: usize, rng: &mut SeededRandom) -> Vec<Node> {
    let canvas_w = params.canvas_width as f64;
    let canvas_h = params.canvas_height as f64;
    let span_x = canvas_w - 2.0 * MARGIN;
    let span_y = canvas_h - 2.0 * MARGIN;

    let mut nodes = Vec::with_capacity(count);
    for i in 0..count {
        let base_x = MARGIN + span_x * (i as f64 / count as f64);
        let base_y = canvas_h / 2.0;

        let jitter_x = (rng.random() - 0.5) * params.position_jitter * span_x;
        let jitter_y = (rng.random() - 0.5) * params.position_jitter * span_y;
        let spread_x = (rng.random() - 0.5) * params.layout_spread * span_x;
        let spread_y = (rng.random() - 0.5) * params.layout_spread * span_y;

        // Bias is deterministic: no draw.
        let bias_x = (params.horizontal_bias - 0.5) * span_x * 0.3;
        let bias_y = (params.vertical_bias - 0.5) * span_y * 0.3;

        let size_w = params.node_min_width
            + (params.node_max_width - params.node_min_width) * params.size_variation;
        let size_h = params.node_min_height
            + (params.node_max_height - params.node_min_height) * params.size_variation;
        let width = rng.range(params.node_min_width, size_w) * params.node_scale;
        let height = rng.range(params.node_min_height, size_h) * params.node_scale;

        let x = (base_x + jitter_x + spread_x + bias_x)
            .clamp(MARGIN, (canvas_w - MARGIN - width).max(MARGIN));
        let y = (base_y + jitter_y + spread_y + bias_y)
            .clamp(MARGIN, (canvas_h - MARGIN - height).max(MARGIN));

        let label = params
            .node_titles
            .get(i)
            .filter(|t| !t.is_empty())
            .cloned();

        nodes.push(Node {
            id: i as u32,
            x,
            y,
            width,
            height,
            label,
        });
    }
    nodes
}

fn synthesize_connections(
    params: &DiagramParams,
    nodes: &[Node],
    rng: &mut SeededRandom,
) -> Vec<Connection> {
    let count = nodes.len();
    let candidates =
        (1.0 + params.connection_density * params.branching_factor * 5.0).floor() as usize;

    let mut connections = Vec::new();
    let mut next_id = 0u32;

    for i in 0..count {
        for _ in 0..candidates {
            // The density gate consumes a draw even when it skips.
            if rng.random() > params.connection_density {
                continue;
            }

            let target = pick_target(params, i, count, rng);

            let from_center = nodes[i].center();
            let to_center = nodes[target].center();
            let dx = to_center.x - from_center.x;
            let dy = to_center.y - from_center.y;
            let distance = (dx * dx + dy * dy).sqrt();

            let curve_factor =
                params.curve_intensity * (1.0 + (rng.random() - 0.5) * params.curve_variation);
            // Zero-length chords (self-loops) get a zero perpendicular rather
            // than NaN so states stay comparable; the renderer skips them.
            let (perp_x, perp_y) = if distance > 0.0 {
                (-dy / distance, dx / distance)
            } else {
                (0.0, 0.0)
            };
            let offset = distance * curve_factor * (rng.random() - 0.5);

            let control1 = Point::new(
                from_center.x + dx * 0.33 + perp_x * offset * 0.7,
                from_center.y + dy * 0.33 + perp_y * offset * 0.7,
            );
            let control2 = Point::new(
                from_center.x + dx * 0.67 + perp_x * offset * 1.3,
                from_center.y + dy * 0.67 + perp_y * offset * 1.3,
            );

            let dashed = rng.random() < params.dashed_frequency;
            let has_arrow = rng.random() < params.arrow_frequency;

            connections.push(Connection {
                id: next_id,
                from: i as u32,
                to: target as u32,
                curve: curve_factor,
                dashed,
                has_arrow,
                control1,
                control2,
            });
            next_id += 1;

            // Mirrored second edge: offset negated and scaled by 0.6, curve
            // factor scaled by 0.8, style flags drawn independently. The gate
            // draw happens even for self-loops, which are never mirrored.
            let multi = rng.random() < params.multi_connection_chance;
            if multi && target != i {
                let offset2 = -offset * 0.6;
                let control1 = Point::new(
                    from_center.x + dx * 0.33 + perp_x * offset2 * 0.7,
                    from_center.y + dy * 0.33 + perp_y * offset2 * 0.7,
                );
                let control2 = Point::new(
                    from_center.x + dx * 0.67 + perp_x * offset2 * 1.3,
                    from_center.y + dy * 0.67 + perp_y * offset2 * 1.3,
                );
                let dashed = rng.random() < params.dashed_frequency;
                let has_arrow = rng.random() < params.arrow_frequency;

                connections.push(Connection {
                    id: next_id,
                    from: i as u32,
                    to: target as u32,
                    curve: curve_factor * 0.8,
                    dashed,
                    has_arrow,
                    control1,
                    control2,
                });
                next_id += 1;
            }
        }
    }
    connections
}

/// Multi-branch connection-target policy. Each branch consumes its own gate
/// draw when evaluated, whether or not it fires.
fn pick_target(params: &DiagramParams, i: usize, count: usize, rng: &mut SeededRandom) -> usize {
    if rng.random() < params.self_loop_chance {
        return i;
    }
    if rng.random() < params.flow_directionality && i + 1 < count {
        let range = (count as f64 * params.downward_bias * 0.5).floor().max(1.0);
        let step = (rng.random() * range).floor() as usize;
        return (i + 1 + step).min(count - 1);
    }
    if rng.random() < params.backward_connection_freq && i > 0 {
        return (rng.random() * i as f64).floor() as usize;
    }
    let target = (rng.random() * count as f64).floor() as usize;
    let target = target.min(count - 1);
    if target == i { (i + 1) % count } else { target }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(seed: i64) -> DiagramParams {
        DiagramParams {
            node_count: 8,
            random_seed: seed,
            ..DiagramParams::default()
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let p = params(17);
        let a = generate(&p);
        let b = generate(&p);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate(&params(1));
        let b = generate(&params(2));
        assert_ne!(a, b);
    }

    #[test]
    fn node_ids_are_contiguous() {
        let state = generate(&params(5));
        assert_eq!(state.nodes.len(), 8);
        for (i, node) in state.nodes.iter().enumerate() {
            assert_eq!(node.id, i as u32);
        }
    }

    #[test]
    fn connection_ids_strictly_increase_from_zero() {
        let p = DiagramParams {
            connection_density: 1.0,
            branching_factor: 1.0,
            ..params(3)
        };
        let state = generate(&p);
        assert!(!state.connections.is_empty());
        for (i, conn) in state.connections.iter().enumerate() {
            assert_eq!(conn.id, i as u32);
        }
    }

    #[test]
    fn connections_reference_existing_nodes() {
        for seed in 0..20 {
            let state = generate(&params(seed));
            for conn in &state.connections {
                assert!(state.node(conn.from).is_some());
                assert!(state.node(conn.to).is_some());
            }
        }
    }

    #[test]
    fn zero_self_loop_chance_yields_no_self_loops() {
        for seed in 0..20 {
            let p = DiagramParams {
                self_loop_chance: 0.0,
                connection_density: 1.0,
                branching_factor: 1.0,
                ..params(seed)
            };
            let state = generate(&p);
            for conn in &state.connections {
                assert_ne!(conn.from, conn.to, "seed {seed} produced a self-loop");
            }
        }
    }

    #[test]
    fn nodes_stay_inside_margins() {
        for seed in 0..10 {
            let p = DiagramParams {
                position_jitter: 1.0,
                layout_spread: 1.0,
                horizontal_bias: 1.0,
                vertical_bias: 0.0,
                ..params(seed)
            };
            let state = generate(&p);
            for node in &state.nodes {
                assert!(node.x >= MARGIN);
                assert!(node.y >= MARGIN);
            }
        }
    }

    #[test]
    fn single_node_does_not_panic() {
        let p = DiagramParams {
            node_count: 1,
            connection_density: 1.0,
            branching_factor: 1.0,
            self_loop_chance: 0.0,
            ..DiagramParams::default()
        };
        let state = generate(&p);
        assert_eq!(state.nodes.len(), 1);
        // With one node the random fallback bumps i back onto itself.
        for conn in &state.connections {
            assert_eq!(conn.from, 0);
            assert_eq!(conn.to, 0);
        }
    }

    #[test]
    fn labels_come_from_titles() {
        let p = DiagramParams {
            node_count: 3,
            node_titles: vec!["Start".into(), "".into(), "End".into()],
            ..DiagramParams::default()
        };
        let state = generate(&p);
        assert_eq!(state.nodes[0].label.as_deref(), Some("Start"));
        assert_eq!(state.nodes[1].label, None);
        assert_eq!(state.nodes[2].label.as_deref(), Some("End"));
    }
}
