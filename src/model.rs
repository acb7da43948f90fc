//! Diagram data model.
//!
//! A [`DiagramState`] is produced wholesale by the generator from a parameter
//! snapshot and never mutated in place; animation produces fresh interpolated
//! states. Connection order is the render layering order (generation order:
//! node index outer loop, per-node edge loop inner).

use kurbo::Point;

/// Rectangular diagram element with position, size, and an optional label.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// 0-based, contiguous index at generation time.
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: Option<String>,
}

impl Node {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Directed curved link between two nodes (possibly the same node).
///
/// `from`/`to` reference node ids in the same state; this holds by
/// construction and is not re-validated downstream — renderers silently skip
/// connections with missing references.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Connection {
    /// Unique within a state, monotonically assigned across the whole
    /// generation pass.
    pub id: u32,
    pub from: u32,
    pub to: u32,
    pub curve: f64,
    pub dashed: bool,
    pub has_arrow: bool,
    pub control1: Point,
    pub control2: Point,
}

/// One generated diagram: nodes plus connections, immutable once produced.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DiagramState {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl DiagramState {
    pub fn node(&self, id: u32) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_center() {
        let n = Node {
            id: 0,
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 40.0,
            label: None,
        };
        assert_eq!(n.center(), Point::new(60.0, 40.0));
    }

    #[test]
    fn node_lookup_by_id() {
        let state = DiagramState {
            nodes: vec![
                Node {
                    id: 0,
                    x: 0.0,
                    y: 0.0,
                    width: 1.0,
                    height: 1.0,
                    label: None,
                },
                Node {
                    id: 1,
                    x: 5.0,
                    y: 5.0,
                    width: 1.0,
                    height: 1.0,
                    label: Some("b".into()),
                },
            ],
            connections: vec![],
        };
        assert_eq!(state.node(1).unwrap().label.as_deref(), Some("b"));
        assert!(state.node(7).is_none());
    }

    #[test]
    fn state_json_roundtrip() {
        let state = DiagramState {
            nodes: vec![Node {
                id: 0,
                x: 1.5,
                y: 2.5,
                width: 80.0,
                height: 40.0,
                label: Some("start".into()),
            }],
            connections: vec![Connection {
                id: 0,
                from: 0,
                to: 0,
                curve: 0.4,
                dashed: true,
                has_arrow: false,
                control1: Point::new(3.0, 4.0),
                control2: Point::new(5.0, 6.0),
            }],
        };
        let s = serde_json::to_string(&state).unwrap();
        let de: DiagramState = serde_json::from_str(&s).unwrap();
        assert_eq!(de, state);
    }
}
