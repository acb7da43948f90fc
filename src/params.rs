//! Flat parameter set driving generation, rendering, and animation.
//!
//! Every field is independently adjustable; the generator clamps internally
//! where needed, so no cross-field validation happens here. `node_titles` is
//! the one soft coupling — it is sized to `node_count` by convention.

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DiagramParams {
    // Complexity / structure.
    pub node_count: u32,
    pub connection_density: f64,
    pub branching_factor: f64,
    pub multi_connection_chance: f64,
    pub self_loop_chance: f64,
    pub backward_connection_freq: f64,
    pub cluster_tendency: f64,
    pub morph_complexity: f64,

    // Layout.
    pub layout_spread: f64,
    pub position_jitter: f64,
    pub horizontal_bias: f64,
    pub vertical_bias: f64,
    pub flow_directionality: f64,
    pub downward_bias: f64,
    pub rightward_bias: f64,

    // Node size / shape.
    pub node_min_width: f64,
    pub node_max_width: f64,
    pub node_min_height: f64,
    pub node_max_height: f64,
    pub size_variation: f64,
    pub node_scale: f64,
    pub node_roundness: f64,
    pub node_thickness: f64,

    // Connection styling.
    pub connection_thickness: f64,
    pub curve_intensity: f64,
    pub curve_variation: f64,
    pub curve_smoothing: f64,
    pub control_point_distance: f64,
    pub style_variation: f64,
    pub dashed_frequency: f64,
    pub arrow_frequency: f64,
    pub dash_length: f64,
    pub dash_gap: f64,
    pub arrow_size: f64,
    pub arrow_gap: f64,
    pub parallel_line_offset: f64,

    // Randomness / animation.
    pub random_seed: i64,
    pub animation_speed: f64,

    // Canvas and colors. Colors are opaque style strings (`#rrggbb`) passed
    // through to the vector backend unmodified.
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub stroke_color: String,
    pub fill_color: String,
    pub background_color: String,

    // Per-node labels, indexed by node id. Empty entries mean no label.
    pub node_titles: Vec<String>,
}

impl Default for DiagramParams {
    fn default() -> Self {
        Self {
            node_count: 6,
            connection_density: 0.5,
            branching_factor: 0.5,
            multi_connection_chance: 0.2,
            self_loop_chance: 0.05,
            backward_connection_freq: 0.15,
            cluster_tendency: 0.3,
            morph_complexity: 0.5,

            layout_spread: 0.5,
            position_jitter: 0.3,
            horizontal_bias: 0.5,
            vertical_bias: 0.5,
            flow_directionality: 0.7,
            downward_bias: 0.5,
            rightward_bias: 0.5,

            node_min_width: 80.0,
            node_max_width: 160.0,
            node_min_height: 40.0,
            node_max_height: 80.0,
            size_variation: 0.5,
            node_scale: 1.0,
            node_roundness: 6.0,
            node_thickness: 2.0,

            connection_thickness: 1.5,
            curve_intensity: 0.5,
            curve_variation: 0.3,
            curve_smoothing: 0.5,
            control_point_distance: 0.4,
            style_variation: 0.3,
            dashed_frequency: 0.3,
            arrow_frequency: 0.7,
            dash_length: 6.0,
            dash_gap: 4.0,
            arrow_size: 8.0,
            arrow_gap: 6.0,
            parallel_line_offset: 12.0,

            random_seed: 42,
            animation_speed: 1.0,

            canvas_width: 800,
            canvas_height: 600,
            stroke_color: "#333333".to_string(),
            fill_color: "#f5f5f5".to_string(),
            background_color: "#ffffff".to_string(),

            node_titles: Vec::new(),
        }
    }
}

/// Parse `#rgb` / `#rrggbb` into RGBA8 (alpha 255). Unrecognized strings map
/// to `None`; the raster backend falls back to opaque black.
pub fn parse_hex_color(s: &str) -> Option<[u8; 4]> {
    let hex = s.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut out = [0u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v << 4 | v;
            }
            out[3] = 255;
            Some(out)
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b, 255])
        }
        _ => None,
    }
}
