//! Vector document backend.
//!
//! Emits a plain-text SVG document: background rectangle, then one path per
//! drawable connection (plus an arrow path when flagged), then node
//! rectangles, then label text. Connections come before nodes so nodes render
//! above them; within each group the state's stored order is kept.

use std::fmt::Write as _;

use crate::{
    error::{NodelinkError, NodelinkResult},
    model::DiagramState,
    params::DiagramParams,
    render::connection_geometry,
    text::layout_label,
};

/// Fixed monospace stack for label text; matches the advance model used by
/// the shared layout.
const FONT_FAMILY: &str = "ui-monospace, SFMono-Regular, Menlo, Consolas, monospace";

/// Vector backend: renders diagram states to an SVG document string.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: Option<String>,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `state` and retain the document for [`Self::document`].
    pub fn draw(&mut self, state: &DiagramState, params: &DiagramParams) {
        self.document = Some(render_svg(state, params));
    }

    /// The most recently rendered document. Exporting before any render is a
    /// reported failure, never a panic.
    pub fn document(&self) -> NodelinkResult<&str> {
        self.document
            .as_deref()
            .ok_or_else(|| NodelinkError::export("no diagram has been rendered yet"))
    }
}

/// Render one diagram state as a standalone SVG document.
pub fn render_svg(state: &DiagramState, params: &DiagramParams) -> String {
    let width = params.canvas_width;
    let height = params.canvas_height;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        params.background_color
    );

    for conn in &state.connections {
        let Some(geom) = connection_geometry(state, conn, params) else {
            continue;
        };

        let dash = if geom.dashed {
            format!(
                r#" stroke-dasharray="{:.2},{:.2}""#,
                params.dash_length, params.dash_gap
            )
        } else {
            String::new()
        };
        let _ = write!(
            svg,
            r#"<path d="M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}" fill="none" stroke="{}" stroke-width="{:.2}"{}/>"#,
            geom.start.x,
            geom.start.y,
            geom.control1.x,
            geom.control1.y,
            geom.control2.x,
            geom.control2.y,
            geom.end.x,
            geom.end.y,
            params.stroke_color,
            params.connection_thickness,
            dash
        );

        if let Some(arrow) = geom.arrow {
            let _ = write!(
                svg,
                r#"<path d="M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} Z" fill="{}"/>"#,
                arrow.tip.x,
                arrow.tip.y,
                arrow.wing1.x,
                arrow.wing1.y,
                arrow.wing2.x,
                arrow.wing2.y,
                params.stroke_color
            );
        }
    }

    for node in &state.nodes {
        let rx = if params.node_roundness > 0.0 {
            format!(r#" rx="{:.2}""#, params.node_roundness)
        } else {
            String::new()
        };
        let _ = write!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"{} fill="{}" stroke="{}" stroke-width="{:.2}"/>"#,
            node.x,
            node.y,
            node.width,
            node.height,
            rx,
            params.fill_color,
            params.stroke_color,
            params.node_thickness
        );
    }

    for node in &state.nodes {
        let Some(label) = node.label.as_deref() else {
            continue;
        };
        let Some(layout) = layout_label(label, node.width, node.height) else {
            continue;
        };
        let center = node.center();
        for (line, offset) in layout.lines.iter().zip(layout.line_offsets()) {
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" text-anchor="middle" dominant-baseline="middle" fill="{}">{}</text>"#,
                center.x,
                center.y + offset,
                FONT_FAMILY,
                layout.font_size,
                params.stroke_color,
                xml_escape(line)
            );
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Escape text content for XML. Ampersand must be replaced first; any other
/// order double-escapes the entities introduced by later substitutions.
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_order_avoids_double_escaping() {
        assert_eq!(xml_escape("a & b"), "a &amp; b");
        assert_eq!(xml_escape("<x>"), "&lt;x&gt;");
        assert_eq!(xml_escape(r#""q" & 'a'"#), "&quot;q&quot; &amp; &apos;a&apos;");
        // An already-escaped entity gains exactly one more level.
        assert_eq!(xml_escape("&lt;"), "&amp;lt;");
    }

    #[test]
    fn export_before_render_is_an_error() {
        let renderer = SvgRenderer::new();
        assert!(matches!(
            renderer.document(),
            Err(NodelinkError::Export(_))
        ));
    }
}
