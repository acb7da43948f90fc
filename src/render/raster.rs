//! Raster backend: draws diagram states onto a `vello_cpu` pixmap.
//!
//! Stroking (including dash patterns) is expanded with `kurbo::stroke` into
//! fill outlines, so the pixel pipeline only ever fills paths. Label glyphs
//! are shaped with Parley from caller-supplied monospace font bytes; when no
//! font is configured, labels are skipped and everything else still renders.

use kurbo::{Affine, Rect, RoundedRect, Shape, Stroke, StrokeOpts};

use crate::{
    error::{NodelinkError, NodelinkResult},
    model::{DiagramState, Node},
    params::{DiagramParams, parse_hex_color},
    render::connection_geometry,
    text::layout_label,
};

/// Flattening tolerance for stroke expansion and rounded corners.
const TOLERANCE: f64 = 0.25;

/// One rendered frame in row-major premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Unit brush for Parley layouts; label color is uniform per diagram, so the
/// paint is set once per glyph run instead of per-style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct LabelBrush;

/// Parley shaping state plus the registered label font.
struct LabelFont {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<LabelBrush>,
    font_data: vello_cpu::peniko::FontData,
    family_name: String,
}

impl LabelFont {
    fn new(bytes: Vec<u8>) -> NodelinkResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            NodelinkError::validation("no font families registered from label font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| NodelinkError::validation("registered label font has no family name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            font_data,
            family_name,
        })
    }

    /// Shape a single pre-wrapped line at the given size.
    fn layout_line(&mut self, line: &str, size_px: f32) -> parley::Layout<LabelBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, line, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(LabelBrush));
        let mut layout: parley::Layout<LabelBrush> = builder.build(line);
        layout.break_all_lines(None);
        layout
    }
}

/// Pixel-surface backend.
pub struct RasterRenderer {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    label_font: Option<LabelFont>,
    rendered: bool,
}

impl RasterRenderer {
    pub fn new(width: u32, height: u32) -> NodelinkResult<Self> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| NodelinkError::render("canvas width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| NodelinkError::render("canvas height exceeds u16"))?;
        Ok(Self {
            width: width_u16,
            height: height_u16,
            pixmap: vello_cpu::Pixmap::new(width_u16, height_u16),
            label_font: None,
            rendered: false,
        })
    }

    /// Supply raw monospace font bytes for label drawing.
    pub fn set_label_font(&mut self, bytes: Vec<u8>) -> NodelinkResult<()> {
        self.label_font = Some(LabelFont::new(bytes)?);
        Ok(())
    }

    /// Render `state` into the pixmap, replacing the previous frame.
    pub fn draw(&mut self, state: &DiagramState, params: &DiagramParams) -> NodelinkResult<()> {
        self.ensure_surface(params.canvas_width, params.canvas_height)?;

        let background = parse_hex_color(&params.background_color).unwrap_or([0, 0, 0, 255]);
        let stroke_color = color_from(&params.stroke_color);
        let fill_color = color_from(&params.fill_color);

        clear_pixmap(&mut self.pixmap, premul_rgba8(background));

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);

        // Connections first so nodes render above them.
        for conn in &state.connections {
            let Some(geom) = connection_geometry(state, conn, params) else {
                continue;
            };

            let mut path = kurbo::BezPath::new();
            path.move_to(geom.start);
            path.curve_to(geom.control1, geom.control2, geom.end);

            let mut style = Stroke::new(params.connection_thickness);
            if geom.dashed {
                style = style.with_dashes(0.0, [params.dash_length, params.dash_gap]);
            }
            let outline = kurbo::stroke(path, &style, &StrokeOpts::default(), TOLERANCE);

            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(stroke_color);
            ctx.fill_path(&bezpath_to_cpu(&outline));

            if let Some(arrow) = geom.arrow {
                let mut tri = kurbo::BezPath::new();
                tri.move_to(arrow.tip);
                tri.line_to(arrow.wing1);
                tri.line_to(arrow.wing2);
                tri.close_path();
                ctx.fill_path(&bezpath_to_cpu(&tri));
            }
        }

        for node in &state.nodes {
            let rect = Rect::new(node.x, node.y, node.x + node.width, node.y + node.height);
            let shape = if params.node_roundness > 0.0 {
                RoundedRect::from_rect(rect, params.node_roundness).to_path(TOLERANCE)
            } else {
                rect.to_path(TOLERANCE)
            };

            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(fill_color);
            ctx.fill_path(&bezpath_to_cpu(&shape));

            let outline = kurbo::stroke(
                shape,
                &Stroke::new(params.node_thickness),
                &StrokeOpts::default(),
                TOLERANCE,
            );
            ctx.set_paint(stroke_color);
            ctx.fill_path(&bezpath_to_cpu(&outline));
        }

        if let Some(font) = &mut self.label_font {
            for node in &state.nodes {
                draw_label(&mut ctx, font, node, stroke_color);
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        self.rendered = true;
        Ok(())
    }

    /// The most recently rendered frame. Exporting before any render is a
    /// reported failure, never a panic.
    pub fn frame(&self) -> NodelinkResult<FrameRgba> {
        if !self.rendered {
            return Err(NodelinkError::export("no diagram has been rendered yet"));
        }
        Ok(FrameRgba {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn ensure_surface(&mut self, width: u32, height: u32) -> NodelinkResult<()> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| NodelinkError::render("canvas width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| NodelinkError::render("canvas height exceeds u16"))?;
        if self.width != width_u16 || self.height != height_u16 {
            self.width = width_u16;
            self.height = height_u16;
            self.pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
            self.rendered = false;
        }
        Ok(())
    }
}

fn draw_label(
    ctx: &mut vello_cpu::RenderContext,
    font: &mut LabelFont,
    node: &Node,
    color: vello_cpu::peniko::Color,
) {
    let Some(label) = node.label.as_deref() else {
        return;
    };
    let Some(layout) = layout_label(label, node.width, node.height) else {
        return;
    };

    let center = node.center();
    let line_height = layout.line_height();
    let offsets: Vec<f64> = layout.line_offsets().collect();

    for (line, offset) in layout.lines.iter().zip(offsets) {
        let shaped = font.layout_line(line, layout.font_size as f32);

        // Center horizontally with the shared monospace model so raster and
        // vector output agree on placement.
        let origin_x = center.x - layout.line_width(line) / 2.0;
        let origin_y = center.y + offset - line_height / 2.0;
        ctx.set_transform(affine_to_cpu(Affine::translate((origin_x, origin_y))));
        ctx.set_paint(color);

        for shaped_line in shaped.lines() {
            for item in shaped_line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font.font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

fn color_from(hex: &str) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = parse_hex_color(hex).unwrap_or([0, 0, 0, 255]);
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn premul_rgba8([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let af = (a as u16) + 1;
    let premul = |c: u8| -> u8 { (((c as u16) * af) >> 8) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
