//! Software painter on a tiny-skia pixmap, used for PNG snapshots.

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use tiny_skia as sk;

use crate::catalog::{Scene, Toy};
use crate::config::Config;
use crate::engine::Engine;
use crate::error::SnapshotError;
use crate::geom::{Point, Viewport};
use crate::paint::{Fill, Glow, Gradient, GradientKind, Painter, Rgba, Stroke};
use crate::path::{PathCmd, TrailPath};
use crate::scene::{Decorations, draw_scene};

/// Glyphs are drawn as a disc this fraction of the glyph size; there is no
/// text shaping on the pixmap.
const GLYPH_DISC: f64 = 0.35;

fn sk_color(c: Rgba) -> sk::Color {
    sk::Color::from_rgba8(c.r, c.g, c.b, (c.a.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn solid(c: Rgba) -> sk::Paint<'static> {
    let mut paint = sk::Paint::default();
    paint.set_color(sk_color(c));
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f64) -> sk::Stroke {
    sk::Stroke {
        width: width as f32,
        line_cap: sk::LineCap::Round,
        line_join: sk::LineJoin::Round,
        ..sk::Stroke::default()
    }
}

fn to_sk_path(path: &TrailPath) -> Option<sk::Path> {
    let mut pb = sk::PathBuilder::new();
    for cmd in &path.cmds {
        match *cmd {
            PathCmd::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathCmd::QuadTo { ctrl, to } => {
                pb.quad_to(ctrl.x as f32, ctrl.y as f32, to.x as f32, to.y as f32)
            }
            PathCmd::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
        }
    }
    pb.finish()
}

pub struct PixmapPainter {
    pixmap: sk::Pixmap,
    transform: sk::Transform,
}

impl PixmapPainter {
    /// Pixmap covering `viewport` at `scale` device pixels per CSS pixel.
    pub fn new(viewport: Viewport, scale: f64) -> Result<Self, SnapshotError> {
        let w = (viewport.width * scale).ceil().max(1.0) as u32;
        let h = (viewport.height * scale).ceil().max(1.0) as u32;
        let pixmap = sk::Pixmap::new(w, h).ok_or(SnapshotError::Alloc(w, h))?;
        Ok(PixmapPainter {
            pixmap,
            transform: sk::Transform::from_scale(scale as f32, scale as f32),
        })
    }

    pub fn pixmap(&self) -> &sk::Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA value of a device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Deterministic PNG: fixed filter and compression, straight alpha.
    pub fn encode_png(&self) -> Result<Vec<u8>, SnapshotError> {
        let data: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        let mut buf = Vec::new();
        let mut enc = Encoder::new(&mut buf, self.pixmap.width(), self.pixmap.height());
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        enc.set_filter(FilterType::NoFilter);
        enc.set_compression(Compression::Default);
        {
            let mut writer = enc.write_header()?;
            writer.write_image_data(&data)?;
        }
        Ok(buf)
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        if let Some(path) =
            sk::PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        {
            self.pixmap.fill_path(
                &path,
                &solid(color),
                sk::FillRule::Winding,
                self.transform,
                None,
            );
        }
    }
}

impl Painter for PixmapPainter {
    fn fill_backdrop(&mut self, gradient: &Gradient, viewport: Viewport) {
        let (w, h) = (viewport.width as f32, viewport.height as f32);
        let stops: Vec<sk::GradientStop> = gradient
            .stops
            .iter()
            .map(|s| sk::GradientStop::new(s.at as f32, sk_color(s.color)))
            .collect();
        let shader = match gradient.kind {
            GradientKind::Linear => sk::LinearGradient::new(
                sk::Point::from_xy(0.0, 0.0),
                sk::Point::from_xy(0.0, h),
                stops,
                sk::SpreadMode::Pad,
                sk::Transform::identity(),
            ),
            GradientKind::Radial { cx, cy } => {
                let c = sk::Point::from_xy(cx as f32 * w, cy as f32 * h);
                // Reach the farthest corner, as CSS radial gradients do.
                let rx = c.x.max(w - c.x);
                let ry = c.y.max(h - c.y);
                sk::RadialGradient::new(
                    c,
                    c,
                    rx.hypot(ry).max(1.0),
                    stops,
                    sk::SpreadMode::Pad,
                    sk::Transform::identity(),
                )
            }
        };
        let mut paint = sk::Paint::default();
        match shader {
            Some(shader) => paint.shader = shader,
            None => {
                if let Some(first) = gradient.stops.first() {
                    paint.set_color(sk_color(first.color));
                }
            }
        }
        if let Some(rect) = sk::Rect::from_xywh(0.0, 0.0, w, h) {
            self.pixmap.fill_rect(rect, &paint, self.transform, None);
        }
    }

    fn stroke_path(&mut self, path: &TrailPath, stroke: &Stroke) {
        let Some(sk_path) = to_sk_path(path) else {
            return;
        };
        if stroke.blur > 0.0 {
            // No gaussian blur here; a wider faint pass stands in for it.
            let halo = stroke.color.with_alpha(stroke.color.a * 0.5);
            self.pixmap.stroke_path(
                &sk_path,
                &solid(halo),
                &round_stroke(stroke.width + stroke.blur * 2.0),
                self.transform,
                None,
            );
        }
        self.pixmap.stroke_path(
            &sk_path,
            &solid(stroke.color),
            &round_stroke(stroke.width),
            self.transform,
            None,
        );
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let mut pb = sk::PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &solid(stroke.color),
                &round_stroke(stroke.width),
                self.transform,
                None,
            );
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill) {
        if fill.blur > 0.0 {
            self.fill_disc(center, radius + fill.blur, fill.color.with_alpha(fill.color.a * 0.4));
        }
        self.fill_disc(center, radius, fill.color);
    }

    fn draw_glyph(
        &mut self,
        _glyph: &str,
        center: Point,
        size_px: f64,
        color: Option<Rgba>,
        glows: &[Glow],
    ) {
        let r = size_px * GLYPH_DISC;
        for g in glows.iter().rev() {
            let c = Point::new(center.x, center.y + g.offset_y);
            self.fill_disc(c, r + g.blur / 2.0, g.color.with_alpha(g.color.a * 0.5));
        }
        self.fill_disc(center, r, color.unwrap_or(Rgba::rgb(255, 255, 255)));
    }
}

/// Render a full frame (backdrop, decorations, trail, toy) and encode it.
pub fn snapshot_png(
    engine: &Engine,
    cfg: &Config,
    scene: &Scene,
    toy: &Toy,
    decorations: &Decorations,
    viewport: Viewport,
    t_ms: f64,
) -> Result<Vec<u8>, SnapshotError> {
    let mut painter = PixmapPainter::new(viewport, 1.0)?;
    draw_scene(&mut painter, scene, decorations, viewport, t_ms);
    engine.draw(&mut painter, cfg, toy);
    painter.encode_png()
}
