use std::f64::consts::TAU;

use toy_core::paint::{Fill, Glow, Gradient, GradientKind, Painter, Rgba, Stroke};
use toy_core::{PathCmd, Point, TrailPath, Viewport};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    set_style(ctx, "fillStyle", &JsValue::from_str(color));
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    set_style(ctx, "strokeStyle", &JsValue::from_str(color));
}

fn set_style(ctx: &CanvasRenderingContext2d, prop: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str(prop), value);
}

/// `Painter` over a 2D context whose transform already maps CSS pixels
/// to the backing store.
pub struct CanvasPainter<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasPainter<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, viewport: Viewport, dpr: f64) -> Self {
        let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
        CanvasPainter { ctx }
    }

    fn shadow(&self, color: Rgba, blur: f64, offset_y: f64) {
        self.ctx.set_shadow_color(&color.css());
        self.ctx.set_shadow_blur(blur);
        self.ctx.set_shadow_offset_y(offset_y);
    }

    fn no_shadow(&self) {
        self.ctx.set_shadow_blur(0.0);
        self.ctx.set_shadow_offset_y(0.0);
        self.ctx.set_shadow_color("transparent");
    }

    fn round_line(&self, stroke: &Stroke) {
        set_stroke_style(self.ctx, &stroke.color.css());
        self.ctx.set_line_width(stroke.width);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        if stroke.blur > 0.0 {
            self.shadow(stroke.color, stroke.blur, 0.0);
        }
    }
}

impl Painter for CanvasPainter<'_> {
    fn fill_backdrop(&mut self, gradient: &Gradient, viewport: Viewport) {
        let (w, h) = (viewport.width, viewport.height);
        let grad = match gradient.kind {
            GradientKind::Linear => Some(self.ctx.create_linear_gradient(0.0, 0.0, 0.0, h)),
            GradientKind::Radial { cx, cy } => {
                let (x, y) = (cx * w, cy * h);
                let r = x.max(w - x).hypot(y.max(h - y)).max(1.0);
                self.ctx.create_radial_gradient(x, y, 0.0, x, y, r).ok()
            }
        };
        match grad {
            Some(grad) => {
                for stop in &gradient.stops {
                    let _ = grad.add_color_stop(stop.at as f32, &stop.color.css());
                }
                set_style(self.ctx, "fillStyle", grad.as_ref());
            }
            None => {
                if let Some(first) = gradient.stops.first() {
                    set_fill_style(self.ctx, &first.color.css());
                }
            }
        }
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn stroke_path(&mut self, path: &TrailPath, stroke: &Stroke) {
        self.ctx.begin_path();
        for cmd in &path.cmds {
            match *cmd {
                PathCmd::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathCmd::QuadTo { ctrl, to } => {
                    self.ctx.quadratic_curve_to(ctrl.x, ctrl.y, to.x, to.y)
                }
                PathCmd::LineTo(p) => self.ctx.line_to(p.x, p.y),
            }
        }
        self.round_line(stroke);
        self.ctx.stroke();
        self.no_shadow();
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.round_line(stroke);
        self.ctx.stroke();
        self.no_shadow();
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius, 0.0, TAU).is_err() {
            return;
        }
        set_fill_style(self.ctx, &fill.color.css());
        if fill.blur > 0.0 {
            self.shadow(fill.color, fill.blur, 0.0);
        }
        self.ctx.fill();
        self.no_shadow();
    }

    fn draw_glyph(
        &mut self,
        glyph: &str,
        center: Point,
        size_px: f64,
        color: Option<Rgba>,
        glows: &[Glow],
    ) {
        self.ctx.set_font(&format!("{size_px}px sans-serif"));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        set_fill_style(self.ctx, &color.unwrap_or(Rgba::rgb(0, 0, 0)).css());
        if glows.is_empty() {
            let _ = self.ctx.fill_text(glyph, center.x, center.y);
        }
        // One pass per shadow; the canvas holds a single shadow at a time.
        for g in glows {
            self.shadow(g.color, g.blur, g.offset_y);
            let _ = self.ctx.fill_text(glyph, center.x, center.y);
        }
        self.no_shadow();
    }
}
