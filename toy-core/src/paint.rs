//! Backend-neutral drawing: colors, the `Painter` seam and the trail layers.

use serde::{Deserialize, Serialize};

use crate::catalog::Toy;
use crate::error::ConfigError;
use crate::geom::{Point, Viewport};
use crate::path::TrailPath;

/// sRGB color with straight alpha in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Rgba {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string usable as a canvas fill/stroke style.
    pub fn css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse `#rgb`, `#rrggbb`, `rgb(r,g,b)` or `rgba(r,g,b,a)`; accepts
    /// everything [`Rgba::css`] produces.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let bad = || ConfigError::Color(s.to_string());
        let t = s.trim();
        if let Some(body) = t.strip_prefix("rgba(").or_else(|| t.strip_prefix("rgb(")) {
            return Self::parse_functional(body).ok_or_else(bad);
        }
        let hex = t.strip_prefix('#').ok_or_else(bad)?;
        let digit = |i: usize, len: usize| {
            u8::from_str_radix(hex.get(i..i + len).ok_or_else(bad)?, 16).map_err(|_| bad())
        };
        match hex.len() {
            3 => Ok(Rgba::rgb(
                digit(0, 1)? * 17,
                digit(1, 1)? * 17,
                digit(2, 1)? * 17,
            )),
            6 => Ok(Rgba::rgb(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?)),
            _ => Err(bad()),
        }
    }
}

impl Rgba {
    fn parse_functional(body: &str) -> Option<Self> {
        let parts: Vec<&str> = body.strip_suffix(')')?.split(',').map(str::trim).collect();
        let channel = |i: usize| parts[i].parse::<u8>().ok();
        let a = match parts.len() {
            3 => 1.0,
            4 => parts[3].parse::<f64>().ok().filter(|a| (0.0..=1.0).contains(a))?,
            _ => return None,
        };
        Some(Rgba::rgba(channel(0)?, channel(1)?, channel(2)?, a))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgba::parse(&s)
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.css()
    }
}

/// Round-capped, round-joined stroke. `blur` is a gaussian radius in px.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
    pub blur: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fill {
    pub color: Rgba,
    pub blur: f64,
}

/// Drop shadow behind a glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f64,
    pub offset_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// Ellipse centred at a fraction of the viewport.
    Radial { cx: f64, cy: f64 },
    /// Top to bottom.
    Linear,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub at: f64,
    pub color: Rgba,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
}

/// Drawing surface. Coordinates are CSS pixels; implementations apply
/// their own device scale.
pub trait Painter {
    fn fill_backdrop(&mut self, gradient: &Gradient, viewport: Viewport);
    fn stroke_path(&mut self, path: &TrailPath, stroke: &Stroke);
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke);
    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill);
    fn draw_glyph(
        &mut self,
        glyph: &str,
        center: Point,
        size_px: f64,
        color: Option<Rgba>,
        glows: &[Glow],
    );
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrailStyle {
    #[default]
    Normal,
    Laser,
}

const STRING_DARK: Rgba = Rgba::rgb(0xc8, 0x96, 0x1a);
const STRING_MAIN: Rgba = Rgba::rgb(0xf5, 0xc8, 0x42);
const STRING_SHINE: Rgba = Rgba::rgba(255, 255, 200, 0.45);
const LASER_GLOW: Rgba = Rgba::rgba(255, 80, 80, 0.35);
const LASER_CORE: Rgba = Rgba::rgba(255, 30, 30, 0.95);
const LASER_SHINE: Rgba = Rgba::rgba(255, 200, 200, 0.8);
const RED: Rgba = Rgba::rgb(255, 0, 0);
const LASER_BLUR: f64 = 5.0;

/// Stroke passes for the trail body, drawn in order.
pub fn trail_layers(style: TrailStyle, sw: f64) -> Vec<Stroke> {
    let crisp = |color, width| Stroke {
        color,
        width,
        blur: 0.0,
    };
    match style {
        TrailStyle::Normal => vec![
            crisp(Rgba::rgba(0, 0, 0, 0.3), sw + 3.0),
            crisp(STRING_DARK, sw + 1.0),
            crisp(STRING_MAIN, sw),
            crisp(STRING_SHINE, (sw * 0.3).max(0.5)),
        ],
        TrailStyle::Laser => vec![
            Stroke {
                color: LASER_GLOW,
                width: sw * 3.5,
                blur: LASER_BLUR,
            },
            crisp(LASER_CORE, sw),
            crisp(LASER_SHINE, sw * 0.3),
        ],
    }
}

/// Circles making up the end marker: `(center, radius, fill)`.
pub fn tip_marks(style: TrailStyle, tip: Point, sw: f64) -> Vec<(Point, f64, Fill)> {
    let solid = |color| Fill { color, blur: 0.0 };
    match style {
        TrailStyle::Normal => vec![
            (tip, sw * 2.0, solid(STRING_DARK)),
            (tip, sw * 1.5, solid(STRING_MAIN)),
            (
                Point::new(tip.x - sw * 0.4, tip.y - sw * 0.4),
                sw * 0.5,
                solid(Rgba::rgba(255, 255, 200, 0.6)),
            ),
        ],
        TrailStyle::Laser => vec![(
            tip,
            sw * 2.0,
            Fill {
                color: RED.with_alpha(0.9),
                blur: LASER_BLUR,
            },
        )],
    }
}

pub fn draw_trail<P: Painter + ?Sized>(painter: &mut P, path: &TrailPath, style: TrailStyle) {
    let Some(tip) = path.tip else {
        return;
    };
    let sw = path.stroke_width.max(1.0);
    for stroke in trail_layers(style, sw) {
        painter.stroke_path(path, &stroke);
    }
    for (center, radius, fill) in tip_marks(style, tip, sw) {
        painter.fill_circle(center, radius, &fill);
    }
}

const LASER_DOT_GLOWS: [Glow; 2] = [
    Glow {
        color: RED,
        blur: 10.0,
        offset_y: 0.0,
    },
    Glow {
        color: Rgba::rgba(255, 0, 0, 0.5),
        blur: 22.0,
        offset_y: 0.0,
    },
];

const GLYPH_SHADOW: [Glow; 1] = [Glow {
    color: Rgba::rgba(0, 0, 0, 0.5),
    blur: 6.0,
    offset_y: 2.0,
}];

/// Glow passes behind a toy glyph, innermost first.
pub fn toy_glows(toy: &Toy) -> &'static [Glow] {
    if toy.laser {
        &LASER_DOT_GLOWS
    } else {
        &GLYPH_SHADOW
    }
}

/// Toy glyph centred on the anchor.
pub fn draw_toy<P: Painter + ?Sized>(painter: &mut P, toy: &Toy, anchor: Point, size_px: f64) {
    let color = toy.laser.then_some(RED);
    painter.draw_glyph(&toy.glyph, anchor, size_px, color, toy_glows(toy));
}
