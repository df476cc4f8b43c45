//! Backdrop gradient and the decorative particles drawn over it.
//! Positions are pure functions of elapsed time; nothing here is simulated.

use std::f64::consts::TAU;

use rand::Rng;

use crate::catalog::{Decor, Scene};
use crate::geom::{Point, Viewport};
use crate::paint::{Fill, Painter, Rgba, Stroke};

const STAR_COUNT: usize = 60;
const FLAKE_COUNT: usize = 40;
const BLADE_COUNT: usize = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    /// Fractions of the viewport.
    pub left: f64,
    pub top: f64,
    pub size: f64,
    pub period_ms: f64,
    pub delay_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Flake {
    pub left: f64,
    pub size: f64,
    pub period_ms: f64,
    pub delay_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Blade {
    pub left: f64,
    pub height: f64,
    pub tilt_deg: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decorations {
    pub stars: Vec<Star>,
    pub flakes: Vec<Flake>,
    pub blades: Vec<Blade>,
}

/// 0 at the start and end of a cycle, 1 halfway through.
fn pulse(t_ms: f64, period_ms: f64, delay_ms: f64) -> f64 {
    let phase = ((t_ms + delay_ms) / period_ms).fract();
    0.5 - 0.5 * (phase * TAU).cos()
}

impl Decorations {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                left: rng.r#gen::<f64>(),
                top: rng.r#gen::<f64>() * 0.7,
                size: rng.r#gen::<f64>() * 3.0 + 1.0,
                period_ms: 2000.0 + rng.r#gen::<f64>() * 3000.0,
                delay_ms: rng.r#gen::<f64>() * 3000.0,
            })
            .collect();
        let flakes = (0..FLAKE_COUNT)
            .map(|_| Flake {
                left: rng.r#gen::<f64>(),
                size: rng.r#gen::<f64>() * 14.0 + 8.0,
                period_ms: 5000.0 + rng.r#gen::<f64>() * 8000.0,
                delay_ms: rng.r#gen::<f64>() * 8000.0,
            })
            .collect();
        let blades = (0..BLADE_COUNT)
            .map(|i| Blade {
                left: i as f64 / BLADE_COUNT as f64 + rng.r#gen::<f64>() * 0.03,
                height: 40.0 + rng.r#gen::<f64>() * 60.0,
                tilt_deg: (rng.r#gen::<f64>() - 0.5) * 20.0,
            })
            .collect();
        Decorations {
            stars,
            flakes,
            blades,
        }
    }

    /// Star centre, radius and opacity at time `t_ms`.
    pub fn star_at(star: &Star, viewport: Viewport, t_ms: f64) -> (Point, f64, f64) {
        let k = pulse(t_ms, star.period_ms, star.delay_ms);
        let center = Point::new(star.left * viewport.width, star.top * viewport.height);
        (center, star.size / 2.0 * (1.0 + 0.4 * k), 0.2 + 0.8 * k)
    }

    /// Flake centre at time `t_ms`; falls from just above the top edge to
    /// past the bottom once per period.
    pub fn flake_at(flake: &Flake, viewport: Viewport, t_ms: f64) -> Point {
        let phase = ((t_ms + flake.delay_ms) / flake.period_ms).fract();
        let travel = viewport.height * 1.1 + 20.0;
        Point::new(flake.left * viewport.width, -20.0 + phase * travel)
    }

    /// Base and tip of a grass blade rooted on the bottom edge.
    pub fn blade_at(blade: &Blade, viewport: Viewport) -> (Point, Point) {
        let base = Point::new(blade.left * viewport.width, viewport.height);
        let (s, c) = blade.tilt_deg.to_radians().sin_cos();
        let tip = Point::new(base.x + blade.height * s, base.y - blade.height * c);
        (base, tip)
    }

    pub fn draw<P: Painter + ?Sized>(&self, painter: &mut P, decor: Decor, viewport: Viewport, t_ms: f64) {
        match decor {
            Decor::None => {}
            Decor::Stars => {
                for star in &self.stars {
                    let (c, r, opacity) = Self::star_at(star, viewport, t_ms);
                    let fill = Fill {
                        color: Rgba::rgb(255, 255, 255).with_alpha(opacity),
                        blur: 0.0,
                    };
                    painter.fill_circle(c, r, &fill);
                }
            }
            Decor::Grass => {
                let stroke = Stroke {
                    color: Rgba::rgb(0x15, 0x80, 0x3d),
                    width: 3.0,
                    blur: 0.0,
                };
                for blade in &self.blades {
                    let (base, tip) = Self::blade_at(blade, viewport);
                    painter.stroke_line(base, tip, &stroke);
                }
            }
            Decor::Snow => {
                let color = Rgba::rgba(255, 255, 255, 0.7);
                for flake in &self.flakes {
                    let c = Self::flake_at(flake, viewport, t_ms);
                    painter.draw_glyph("❄", c, flake.size, Some(color), &[]);
                }
            }
        }
    }
}

/// Backdrop gradient followed by the scene's decorations.
pub fn draw_scene<P: Painter + ?Sized>(
    painter: &mut P,
    scene: &Scene,
    decorations: &Decorations,
    viewport: Viewport,
    t_ms: f64,
) {
    painter.fill_backdrop(&scene.gradient, viewport);
    decorations.draw(painter, scene.decor, viewport, t_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::paint::tests::{Op, Recorder};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn decorations() -> Decorations {
        Decorations::generate(&mut SmallRng::seed_from_u64(99))
    }

    #[test]
    fn test_generate_counts_and_ranges() {
        let d = decorations();
        assert_eq!(d.stars.len(), 60);
        assert_eq!(d.flakes.len(), 40);
        assert_eq!(d.blades.len(), 30);
        assert!(d.stars.iter().all(|s| s.top < 0.7 && (1.0..4.0).contains(&s.size)));
        assert!(d.blades.iter().all(|b| b.tilt_deg.abs() <= 10.0));
    }

    #[test]
    fn test_star_twinkles() {
        let star = Star {
            left: 0.5,
            top: 0.5,
            size: 2.0,
            period_ms: 2000.0,
            delay_ms: 0.0,
        };
        let vp = Viewport::new(100.0, 100.0);
        let (c, r0, o0) = Decorations::star_at(&star, vp, 0.0);
        assert_eq!(c, Point::new(50.0, 50.0));
        assert!((r0 - 1.0).abs() < 1e-12 && (o0 - 0.2).abs() < 1e-12);
        let (_, r1, o1) = Decorations::star_at(&star, vp, 1000.0);
        assert!((r1 - 1.4).abs() < 1e-12 && (o1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_flake_wraps() {
        let flake = Flake {
            left: 0.25,
            size: 10.0,
            period_ms: 1000.0,
            delay_ms: 0.0,
        };
        let vp = Viewport::new(400.0, 100.0);
        assert_eq!(Decorations::flake_at(&flake, vp, 0.0), Point::new(100.0, -20.0));
        let mid = Decorations::flake_at(&flake, vp, 500.0);
        assert!((mid.y - 45.0).abs() < 1e-9);
        assert_eq!(Decorations::flake_at(&flake, vp, 1000.0).y, -20.0);
    }

    #[test]
    fn test_blade_tilts_from_bottom() {
        let blade = Blade {
            left: 0.5,
            height: 50.0,
            tilt_deg: 0.0,
        };
        let (base, tip) = Decorations::blade_at(&blade, Viewport::new(200.0, 300.0));
        assert_eq!(base, Point::new(100.0, 300.0));
        assert!((tip.x - 100.0).abs() < 1e-9 && (tip.y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_draw_scene_per_decor() {
        let cat = Catalog::builtin().unwrap();
        let d = decorations();
        let vp = Viewport::new(800.0, 600.0);
        let count = |id: &str| {
            let mut rec = Recorder::default();
            draw_scene(&mut rec, cat.scene(id).unwrap(), &d, vp, 1234.0);
            assert_eq!(rec.ops[0], Op::Backdrop);
            rec.ops.len()
        };
        assert_eq!(count("night"), 61);
        assert_eq!(count("grass"), 31);
        assert_eq!(count("snow"), 41);
        assert_eq!(count("ocean"), 1);
    }
}
