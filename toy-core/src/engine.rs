//! Per-frame driver: anchor update, then physics, then drawing.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::catalog::Toy;
use crate::config::{Config, Mode};
use crate::constants::MAX_FRAME_MS;
use crate::geom::{Point, Viewport};
use crate::motion::Motion;
use crate::paint::{Painter, draw_toy, draw_trail};
use crate::path::{TrailPath, build_path};
use crate::rope::{Rope, floor_line};

pub struct Engine {
    motion: Motion,
    rope: Rope,
    anchor: Point,
    seeds: SmallRng,
}

impl Engine {
    pub fn new(cfg: &Config, viewport: Viewport, seed: u64) -> Self {
        let mut seeds = SmallRng::seed_from_u64(seed);
        let motion = Motion::for_mode(cfg.mode, seeds.r#gen(), viewport);
        let anchor = motion.current();
        Engine {
            motion,
            rope: Rope::new(anchor, cfg.seg_len()),
            anchor,
            seeds,
        }
    }

    pub fn mode(&self) -> Mode {
        self.motion.mode()
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Anchor used by the most recent frame.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Replace the motion source and rebuild the rope at its anchor.
    /// Selecting the active mode again keeps the current state.
    pub fn set_mode(&mut self, mode: Mode, cfg: &Config, viewport: Viewport) {
        if mode == self.mode() {
            return;
        }
        log::debug!("mode switched: {:?} -> {:?}", self.mode(), mode);
        self.motion = Motion::for_mode(mode, self.seeds.r#gen(), viewport);
        self.anchor = self.motion.current();
        self.rope.reset(self.anchor, cfg.seg_len());
    }

    pub fn pointer_moved(&mut self, p: Point) {
        if let Motion::Manual(m) = &mut self.motion {
            m.moved(p);
        }
    }

    pub fn pointer_left(&mut self) {
        if let Motion::Manual(m) = &mut self.motion {
            m.left();
        }
    }

    pub fn pointer_entered(&mut self, p: Point) {
        if let Motion::Manual(m) = &mut self.motion {
            m.entered(p);
        }
    }

    /// Run one frame against the live configuration. `dt_ms` is the time
    /// since the previous frame; it only drives the retarget timer.
    pub fn frame(&mut self, cfg: &Config, viewport: Viewport, dt_ms: f64) -> Point {
        if cfg.mode != self.mode() {
            self.set_mode(cfg.mode, cfg, viewport);
        }
        let dt_ms = dt_ms.clamp(0.0, MAX_FRAME_MS);
        self.anchor = self.motion.anchor(dt_ms, cfg.auto_speed(), viewport);
        self.rope
            .advance(self.anchor, cfg.seg_len(), floor_line(viewport.height));
        self.anchor
    }

    pub fn trail_path(&self, cfg: &Config) -> TrailPath {
        build_path(self.rope.nodes(), cfg.stroke_width())
    }

    /// Draw the trail and the toy glyph on top of it.
    pub fn draw<P: Painter + ?Sized>(&self, painter: &mut P, cfg: &Config, toy: &Toy) {
        draw_trail(painter, &self.trail_path(cfg), toy.trail_style());
        draw_toy(painter, toy, self.anchor, cfg.glyph_px(toy.base_size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::paint::tests::{Op, Recorder};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn vp() -> Viewport {
        Viewport::new(1000.0, 800.0)
    }

    #[test]
    fn test_manual_follows_pointer() {
        let cfg = Config::default();
        let mut e = Engine::new(&cfg, vp(), 1);
        assert_eq!(e.frame(&cfg, vp(), FRAME_MS), Point::new(-400.0, -400.0));
        e.pointer_entered(Point::new(200.0, 100.0));
        assert_eq!(e.frame(&cfg, vp(), FRAME_MS), Point::new(200.0, 100.0));
        assert_eq!(e.rope().head(), Point::new(200.0, 100.0));
        e.pointer_left();
        assert_eq!(e.frame(&cfg, vp(), FRAME_MS), Point::new(-400.0, -400.0));
    }

    #[test]
    fn test_mode_switch_is_a_hard_reset() {
        let mut cfg = Config::default();
        let mut e = Engine::new(&cfg, vp(), 2);
        e.pointer_moved(Point::new(500.0, 200.0));
        for _ in 0..30 {
            e.frame(&cfg, vp(), FRAME_MS);
        }
        cfg.mode = Mode::Auto;
        e.frame(&cfg, vp(), FRAME_MS);
        assert_eq!(e.mode(), Mode::Auto);
        // Rope rebuilt under the autonomous start position, then stepped once.
        assert_eq!(e.rope().head(), e.anchor());
        assert!(e.anchor().dist(Point::new(400.0, 300.0)) <= 6.6 + 1e-9);
        assert!(e.rope().tip().y > 700.0);

        cfg.mode = Mode::Manual;
        e.frame(&cfg, vp(), FRAME_MS);
        assert_eq!(e.anchor(), Point::new(-400.0, -400.0));
    }

    #[test]
    fn test_pointer_ignored_in_auto_mode() {
        let cfg = Config::with_mode(Mode::Auto);
        let mut e = Engine::new(&cfg, vp(), 3);
        e.pointer_moved(Point::new(5.0, 5.0));
        let a = e.frame(&cfg, vp(), FRAME_MS);
        assert!(a.x >= 60.0 && a.y >= 60.0);
    }

    #[test]
    fn test_live_speed_change() {
        let mut cfg = Config::with_mode(Mode::Auto);
        cfg.set_auto_speed(100.0);
        let mut e = Engine::new(&cfg, vp(), 4);
        for _ in 0..200 {
            e.frame(&cfg, vp(), FRAME_MS);
        }
        cfg.set_auto_speed(1.0);
        let mut prev = e.frame(&cfg, vp(), FRAME_MS);
        // Deceleration from the old cap is immediate: each frame rescales
        // the velocity to the new cap.
        for _ in 0..50 {
            let p = e.frame(&cfg, vp(), FRAME_MS);
            assert!(prev.dist(p) <= 1.14 + 1e-9);
            prev = p;
        }
    }

    #[test]
    fn test_draw_emits_trail_then_glyph() {
        let cat = Catalog::builtin().unwrap();
        let cfg = Config::default();
        let mut e = Engine::new(&cfg, vp(), 5);
        e.pointer_moved(Point::new(300.0, 300.0));
        e.frame(&cfg, vp(), FRAME_MS);
        let mut rec = Recorder::default();
        e.draw(&mut rec, &cfg, cat.toy("mouse").unwrap());
        assert_eq!(rec.ops.len(), 8);
        assert!(matches!(rec.ops[0], Op::Path(_)));
        assert_eq!(
            rec.ops[7],
            Op::Glyph("🐭".to_string(), Point::new(300.0, 300.0), 36.0)
        );
    }
}
