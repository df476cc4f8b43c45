//! Anchor sources: the pointer, or a steering controller chasing random targets.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::Mode;
use crate::constants::{
    AUTO_START_POS, AUTO_START_VEL, PARKED_ANCHOR, POSITION_MARGIN, RETARGET_MIN_MS,
    RETARGET_SPAN_MS, TARGET_MARGIN,
};
use crate::geom::{Point, Viewport};

/// Follows the pointer; parks off-screen while no pointer is present.
#[derive(Clone, Debug)]
pub struct PointerMotion {
    pos: Point,
}

impl Default for PointerMotion {
    fn default() -> Self {
        PointerMotion {
            pos: PARKED_ANCHOR.into(),
        }
    }
}

impl PointerMotion {
    pub fn moved(&mut self, p: Point) {
        self.pos = p;
    }

    pub fn left(&mut self) {
        self.pos = PARKED_ANCHOR.into();
    }

    pub fn entered(&mut self, p: Point) {
        self.pos = p;
    }

    pub fn anchor(&self) -> Point {
        self.pos
    }
}

/// Acceleration toward the target per frame for a speed setting.
pub fn accel(speed: f64) -> f64 {
    0.05 + speed * 0.008
}

/// Velocity cap in px/frame for a speed setting (~1.1 at 1, 15 at 100).
pub fn top_speed(speed: f64) -> f64 {
    1.0 + speed * 0.14
}

/// Rescale `v` to length `cap` if it is longer, keeping its direction.
pub fn cap_speed(v: Point, cap: f64) -> Point {
    let spd = v.x.hypot(v.y);
    if spd > cap {
        Point::new(v.x / spd * cap, v.y / spd * cap)
    } else {
        v
    }
}

/// Steering controller for the autonomous mode.
#[derive(Clone, Debug)]
pub struct AutoMotion {
    pos: Point,
    vel: Point,
    target: Point,
    retarget_in_ms: f64,
    rng: SmallRng,
}

impl AutoMotion {
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let mut m = AutoMotion {
            pos: AUTO_START_POS.into(),
            vel: AUTO_START_VEL.into(),
            target: AUTO_START_POS.into(),
            retarget_in_ms: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        };
        m.retarget(viewport);
        m
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn velocity(&self) -> Point {
        self.vel
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Pick a fresh target inside the inset viewport and re-draw the
    /// interval until the next pick.
    pub fn retarget(&mut self, viewport: Viewport) {
        let span_x = (viewport.width - TARGET_MARGIN * 2.0).max(0.0);
        let span_y = (viewport.height - TARGET_MARGIN * 2.0).max(0.0);
        self.target = Point::new(
            TARGET_MARGIN + self.rng.r#gen::<f64>() * span_x,
            TARGET_MARGIN + self.rng.r#gen::<f64>() * span_y,
        );
        self.retarget_in_ms = RETARGET_MIN_MS + self.rng.r#gen::<f64>() * RETARGET_SPAN_MS;
        log::trace!(
            "new target ({:.0}, {:.0}), next in {:.0}ms",
            self.target.x,
            self.target.y,
            self.retarget_in_ms
        );
    }

    /// One frame of steering. `speed` is the live speed setting.
    pub fn step(&mut self, dt_ms: f64, speed: f64, viewport: Viewport) -> Point {
        self.retarget_in_ms -= dt_ms;
        if self.retarget_in_ms <= 0.0 {
            self.retarget(viewport);
        }

        let dx = self.target.x - self.pos.x;
        let dy = self.target.y - self.pos.y;
        let mut dist = dx.hypot(dy);
        if dist == 0.0 {
            dist = 1.0;
        }
        let a = accel(speed);
        let v = Point::new(self.vel.x + dx / dist * a, self.vel.y + dy / dist * a);
        self.vel = cap_speed(v, top_speed(speed));

        self.pos = viewport.clamp_inset(
            Point::new(self.pos.x + self.vel.x, self.pos.y + self.vel.y),
            POSITION_MARGIN,
        );
        self.pos
    }
}

/// The active anchor source. Switching variants is a hard reset.
#[derive(Clone, Debug)]
pub enum Motion {
    Manual(PointerMotion),
    Auto(AutoMotion),
}

impl Motion {
    pub fn for_mode(mode: Mode, seed: u64, viewport: Viewport) -> Self {
        match mode {
            Mode::Manual => Motion::Manual(PointerMotion::default()),
            Mode::Auto => Motion::Auto(AutoMotion::new(seed, viewport)),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Motion::Manual(_) => Mode::Manual,
            Motion::Auto(_) => Mode::Auto,
        }
    }

    /// Where the anchor sits right now, without advancing anything.
    pub fn current(&self) -> Point {
        match self {
            Motion::Manual(p) => p.anchor(),
            Motion::Auto(a) => a.position(),
        }
    }

    /// Advance by one frame and return the anchor for the rope.
    pub fn anchor(&mut self, dt_ms: f64, speed: f64, viewport: Viewport) -> Point {
        match self {
            Motion::Manual(p) => p.anchor(),
            Motion::Auto(a) => a.step(dt_ms, speed, viewport),
        }
    }
}
