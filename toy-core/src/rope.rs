//! Verlet rope: a fixed chain of mass points pinned to a moving anchor.

use crate::constants::{
    DAMPING, FLOOR_FRICTION, FLOOR_INSET, GRAVITY, ITERATIONS, MIN_DIST, REBUILD_THRESHOLD,
    SEG_COUNT,
};
use crate::geom::Point;

/// One mass point. Velocity is implied by `(x, y) - (px, py)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RopeNode {
    pub x: f64,
    pub y: f64,
    pub px: f64,
    pub py: f64,
}

impl RopeNode {
    /// A node resting at `p`.
    pub fn at(p: Point) -> Self {
        RopeNode {
            x: p.x,
            y: p.y,
            px: p.x,
            py: p.y,
        }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Damped Verlet step with gravity. A node reaching `floor` is held on
    /// it and keeps only `FLOOR_FRICTION` of its velocity, the vertical
    /// part reflected.
    pub fn integrate(&mut self, floor: f64) {
        let vx = (self.x - self.px) * DAMPING;
        let vy = (self.y - self.py) * DAMPING;
        self.px = self.x;
        self.py = self.y;
        self.x += vx;
        self.y += vy + GRAVITY;

        if self.y >= floor {
            self.y = floor;
            self.py = floor + vy * FLOOR_FRICTION;
            self.x = self.px + vx * FLOOR_FRICTION;
        }
    }
}

/// Floor line for a viewport of the given height.
pub fn floor_line(viewport_height: f64) -> f64 {
    viewport_height - FLOOR_INSET
}

#[derive(Clone, Debug)]
pub struct Rope {
    nodes: [RopeNode; SEG_COUNT],
    seg_len: f64,
}

impl Rope {
    /// Straight vertical rope hanging below `anchor`, at rest.
    pub fn new(anchor: Point, seg_len: f64) -> Self {
        let mut rope = Rope {
            nodes: [RopeNode::default(); SEG_COUNT],
            seg_len,
        };
        rope.reset(anchor, seg_len);
        rope
    }

    pub fn reset(&mut self, anchor: Point, seg_len: f64) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            *node = RopeNode::at(Point::new(anchor.x, anchor.y + i as f64 * seg_len));
        }
        self.seg_len = seg_len;
    }

    pub fn nodes(&self) -> &[RopeNode] {
        &self.nodes
    }

    pub fn seg_len(&self) -> f64 {
        self.seg_len
    }

    pub fn head(&self) -> Point {
        self.nodes[0].pos()
    }

    pub fn tip(&self) -> Point {
        self.nodes[SEG_COUNT - 1].pos()
    }

    /// Adopt a new rest length. Jumps larger than the rebuild threshold
    /// discard the chain and lay it out fresh under `anchor`; returns whether
    /// that happened.
    pub fn set_rest_length(&mut self, anchor: Point, seg_len: f64) -> bool {
        if (seg_len - self.seg_len).abs() > REBUILD_THRESHOLD {
            log::debug!(
                "rope rebuilt: rest length {:.2} -> {:.2}",
                self.seg_len,
                seg_len
            );
            self.reset(anchor, seg_len);
            true
        } else {
            self.seg_len = seg_len;
            false
        }
    }

    /// Advance the simulation by one frame.
    pub fn advance(&mut self, anchor: Point, seg_len: f64, floor: f64) {
        self.set_rest_length(anchor, seg_len);
        let seg_len = self.seg_len;
        let n = &mut self.nodes;

        n[0] = RopeNode::at(anchor);

        for node in n.iter_mut().skip(1) {
            node.integrate(floor);
        }

        for _ in 0..ITERATIONS {
            for i in 0..SEG_COUNT - 1 {
                let dx = n[i + 1].x - n[i].x;
                let dy = n[i + 1].y - n[i].y;
                let mut dist = dx.hypot(dy);
                if dist == 0.0 {
                    dist = MIN_DIST;
                }
                let diff = (dist - seg_len) / dist * 0.5;
                if i == 0 {
                    // The head is pinned; the neighbour takes the whole correction.
                    n[1].x -= dx * diff * 2.0;
                    n[1].y -= dy * diff * 2.0;
                } else {
                    n[i].x += dx * diff;
                    n[i].y += dy * diff;
                    n[i + 1].x -= dx * diff;
                    n[i + 1].y -= dy * diff;
                }
                if i > 0 && n[i].y > floor {
                    n[i].y = floor;
                }
                if n[i + 1].y > floor {
                    n[i + 1].y = floor;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn spacings(rope: &Rope) -> Vec<f64> {
        rope.nodes()
            .windows(2)
            .map(|w| w[0].pos().dist(w[1].pos()))
            .collect()
    }

    #[test]
    fn test_new_rope_is_straight_and_at_rest() {
        let rope = Rope::new(Point::new(10.0, 20.0), 5.0);
        assert_eq!(rope.nodes().len(), SEG_COUNT);
        for (i, node) in rope.nodes().iter().enumerate() {
            assert_eq!(node.x, 10.0);
            assert_eq!(node.y, 20.0 + i as f64 * 5.0);
            assert_eq!((node.px, node.py), (node.x, node.y));
        }
    }

    #[test]
    fn test_free_node_integrates_with_damping_and_gravity() {
        let mut node = RopeNode {
            x: 10.0,
            y: 20.0,
            px: 8.0,
            py: 15.0,
        };
        node.integrate(1.0e9);
        assert!((node.x - (10.0 + 2.0 * DAMPING)).abs() < 1e-12);
        assert!((node.y - (20.0 + 5.0 * DAMPING + GRAVITY)).abs() < 1e-12);
        assert_eq!((node.px, node.py), (10.0, 20.0));
    }

    #[test]
    fn test_floor_contact_applies_friction() {
        let floor = 100.0;
        let mut node = RopeNode {
            x: 10.0,
            y: 95.0,
            px: 8.0,
            py: 90.0,
        };
        let (vx, vy) = (2.0 * DAMPING, 5.0 * DAMPING);
        node.integrate(floor);
        assert_eq!(node.y, floor);
        assert!((node.x - (10.0 + vx * FLOOR_FRICTION)).abs() < 1e-12);
        assert!((node.py - (floor + vy * FLOOR_FRICTION)).abs() < 1e-12);

        // Next step: horizontal motion carries the reduced speed and the
        // vertical velocity points back up.
        let before = node;
        node.integrate(1.0e9);
        let dx = node.x - before.x;
        let dy = node.y - before.y;
        assert!((dx - vx * FLOOR_FRICTION * DAMPING).abs() < 1e-12);
        assert!((dy - (-vy * FLOOR_FRICTION * DAMPING + GRAVITY)).abs() < 1e-12);
        assert!(dy < 0.0);
    }

    #[test]
    fn test_rope_sliding_on_floor_slows_down() {
        let floor = floor_line(800.0);
        let anchor = Point::new(0.0, floor);
        let mut rope = Rope::new(anchor, 10.0);
        // Lay the chain flat along the floor, moving 6 px/step to the right.
        for (i, node) in rope.nodes.iter_mut().enumerate().skip(1) {
            let x = i as f64 * 10.0;
            *node = RopeNode {
                x,
                y: floor,
                px: x - 6.0,
                py: floor,
            };
        }
        let tip_before = rope.tip().x;
        rope.advance(anchor, 10.0, floor);
        // A free tip would move 6 * DAMPING; floor contact keeps only a fraction.
        let moved = rope.tip().x - tip_before;
        assert!((moved - 6.0 * DAMPING * FLOOR_FRICTION).abs() < 0.01, "moved {moved}");
        assert!(rope.nodes().iter().all(|n| n.y <= floor));
    }

    #[test]
    fn test_head_is_pinned_every_step() {
        let mut rope = Rope::new(Point::new(0.0, 0.0), 10.0);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..300 {
            let anchor = Point::new(rng.gen_range(-500.0..1500.0), rng.gen_range(-500.0..1000.0));
            rope.advance(anchor, 10.0, 796.0);
            let head = rope.nodes()[0];
            assert_eq!(head.pos(), anchor);
            assert_eq!((head.px, head.py), (anchor.x, anchor.y));
        }
    }

    #[test]
    fn test_converges_under_stationary_anchor() {
        for seg_len in [5.0, 15.0, 30.4] {
            let anchor = Point::new(500.0, 100.0);
            let mut rope = Rope::new(anchor, seg_len);
            for _ in 0..400 {
                rope.advance(anchor, seg_len, 1.0e9);
            }
            let before = rope.clone();
            rope.advance(anchor, seg_len, 1.0e9);
            let tol = (seg_len * 0.02).max(1.0);
            for d in spacings(&rope) {
                assert!((d - seg_len).abs() <= tol, "spacing {d} vs {seg_len}");
            }
            for (a, b) in before.nodes().iter().zip(rope.nodes()) {
                assert!(a.pos().dist(b.pos()) < 1e-3, "rope still moving");
            }
        }
    }

    #[test]
    fn test_floor_containment_under_random_motion() {
        let floor = floor_line(800.0);
        let mut rope = Rope::new(Point::new(100.0, 100.0), 20.0);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut anchor = Point::new(100.0, 100.0);
        for _ in 0..3000 {
            anchor.x += rng.gen_range(-40.0..40.0);
            anchor.y += rng.gen_range(-40.0..40.0);
            rope.advance(anchor, 20.0, floor);
            for node in &rope.nodes()[1..] {
                assert!(node.y <= floor + 1e-9, "node below floor: {}", node.y);
            }
        }
    }

    #[test]
    fn test_small_rest_length_change_is_absorbed() {
        let anchor = Point::new(0.0, 0.0);
        let mut rope = Rope::new(anchor, 15.0);
        rope.advance(anchor, 15.0, 1.0e9);
        let before = rope.nodes().to_vec();
        assert!(!rope.set_rest_length(anchor, 18.0));
        assert_eq!(rope.seg_len(), 18.0);
        assert_eq!(rope.nodes(), before.as_slice());
    }

    #[test]
    fn test_large_rest_length_change_rebuilds() {
        let anchor = Point::new(500.0, 100.0);
        let mut rope = Rope::new(anchor, 10.0);
        for _ in 0..50 {
            rope.advance(Point::new(520.0, 110.0), 10.0, 1.0e9);
        }
        let moved = Point::new(480.0, 90.0);
        assert!(rope.set_rest_length(moved, 30.0));
        for d in spacings(&rope) {
            assert!((d - 30.0).abs() < 1e-9);
        }
        assert_eq!(rope.head(), moved);
    }

    #[test]
    fn test_rebuild_during_advance_is_not_a_stretch() {
        let anchor = Point::new(500.0, 100.0);
        let mut rope = Rope::new(anchor, 10.0);
        rope.advance(anchor, 10.0, 1.0e9);
        rope.advance(anchor, 30.0, 1.0e9);
        for d in spacings(&rope) {
            assert!((d - 30.0).abs() < 1.0, "spacing {d}");
        }
    }

    #[test]
    fn test_coincident_nodes_do_not_produce_nan() {
        let anchor = Point::new(50.0, 50.0);
        let mut rope = Rope::new(anchor, 0.0);
        for _ in 0..20 {
            rope.advance(anchor, 0.0, 796.0);
        }
        assert!(rope.nodes().iter().all(|n| n.x.is_finite() && n.y.is_finite()));
    }
}
