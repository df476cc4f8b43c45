//! Smooth drawable curve through the rope nodes.

use std::fmt::Write as _;

use crate::geom::Point;
use crate::rope::RopeNode;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    QuadTo { ctrl: Point, to: Point },
    LineTo(Point),
}

/// Curve descriptor consumed by a [`Painter`](crate::paint::Painter).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrailPath {
    pub cmds: Vec<PathCmd>,
    pub tip: Option<Point>,
    pub stroke_width: f64,
}

impl TrailPath {
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn start(&self) -> Option<Point> {
        match self.cmds.first() {
            Some(PathCmd::MoveTo(p)) => Some(*p),
            _ => None,
        }
    }

    pub fn end(&self) -> Option<Point> {
        match self.cmds.last()? {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => Some(*p),
            PathCmd::QuadTo { to, .. } => Some(*to),
        }
    }

    /// SVG path data with two decimals, e.g. `M 0.00 0.00 Q … L …`.
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for cmd in &self.cmds {
            if !d.is_empty() {
                d.push(' ');
            }
            let _ = match cmd {
                PathCmd::MoveTo(p) => write!(d, "M {:.2} {:.2}", p.x, p.y),
                PathCmd::QuadTo { ctrl, to } => {
                    write!(d, "Q {:.2} {:.2} {:.2} {:.2}", ctrl.x, ctrl.y, to.x, to.y)
                }
                PathCmd::LineTo(p) => write!(d, "L {:.2} {:.2}", p.x, p.y),
            };
        }
        d
    }
}

/// Quadratic segments controlled by each interior node and ending on the
/// midpoint to the next one; the last leg is straight so the tip stays exact.
pub fn build_path(nodes: &[RopeNode], stroke_width: f64) -> TrailPath {
    if nodes.len() < 2 {
        return TrailPath {
            stroke_width,
            ..Default::default()
        };
    }
    let mut cmds = Vec::with_capacity(nodes.len() + 1);
    cmds.push(PathCmd::MoveTo(nodes[0].pos()));
    for w in nodes[1..].windows(2) {
        let ctrl = w[0].pos();
        cmds.push(PathCmd::QuadTo {
            ctrl,
            to: ctrl.midpoint(w[1].pos()),
        });
    }
    let tip = nodes[nodes.len() - 1].pos();
    cmds.push(PathCmd::LineTo(tip));
    TrailPath {
        cmds,
        tip: Some(tip),
        stroke_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(pts: &[(f64, f64)]) -> Vec<RopeNode> {
        pts.iter().map(|&p| RopeNode::at(p.into())).collect()
    }

    #[test]
    fn test_empty_and_single_node() {
        assert!(build_path(&[], 2.0).is_empty());
        let one = build_path(&nodes(&[(1.0, 2.0)]), 2.0);
        assert!(one.is_empty());
        assert_eq!(one.tip, None);
        assert_eq!(one.to_svg(), "");
    }

    #[test]
    fn test_two_nodes_is_a_straight_line() {
        let p = build_path(&nodes(&[(0.0, 0.0), (10.0, 5.0)]), 3.0);
        assert_eq!(
            p.cmds,
            vec![
                PathCmd::MoveTo(Point::new(0.0, 0.0)),
                PathCmd::LineTo(Point::new(10.0, 5.0)),
            ]
        );
        assert_eq!(p.tip, Some(Point::new(10.0, 5.0)));
        assert_eq!(p.stroke_width, 3.0);
    }

    #[test]
    fn test_interior_nodes_become_quadratics_through_midpoints() {
        let p = build_path(&nodes(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]), 1.0);
        assert_eq!(p.cmds.len(), 4);
        assert_eq!(
            p.cmds[1],
            PathCmd::QuadTo {
                ctrl: Point::new(10.0, 0.0),
                to: Point::new(10.0, 5.0),
            }
        );
        assert_eq!(
            p.cmds[2],
            PathCmd::QuadTo {
                ctrl: Point::new(10.0, 10.0),
                to: Point::new(5.0, 10.0),
            }
        );
        assert_eq!(p.start(), Some(Point::new(0.0, 0.0)));
        assert_eq!(p.end(), Some(Point::new(0.0, 10.0)));
    }

    #[test]
    fn test_svg_output() {
        let p = build_path(&nodes(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]), 1.0);
        assert_eq!(p.to_svg(), "M 0.00 0.00 Q 1.00 1.00 1.50 0.50 L 2.00 0.00");
    }
}
