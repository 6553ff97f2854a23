//! SVG path data for links.
//!
//! Paths are generated in the vertical tree frame and every emitted point is passed through
//! the orientation, so a horizontal chart is the exact transpose of the vertical one.

use crate::fmt::{fmt_js_number_into, fmt_path_into};
use crate::layout::{Link, TreeLayout};
use treechart_core::{Direction, LinkStyle, Point, rotate_point};

/// Minimal `d3-path` style builder: absolute commands with comma separated numbers.
///
/// [`PathBuilder::new`] rounds numbers to three fractional digits like the d3 link generators;
/// [`PathBuilder::unrounded`] prints them in full like a plain `d3.path()`.
#[derive(Debug, Clone)]
pub struct PathBuilder {
    out: String,
    round: bool,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(64),
            round: true,
        }
    }

    pub fn unrounded() -> Self {
        Self {
            round: false,
            ..Self::new()
        }
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.emit_pair('M', p);
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.emit_pair('L', p);
        self
    }

    pub fn bezier_curve_to(&mut self, c1: Point, c2: Point, p: Point) -> &mut Self {
        self.out.push('C');
        self.emit_xy(c1);
        self.out.push(',');
        self.emit_xy(c2);
        self.out.push(',');
        self.emit_xy(p);
        self
    }

    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    fn emit_pair(&mut self, cmd: char, p: Point) {
        self.out.push(cmd);
        self.emit_xy(p);
    }

    fn emit_xy(&mut self, p: Point) {
        self.emit_num(p.x);
        self.out.push(',');
        self.emit_num(p.y);
    }

    fn emit_num(&mut self, v: f64) {
        if self.round {
            fmt_path_into(&mut self.out, v);
        } else {
            fmt_js_number_into(&mut self.out, v);
        }
    }
}

/// Path from `source` to `target`, both given in the tree frame (`y` grows with depth).
///
/// Curves round their numbers to three fractional digits; right-angle polylines do not.
pub fn link_path(source: Point, target: Point, style: LinkStyle, direction: Direction) -> String {
    let orient = |p: Point| match direction {
        Direction::Vertical => p,
        Direction::Horizontal => rotate_point(p),
    };
    let y_mid = (source.y + target.y) / 2.0;
    let bend_from = Point::new(source.x, y_mid);
    let bend_to = Point::new(target.x, y_mid);

    let mut path = match style {
        LinkStyle::Curve => PathBuilder::new(),
        LinkStyle::Straight => PathBuilder::unrounded(),
    };
    path.move_to(orient(source));
    match style {
        LinkStyle::Curve => {
            path.bezier_curve_to(orient(bend_from), orient(bend_to), orient(target));
        }
        LinkStyle::Straight => {
            path.line_to(orient(bend_from))
                .line_to(orient(bend_to))
                .line_to(orient(target));
        }
    }
    path.finish()
}

/// Path for a link of `layout`.
pub fn path_for(layout: &TreeLayout, link: &Link, style: LinkStyle, direction: Direction) -> String {
    let s = layout.source(link);
    let t = layout.target(link);
    link_path(Point::new(s.x, s.y), Point::new(t.x, t.y), style, direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_bends_halfway_between_levels() {
        let d = link_path(
            Point::new(0.0, 200.0),
            Point::new(-50.0, 400.0),
            LinkStyle::Curve,
            Direction::Vertical,
        );
        assert_eq!(d, "M0,200C0,300,-50,300,-50,400");
    }

    #[test]
    fn straight_is_a_right_angle_polyline() {
        let d = link_path(
            Point::new(0.0, 200.0),
            Point::new(50.0, 400.0),
            LinkStyle::Straight,
            Direction::Vertical,
        );
        assert_eq!(d, "M0,200L0,300L50,300L50,400");
    }

    #[test]
    fn only_curves_round_fractional_coordinates() {
        let source = Point::new(0.0, 0.0);
        let target = Point::new(1.0 / 3.0, 100.0);
        assert_eq!(
            link_path(source, target, LinkStyle::Curve, Direction::Vertical),
            "M0,0C0,50,0.333,50,0.333,100"
        );
        assert_eq!(
            link_path(source, target, LinkStyle::Straight, Direction::Vertical),
            "M0,0L0,50L0.3333333333333333,50L0.3333333333333333,100"
        );
        assert_eq!(
            link_path(source, target, LinkStyle::Straight, Direction::Horizontal),
            "M0,0L50,0L50,0.3333333333333333L100,0.3333333333333333"
        );
    }

    #[test]
    fn horizontal_swaps_every_coordinate() {
        let d = link_path(
            Point::new(0.0, 200.0),
            Point::new(50.0, 400.0),
            LinkStyle::Straight,
            Direction::Horizontal,
        );
        assert_eq!(d, "M200,0L300,0L300,50L400,50");
    }

    #[test]
    fn coincident_endpoints_degrade_to_a_point_path() {
        let p = Point::new(12.5, 7.0);
        assert_eq!(
            link_path(p, p, LinkStyle::Straight, Direction::Vertical),
            "M12.5,7L12.5,7L12.5,7L12.5,7"
        );
        assert_eq!(
            link_path(p, p, LinkStyle::Curve, Direction::Vertical),
            "M12.5,7C12.5,7,12.5,7,12.5,7"
        );
    }

    #[test]
    fn coordinates_round_to_three_digits() {
        let d = link_path(
            Point::new(1.0 / 3.0, 0.0),
            Point::new(0.0, 100.0),
            LinkStyle::Curve,
            Direction::Vertical,
        );
        assert_eq!(d, "M0.333,0C0.333,50,0,50,0,100");
    }
}
