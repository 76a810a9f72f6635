//! Geometry reconstruction
//!
//! Pure helpers for rebuilding Circuit JSON geometry from KiCad primitives:
//! point rotation, three-point arcs, circles and board outlines.

use crate::circuit_json::Point;
use crate::parser::Point2;
use std::f64::consts::PI;

/// Collinearity tolerance for the circumcircle denominator
pub const ARC_FIT_EPSILON: f64 = 1e-10;

/// Consecutive outline points closer than this (per axis) are merged
pub const OUTLINE_EPSILON: f64 = 1e-3;

/// Rotate `p` about the origin by `angle` degrees.
pub fn rotate_point(p: Point2, angle: f64) -> Point2 {
    let (sin, cos) = angle.to_radians().sin_cos();
    Point2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}

/// A footprint-local offset moved into board space: rotated by the negated
/// footprint angle, then added to the anchor.
pub fn place_local(anchor: Point2, local: Point2, footprint_angle: f64) -> Point2 {
    let r = rotate_point(local, -footprint_angle);
    Point2::new(anchor.x + r.x, anchor.y + r.y)
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.,
            (self.min.y + self.max.y) / 2.,
        )
    }
}

/// Bounding box of a point set, `None` when empty.
pub fn bounds(points: impl IntoIterator<Item = Point>) -> Option<Bounds> {
    points.into_iter().fold(None, |acc, p| {
        Some(match acc {
            None => Bounds { min: p, max: p },
            Some(b) => Bounds {
                min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            },
        })
    })
}

/// Circle through three points as `(center, radius)`, or `None` when the
/// points are collinear.
pub fn circumcircle(a: Point, b: Point, c: Point) -> Option<(Point, f64)> {
    let d = 2. * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < ARC_FIT_EPSILON {
        return None;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let center = Point::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );
    Some((center, center.distance(&a)))
}

/// Wrap an angle into (-PI, PI].
fn normalize_angle(mut angle: f64) -> f64 {
    while angle <= -PI {
        angle += 2. * PI;
    }
    while angle > PI {
        angle -= 2. * PI;
    }
    angle
}

/// A fitted arc: center, radius, start angle and signed sweep (radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc {
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// `max(2, ceil(length / resolution))` points, both endpoints included.
    pub fn points(&self, resolution: f64) -> Vec<Point> {
        let count = segment_count(self.length(), resolution);
        (0..count)
            .map(|i| {
                let t = i as f64 / (count - 1) as f64;
                let angle = self.start_angle + self.sweep * t;
                Point::new(
                    self.center.x + self.radius * angle.cos(),
                    self.center.y + self.radius * angle.sin(),
                )
            })
            .collect()
    }
}

fn segment_count(length: f64, resolution: f64) -> usize {
    if !(resolution > 0.) || !length.is_finite() {
        return 2;
    }
    ((length / resolution).ceil() as usize).max(2)
}

/// Fit the arc running from `start` through `mid` to `end`.
pub fn fit_arc(start: Point, mid: Point, end: Point) -> Option<Arc> {
    let (center, radius) = circumcircle(start, mid, end)?;
    let angle_of = |p: Point| (p.y - center.y).atan2(p.x - center.x);
    let start_angle = angle_of(start);

    let short = normalize_angle(angle_of(end) - start_angle);
    let to_mid = normalize_angle(angle_of(mid) - start_angle);

    let sweep = if short.abs() < ARC_FIT_EPSILON {
        // start == end: a full turn through mid
        2. * PI * if to_mid < 0. { -1. } else { 1. }
    } else if to_mid.signum() == short.signum() && to_mid.abs() <= short.abs() {
        short
    } else {
        short - 2. * PI * short.signum()
    };

    Some(Arc {
        center,
        radius,
        start_angle,
        sweep,
    })
}

/// Discretize a three-point arc. Collinear input degrades to the straight
/// segment `start → end`.
pub fn arc_points(start: Point, mid: Point, end: Point, resolution: f64) -> Vec<Point> {
    match fit_arc(start, mid, end) {
        Some(arc) => arc.points(resolution),
        None => vec![start, end],
    }
}

/// Closed circle polyline, first point repeated at the end.
pub fn circle_points(center: Point, radius: f64, resolution: f64) -> Vec<Point> {
    Arc {
        center,
        radius,
        start_angle: 0.,
        sweep: 2. * PI,
    }
    .points(resolution)
}

/// Corners of an axis-aligned rectangle given two opposite corners.
pub fn rect_corners(start: Point2, end: Point2) -> [Point2; 4] {
    [
        start,
        Point2::new(end.x, start.y),
        end,
        Point2::new(start.x, end.y),
    ]
}

fn near(a: &Point, b: &Point) -> bool {
    (a.x - b.x).abs() < OUTLINE_EPSILON && (a.y - b.y).abs() < OUTLINE_EPSILON
}

/// Chain segments (in the order given) into a polygon. Consecutive duplicate
/// points are merged, and the closing vertex is dropped when it repeats the
/// first one.
pub fn assemble_outline(segments: impl IntoIterator<Item = (Point, Point)>) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::new();
    for (start, end) in segments {
        if points.last().map_or(true, |last| !near(last, &start)) {
            points.push(start);
        }
        if points.last().map_or(true, |last| !near(last, &end)) {
            points.push(end);
        }
    }
    if points.len() > 2 && near(&points[0], &points[points.len() - 1]) {
        points.pop();
    }
    points
}
