//! Polyline routes for graphic primitives, shared by board and footprint graphics.

use crate::circuit_json::Point;
use crate::geometry::{arc_points, circle_points, rect_corners};
use crate::parser::{GraphicItem, GraphicKind, Point2};

/// Target-space route for a line, arc, circle, rect or polygon.
///
/// `map` takes a source point to target space; `scale` is the length scale
/// of that mapping (for circle radii). Returns `None` for text and for items
/// missing the points their kind needs.
pub fn graphic_route(
    item: &GraphicItem,
    map: impl Fn(Point2) -> Point,
    scale: f64,
    resolution: f64,
) -> Option<Vec<Point>> {
    match item.kind {
        GraphicKind::Line => Some(vec![map(item.start?), map(item.end?)]),
        GraphicKind::Arc => {
            let (start, end) = (map(item.start?), map(item.end?));
            Some(match item.mid {
                Some(mid) => arc_points(start, map(mid), end, resolution),
                None => vec![start, end],
            })
        }
        GraphicKind::Circle => {
            let (center, end) = (item.center?, item.end?);
            let radius = ((end.x - center.x).powi(2) + (end.y - center.y).powi(2)).sqrt();
            Some(circle_points(map(center), radius * scale, resolution))
        }
        GraphicKind::Rect => {
            let corners = rect_corners(item.start?, item.end?);
            Some(closed(corners.iter().map(|&p| map(p)).collect()))
        }
        GraphicKind::Polygon => {
            if item.points.len() < 2 {
                return None;
            }
            Some(closed(item.points.iter().map(|&p| map(p)).collect()))
        }
        GraphicKind::Text => None,
    }
}

fn closed(mut points: Vec<Point>) -> Vec<Point> {
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

/// Consecutive point pairs of a route
pub fn route_segments(route: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    route.windows(2).map(|w| (w[0], w[1]))
}
