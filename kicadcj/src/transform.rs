//! Coordinate transforms from KiCad document space to Circuit JSON space
//!
//! KiCad uses millimeters with Y growing downward. Circuit JSON uses Y up,
//! with the board outline center (board) or the sheet center (schematic)
//! at the origin. Schematic coordinates are additionally scaled down.

use crate::circuit_json::Point;
use crate::defaults;
use crate::geometry::{self, Bounds};
use crate::parser::{GraphicKind, Paper, PcbDocument, Point2, SchematicDocument};

/// # Transform
///
/// Affine matrix-vector transform. Points map as `p' = a * p + b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Rotation / scale matrix, row-major
    pub a: [[f64; 2]; 2],
    /// X-Y translation
    pub b: [f64; 2],
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [0., 0.],
        }
    }

    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [x, y],
        }
    }

    /// Rotate by `angle` degrees, counter-clockwise in a Y-up space
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self {
            a: [[cos, -sin], [sin, cos]],
            b: [0., 0.],
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: [[sx, 0.], [0., sy]],
            b: [0., 0.],
        }
    }

    /// Reflect about the x-axis
    pub fn reflect_vert() -> Self {
        Self::scale(1., -1.)
    }

    /// `child` applied first, then `parent`. Not commutative.
    pub fn cascade(parent: &Transform, child: &Transform) -> Transform {
        let mut b = matvec(&parent.a, &child.b);
        b[0] += parent.b[0];
        b[1] += parent.b[1];
        let a = matmul(&parent.a, &child.a);
        Self { a, b }
    }

    pub fn apply(&self, p: Point2) -> Point {
        let [x, y] = matvec(&self.a, &[p.x, p.y]);
        Point::new(x + self.b[0], y + self.b[1])
    }

    /// Uniform scale factor. Assumes no shear, which holds for every
    /// transform built in this crate.
    pub fn scale_factor(&self) -> f64 {
        (self.a[0][0] * self.a[1][1] - self.a[0][1] * self.a[1][0])
            .abs()
            .sqrt()
    }
}

fn matmul(a: &[[f64; 2]; 2], b: &[[f64; 2]; 2]) -> [[f64; 2]; 2] {
    [
        [
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
        ],
        [
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        ],
    ]
}

fn matvec(a: &[[f64; 2]; 2], b: &[f64; 2]) -> [f64; 2] {
    [
        a[0][0] * b[0] + a[0][1] * b[1],
        a[1][0] * b[0] + a[1][1] * b[1],
    ]
}

/// Board space: `x' = x - cx`, `y' = -(y - cy)` where `(cx, cy)` is the
/// center of the Edge.Cuts bounding box, or the origin without an outline.
pub fn board_transform(pcb: &PcbDocument) -> Transform {
    let center = board_outline_bounds(pcb)
        .map(|b| b.center())
        .unwrap_or_default();
    Transform::cascade(
        &Transform::reflect_vert(),
        &Transform::translate(-center.x, -center.y),
    )
}

/// Source-space bounding box of all Edge.Cuts geometry
pub fn board_outline_bounds(pcb: &PcbDocument) -> Option<Bounds> {
    let mut points: Vec<Point2> = Vec::new();
    for item in pcb
        .graphics
        .iter()
        .filter(|g| g.layer.as_deref().map_or(false, |l| l.contains("Edge.Cuts")))
    {
        match item.kind {
            GraphicKind::Circle => {
                if let (Some(c), Some(e)) = (item.center, item.end) {
                    let r = ((e.x - c.x).powi(2) + (e.y - c.y).powi(2)).sqrt();
                    points.push(Point2::new(c.x - r, c.y - r));
                    points.push(Point2::new(c.x + r, c.y + r));
                }
            }
            GraphicKind::Polygon => points.extend(item.points.iter().copied()),
            GraphicKind::Text => {}
            _ => points.extend([item.start, item.mid, item.end].into_iter().flatten()),
        }
    }
    geometry::bounds(points.iter().map(|p| Point::new(p.x, p.y)))
}

/// Schematic space: `x' = (x - pcx) / s`, `y' = -(y - pcy) / s` around the
/// paper center `(pcx, pcy)`.
pub fn schematic_transform(sch: &SchematicDocument, scale: f64) -> Transform {
    let (width, height) = paper_size(sch.paper.as_ref());
    Transform::cascade(
        &Transform::scale(1. / scale, -1. / scale),
        &Transform::translate(-width / 2., -height / 2.),
    )
}

/// Sheet size in mm (width, height), honoring portrait orientation.
pub fn paper_size(paper: Option<&Paper>) -> (f64, f64) {
    let Some(paper) = paper else {
        return defaults::schematic::PAPER_SIZE;
    };
    if let Some(custom) = paper.custom {
        return custom;
    }
    let (w, h) = match paper.size.as_str() {
        "A5" => (210.0, 148.0),
        "A4" => (297.0, 210.0),
        "A3" => (420.0, 297.0),
        "A2" => (594.0, 420.0),
        "A1" => (841.0, 594.0),
        "A0" => (1189.0, 841.0),
        "A" => (279.4, 215.9),
        "B" => (431.8, 279.4),
        "C" => (558.8, 431.8),
        "D" => (863.6, 558.8),
        "E" => (1117.6, 863.6),
        "USLetter" => (279.4, 215.9),
        "USLegal" => (355.6, 215.9),
        "USLedger" => (431.8, 279.4),
        _ => defaults::schematic::PAPER_SIZE,
    };
    if paper.portrait {
        (h, w)
    } else {
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::GraphicItem;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    fn edge(start: (f64, f64), end: (f64, f64)) -> GraphicItem {
        GraphicItem {
            kind: GraphicKind::Line,
            layer: Some("Edge.Cuts".to_string()),
            start: Some(Point2::new(start.0, start.1)),
            end: Some(Point2::new(end.0, end.1)),
            ..Default::default()
        }
    }

    #[test]
    fn test_cascade_order() {
        // Reflect after translating: (1,1) + (1,1) = (2,2), reflected → (2,-2)
        let t = Transform::cascade(&Transform::reflect_vert(), &Transform::translate(1., 1.));
        assert!(close(t.apply(Point2::new(1., 1.)), Point::new(2., -2.)));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let t = Transform::rotate(90.);
        assert!(close(t.apply(Point2::new(1., 0.)), Point::new(0., 1.)));
    }

    #[test]
    fn test_board_without_outline_only_flips() {
        let t = board_transform(&PcbDocument::default());
        assert!(close(t.apply(Point2::new(0., 0.)), Point::new(0., 0.)));
        assert!(close(t.apply(Point2::new(3., 4.)), Point::new(3., -4.)));
    }

    #[test]
    fn test_board_centered_on_outline() {
        let pcb = PcbDocument {
            graphics: vec![
                edge((100., 50.), (140., 50.)),
                edge((140., 50.), (140., 80.)),
                edge((140., 80.), (100., 80.)),
                edge((100., 80.), (100., 50.)),
            ],
            ..Default::default()
        };
        let t = board_transform(&pcb);
        assert!(close(t.apply(Point2::new(120., 65.)), Point::new(0., 0.)));
        assert!(close(t.apply(Point2::new(100., 50.)), Point::new(-20., 15.)));
    }

    #[test]
    fn test_schematic_default_paper() {
        let t = schematic_transform(&SchematicDocument::default(), 15.);
        assert!(close(t.apply(Point2::new(148.5, 105.)), Point::new(0., 0.)));
        assert!(close(t.apply(Point2::new(163.5, 90.)), Point::new(1., 1.)));
        assert!((t.scale_factor() - 1. / 15.).abs() < 1e-12);
    }

    #[test]
    fn test_paper_sizes() {
        let portrait = Paper {
            size: "A3".to_string(),
            portrait: true,
            custom: None,
        };
        assert_eq!(paper_size(Some(&portrait)), (297.0, 420.0));
        assert_eq!(paper_size(None), (297.0, 210.0));
    }
}
