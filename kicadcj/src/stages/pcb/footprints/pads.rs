use super::{is_quarter_turn, Placement};
use crate::circuit_json::{
    HoleShape, LayerRef, PcbHole, PcbPlatedHole, PcbSmtPad, PlatedHoleShape, SmtPadShape,
};
use crate::context::ConverterContext;
use crate::defaults;
use crate::parser::{Pad, PadShape, PadType};
use crate::stages::pcb::layers::pad_layer;

/// Emit one pad as an SMT pad, plated hole or unplated hole.
pub(super) fn process_pad(
    ctx: &mut ConverterContext,
    placement: &Placement,
    component_id: &str,
    pad: &Pad,
) {
    let local = pad.position.map(|p| p.point()).unwrap_or_default();
    let center = placement.to_board(local);
    let port_hints: Vec<String> = pad
        .number
        .iter()
        .filter(|n| !n.is_empty())
        .cloned()
        .collect();

    match pad.pad_type {
        Some(PadType::Smd) => {
            let (width, height) = pad_size(pad);
            ctx.db.pcb_smtpad.insert(PcbSmtPad {
                pcb_component_id: component_id.to_string(),
                x: center.x,
                y: center.y,
                shape: if pad.shape == Some(PadShape::Circle) {
                    SmtPadShape::Circle
                } else {
                    SmtPadShape::Rect
                },
                width,
                height,
                layer: pad_layer(&pad.layers),
                port_hints,
                ..Default::default()
            });
            ctx.stats.pads += 1;
        }
        Some(PadType::NpThruHole) => {
            let hole_diameter = pad
                .drill
                .as_ref()
                .and_then(|d| d.diameter)
                .unwrap_or(defaults::hole::DRILL);
            ctx.db.pcb_hole.insert(PcbHole {
                x: center.x,
                y: center.y,
                hole_shape: HoleShape::Circle,
                hole_diameter,
                ..Default::default()
            });
        }
        _ => {
            let pad_angle = pad.position.map(|p| p.angle_or_zero()).unwrap_or(0.);
            let shape = plated_hole_shape(pad, pad_angle + placement.angle);
            ctx.db.pcb_plated_hole.insert(PcbPlatedHole {
                pcb_component_id: component_id.to_string(),
                x: center.x,
                y: center.y,
                shape,
                layers: vec![LayerRef::Top, LayerRef::Bottom],
                port_hints,
                ..Default::default()
            });
            ctx.stats.pads += 1;
        }
    }
}

fn pad_size(pad: &Pad) -> (f64, f64) {
    pad.size
        .map(|s| (s.width, s.height))
        .unwrap_or(defaults::pad::SIZE)
}

/// Plated hole geometry from the pad shape and drill.
///
/// Oval pads become pills, swapped when the combined pad and footprint
/// angle is a quarter turn. Rectangular pads keep a round hole unless the
/// drill is oval.
fn plated_hole_shape(pad: &Pad, total_angle: f64) -> PlatedHoleShape {
    let (width, height) = pad_size(pad);
    let drill = pad.drill.as_ref();
    let (hole_width, hole_height) = drill
        .and_then(|d| d.dimensions())
        .unwrap_or((defaults::pad::PLATED_DRILL, defaults::pad::PLATED_DRILL));
    let oval_drill = drill.map_or(false, |d| d.oval);

    match pad.shape {
        Some(PadShape::Oval) => {
            let swap = is_quarter_turn(total_angle);
            let (outer_width, outer_height) = if swap { (height, width) } else { (width, height) };
            let (hole_width, hole_height) = if swap {
                (hole_height, hole_width)
            } else {
                (hole_width, hole_height)
            };
            PlatedHoleShape::Pill {
                hole_width,
                hole_height,
                outer_width,
                outer_height,
            }
        }
        Some(PadShape::Rect) | Some(PadShape::Square) | Some(PadShape::RoundRect) => {
            if oval_drill {
                PlatedHoleShape::PillHoleWithRectPad {
                    hole_width,
                    hole_height,
                    rect_pad_width: width,
                    rect_pad_height: height,
                }
            } else {
                PlatedHoleShape::CircularHoleWithRectPad {
                    hole_diameter: hole_width,
                    rect_pad_width: width,
                    rect_pad_height: height,
                }
            }
        }
        _ => PlatedHoleShape::Circle {
            hole_diameter: hole_width,
            outer_diameter: width.max(height),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Drill, Point2, Position, Size2D};
    use crate::transform::Transform;

    fn pad(shape: PadShape, size: (f64, f64), drill: Option<Drill>, angle: f64) -> Pad {
        Pad {
            number: Some("1".to_string()),
            pad_type: Some(PadType::ThruHole),
            shape: Some(shape),
            position: Some(Position {
                x: 0.,
                y: 0.,
                angle: Some(angle),
            }),
            size: Some(Size2D {
                width: size.0,
                height: size.1,
            }),
            drill,
            ..Default::default()
        }
    }

    fn round(d: f64) -> Option<Drill> {
        Some(Drill {
            diameter: Some(d),
            ..Default::default()
        })
    }

    #[test]
    fn test_oval_pad_swaps_at_quarter_turn() {
        let shape = plated_hole_shape(&pad(PadShape::Oval, (1.2, 2.0), round(0.6), 0.), 90.);
        assert_eq!(
            shape,
            PlatedHoleShape::Pill {
                hole_width: 0.6,
                hole_height: 0.6,
                outer_width: 2.0,
                outer_height: 1.2,
            }
        );
    }

    #[test]
    fn test_oval_pad_unrotated() {
        let oval = Some(Drill {
            oval: true,
            diameter: Some(0.6),
            height: Some(1.0),
            offset: None,
        });
        let shape = plated_hole_shape(&pad(PadShape::Oval, (1.2, 2.0), oval, 180.), 0.);
        assert_eq!(
            shape,
            PlatedHoleShape::Pill {
                hole_width: 0.6,
                hole_height: 1.0,
                outer_width: 1.2,
                outer_height: 2.0,
            }
        );
    }

    #[test]
    fn test_rect_pad_variants() {
        let round_hole = plated_hole_shape(&pad(PadShape::Rect, (1.7, 1.7), round(1.0), 0.), 0.);
        assert!(matches!(
            round_hole,
            PlatedHoleShape::CircularHoleWithRectPad { hole_diameter, .. } if hole_diameter == 1.0
        ));

        let oval = Some(Drill {
            oval: true,
            diameter: Some(0.8),
            height: Some(1.6),
            offset: None,
        });
        let pill_hole = plated_hole_shape(&pad(PadShape::RoundRect, (1.5, 2.5), oval, 0.), 0.);
        assert!(matches!(pill_hole, PlatedHoleShape::PillHoleWithRectPad { .. }));
    }

    #[test]
    fn test_missing_drill_defaults() {
        let shape = plated_hole_shape(&pad(PadShape::Circle, (1.6, 1.6), None, 0.), 0.);
        assert_eq!(
            shape,
            PlatedHoleShape::Circle {
                hole_diameter: 0.8,
                outer_diameter: 1.6,
            }
        );
    }

    #[test]
    fn test_unknown_shape_is_circle() {
        let shape = plated_hole_shape(&pad(PadShape::Trapezoid, (1., 1.), round(0.5), 0.), 0.);
        assert!(matches!(shape, PlatedHoleShape::Circle { .. }));
    }

    #[test]
    fn test_pad_center_uses_negated_angle() {
        let placement = Placement {
            transform: Transform::identity(),
            anchor: Point2::new(0., 0.),
            angle: 90.,
        };
        let mut p = pad(PadShape::Circle, (1., 1.), None, 0.);
        p.position = Some(Position {
            x: 0.,
            y: 2.,
            angle: None,
        });
        let c = placement.to_board(p.position.unwrap().point());
        assert!((c.x - 2.).abs() < 1e-9);
        assert!(c.y.abs() < 1e-9);
    }
}
