use std::collections::HashSet;

use super::labels::quadrant;
use crate::circuit_json::{
    FacingDirection, Point, SchematicComponent, SchematicPort, Size, SourceComponent,
};
use crate::context::{infer_component_type, ConverterContext};
use crate::defaults;
use crate::geometry::{bounds, rotate_point};
use crate::parser::{LibPin, SchematicDocument, SymbolInstance};
use crate::stages::{stage_state, ConverterStage};
use crate::transform::Transform;

/// Placed symbols → source component, `schematic_component` and one
/// `schematic_port` per library pin of the placed unit.
#[derive(Debug, Default)]
pub struct CollectLibrarySymbolsStage {
    finished: bool,
    processed: HashSet<String>,
}

impl ConverterStage for CollectLibrarySymbolsStage {
    stage_state!("CollectLibrarySymbolsStage");

    fn step(&mut self, ctx: &mut ConverterContext) -> bool {
        self.finished = true;
        let (Some(sch), Some(transform)) = (ctx.kicad_sch.clone(), ctx.sch_transform) else {
            return false;
        };

        for symbol in &sch.symbols {
            let Some(uuid) = symbol.uuid.as_deref() else {
                ctx.warn(format!(
                    "Skipping symbol {} without uuid",
                    symbol.reference().unwrap_or("<unnamed>")
                ));
                continue;
            };
            if !self.processed.insert(uuid.to_string()) {
                continue;
            }
            process_symbol(ctx, &sch, &transform, uuid, symbol);
        }

        false
    }
}

fn process_symbol(
    ctx: &mut ConverterContext,
    sch: &SchematicDocument,
    transform: &Transform,
    uuid: &str,
    symbol: &SymbolInstance,
) {
    if ctx.symbol_uuid_to_component_id.contains_key(uuid) {
        return;
    }

    let reference = symbol.reference().unwrap_or(defaults::component::NAME);
    let lib_id = symbol.lib_id.as_deref().unwrap_or_default();
    let key = if lib_id.is_empty() { reference } else { lib_id };
    let source_component_id = ctx.ensure_source_component(key, || SourceComponent {
        name: key.to_string(),
        ftype: infer_component_type(lib_id, reference),
        manufacturer_part_number: symbol.value().map(|v| v.to_string()),
        ..Default::default()
    });

    let anchor = symbol.position.map(|p| p.point()).unwrap_or_default();
    let angle = symbol.position.map(|p| p.angle_or_zero()).unwrap_or(0.);
    let scale = ctx.options.schematic_scale;
    // Only pins of the placed unit, plus those shared by all units
    let unit = symbol.unit.unwrap_or(1);
    let pins: Vec<&LibPin> = sch
        .lib_symbol(lib_id)
        .map(|lib| lib.pins.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|pin| pin.unit == 0 || pin.unit == unit)
        .collect();

    let offsets: Vec<Point> = pins
        .iter()
        .map(|pin| pin_offset(pin, angle, scale))
        .collect();
    let size = bounds(offsets.iter().copied())
        .map(|bb| Size {
            width: bb.width().max(defaults::schematic::MIN_COMPONENT_SIZE),
            height: bb.height().max(defaults::schematic::MIN_COMPONENT_SIZE),
        })
        .unwrap_or(Size {
            width: defaults::schematic::MIN_COMPONENT_SIZE,
            height: defaults::schematic::MIN_COMPONENT_SIZE,
        });

    let component_id = ctx
        .db
        .schematic_component
        .insert(SchematicComponent {
            source_component_id,
            center: transform.apply(anchor),
            size,
            rotation: angle,
            ..Default::default()
        })
        .schematic_component_id
        .clone();
    ctx.symbol_uuid_to_component_id
        .insert(uuid.to_string(), component_id.clone());

    for (pin, center) in pins.iter().zip(offsets) {
        let pin_angle = pin.position.map(|p| p.angle_or_zero()).unwrap_or(0.);
        ctx.db.schematic_port.insert(SchematicPort {
            schematic_component_id: component_id.clone(),
            center,
            facing_direction: facing_direction(orientation_code(pin_angle + angle)),
            pin_number: pin.number.clone(),
            ..Default::default()
        });
    }

    ctx.stats.components += 1;
}

/// Pin connection point relative to the symbol, in target units. Library
/// coordinates are already Y-up, so only rotation and scale apply.
fn pin_offset(pin: &LibPin, symbol_angle: f64, scale: f64) -> Point {
    let local = pin.position.map(|p| p.point()).unwrap_or_default();
    let r = rotate_point(local, symbol_angle);
    Point::new(r.x / scale, r.y / scale)
}

/// KiCad pin orientation code for an angle: 0 → R, 90 → U, 180 → L, 270 → D.
fn orientation_code(angle: f64) -> &'static str {
    match quadrant(angle) {
        1 => "U",
        2 => "L",
        3 => "D",
        _ => "R",
    }
}

fn facing_direction(code: &str) -> FacingDirection {
    match code {
        "R" => FacingDirection::Right,
        "L" => FacingDirection::Left,
        "U" => FacingDirection::Up,
        "D" => FacingDirection::Down,
        _ => FacingDirection::Right,
    }
}
